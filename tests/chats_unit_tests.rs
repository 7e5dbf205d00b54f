use chrono::{Duration, TimeZone, Utc};
use pet_home_backend::chats::{group_into_chats, MessageRecord, PartnerKey};
use uuid::Uuid;

// Сообщение с отметкой времени «minutes_ago минут назад»: чем меньше
// аргумент, тем новее сообщение
fn message(
    sender_id: Option<Uuid>,
    receiver_id: Option<Uuid>,
    content: &str,
    minutes_ago: i64,
    is_read: bool,
) -> MessageRecord {
    MessageRecord {
        id: Uuid::new_v4(),
        sender_id,
        receiver_id,
        content: content.to_string(),
        sender_name: None,
        sender_avatar: None,
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
            - Duration::minutes(minutes_ago),
        is_read,
    }
}

#[cfg(test)]
mod grouping_tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_output() {
        let user = Uuid::new_v4();
        assert!(group_into_chats(&[], user).is_empty());
    }

    #[test]
    fn test_one_summary_per_partner() {
        let user = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let messages = vec![
            message(Some(alice), Some(user), "привет", 0, true),
            message(Some(bob), Some(user), "здравствуйте", 1, true),
            message(Some(user), Some(alice), "ответ", 2, true),
            message(Some(alice), Some(user), "старое", 3, true),
        ];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats.len(), 2);
    }

    #[test]
    fn test_two_partners_each_echo_their_message() {
        let user = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let from_alice = message(Some(alice), Some(user), "想领养小猫", 0, true);
        let from_bob = message(Some(bob), Some(user), "狗狗还在吗", 5, true);
        let messages = vec![from_alice.clone(), from_bob.clone()];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats.len(), 2);

        assert_eq!(chats[0].id, from_alice.id);
        assert_eq!(chats[0].partner_id, Some(alice));
        assert_eq!(chats[0].last_message, "想领养小猫");
        assert_eq!(chats[0].time, from_alice.created_at);

        assert_eq!(chats[1].id, from_bob.id);
        assert_eq!(chats[1].partner_id, Some(bob));
        assert_eq!(chats[1].last_message, "狗狗还在吗");
        assert_eq!(chats[1].time, from_bob.created_at);
    }

    #[test]
    fn test_newest_first_input_keeps_newest_as_last_message() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        // Новые первыми, две непрочитанные адресованы пользователю,
        // третья уже прочитана
        let newest = message(Some(partner), Some(user), "最新消息", 0, false);
        let middle = message(Some(partner), Some(user), "第二条", 10, false);
        let oldest = message(Some(partner), Some(user), "最早", 20, true);
        let messages = vec![newest.clone(), middle, oldest];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, newest.id);
        assert_eq!(chats[0].last_message, "最新消息");
        assert_eq!(chats[0].time, newest.created_at);
        assert_eq!(chats[0].unread, 2);
    }

    #[test]
    fn test_display_fields_follow_input_order_not_timestamps() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        // Контракт вызывающей стороны: порядок убывания created_at.
        // Если подать наоборот, сводка показывает первое встреченное,
        // то есть старое сообщение — поведение сохранено намеренно.
        let oldest = message(Some(partner), Some(user), "старое", 60, true);
        let newest = message(Some(partner), Some(user), "новое", 0, true);
        let messages = vec![oldest.clone(), newest];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats[0].last_message, "старое");
        assert_eq!(chats[0].time, oldest.created_at);
    }

    #[test]
    fn test_output_order_is_first_encounter_order() {
        let user = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        let messages = vec![
            message(Some(first), Some(user), "a", 0, true),
            message(Some(second), Some(user), "b", 1, true),
            message(Some(first), Some(user), "c", 2, true),
            message(Some(third), Some(user), "d", 3, true),
        ];

        let chats = group_into_chats(&messages, user);
        let order: Vec<_> = chats.iter().map(|c| c.partner_id).collect();
        assert_eq!(order, vec![Some(first), Some(second), Some(third)]);
    }

    #[test]
    fn test_idempotent_over_same_input() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        let messages = vec![
            message(Some(partner), Some(user), "раз", 0, false),
            message(Some(user), Some(partner), "два", 1, true),
            message(None, Some(user), "три", 2, false),
        ];
        let before = messages.clone();

        let first_run = group_into_chats(&messages, user);
        let second_run = group_into_chats(&messages, user);

        assert_eq!(first_run, second_run);
        // Входные записи не мутируются
        for (a, b) in messages.iter().zip(before.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.content, b.content);
            assert_eq!(a.is_read, b.is_read);
        }
    }
}

#[cfg(test)]
mod unread_count_tests {
    use super::*;

    #[test]
    fn test_unread_counts_only_unread_addressed_to_user() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        let messages = vec![
            message(Some(partner), Some(user), "непрочитанное", 0, false),
            message(Some(partner), Some(user), "прочитанное", 1, true),
            // Отправлено самим пользователем — не считается, даже без is_read
            message(Some(user), Some(partner), "моё", 2, false),
            message(Some(partner), Some(user), "ещё одно", 3, false),
        ];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].unread, 2);
    }

    #[test]
    fn test_all_read_gives_zero_unread() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        let messages = vec![
            message(Some(partner), Some(user), "a", 0, true),
            message(Some(partner), Some(user), "b", 1, true),
        ];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats[0].unread, 0);
    }

    #[test]
    fn test_first_message_unread_initializes_counter() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        let messages = vec![message(Some(partner), Some(user), "a", 0, false)];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats[0].unread, 1);
    }

    #[test]
    fn test_unread_sums_across_later_messages_per_partner() {
        let user = Uuid::new_v4();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let messages = vec![
            message(Some(alice), Some(user), "a1", 0, false),
            message(Some(bob), Some(user), "b1", 1, true),
            message(Some(alice), Some(user), "a2", 2, false),
            message(Some(bob), Some(user), "b2", 3, false),
            message(Some(alice), Some(user), "a3", 4, false),
        ];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].unread, 3);
        assert_eq!(chats[1].unread, 1);
    }
}

#[cfg(test)]
mod partner_key_tests {
    use super::*;

    #[test]
    fn test_partner_is_the_other_participant() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        let incoming = message(Some(partner), Some(user), "in", 0, true);
        let outgoing = message(Some(user), Some(partner), "out", 1, true);

        assert_eq!(incoming.partner_id(user), Some(partner));
        assert_eq!(outgoing.partner_id(user), Some(partner));
        assert_eq!(incoming.partner_key(user), PartnerKey::Id(partner));
        assert_eq!(outgoing.partner_key(user), PartnerKey::Id(partner));
    }

    #[test]
    fn test_system_senders_grouped_by_name() {
        let user = Uuid::new_v4();

        // У системных отправителей нет аккаунта — группировка по имени
        let mut shelter_a = message(None, Some(user), "来自A", 0, true);
        shelter_a.sender_name = Some("Shelter A".to_string());
        let mut shelter_b = message(None, Some(user), "来自B", 1, true);
        shelter_b.sender_name = Some("Shelter B".to_string());
        let mut shelter_a_again = message(None, Some(user), "A再次", 2, false);
        shelter_a_again.sender_name = Some("Shelter A".to_string());

        let chats = group_into_chats(&[shelter_a, shelter_b, shelter_a_again], user);
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].sender_name.as_deref(), Some("Shelter A"));
        assert_eq!(chats[0].unread, 1);
        assert_eq!(chats[1].sender_name.as_deref(), Some("Shelter B"));
    }

    #[test]
    fn test_messages_without_partner_and_name_share_one_bucket() {
        let user = Uuid::new_v4();

        let messages = vec![
            message(None, Some(user), "аноним 1", 0, false),
            message(None, Some(user), "аноним 2", 1, false),
        ];

        let chats = group_into_chats(&messages, user);
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].unread, 2);
        assert_eq!(messages[0].partner_key(user), PartnerKey::Unknown);
    }

    #[test]
    fn test_name_fallback_applies_only_without_partner_id() {
        let user = Uuid::new_v4();
        let partner = Uuid::new_v4();

        // При наличии id собеседника имя не участвует в группировке
        let mut named = message(Some(partner), Some(user), "a", 0, true);
        named.sender_name = Some("Shelter A".to_string());

        assert_eq!(named.partner_key(user), PartnerKey::Id(partner));
    }
}
