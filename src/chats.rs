use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Строка таблицы messages, как её отдаёт Supabase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub content: String,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

// Сводка чата: одна запись на собеседника
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatSummary {
    pub id: Uuid,
    pub partner_id: Option<Uuid>,
    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
    pub last_message: String,
    pub time: DateTime<Utc>,
    pub unread: u32,
}

// Ключ группировки: id собеседника, иначе отображаемое имя отправителя
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartnerKey {
    Id(Uuid),
    Name(String),
    Unknown,
}

impl MessageRecord {
    // Участник, который не является запрашивающим пользователем
    pub fn partner_id(&self, user_id: Uuid) -> Option<Uuid> {
        if self.sender_id == Some(user_id) {
            self.receiver_id
        } else {
            self.sender_id
        }
    }

    pub fn partner_key(&self, user_id: Uuid) -> PartnerKey {
        match (self.partner_id(user_id), &self.sender_name) {
            (Some(id), _) => PartnerKey::Id(id),
            (None, Some(name)) => PartnerKey::Name(name.clone()),
            (None, None) => PartnerKey::Unknown,
        }
    }

    fn is_unread_for(&self, user_id: Uuid) -> bool {
        self.receiver_id == Some(user_id) && !self.is_read
    }
}

// Сворачивает плоский список сообщений пользователя в список чатов.
//
// Сообщения должны приходить в порядке убывания created_at (как их отдаёт
// store): поля last_message/time берутся из первого встреченного сообщения
// собеседника, поздние сообщения только увеличивают счётчик непрочитанных.
pub fn group_into_chats(messages: &[MessageRecord], user_id: Uuid) -> Vec<ChatSummary> {
    let mut chats: Vec<ChatSummary> = Vec::new();
    let mut seen: HashMap<PartnerKey, usize> = HashMap::new();

    for msg in messages {
        let key = msg.partner_key(user_id);

        match seen.get(&key) {
            None => {
                seen.insert(key, chats.len());
                chats.push(ChatSummary {
                    id: msg.id,
                    partner_id: msg.partner_id(user_id),
                    sender_name: msg.sender_name.clone(),
                    sender_avatar: msg.sender_avatar.clone(),
                    last_message: msg.content.clone(),
                    time: msg.created_at,
                    unread: if msg.is_unread_for(user_id) { 1 } else { 0 },
                });
            }
            Some(&index) => {
                if msg.is_unread_for(user_id) {
                    chats[index].unread += 1;
                }
            }
        }
    }

    chats
}
