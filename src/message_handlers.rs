use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::chats::{group_into_chats, MessageRecord};
use crate::middleware::get_session_from_request;
use crate::models::{ErrorResponse, SendMessageRequest};
use crate::supabase::{SupabaseError, SupabaseService};

// Фильтры PostgREST для выборки сообщений пользователя: он либо отправитель,
// либо получатель; новые сообщения первыми — порядок, на который рассчитывает
// группировка в chats
pub fn message_list_query(user_id: Uuid) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        (
            "or",
            format!("(sender_id.eq.{id},receiver_id.eq.{id})", id = user_id),
        ),
        ("order", "created_at.desc".to_string()),
    ]
}

// Список чатов: сообщения сворачиваются в сводки по собеседникам
pub async fn list_chats(supabase: web::Data<SupabaseService>, req: HttpRequest) -> impl Responder {
    let session = match get_session_from_request(&req) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    match supabase
        .select::<MessageRecord>(
            Some(&session.access_token),
            "messages",
            &message_list_query(session.user.id),
        )
        .await
    {
        Ok(messages) => {
            let chats = group_into_chats(&messages, session.user.id);
            HttpResponse::Ok().json(serde_json::json!({ "chats": chats }))
        }
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("获取消息列表错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "获取消息列表失败".to_string(),
            })
        }
    }
}

// Отправка сообщения
pub async fn send_message(
    supabase: web::Data<SupabaseService>,
    req: HttpRequest,
    payload: web::Json<SendMessageRequest>,
) -> impl Responder {
    let session = match get_session_from_request(&req) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    if let Err(errors) = payload.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("{}", errors),
        });
    }

    let request = payload.into_inner();

    let row = serde_json::json!({
        "sender_id": session.user.id,
        "receiver_id": request.receiver_id,
        "content": request.content,
        "sender_name": request.sender_name.unwrap_or_else(|| "用户".to_string()),
        "sender_avatar": request.sender_avatar.unwrap_or_default(),
    });

    match supabase
        .insert(Some(&session.access_token), "messages", &row)
        .await
    {
        Ok(message) => HttpResponse::Created().json(serde_json::json!({
            "message": "发送成功",
            "data": message,
        })),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("发送消息错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "发送消息失败".to_string(),
            })
        }
    }
}

// Конфигурация маршрутов сообщений
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_chats))
        .route("", web::post().to(send_message));
}
