use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

use crate::middleware::get_session_from_request;
use crate::models::{AddFavorite, ErrorResponse, Favorite};
use crate::supabase::{SupabaseError, SupabaseService};

// Список избранного со встроенной карточкой питомца
pub async fn list_favorites(
    supabase: web::Data<SupabaseService>,
    req: HttpRequest,
) -> impl Responder {
    let session = match get_session_from_request(&req) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    let query = [
        (
            "select",
            "*,pets(id,name,breed,age,image_url,gender)".to_string(),
        ),
        ("user_id", format!("eq.{}", session.user.id)),
        ("order", "created_at.desc".to_string()),
    ];

    match supabase
        .select::<Favorite>(Some(&session.access_token), "favorites", &query)
        .await
    {
        Ok(favorites) => HttpResponse::Ok().json(serde_json::json!({ "favorites": favorites })),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("获取收藏列表错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "获取收藏列表失败".to_string(),
            })
        }
    }
}

// Добавление в избранное
pub async fn add_favorite(
    supabase: web::Data<SupabaseService>,
    req: HttpRequest,
    payload: web::Json<AddFavorite>,
) -> impl Responder {
    let session = match get_session_from_request(&req) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    let row = serde_json::json!({
        "user_id": session.user.id,
        "pet_id": payload.pet_id,
    });

    match supabase
        .insert(Some(&session.access_token), "favorites", &row)
        .await
    {
        Ok(favorite) => HttpResponse::Created().json(serde_json::json!({
            "message": "收藏成功",
            "favorite": favorite,
        })),
        // Повторное добавление упирается в unique-индекс
        Err(e) if e.is_duplicate() => HttpResponse::BadRequest().json(ErrorResponse {
            error: "已收藏过该宠物".to_string(),
        }),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("添加收藏错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "收藏失败".to_string(),
            })
        }
    }
}

// Удаление из избранного
pub async fn remove_favorite(
    supabase: web::Data<SupabaseService>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    let session = match get_session_from_request(&req) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    let pet_id = path.into_inner();
    let query = [
        ("user_id", format!("eq.{}", session.user.id)),
        ("pet_id", format!("eq.{}", pet_id)),
    ];

    match supabase
        .delete(Some(&session.access_token), "favorites", &query)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "已取消收藏" })),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("取消收藏错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "取消收藏失败".to_string(),
            })
        }
    }
}

// Конфигурация маршрутов избранного
pub fn configure_favorite_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_favorites))
        .route("", web::post().to(add_favorite))
        .route("/{pet_id}", web::delete().to(remove_favorite));
}
