use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::middleware::get_session_from_request;
use crate::models::{Application, ErrorResponse, NewApplication};
use crate::supabase::{SupabaseError, SupabaseService};

// Подача заявки на усыновление
pub async fn submit_application(
    supabase: web::Data<SupabaseService>,
    req: HttpRequest,
    payload: web::Json<NewApplication>,
) -> impl Responder {
    let session = match get_session_from_request(&req) {
        Some(s) => s,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    let request = payload.into_inner();

    let row = serde_json::json!({
        "user_id": session.user.id,
        "pet_id": request.pet_id,
        "housing_type": request.housing_type.unwrap_or_default(),
        "experience": request.experience.unwrap_or_default(),
        "family_members": request.family_members.unwrap_or_default(),
        "work_schedule": request.work_schedule.unwrap_or_default(),
        "status": "待审核",
    });

    match supabase
        .insert(Some(&session.access_token), "applications", &row)
        .await
    {
        Ok(application) => HttpResponse::Created().json(serde_json::json!({
            "message": "领养申请提交成功！",
            "application": application,
        })),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("提交申请错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "提交申请失败".to_string(),
            })
        }
    }
}

// Мои заявки со встроенной карточкой питомца
pub async fn my_applications(
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
            "*,pets(id,name,breed,age,image_url)".to_string(),
        ),
        ("user_id", format!("eq.{}", session.user.id)),
        ("order", "created_at.desc".to_string()),
    ];

    match supabase
        .select::<Application>(Some(&session.access_token), "applications", &query)
        .await
    {
        Ok(applications) => {
            HttpResponse::Ok().json(serde_json::json!({ "applications": applications }))
        }
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("获取申请列表错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "获取申请列表失败".to_string(),
            })
        }
    }
}

// Конфигурация маршрутов заявок
pub fn configure_application_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(submit_application))
        .route("/mine", web::get().to(my_applications));
}
