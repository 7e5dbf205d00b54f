use actix_web::{web, HttpResponse, Responder};

// Endpoint для проверки работоспособности
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "宠归家后端服务运行正常 🐾"
    }))
}

// Ответ на неизвестные маршруты
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "接口不存在"
    }))
}

// Конфигурация маршрутов
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_check));
}
