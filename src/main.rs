pub mod application_handlers;
pub mod auth_handlers;
pub mod chats;
pub mod favorite_handlers;
pub mod handlers;
pub mod message_handlers;
pub mod middleware;
pub mod models;
pub mod pet_handlers;
pub mod supabase;

use actix_cors::Cors;
use actix_web::{http::header, middleware as actix_middleware, web, App, HttpServer};
use dotenv::dotenv;
use std::env;

use middleware::AuthMiddleware;
use supabase::SupabaseService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Загрузка переменных окружения
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Без проекта Supabase сервер бесполезен — не стартуем
    let supabase_url = env::var("SUPABASE_URL").unwrap_or_else(|_| {
        eprintln!("❌ 错误: 缺少 SUPABASE_URL 环境变量");
        std::process::exit(1);
    });
    let supabase_key = env::var("SUPABASE_ANON_KEY").unwrap_or_else(|_| {
        eprintln!("❌ 错误: 缺少 SUPABASE_ANON_KEY 环境变量");
        std::process::exit(1);
    });

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| {
        println!("PORT 未设置，使用默认端口 3001");
        "3001".to_string()
    });

    let supabase_service = SupabaseService::new(supabase_url, supabase_key);
    let supabase_data = web::Data::new(supabase_service.clone());

    let bind_address = format!("{}:{}", host, port);
    println!("\n🐾 宠归家后端服务已启动");
    println!("📡 地址: http://{}", bind_address);
    println!("\n=== API Endpoints ===");
    println!("Health Check:");
    println!("  GET    http://{}/api/health", bind_address);
    println!("\nAuth:");
    println!("  POST   http://{}/api/auth/register", bind_address);
    println!("  POST   http://{}/api/auth/login", bind_address);
    println!("  POST   http://{}/api/auth/logout", bind_address);
    println!("  GET    http://{}/api/auth/me", bind_address);
    println!("\nPets:");
    println!("  GET    http://{}/api/pets", bind_address);
    println!("  GET    http://{}/api/pets/{{id}}", bind_address);
    println!("  POST   http://{}/api/pets", bind_address);
    println!("\nApplications:");
    println!("  POST   http://{}/api/applications", bind_address);
    println!("  GET    http://{}/api/applications/mine", bind_address);
    println!("\nFavorites:");
    println!("  GET    http://{}/api/favorites", bind_address);
    println!("  POST   http://{}/api/favorites", bind_address);
    println!("  DELETE http://{}/api/favorites/{{pet_id}}", bind_address);
    println!("\nMessages:");
    println!("  GET    http://{}/api/messages", bind_address);
    println!("  POST   http://{}/api/messages", bind_address);
    println!("\n===================\n");

    // Запуск HTTP сервера
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(supabase_data.clone())
            .wrap(actix_middleware::Logger::default())
            .wrap(cors)
            .configure(handlers::configure_routes)
            .configure(auth_handlers::configure_auth_routes)
            .configure(pet_handlers::configure_pet_routes)
            .service(
                web::scope("/api/applications")
                    .wrap(AuthMiddleware::new(supabase_service.clone()))
                    .configure(application_handlers::configure_application_routes),
            )
            .service(
                web::scope("/api/favorites")
                    .wrap(AuthMiddleware::new(supabase_service.clone()))
                    .configure(favorite_handlers::configure_favorite_routes),
            )
            .service(
                web::scope("/api/messages")
                    .wrap(AuthMiddleware::new(supabase_service.clone()))
                    .configure(message_handlers::configure_message_routes),
            )
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(&bind_address)?
    .run()
    .await
}
