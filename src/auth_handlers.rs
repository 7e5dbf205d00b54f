use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::middleware::bearer_token;
use crate::models::{ErrorResponse, LoginRequest, ProfileRow, RegisterRequest, UserProfile};
use crate::supabase::{SupabaseError, SupabaseService};

// Регистрация через GoTrue
pub async fn register(
    supabase: web::Data<SupabaseService>,
    request: web::Json<RegisterRequest>,
) -> impl Responder {
    // Валидация входных данных
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("{}", errors),
        });
    }

    let nickname = request.nickname.as_deref().unwrap_or("新用户");

    match supabase
        .sign_up(&request.email, &request.password, nickname)
        .await
    {
        Ok((user, Some(session))) => HttpResponse::Ok().json(serde_json::json!({
            "message": "注册成功",
            "user": user,
            "session": session,
        })),
        // Включено подтверждение почты: сессии ещё нет
        Ok((user, None)) => HttpResponse::Ok().json(serde_json::json!({
            "message": "注册成功！请查收邮箱验证链接后再登录",
            "needEmailConfirm": true,
            "user": user,
        })),
        Err(SupabaseError::Auth { message, .. }) => {
            eprintln!("Supabase注册错误: {}", message);
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("注册错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "注册失败".to_string(),
            })
        }
    }
}

// Вход по email и паролю
pub async fn login(
    supabase: web::Data<SupabaseService>,
    request: web::Json<LoginRequest>,
) -> impl Responder {
    if let Err(errors) = request.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("{}", errors),
        });
    }

    match supabase.sign_in(&request.email, &request.password).await {
        Ok(session) => {
            let user = session.user.clone();
            HttpResponse::Ok().json(serde_json::json!({
                "message": "登录成功",
                "user": user,
                "session": session,
            }))
        }
        Err(SupabaseError::Auth { status, message }) => {
            eprintln!("Supabase登录错误: {} | 状态: {}", message, status);

            // Различаем типы отказа GoTrue
            let error = if message.contains("Email not confirmed") {
                "邮箱尚未验证，请检查您的邮箱并点击验证链接".to_string()
            } else if message.contains("Invalid login credentials") {
                "邮箱或密码错误".to_string()
            } else {
                message
            };

            HttpResponse::Unauthorized().json(ErrorResponse { error })
        }
        Err(e) => {
            eprintln!("登录错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "登录失败".to_string(),
            })
        }
    }
}

// Выход: отзываем токен, если он был передан
pub async fn logout(supabase: web::Data<SupabaseService>, req: HttpRequest) -> impl Responder {
    if let Some(token) = bearer_token(req.headers()) {
        if let Err(e) = supabase.sign_out(&token).await {
            // Просроченный токен не мешает выходу
            eprintln!("登出错误: {}", e);
        }
    }

    HttpResponse::Ok().json(serde_json::json!({ "message": "已退出登录" }))
}

// Текущий пользователь: auth-запись GoTrue + строка profiles
pub async fn me(supabase: web::Data<SupabaseService>, req: HttpRequest) -> impl Responder {
    let token = match bearer_token(req.headers()) {
        Some(t) => t,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "未登录".to_string(),
            })
        }
    };

    let user = match supabase.get_user(&token).await {
        Ok(user) => user,
        Err(SupabaseError::Auth { .. }) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "登录已过期".to_string(),
            })
        }
        Err(e) => {
            eprintln!("获取用户信息错误: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "获取用户信息失败".to_string(),
            });
        }
    };

    // Профиль может отсутствовать у свежего аккаунта
    let profile = supabase
        .select::<ProfileRow>(
            Some(&token),
            "profiles",
            &[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", user.id)),
            ],
        )
        .await
        .unwrap_or_default()
        .into_iter()
        .next();

    let response = UserProfile {
        id: user.id,
        email: user.email.unwrap_or_default(),
        nickname: profile
            .as_ref()
            .and_then(|p| p.nickname.clone())
            .unwrap_or_else(|| "新用户".to_string()),
        avatar_url: profile
            .as_ref()
            .and_then(|p| p.avatar_url.clone())
            .unwrap_or_default(),
        phone: profile
            .as_ref()
            .and_then(|p| p.phone.clone())
            .unwrap_or_default(),
        created_at: profile.as_ref().and_then(|p| p.created_at).or(user.created_at),
    };

    HttpResponse::Ok().json(serde_json::json!({ "user": response }))
}

// Конфигурация маршрутов аутентификации
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me)),
    );
}
