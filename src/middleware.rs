use actix_web::{
    body::MessageBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderMap,
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::supabase::{AuthUser, SupabaseError, SupabaseService};

// Сессия запроса: пользователь и его access token, проверенные GoTrue.
// Токен передаётся дальше в каждый вызов PostgREST — никакого ambient-состояния.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: String,
}

// Middleware для проверки Bearer токенов через Supabase
pub struct AuthMiddleware {
    supabase: Rc<SupabaseService>,
}

impl AuthMiddleware {
    pub fn new(supabase: SupabaseService) -> Self {
        Self {
            supabase: Rc::new(supabase),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            supabase: self.supabase.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    supabase: Rc<SupabaseService>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let supabase = self.supabase.clone();

        Box::pin(async move {
            // Извлечение токена из заголовка Authorization
            let token = match bearer_token(req.headers()) {
                Some(t) => t,
                None => return unauthorized(req, "请先登录"),
            };

            // Проверка токена на стороне GoTrue
            match supabase.get_user(&token).await {
                Ok(user) => {
                    req.extensions_mut().insert(AuthSession {
                        user,
                        access_token: token,
                    });
                    let res = service.call(req).await?;
                    Ok(res.map_into_boxed_body())
                }
                Err(SupabaseError::Auth { .. }) => unauthorized(req, "登录已过期"),
                Err(e) => {
                    eprintln!("鉴权失败: {}", e);
                    unauthorized(req, "身份验证失败")
                }
            }
        })
    }
}

fn unauthorized(req: ServiceRequest, message: &str) -> Result<ServiceResponse, Error> {
    let (http_req, _) = req.into_parts();
    let response = HttpResponse::Unauthorized().json(serde_json::json!({ "error": message }));
    Ok(ServiceResponse::new(http_req, response).map_into_boxed_body())
}

// Извлечение Bearer токена из заголовков
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    if !auth_str.starts_with("Bearer ") {
        return None;
    }

    Some(auth_str[7..].to_string())
}

// Helper для извлечения сессии из request
pub fn get_session_from_request(req: &actix_web::HttpRequest) -> Option<AuthSession> {
    req.extensions().get::<AuthSession>().cloned()
}
