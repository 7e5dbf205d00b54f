use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// Ошибки при обращении к Supabase
#[derive(Debug)]
pub enum SupabaseError {
    // Транспортная ошибка reqwest
    Request(reqwest::Error),
    // Отказ GoTrue (регистрация, вход, проверка токена)
    Auth { status: u16, message: String },
    // Отказ PostgREST; code сохраняем для обработки 23505
    Database {
        status: u16,
        code: Option<String>,
        message: String,
    },
    // Ответ пришёл, но не распарсился
    Decode(String),
}

impl std::fmt::Display for SupabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupabaseError::Request(e) => write!(f, "请求 Supabase 失败: {}", e),
            SupabaseError::Auth { status, message } => {
                write!(f, "认证错误 ({}): {}", status, message)
            }
            SupabaseError::Database {
                status, message, ..
            } => write!(f, "数据库错误 ({}): {}", status, message),
            SupabaseError::Decode(detail) => write!(f, "响应解析失败: {}", detail),
        }
    }
}

impl std::error::Error for SupabaseError {}

impl SupabaseError {
    // Нарушение уникальности в Postgres (повторное избранное и т.п.)
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            SupabaseError::Database { code: Some(c), .. } if c == "23505"
        )
    }
}

// Пользователь GoTrue; лишние поля ответа игнорируются
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub user_metadata: Value,
}

// Токены сессии из ответа GoTrue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub user: Option<AuthUser>,
}

// Клиент hosted-бэкенда: GoTrue (auth/v1) + PostgREST (rest/v1).
//
// Каждый запрос несёт apikey проекта; запросы от имени пользователя дополнительно
// несут его Bearer-токен, чтобы сработали политики row-level security.
#[derive(Clone)]
pub struct SupabaseService {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseService {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    // Регистрация. При включённом подтверждении почты GoTrue возвращает только
    // пользователя без сессии.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<(Option<AuthUser>, Option<SessionTokens>), SupabaseError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "nickname": nickname },
        });

        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if !response.status().is_success() {
            return Err(Self::auth_error(response).await);
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;

        if value.get("access_token").is_some() {
            let session: SessionTokens = serde_json::from_value(value)
                .map_err(|e| SupabaseError::Decode(e.to_string()))?;
            let user = session.user.clone();
            Ok((user, Some(session)))
        } else {
            let user: AuthUser = serde_json::from_value(value)
                .map_err(|e| SupabaseError::Decode(e.to_string()))?;
            Ok((Some(user), None))
        }
    }

    // Вход по email и паролю
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, SupabaseError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if !response.status().is_success() {
            return Err(Self::auth_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    // Инвалидация токена на стороне GoTrue
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::auth_error(response).await)
        }
    }

    // Проверка токена: возвращает пользователя, которому он принадлежит
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, SupabaseError> {
        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if !response.status().is_success() {
            return Err(Self::auth_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    // Выборка строк таблицы; query — пары PostgREST (select, order, eq-фильтры...)
    pub async fn select<T: DeserializeOwned>(
        &self,
        access_token: Option<&str>,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .http
            .get(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
            .query(query)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if !response.status().is_success() {
            return Err(Self::database_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))
    }

    // Вставка одной строки; PostgREST возвращает созданные строки массивом
    pub async fn insert(
        &self,
        access_token: Option<&str>,
        table: &str,
        row: &Value,
    ) -> Result<Value, SupabaseError> {
        let response = self
            .http
            .post(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
            .json(row)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if !response.status().is_success() {
            return Err(Self::database_error(response).await);
        }

        let mut rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| SupabaseError::Decode(e.to_string()))?;

        if rows.is_empty() {
            return Err(SupabaseError::Decode(
                "insert 没有返回任何行".to_string(),
            ));
        }

        Ok(rows.remove(0))
    }

    // Удаление строк по фильтрам
    pub async fn delete(
        &self,
        access_token: Option<&str>,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<(), SupabaseError> {
        let response = self
            .http
            .delete(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
            .query(query)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::database_error(response).await)
        }
    }

    async fn auth_error(response: Response) -> SupabaseError {
        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        SupabaseError::Auth {
            status,
            message: Self::extract_message(&body),
        }
    }

    async fn database_error(response: Response) -> SupabaseError {
        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string);
        SupabaseError::Database {
            status,
            code,
            message: Self::extract_message(&body),
        }
    }

    // GoTrue и PostgREST кладут текст ошибки в разные поля
    fn extract_message(body: &Value) -> String {
        for field in ["error_description", "msg", "message", "error"] {
            if let Some(text) = body.get(field).and_then(Value::as_str) {
                return text.to_string();
            }
        }
        "unknown error".to_string()
    }
}
