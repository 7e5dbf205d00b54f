use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Карточка питомца из таблицы pets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_vaccinated: bool,
    #[serde(default)]
    pub is_neutered: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub shelter_name: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Короткая карточка питомца, встраиваемая PostgREST в выборки с join
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetPreview {
    pub id: Uuid,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
    pub gender: Option<String>,
}

// Заявка на усыновление
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub housing_type: Option<String>,
    pub experience: Option<String>,
    pub family_members: Option<String>,
    pub work_schedule: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub pets: Option<PetPreview>,
}

// Запись в избранном
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub pets: Option<PetPreview>,
}

// Строка таблицы profiles (может отсутствовать у свежего аккаунта)
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: Uuid,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

// Собранный профиль для ответа /auth/me
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub avatar_url: String,
    pub phone: String,
    pub created_at: Option<DateTime<Utc>>,
}

// DTO для регистрации
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,

    #[validate(length(min = 6, message = "密码至少需要6个字符"))]
    pub password: String,

    pub nickname: Option<String>,
}

// DTO для входа
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,

    #[validate(length(min = 1, message = "密码不能为空"))]
    pub password: String,
}

// DTO для публикации питомца
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewPet {
    #[validate(length(min = 1, max = 50, message = "名字不能为空且不超过50个字符"))]
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "请选择分类"))]
    pub category: String,
    #[serde(default)]
    pub is_vaccinated: bool,
    #[serde(default)]
    pub is_neutered: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub shelter_name: Option<String>,
}

// DTO для подачи заявки
#[derive(Debug, Deserialize)]
pub struct NewApplication {
    pub pet_id: Uuid,
    pub housing_type: Option<String>,
    pub experience: Option<String>,
    pub family_members: Option<String>,
    pub work_schedule: Option<String>,
}

// DTO для добавления в избранное
#[derive(Debug, Deserialize)]
pub struct AddFavorite {
    pub pet_id: Uuid,
}

// DTO для отправки сообщения
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub receiver_id: Option<Uuid>,

    #[validate(length(min = 1, message = "消息内容不能为空"))]
    pub content: String,

    pub sender_name: Option<String>,
    pub sender_avatar: Option<String>,
}

// Параметры списка питомцев
#[derive(Debug, Default, Deserialize)]
pub struct PetListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

// Общий ответ об ошибке
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
