use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::bearer_token;
use crate::models::{ErrorResponse, NewPet, Pet, PetListQuery};
use crate::supabase::{SupabaseError, SupabaseService};

// Фильтры PostgREST для списка питомцев
pub fn pet_list_query(params: &PetListQuery) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("select", "*".to_string()),
        ("order", "created_at.desc".to_string()),
        ("limit", params.limit.unwrap_or(20).to_string()),
    ];

    // «全部» — псевдокатегория без фильтра
    if let Some(category) = &params.category {
        if !category.is_empty() && category != "全部" {
            query.push(("category", format!("eq.{}", category)));
        }
    }

    if let Some(search) = &params.search {
        if !search.is_empty() {
            query.push((
                "or",
                format!(
                    "(name.ilike.*{s}*,breed.ilike.*{s}*,description.ilike.*{s}*)",
                    s = search
                ),
            ));
        }
    }

    query
}

// Список питомцев с фильтром по категории и поиском
pub async fn list_pets(
    supabase: web::Data<SupabaseService>,
    params: web::Query<PetListQuery>,
) -> impl Responder {
    match supabase
        .select::<Pet>(None, "pets", &pet_list_query(&params))
        .await
    {
        Ok(pets) => HttpResponse::Ok().json(serde_json::json!({ "pets": pets })),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("获取宠物列表错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "获取宠物列表失败".to_string(),
            })
        }
    }
}

// Карточка питомца
pub async fn get_pet(
    supabase: web::Data<SupabaseService>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let query = [
        ("select", "*".to_string()),
        ("id", format!("eq.{}", id)),
    ];

    match supabase.select::<Pet>(None, "pets", &query).await {
        Ok(pets) => match pets.into_iter().next() {
            Some(pet) => HttpResponse::Ok().json(serde_json::json!({ "pet": pet })),
            None => HttpResponse::NotFound().json(ErrorResponse {
                error: "宠物不存在".to_string(),
            }),
        },
        Err(e) => {
            eprintln!("获取宠物详情错误: {}", e);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "宠物不存在".to_string(),
            })
        }
    }
}

// Публикация питомца. Токен проверяется прямо в обработчике: GET-маршруты
// этого ресурса публичные, поэтому scope не обёрнут в AuthMiddleware.
pub async fn create_pet(
    supabase: web::Data<SupabaseService>,
    req: HttpRequest,
    payload: web::Json<NewPet>,
) -> impl Responder {
    let token = match bearer_token(req.headers()) {
        Some(t) => t,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "请先登录".to_string(),
            })
        }
    };

    let user = match supabase.get_user(&token).await {
        Ok(user) => user,
        Err(_) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "登录已过期".to_string(),
            })
        }
    };

    if let Err(errors) = payload.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("{}", errors),
        });
    }

    let mut row = match serde_json::to_value(&payload.into_inner()) {
        Ok(Value::Object(map)) => map,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "请求体格式错误".to_string(),
            })
        }
    };
    row.insert("created_by".to_string(), Value::String(user.id.to_string()));

    match supabase
        .insert(Some(&token), "pets", &Value::Object(row))
        .await
    {
        Ok(pet) => HttpResponse::Created().json(serde_json::json!({
            "message": "发布成功",
            "pet": pet,
        })),
        Err(SupabaseError::Database { message, .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse { error: message })
        }
        Err(e) => {
            eprintln!("发布宠物错误: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "发布失败".to_string(),
            })
        }
    }
}

// Конфигурация маршрутов питомцев
pub fn configure_pet_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/pets")
            .route("", web::get().to(list_pets))
            .route("", web::post().to(create_pet))
            .route("/{id}", web::get().to(get_pet)),
    );
}
