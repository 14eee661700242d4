use actix_web::{web, HttpResponse, Responder, Scope};
use serde::{Deserialize, Serialize};

use crate::{
    database::MongoDB,
    models::User,
    repository::{UpdateUser, UserRepository},
};

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<CreateUserRequest> for User {
    fn from(request: CreateUserRequest) -> Self {
        User {
            id: None,
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    /// Canonical external form of the store-assigned identifier (24-char hex)
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            password: user.password,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

fn user_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "User not found".to_string(),
        code: 404,
    })
}

fn database_error(e: mongodb::error::Error) -> HttpResponse {
    log::error!("❌ Database error: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: e.to_string(),
        code: 500,
    })
}

// ==================== ROUTES ====================

/// Rotas do recurso /users (usado pelo main e pelos testes)
pub fn scope() -> Scope {
    web::scope("/users")
        .route("", web::post().to(create_user))
        .route("", web::get().to(list_users))
        .route("/{id}", web::get().to(get_user))
        .route("/{id}", web::put().to(update_user))
        .route("/{id}", web::delete().to(delete_user))
}

// ==================== HANDLERS ====================

/// POST /users - Cria um novo usuário
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse)
    )
)]
pub async fn create_user(
    db: web::Data<MongoDB>,
    request: web::Json<CreateUserRequest>,
) -> impl Responder {
    let repository = UserRepository::new(&db);

    match repository.insert(request.into_inner().into()).await {
        Ok(user) => {
            log::info!("✅ User created: {:?}", user.id);
            HttpResponse::Created().json(UserResponse::from(user))
        }
        Err(e) => database_error(e),
    }
}

/// GET /users - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    )
)]
pub async fn list_users(db: web::Data<MongoDB>) -> impl Responder {
    let repository = UserRepository::new(&db);

    match repository.find_all().await {
        Ok(users) => {
            log::info!("📋 Listed {} users", users.len());
            let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => database_error(e),
    }
}

/// GET /users/{id} - Detalha um usuário
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (24-char hex)")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(db: web::Data<MongoDB>, id: web::Path<String>) -> impl Responder {
    let repository = UserRepository::new(&db);

    match repository.find(&id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserResponse::from(user)),
        Ok(None) => user_not_found(),
        Err(e) => database_error(e),
    }
}

/// PUT /users/{id} - Altera campos de um usuário existente
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (24-char hex)")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    db: web::Data<MongoDB>,
    id: web::Path<String>,
    request: web::Json<UpdateUser>,
) -> impl Responder {
    let repository = UserRepository::new(&db);

    match repository.update(&id, request.into_inner()).await {
        Ok(Some(user)) => {
            log::info!("🔧 User updated: {}", id);
            HttpResponse::Ok().json(UserResponse::from(user))
        }
        Ok(None) => user_not_found(),
        Err(e) => database_error(e),
    }
}

/// DELETE /users/{id} - Remove um usuário
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (24-char hex)")),
    responses(
        (status = 204, description = "User removed"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(db: web::Data<MongoDB>, id: web::Path<String>) -> impl Responder {
    let repository = UserRepository::new(&db);

    // remove() does not report whether anything matched, so check first
    match repository.find(&id).await {
        Ok(Some(_)) => match repository.remove(&id).await {
            Ok(()) => {
                log::info!("🗑️  User removed: {}", id);
                HttpResponse::NoContent().finish()
            }
            Err(e) => database_error(e),
        },
        Ok(None) => user_not_found(),
        Err(e) => database_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    async fn repository() -> (MongoDB, UserRepository) {
        dotenv::dotenv().ok();

        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/users_db".to_string());

        let db = MongoDB::new(&uri).await.expect("MongoDB must be running");
        let repository = UserRepository::new(&db);
        repository.clear().await.expect("failed to clear collection");
        (db, repository)
    }

    macro_rules! app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .service(scope()),
            )
            .await
        };
    }

    fn leandro() -> Value {
        json!({
            "name": "Leandro Simeao",
            "email": "leandrosimeao@yahoo.com.br",
            "password": "123456",
        })
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_post_creates_user() {
        let (db, _) = repository().await;
        let app = app!(db);

        let request = test::TestRequest::post()
            .uri("/users")
            .set_json(leandro())
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 201);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["name"], "Leandro Simeao");
        assert_eq!(body["email"], "leandrosimeao@yahoo.com.br");
        assert_eq!(body["password"], "123456");
        assert!(body["_id"].as_str().is_some_and(|id| id.len() == 24));
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_get_lists_all_users() {
        let (db, repository) = repository().await;
        let app = app!(db);

        repository
            .insert(serde_json::from_value(leandro()).unwrap())
            .await
            .unwrap();

        let request = test::TestRequest::get().uri("/users").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 200);

        let body: Value = test::read_body_json(response).await;
        let users = body.as_array().expect("body must be an array");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["name"], "Leandro Simeao");
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_get_existing_user() {
        let (db, repository) = repository().await;
        let app = app!(db);

        let user = repository
            .insert(serde_json::from_value(leandro()).unwrap())
            .await
            .unwrap();
        let id = user.id.unwrap().to_hex();

        let request = test::TestRequest::get()
            .uri(&format!("/users/{}", id))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 200);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["_id"], id.as_str());
        assert_eq!(body["email"], "leandrosimeao@yahoo.com.br");
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_get_nonexistent_user_is_404() {
        let (db, _) = repository().await;
        let app = app!(db);

        let request = test::TestRequest::get()
            .uri("/users/63f8f6bd6ba024559194fe0e")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 404);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "error": "User not found", "code": 404 }));
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_put_updates_existing_user() {
        let (db, repository) = repository().await;
        let app = app!(db);

        let user = repository
            .insert(serde_json::from_value(leandro()).unwrap())
            .await
            .unwrap();
        let id = user.id.unwrap().to_hex();

        let request = test::TestRequest::put()
            .uri(&format!("/users/{}", id))
            .set_json(json!({
                "name": "Leandro Ferreira",
                "email": "leandroferreira@yahoo.com.br",
                "password": "123456abc",
            }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 200);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["name"], "Leandro Ferreira");
        assert_eq!(body["email"], "leandroferreira@yahoo.com.br");
        assert_eq!(body["password"], "123456abc");
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_put_nonexistent_user_is_404() {
        let (db, _) = repository().await;
        let app = app!(db);

        let request = test::TestRequest::put()
            .uri("/users/63f8f6bd6ba024559194fe0e")
            .set_json(json!({ "name": "Leandro Ferreira" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 404);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "error": "User not found", "code": 404 }));
    }

    #[actix_web::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_delete_existing_then_repeated_delete() {
        let (db, repository) = repository().await;
        let app = app!(db);

        let user = repository
            .insert(serde_json::from_value(leandro()).unwrap())
            .await
            .unwrap();
        let id = user.id.unwrap().to_hex();

        let request = test::TestRequest::delete()
            .uri(&format!("/users/{}", id))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 204);
        let body = test::read_body(response).await;
        assert!(body.is_empty());

        // Same id again: record is gone, must be 404 now
        let request = test::TestRequest::delete()
            .uri(&format!("/users/{}", id))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), 404);

        let body: Value = test::read_body_json(response).await;
        assert_eq!(body, json!({ "error": "User not found", "code": 404 }));
    }
}
