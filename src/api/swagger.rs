use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "Minimal CRUD API for user records backed by MongoDB. \n\nNo authentication: every endpoint is public. Identifiers are the store-assigned ObjectIds in their 24-character hex form.",
    ),
    paths(
        // Users CRUD
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::api::users::CreateUserRequest,
            crate::api::users::UserResponse,
            crate::api::users::ErrorResponse,
            crate::repository::UpdateUser,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "User record management. Create, list, retrieve, update and delete user documents."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    )
)]
pub struct ApiDoc;
