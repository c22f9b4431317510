use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    /// One of "client", "driver" or "admin".
    pub role: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(ToSchema)]
pub struct RequestServiceRequest {
    pub client_id: i64,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
}

#[derive(ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::forgot_password,
        crate::routes::auth::reset_password,
        crate::routes::services::request,
        crate::routes::services::list,
        crate::routes::services::get_one,
        crate::routes::services::list_for_user,
        crate::routes::services::accept,
        crate::routes::services::complete,
        crate::routes::services::cancel,
        crate::routes::users::list,
        crate::routes::users::get_one,
        crate::routes::users::update_me,
        crate::routes::users::change_password,
        crate::routes::users::delete_me,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            RequestServiceRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "users")
    )
)]
pub struct ApiDoc;
