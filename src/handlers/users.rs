use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::user::{PasswordChange, Registration, User, UserPatch};
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// A user as returned by the API. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            phone: user.phone,
            email: user.email,
            address: user.address,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordChangeRequest {
    pub current: String,
    pub new: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Required to change the password; `current` must match.
    pub password: Option<PasswordChangeRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPasswordRequest {
    pub email: String,
    pub password: String,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [UserResponse])),
    tag = "users"
)]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = blocking(move || state.users.list_users()).await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let user = blocking(move || state.users.get_user(id)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /users/email/{email}
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    params(("email" = String, Path, description = "Email address, case-insensitive")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user_by_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    let user = blocking(move || state.users.get_user_by_email(&email)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /users/new
#[utoipa::path(
    post,
    path = "/users/new",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid user"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let registration = Registration {
        name: body.name,
        phone: body.phone,
        email: body.email,
        password: body.password,
        address: body.address,
    };
    let user = blocking(move || state.users.create_user(registration)).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /users/verify
///
/// Checks an email/password pair and returns the matching user.
#[utoipa::path(
    post,
    path = "/users/verify",
    request_body = VerifyPasswordRequest,
    responses(
        (status = 200, description = "Credentials match", body = UserResponse),
        (status = 401, description = "Unknown email or wrong password"),
    ),
    tag = "users"
)]
pub async fn verify_password(
    state: web::Data<AppState>,
    body: web::Json<VerifyPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user = blocking(move || state.users.verify_password(&body.email, &body.password)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PUT /users/update/{id}
#[utoipa::path(
    put,
    path = "/users/update/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid change"),
        (status = 401, description = "Current password does not match"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "users"
)]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let patch = UserPatch {
        name: body.name,
        phone: body.phone,
        email: body.email,
        address: body.address,
        password: body.password.map(|p| PasswordChange {
            current: p.current,
            new: p.new,
        }),
    };
    let user = blocking(move || state.users.update_user(id, patch)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /users/delete/{id}
///
/// Also removes the user's orders and wishlist.
#[utoipa::path(
    delete,
    path = "/users/delete/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(move || state.users.delete_user(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/email/{email}", web::get().to(get_user_by_email))
            .route("/new", web::post().to(create_user))
            .route("/verify", web::post().to(verify_password))
            .route("/update/{id}", web::put().to(update_user))
            .route("/delete/{id}", web::delete().to(delete_user))
            .route("/{id}", web::get().to(get_user)),
    );
}
