//! Users API handlers: login/logout, profiles, and user management.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@example.com","password":"..."}
//! GET  /api/v1/me
//! GET  /api/v1/users
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{Error, NewUser, Role, User, UserChanges, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile shape returned to clients. Never carries credential material.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar_url: user.avatar_url,
        }
    }
}

/// Request body for `POST /api/v1/users`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Request body for `PUT /api/v1/users/{id}`. Absent fields stay unchanged.
#[derive(Deserialize, Serialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserProfile),
        (status = 401, description = "Invalid credentials", body = Error),
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let LoginRequest { email, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    let user = state.accounts.authenticate(&email, &password).await?;
    session.persist_user(&user.id)?;
    Ok(web::Json(user.into()))
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the profile of the session user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current profile", body = UserProfile),
        (status = 401, description = "Not logged in", body = Error),
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let user = session.require_user(&state.accounts).await?;
    Ok(web::Json(user.into()))
}

/// List every user account. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserProfile]),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let actor = session.require_user(&state.accounts).await?;
    let users = state.accounts.list(&actor).await?;
    Ok(web::Json(users.into_iter().map(UserProfile::from).collect()))
}

/// Create a user account. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let CreateUserRequest {
        name,
        email,
        password,
        role,
        avatar_url,
    } = payload.into_inner();
    let new = NewUser {
        name,
        email,
        password: Zeroizing::new(password),
        role,
        avatar_url,
    };
    let user = state.accounts.create(&actor, new).await?;
    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

/// Update a user account. Admin only.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UpdateUserRequest,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user", body = Error),
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let actor = session.require_user(&state.accounts).await?;
    let id = UserId::from(path.into_inner());
    let UpdateUserRequest {
        name,
        email,
        password,
        role,
        avatar_url,
    } = payload.into_inner();
    let changes = UserChanges {
        name,
        email,
        password: password.map(Zeroizing::new),
        role,
        avatar_url,
    };
    let user = state.accounts.update(&actor, &id, changes).await?;
    Ok(web::Json(user.into()))
}

/// Delete a user account. Admin only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown user", body = Error),
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user(&state.accounts).await?;
    let id = UserId::from(path.into_inner());
    state.accounts.delete(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
