//! HTTP handlers for the Users API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
        UnauthorizedResponse,
    },
    UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    Address, CreateUser, LoginRequest, LoginResponse, PermissionCheck, PermissionQuery,
    PersonalInfo, ProfessionalInfo, Role, UpdatePersonalInfo, UpdateProfessionalInfo, UpdateUser,
    UserResponse, UserSummary,
};
use crate::permission::{all_role_permissions, Action, Module, ModuleGrant, RolePermissions};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        login,
        list_roles,
        create_user,
        get_user,
        update_user,
        delete_user,
        check_permission,
        get_user_by_email,
        get_user_by_oab,
        get_users_by_department,
    ),
    components(
        schemas(
            UserResponse, CreateUser, UpdateUser, UpdatePersonalInfo, UpdateProfessionalInfo,
            PersonalInfo, ProfessionalInfo, Address, Role,
            LoginRequest, LoginResponse, UserSummary,
            PermissionCheck, RolePermissions, ModuleGrant, Module, Action
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ConflictResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Password login"),
        (name = "Users", description = "Staff management endpoints"),
        (name = "Roles", description = "Role permission table")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/login", post(login))
        .route("/roles", get(list_roles))
        .route("/users", post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/permissions", get(check_permission))
        .route("/users/email/{email}", get(get_user_by_email))
        .route("/users/oab/{number}/{state}", get(get_user_by_oab))
        .route("/users/department/{department}", get(get_users_by_department))
        .with_state(shared_service)
}

/// Log in with email and password
///
/// Returns a confirmation and the user's identity; no token is issued.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// List every role with its permissions
#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "Role permission table", body = Vec<RolePermissions>)
    )
)]
async fn list_roles() -> Json<Vec<RolePermissions>> {
    Json(all_role_permissions())
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user
///
/// Only supplied, non-empty fields are changed.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check whether a user's role allows an action on a module
#[utoipa::path(
    get,
    path = "/users/{id}/permissions",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        PermissionQuery
    ),
    responses(
        (status = 200, description = "Permission evaluated", body = PermissionCheck),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn check_permission<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    Query(query): Query<PermissionQuery>,
) -> UserResult<Json<PermissionCheck>> {
    let allowed = service
        .has_permission(id, &query.module, &query.action)
        .await?;

    Ok(Json(PermissionCheck {
        user_id: id,
        module: query.module,
        action: query.action,
        allowed,
    }))
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/users/email/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "Email address")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user_by_email(&email).await?;
    Ok(Json(user))
}

/// Get the lawyer holding a bar registration
#[utoipa::path(
    get,
    path = "/users/oab/{number}/{state}",
    tag = "Users",
    params(
        ("number" = String, Path, description = "OAB number"),
        ("state" = String, Path, description = "Issuing state, e.g. SP")
    ),
    responses(
        (status = 200, description = "Lawyer found", body = UserResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_oab<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path((number, state)): Path<(String, String)>,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user_by_oab(&number, &state).await?;
    Ok(Json(user))
}

/// List the users of a department
#[utoipa::path(
    get,
    path = "/users/department/{department}",
    tag = "Users",
    params(
        ("department" = String, Path, description = "Department name")
    ),
    responses(
        (status = 200, description = "Users in the department", body = Vec<UserResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_users_by_department<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(department): Path<String>,
) -> UserResult<Json<Vec<UserResponse>>> {
    let users = service.get_users_by_department(&department).await?;
    Ok(Json(users))
}
