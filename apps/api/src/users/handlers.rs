use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::user::User;
use crate::state::AppState;
use crate::users::password::{hash_password, verify_password};
use crate::users::session::{
    issue_token, removal_cookie, revoke, session_cookie, verify_token, AdminUser, AuthUser,
    TOKEN_COOKIE,
};
use crate::users::store::{self, sort_column, NewUser, SortOrder, UserChanges, UserFilter};
use crate::users::validation::Validator;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 5;
const MAX_LIMIT: i64 = 100;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub user_type: Option<String>,
    pub user_status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub status: &'static str,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_users: i64,
    pub data: Vec<User>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: User,
}

fn user_response(message: Option<&'static str>, user: User) -> Json<UserResponse> {
    Json(UserResponse {
        status: "success",
        message,
        data: user,
    })
}

fn normalize(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn normalize_email(value: Option<String>) -> Option<String> {
    normalize(value).map(|v| v.to_lowercase())
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{field} must be a date in YYYY-MM-DD format"))),
    }
}

fn conflict_or(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict("User with this email or mobile already exists".to_string())
    } else {
        AppError::Database(e)
    }
}

/// Translates list query parameters into a validated store filter.
pub fn build_filter(params: ListUsersQuery) -> Result<UserFilter, AppError> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if page < 1 {
        return Err(AppError::Validation("page must be at least 1".to_string()));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let sort_column = match normalize(params.sort_field) {
        None => "created_at",
        Some(field) => sort_column(&field)
            .ok_or_else(|| AppError::Validation(format!("Cannot sort by '{field}'")))?,
    };

    Ok(UserFilter {
        search: normalize(params.search),
        status: normalize(params.status),
        from_date: parse_date("fromDate", params.from_date.as_deref())?,
        to_date: parse_date("toDate", params.to_date.as_deref())?,
        sort_column,
        sort_order: SortOrder::parse(params.sort_order.as_deref()),
        page,
        limit,
    })
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// POST /api/v1/user/CreateUser
pub async fn handle_create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), AppError> {
    let name = normalize(req.name);
    let email = normalize_email(req.email);
    let mobile = normalize(req.mobile);

    let mut v = Validator::new();
    if let Some(name) = &name {
        v.name(name);
    }
    if let Some(email) = &email {
        v.email(email);
    }
    if let Some(mobile) = &mobile {
        v.mobile(mobile);
    }
    v.password("password", &req.password);
    v.finish()?;
    if email.is_none() && mobile.is_none() {
        return Err(AppError::Validation(
            "Either email or mobile is required".to_string(),
        ));
    }

    if store::identity_taken(&state.db, email.as_deref(), mobile.as_deref(), None).await? {
        return Err(AppError::Conflict(
            "User with this email or mobile already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)?;
    let user = store::insert_user(
        &state.db,
        NewUser {
            name,
            email,
            mobile,
            password_hash,
        },
    )
    .await
    .map_err(conflict_or)?;
    info!("Created user {}", user.id);

    let token = issue_token(&user, &state.config.secret_key)?;
    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    Ok((
        StatusCode::CREATED,
        jar,
        user_response(Some("User created successfully"), user),
    ))
}

/// GET /api/v1/user/ReadUser
pub async fn handle_list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(params): AppQuery<ListUsersQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    let filter = build_filter(params)?;
    let (users, total) = store::list_users(&state.db, &filter).await?;
    if users.is_empty() {
        return Err(AppError::NotFound("No users found".to_string()));
    }
    Ok(Json(UserListResponse {
        status: "success",
        current_page: filter.page,
        total_pages: total_pages(total, filter.limit),
        total_users: total,
        data: users,
    }))
}

/// GET /api/v1/user/ReadUser/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(user_response(None, user))
}

/// PUT /api/v1/user/UpdateUser/:id
pub async fn handle_update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let is_admin = auth.user.is_admin();
    if auth.user.id != id && !is_admin {
        return Err(AppError::Forbidden(
            "You can only update your own profile".to_string(),
        ));
    }

    let changes = UserChanges {
        name: normalize(req.name),
        email: normalize_email(req.email),
        mobile: normalize(req.mobile),
        address: normalize(req.address),
        gender: normalize(req.gender),
        date_of_birth: normalize(req.date_of_birth),
        user_type: normalize(req.user_type),
        user_status: normalize(req.user_status),
    };
    if !is_admin && (changes.user_type.is_some() || changes.user_status.is_some()) {
        return Err(AppError::Forbidden(
            "Only admins can change userType or userStatus".to_string(),
        ));
    }
    if changes.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let mut v = Validator::new();
    if let Some(name) = &changes.name {
        v.name(name);
    }
    if let Some(email) = &changes.email {
        v.email(email);
    }
    if let Some(mobile) = &changes.mobile {
        v.mobile(mobile);
    }
    if let Some(address) = &changes.address {
        v.address(address);
    }
    if let Some(gender) = &changes.gender {
        v.gender(gender);
    }
    if let Some(dob) = &changes.date_of_birth {
        v.date_of_birth(dob);
    }
    if let Some(user_type) = &changes.user_type {
        v.user_type(user_type);
    }
    if let Some(user_status) = &changes.user_status {
        v.user_status(user_status);
    }
    v.finish()?;

    if store::identity_taken(
        &state.db,
        changes.email.as_deref(),
        changes.mobile.as_deref(),
        Some(id),
    )
    .await?
    {
        return Err(AppError::Conflict(
            "User with this email or mobile already exists".to_string(),
        ));
    }

    let user = store::update_user(&state.db, id, changes)
        .await
        .map_err(conflict_or)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    info!("User {} updated by {}", user.id, auth.user.id);
    Ok(user_response(Some("User updated successfully"), user))
}

/// DELETE /api/v1/user/DeleteUser/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !store::delete_user(&state.db, id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!("User {id} deleted by admin {}", admin.user.id);
    Ok(Json(json!({
        "status": "success",
        "message": "User deleted successfully"
    })))
}

/// POST /api/v1/user/LoginUser
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), AppError> {
    let email = normalize_email(req.email);
    let mobile = normalize(req.mobile);

    let mut v = Validator::new();
    v.login_identity(email.as_deref(), mobile.as_deref());
    v.finish()?;

    let found = match (&email, &mobile) {
        (Some(email), _) => store::find_by_email(&state.db, email).await?,
        (None, Some(mobile)) => store::find_by_mobile(&state.db, mobile).await?,
        (None, None) => None,
    };
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let user = found.ok_or_else(invalid)?;
    if !verify_password(&user.password_hash, &req.password)? {
        return Err(invalid());
    }
    if !user.is_active() {
        return Err(AppError::Forbidden("Your account is not active".to_string()));
    }

    let token = issue_token(&user, &state.config.secret_key)?;
    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    info!("User {} logged in", user.id);
    Ok((jar, user_response(Some("Login successful"), user)))
}

/// GET /api/v1/user/LoginUser
pub async fn handle_login_verify(auth: AuthUser) -> Json<UserResponse> {
    user_response(None, auth.user)
}

/// POST /api/v1/user/LogoutUser
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        // An unverifiable token has nothing to revoke; the cookie is still cleared
        if let Ok(claims) = verify_token(cookie.value(), &state.config.secret_key) {
            revoke(&state.redis, &claims).await?;
            info!("Revoked session {} for user {}", claims.jti, claims.sub);
        }
    }
    Ok((
        jar.add(removal_cookie(state.config.cookie_secure)),
        Json(json!({
            "status": "success",
            "message": "Logged out successfully"
        })),
    ))
}

/// PUT /api/v1/user/ChangePassword
pub async fn handle_change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let mut v = Validator::new();
    v.password("newPassword", &req.new_password);
    v.finish()?;

    if !verify_password(&auth.user.password_hash, &req.current_password)? {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }
    if req.current_password == req.new_password {
        return Err(AppError::Validation(
            "New password must differ from the current password".to_string(),
        ));
    }

    let password_hash = hash_password(&req.new_password)?;
    store::update_password(&state.db, auth.user.id, &password_hash).await?;
    info!(
        "User {} changed their password (session {})",
        auth.user.id, auth.claims.jti
    );
    Ok(Json(json!({
        "status": "success",
        "message": "Password changed successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_defaults() {
        let filter = build_filter(ListUsersQuery::default()).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.sort_column, "created_at");
        assert_eq!(filter.sort_order, SortOrder::Asc);

        let newest_first = ListUsersQuery {
            sort_order: Some("desc".into()),
            ..Default::default()
        };
        assert_eq!(build_filter(newest_first).unwrap().sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_build_filter_rejects_bad_input() {
        let bad_sort = ListUsersQuery {
            sort_field: Some("password_hash".into()),
            ..Default::default()
        };
        assert!(matches!(build_filter(bad_sort), Err(AppError::Validation(_))));

        let bad_page = ListUsersQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(build_filter(bad_page).is_err());

        let bad_date = ListUsersQuery {
            from_date: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(build_filter(bad_date).is_err());
    }

    #[test]
    fn test_build_filter_blank_values_are_ignored() {
        let params = ListUsersQuery {
            search: Some("   ".into()),
            status: Some("".into()),
            to_date: Some("2024-02-29".into()),
            ..Default::default()
        };
        let filter = build_filter(params).unwrap();
        assert!(filter.search.is_none());
        assert!(filter.status.is_none());
        assert_eq!(filter.to_date, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(
            normalize_email(Some("  Ada@Example.COM ".into())),
            Some("ada@example.com".to_string())
        );
        assert_eq!(normalize_email(Some(" ".into())), None);
    }
}
