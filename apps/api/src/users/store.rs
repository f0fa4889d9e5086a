//! SQL access for the `users` table.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::user::User;

pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password_hash: String,
}

/// Partial profile update. `None` leaves a column untouched.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub user_type: Option<String>,
    pub user_status: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.address.is_none()
            && self.gender.is_none()
            && self.date_of_birth.is_none()
            && self.user_type.is_none()
            && self.user_status.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") | Some("-1") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub sort_column: &'static str,
    pub sort_order: SortOrder,
    pub page: i64,
    pub limit: i64,
}

/// Maps a client sort field (camelCase or snake_case) to a column name.
/// Anything else is rejected so the column can be pushed into SQL unbound.
pub fn sort_column(field: &str) -> Option<&'static str> {
    match field.trim() {
        "createdAt" | "created_at" => Some("created_at"),
        "updatedAt" | "updated_at" => Some("updated_at"),
        "name" => Some("name"),
        "email" => Some("email"),
        "mobile" => Some("mobile"),
        "userType" | "user_type" => Some("user_type"),
        "userStatus" | "user_status" => Some("user_status"),
        _ => None,
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a UserFilter) {
    qb.push(" WHERE TRUE");

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = format!("%{}%", escape_like(search.trim()));
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR mobile ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR user_type ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status.as_deref() {
        qb.push(" AND user_status = ").push_bind(status);
    }
    if let Some(from) = filter.from_date {
        qb.push(" AND created_at >= ").push_bind(start_of_day(from));
    }
    if let Some(to) = filter.to_date {
        // inclusive of the whole end day
        let end = to.checked_add_days(Days::new(1)).unwrap_or(to);
        qb.push(" AND created_at < ").push_bind(start_of_day(end));
    }
}

/// Returns one page of users plus the total count matching the filter.
pub async fn list_users(pool: &PgPool, filter: &UserFilter) -> Result<(Vec<User>, i64), sqlx::Error> {
    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users");
    push_filters(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::new("SELECT * FROM users");
    push_filters(&mut query, filter);
    query
        .push(format!(
            " ORDER BY {} {}, id",
            filter.sort_column,
            filter.sort_order.as_sql()
        ))
        .push(" LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind((filter.page - 1) * filter.limit);
    let users = query.build_query_as::<User>().fetch_all(pool).await?;

    Ok((users, total))
}

pub async fn insert_user(pool: &PgPool, new: NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, mobile, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.name)
    .bind(new.email)
    .bind(new.mobile)
    .bind(new.password_hash)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_mobile(pool: &PgPool, mobile: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE mobile = $1")
        .bind(mobile)
        .fetch_optional(pool)
        .await
}

/// True when another user already owns `email` or `mobile`.
pub async fn identity_taken(
    pool: &PgPool,
    email: Option<&str>,
    mobile: Option<&str>,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error> {
    if email.is_none() && mobile.is_none() {
        return Ok(false);
    }
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users
            WHERE (email = $1 OR mobile = $2)
              AND ($3::uuid IS NULL OR id <> $3)
        )
        "#,
    )
    .bind(email)
    .bind(mobile)
    .bind(exclude)
    .fetch_one(pool)
    .await
}

pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    changes: UserChanges,
) -> Result<Option<User>, sqlx::Error> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET updated_at = NOW()");
    let columns = [
        ("name", changes.name),
        ("email", changes.email),
        ("mobile", changes.mobile),
        ("address", changes.address),
        ("gender", changes.gender),
        ("date_of_birth", changes.date_of_birth),
        ("user_type", changes.user_type),
        ("user_status", changes.user_status),
    ];
    for (column, value) in columns {
        if let Some(value) = value {
            qb.push(format!(", {column} = ")).push_bind(value);
        }
    }
    qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
    qb.build_query_as::<User>().fetch_optional(pool).await
}

pub async fn update_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Returns false when no row matched.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
