//! Session tokens: HS256 JWTs carried in an httpOnly cookie.
//!
//! Logout revokes a token by storing its `jti` in Redis until the token would
//! have expired anyway. The extractors below reject revoked tokens, so a
//! copied cookie stops working after logout.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::store;

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const REVOKED_PREFIX: &str = "revoked:";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub user_type: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Seconds until expiry, never below 1.
    pub fn remaining_secs(&self, now: i64) -> u64 {
        (self.exp - now).max(1) as u64
    }
}

pub fn issue_token(user: &User, secret: &str) -> Result<String, AppError> {
    issue_token_at(user.id, &user.user_type, secret, Utc::now().timestamp())
}

pub fn issue_token_at(
    user_id: Uuid,
    user_type: &str,
    secret: &str,
    now: i64,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        user_type: user_type.to_string(),
        jti: Uuid::new_v4(),
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign session token: {e}")))
}

/// Verifies signature and expiry. Any failure is a 401.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Rejected session token: {e}");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS))
        .build()
}

/// Empty, already-expired session cookie. Sent on logout even when the
/// request carried no cookie.
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

pub async fn revoke(redis: &redis::Client, claims: &Claims) -> Result<(), AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    redis::cmd("SET")
        .arg(format!("{REVOKED_PREFIX}{}", claims.jti))
        .arg(1)
        .arg("EX")
        .arg(claims.remaining_secs(Utc::now().timestamp()))
        .query_async::<_, ()>(&mut conn)
        .await?;
    Ok(())
}

pub async fn is_revoked(redis: &redis::Client, jti: Uuid) -> Result<bool, AppError> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let exists: bool = redis::cmd("EXISTS")
        .arg(format!("{REVOKED_PREFIX}{jti}"))
        .query_async(&mut conn)
        .await?;
    Ok(exists)
}

// ──────────────────────────────────────────────────────────────
// Extractors
// ──────────────────────────────────────────────────────────────

/// An authenticated, active user resolved from the session cookie.
pub struct AuthUser {
    pub user: User,
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

        let claims = verify_token(&token, &state.config.secret_key)?;
        if is_revoked(&state.redis, claims.jti).await? {
            return Err(AppError::Unauthorized("Session has been logged out".to_string()));
        }

        let user = store::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
        if !user.is_active() {
            warn!("Inactive user {} attempted to use a session", user.id);
            return Err(AppError::Forbidden("Your account is not active".to_string()));
        }

        Ok(AuthUser { user, claims })
    }
}

/// An authenticated user whose role is admin.
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    #[test]
    fn test_issue_then_verify() {
        let id = Uuid::new_v4();
        let token = issue_token_at(id, "admin", SECRET, Utc::now().timestamp()).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.user_type, "admin");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issued = Utc::now().timestamp() - TOKEN_TTL_SECS - 60;
        let token = issue_token_at(Uuid::new_v4(), "user", SECRET, issued).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token_at(Uuid::new_v4(), "user", SECRET, Utc::now().timestamp()).unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
        assert!(verify_token("garbage", SECRET).is_err());
    }

    #[test]
    fn test_each_token_has_unique_jti() {
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp();
        let a = verify_token(&issue_token_at(id, "user", SECRET, now).unwrap(), SECRET).unwrap();
        let b = verify_token(&issue_token_at(id, "user", SECRET, now).unwrap(), SECRET).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".into(), true);
        assert_eq!(cookie.name(), TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));

        let removal = removal_cookie(false);
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn test_remaining_secs_floor() {
        let claims = Claims {
            sub: Uuid::nil(),
            user_type: "user".into(),
            jti: Uuid::nil(),
            iat: 0,
            exp: 100,
        };
        assert_eq!(claims.remaining_secs(40), 60);
        assert_eq!(claims.remaining_secs(500), 1);
    }
}
