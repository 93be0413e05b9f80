//! Server-side login sessions. The cookie carries only a random token; the
//! `sessions` table maps it to a user until it expires or the user logs out.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::SessionRow;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/login";

/// The logged-in user behind the current request.
///
/// Extracting it from a request without a valid session redirects to the login page.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub token: Uuid,
    pub user_id: Uuid,
    pub username: String,
}

impl From<SessionRow> for SessionUser {
    fn from(row: SessionRow) -> Self {
        SessionUser {
            token: row.token,
            user_id: row.user_id,
            username: row.username,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = session_token(&jar) else {
            debug!("No session cookie, redirecting to login");
            return Err(Redirect::to(LOGIN_PATH).into_response());
        };

        match find_session(&state.db, token).await {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => {
                warn!("Unknown or expired session, redirecting to login");
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
            Err(e) => Err(AppError::Database(e).into_response()),
        }
    }
}

/// Parses the session token out of the cookie jar, if there is a well-formed one.
pub fn session_token(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<Uuid>().ok())
}

pub fn session_cookie(token: Uuid, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

/// A cookie that, when removed from a jar, clears the session cookie in the browser.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_hours: i64) -> Result<Uuid, sqlx::Error> {
    let token = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

pub async fn find_session(pool: &PgPool, token: Uuid) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(
        r#"
        SELECT s.token, s.user_id, u.username
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn delete_session(pool: &PgPool, token: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use super::*;

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_session_token_parses_uuid() {
        let token = Uuid::new_v4();
        let jar = jar_with(&format!("{SESSION_COOKIE}={token}"));
        assert_eq!(session_token(&jar), Some(token));
    }

    #[test]
    fn test_session_token_rejects_garbage_and_empty() {
        assert_eq!(session_token(&jar_with("session=not-a-uuid")), None);
        assert_eq!(session_token(&jar_with("session=")), None);
        assert_eq!(session_token(&jar_with("other=1")), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let mut config = Config::for_tests();
        config.cookie_secure = true;
        let token = Uuid::new_v4();
        let cookie = session_cookie(token, &config);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), token.to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }
}
