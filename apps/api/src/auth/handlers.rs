//! Axum route handlers for registration, login and logout.

use axum::{extract::State, http::StatusCode, response::Redirect, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_login};
use crate::auth::session::{
    create_session, delete_session, removal_cookie, session_cookie, SessionUser, LOGIN_PATH,
};
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub username: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
}

/// GET /
///
/// Sends logged-in users to their profile and everyone else to the login page.
pub async fn handle_landing(user: Option<SessionUser>) -> Redirect {
    match user {
        Some(_) => Redirect::to("/profile"),
        None => Redirect::to(LOGIN_PATH),
    }
}

/// GET /login
///
/// Describes the login form; the actual login is a POST to the same path.
pub async fn handle_login_page() -> Json<Value> {
    Json(json!({
        "message": "Please log in.",
        "login": { "method": "POST", "path": LOGIN_PATH, "fields": ["username", "password"] },
        "register": { "method": "POST", "path": "/register", "fields": ["username", "password"] }
    }))
}

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    request.validate()?;
    let username = request.username.trim().to_string();
    let password_hash = hash_password(&request.password).await?;

    let inserted = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await;

    let user = match inserted {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!("Registration rejected: username '{username}' already taken");
            return Err(AppError::Conflict("Username already exists.".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    info!("Registered user {} ({})", user.username, user.id);
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            username: user.username,
            message: "Registration successful. Please log in.".to_string(),
        }),
    ))
}

/// POST /login
///
/// Verifies the password hash and starts a server-side session.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<Credentials>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    request.validate()?;

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
        .bind(request.username.trim())
        .fetch_optional(&state.db)
        .await?;

    // An unknown username is still checked against a dummy hash.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_login(&request.password, stored_hash).await;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!("Failed login attempt for '{}'", request.username.trim());
            return Err(AppError::Unauthorized("Invalid credentials.".to_string()));
        }
    };

    let token = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    info!("User {} logged in", user.username);

    Ok((
        jar.add(session_cookie(token, &state.config)),
        Json(LoginResponse {
            user_id: user.id,
            username: user.username,
        }),
    ))
}

/// GET /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    delete_session(&state.db, user.token).await?;
    info!("User {} logged out", user.username);
    Ok((jar.remove(removal_cookie()), Redirect::to(LOGIN_PATH)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_credentials_require_both_fields() {
        assert!(creds("alice", "pw").validate().is_ok());
        assert!(matches!(
            creds("   ", "pw").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            creds("alice", "").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_landing_redirects_anonymous_to_login() {
        let response = axum::response::IntoResponse::into_response(handle_landing(None).await);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_landing_redirects_user_to_profile() {
        let user = SessionUser {
            token: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
        };
        let response = axum::response::IntoResponse::into_response(handle_landing(Some(user)).await);
        assert_eq!(response.headers()["location"], "/profile");
    }
}
