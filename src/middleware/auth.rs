use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    error::{AppError, AppResult},
    state::AppState,
};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Header the storefront client sends the raw token in.
const TOKEN_HEADER: &str = "auth-token";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

/// Admin sessions last a day, shopper sessions a week.
pub fn token_lifetime(role: &str) -> Duration {
    if role == ROLE_ADMIN {
        Duration::days(1)
    } else {
        Duration::days(7)
    }
}

pub fn issue_token(secret: &str, user_id: Uuid, role: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(token_lifetime(role))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_token(secret: &str, token: &str) -> AppResult<AuthUser> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;
        return Ok(token.trim().to_string());
    }

    if let Some(value) = parts.headers.get(TOKEN_HEADER) {
        let token = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid auth-token header".into()))?;
        return Ok(token.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Access Denied. No token provided.".into(),
    ))
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let state = AppState::from_ref(state);
        verify_token(&state.config.jwt_secret, &token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "test-secret";

    fn parts_with(name: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(())
            .expect("request")
            .into_parts();
        parts
    }

    #[test]
    fn issued_token_round_trips_identity_and_role() {
        let id = Uuid::new_v4();
        let token = issue_token(SECRET, id, ROLE_ADMIN).expect("token");
        let user = verify_token(SECRET, &token).expect("valid");
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, ROLE_ADMIN);
        assert!(ensure_admin(&user).is_ok());
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = issue_token(SECRET, Uuid::new_v4(), ROLE_USER).expect("token");
        let err = verify_token("other-secret", &token).expect_err("rejected");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: ROLE_USER.into(),
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encode");
        assert!(matches!(
            verify_token(SECRET, &token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn lifetimes_differ_by_role() {
        assert_eq!(token_lifetime(ROLE_ADMIN), Duration::days(1));
        assert_eq!(token_lifetime(ROLE_USER), Duration::days(7));
    }

    #[test]
    fn token_is_read_from_either_header() {
        let bearer = parts_with("authorization", "Bearer abc.def");
        assert_eq!(bearer_token(&bearer).expect("token"), "abc.def");

        let raw = parts_with("auth-token", "abc.def");
        assert_eq!(bearer_token(&raw).expect("token"), "abc.def");

        let basic = parts_with("authorization", "Basic Zm9v");
        assert!(matches!(bearer_token(&basic), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn shopper_is_forbidden_from_admin_operations() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_USER.into(),
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));
    }
}
