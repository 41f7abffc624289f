use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use askama::Template;
use chrono::{DateTime, FixedOffset, Utc};
use password_hash::rand_core::OsRng;
use rand::Rng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{
        EmailRequest, LoginRequest, LoginResponse, ResetPasswordRequest, SignupRequest,
        VerifyOtpRequest,
    },
    entity::{Users, users},
    error::{AppError, AppResult},
    mailer::{MailError, OtpEmail},
    middleware::auth::{ROLE_ADMIN, ROLE_USER, issue_token},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn generate_otp() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// A code is good when it matches and has not expired yet.
pub fn otp_is_valid(
    stored: Option<&str>,
    expires_at: Option<DateTime<FixedOffset>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> bool {
    match (stored, expires_at) {
        (Some(stored), Some(expires_at)) => stored == submitted.trim() && expires_at >= now,
        _ => false,
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn find_by_email(state: &AppState, email: &str) -> AppResult<Option<users::Model>> {
    Ok(Users::find()
        .filter(users::Column::Email.eq(normalize_email(email)))
        .one(&state.orm)
        .await?)
}

fn otp_expiry(state: &AppState) -> AppResult<DateTime<FixedOffset>> {
    let ttl = chrono::Duration::from_std(state.config.otp_ttl)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok((Utc::now() + ttl).into())
}

async fn send_otp(state: &AppState, email: &str, subject: &str, headline: &str, otp: &str) -> AppResult<()> {
    let html = OtpEmail { headline, otp }.render().map_err(MailError::from)?;
    state.mailer.send(email, subject, &html).await?;
    Ok(())
}

/// Issue a fresh code to an existing user and mail it.
async fn reissue_otp(
    state: &AppState,
    user: users::Model,
    subject: &str,
    headline: &str,
) -> AppResult<()> {
    let otp = generate_otp();
    let email = user.email.clone();
    let mut active: users::ActiveModel = user.into();
    active.otp = Set(Some(otp.clone()));
    active.otp_expires_at = Set(Some(otp_expiry(state)?));
    active.update(&state.orm).await?;

    send_otp(state, &email, subject, headline, &otp).await
}

pub async fn signup(
    state: &AppState,
    payload: SignupRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let SignupRequest {
        name,
        email,
        password,
    } = payload;
    let email = normalize_email(&email);
    if name.trim().is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "name, email and password are required".into(),
        ));
    }
    if find_by_email(state, &email).await?.is_some() {
        return Err(AppError::BadRequest("Email already exists".into()));
    }

    let otp = generate_otp();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(email.clone()),
        password_hash: Set(hash_password(&password)?),
        role: Set(ROLE_USER.to_string()),
        is_verified: Set(false),
        otp: Set(Some(otp.clone())),
        otp_expires_at: Set(Some(otp_expiry(state)?)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    send_otp(state, &email, "Email Verification OTP", "Your OTP is", &otp).await?;

    audit::record(
        &state.pool,
        user.id,
        "user_signup",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::message("OTP sent to email"))
}

pub async fn verify_otp(
    state: &AppState,
    payload: VerifyOtpRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = find_by_email(state, &payload.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".into()))?;

    if !otp_is_valid(
        user.otp.as_deref(),
        user.otp_expires_at,
        &payload.otp,
        Utc::now(),
    ) {
        return Err(AppError::BadRequest("Invalid or expired OTP".into()));
    }

    let mut active: users::ActiveModel = user.into();
    active.is_verified = Set(true);
    active.otp = Set(None);
    active.otp_expires_at = Set(None);
    let user = active.update(&state.orm).await?;

    let token = issue_token(&state.config.jwt_secret, user.id, ROLE_USER)?;
    tracing::info!(user_id = %user.id, "email verified");

    Ok(ApiResponse::success(
        "Email verified successfully",
        LoginResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = find_by_email(state, &payload.email)
        .await?
        .ok_or_else(|| AppError::BadRequest("User does not exist".into()))?;

    if !user.is_verified {
        return Err(AppError::BadRequest("Email not verified".into()));
    }
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid credentials".into()));
    }

    let token = issue_token(&state.config.jwt_secret, user.id, ROLE_USER)?;

    audit::record(
        &state.pool,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Login successful",
        LoginResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn forgot_password(
    state: &AppState,
    payload: EmailRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = find_by_email(state, &payload.email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    reissue_otp(
        state,
        user,
        "Password Reset OTP",
        "Your Password Reset OTP is",
    )
    .await?;
    Ok(ApiResponse::message("OTP sent to your email"))
}

pub async fn resend_otp(
    state: &AppState,
    payload: EmailRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = find_by_email(state, &payload.email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    reissue_otp(state, user, "Resent OTP", "Your new OTP is").await?;
    Ok(ApiResponse::message("New OTP sent to your email"))
}

pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = find_by_email(state, &payload.email)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if !otp_is_valid(
        user.otp.as_deref(),
        user.otp_expires_at,
        &payload.otp,
        Utc::now(),
    ) {
        return Err(AppError::BadRequest("Invalid or expired OTP".into()));
    }
    if payload.new_password.is_empty() {
        return Err(AppError::BadRequest("new_password is required".into()));
    }

    let user_id = user.id;
    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    active.otp = Set(None);
    active.otp_expires_at = Set(None);
    active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user_id,
        "password_reset",
        "users",
        serde_json::json!({ "user_id": user_id }),
    )
    .await;

    Ok(ApiResponse::message(
        "Password reset successfully. Please login.",
    ))
}

pub async fn admin_login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let invalid = || AppError::Unauthorized("Invalid admin credentials".into());

    let user = find_by_email(state, &payload.email)
        .await?
        .filter(|user| user.role == ROLE_ADMIN)
        .ok_or_else(invalid)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = issue_token(&state.config.jwt_secret, user.id, ROLE_ADMIN)?;

    audit::record(
        &state.pool,
        user.id,
        "admin_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Admin login successful",
        LoginResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..50 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn otp_must_match_and_be_unexpired() {
        let now = Utc::now();
        let later: DateTime<FixedOffset> = (now + Duration::seconds(60)).into();
        let earlier: DateTime<FixedOffset> = (now - Duration::seconds(1)).into();

        assert!(otp_is_valid(Some("123456"), Some(later), "123456", now));
        assert!(otp_is_valid(Some("123456"), Some(later), " 123456 ", now));
        assert!(!otp_is_valid(Some("123456"), Some(later), "654321", now));
        assert!(!otp_is_valid(Some("123456"), Some(earlier), "123456", now));
        assert!(!otp_is_valid(None, None, "123456", now));
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("s3cret!").expect("hash");
        assert!(verify_password("s3cret!", &hash).expect("verify"));
        assert!(!verify_password("wrong", &hash).expect("verify"));
    }
}
