use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub otp_ttl: Duration,
    pub max_upload_bytes: usize,
    pub outbound_timeout: Duration,
    pub smtp: SmtpConfig,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    /// Recipient of contact-form notifications.
    pub admin_address: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);

        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let from_address = env::var("MAIL_FROM").unwrap_or_else(|_| smtp_username.clone());
        let admin_address = env::var("ADMIN_EMAIL").unwrap_or_else(|_| from_address.clone());
        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: parse_or("SMTP_PORT", 587),
            username: smtp_username,
            password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_address,
            admin_address,
        };

        let cloudinary = CloudinaryConfig {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
        };

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            otp_ttl: Duration::from_secs(parse_or("OTP_TTL_SECS", 60)),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024),
            outbound_timeout: Duration::from_secs(parse_or("OUTBOUND_TIMEOUT_SECS", 30)),
            smtp,
            cloudinary,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    parse_value(env::var(key).ok().as_deref(), default)
}

fn parse_value<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::parse_value;

    #[test]
    fn falls_back_when_missing_or_malformed() {
        assert_eq!(parse_value::<u16>(None, 3000), 3000);
        assert_eq!(parse_value::<u16>(Some("not-a-port"), 3000), 3000);
        assert_eq!(parse_value::<u16>(Some(" 8080 "), 3000), 8080);
    }
}
