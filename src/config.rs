// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Mail account used for every transactional email
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
    // Worker proof documents
    pub upload_dir: String,
    pub otp_ttl_minutes: i64,
    pub admin_email_domain: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn init() -> Result<Config, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so parsing can be
    /// exercised without mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| format!("{} must be set", key))
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;

        let jwt_maxage = parse_or("JWT_MAXAGE", optional("JWT_MAXAGE"), 1440)?;
        let port = parse_or("PORT", optional("PORT"), 8000)?;
        let database_max_connections =
            parse_or("DATABASE_MAX_CONNECTIONS", optional("DATABASE_MAX_CONNECTIONS"), 10)?;

        // APP_MAIL / APP_PASSWORD are accepted for existing deployments
        let smtp_username = optional("SMTP_USERNAME")
            .or_else(|| optional("APP_MAIL"))
            .ok_or_else(|| "SMTP_USERNAME (or APP_MAIL) must be set".to_string())?;
        let smtp_password = optional("SMTP_PASSWORD")
            .or_else(|| optional("APP_PASSWORD"))
            .ok_or_else(|| "SMTP_PASSWORD (or APP_PASSWORD) must be set".to_string())?;
        let smtp_host = optional("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string());
        let smtp_port = parse_or("SMTP_PORT", optional("SMTP_PORT"), 587)?;
        let mail_from = optional("MAIL_FROM").unwrap_or_else(|| smtp_username.clone());

        let upload_dir = optional("UPLOAD_DIR").unwrap_or_else(|| "worker_proofs".to_string());
        let otp_ttl_minutes = parse_or("OTP_TTL_MINUTES", optional("OTP_TTL_MINUTES"), 10)?;
        let admin_email_domain =
            optional("ADMIN_EMAIL_DOMAIN").unwrap_or_else(|| "@admin.fixit".to_string());

        let allowed_origins = optional("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_maxage,
            port,
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            mail_from,
            upload_dir,
            otp_ttl_minutes,
            admin_email_domain,
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
            allowed_origins,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} has an invalid value: {}", key, value)),
        None => Ok(default),
    }
}
