use std::str::FromStr;

use jsonwebtoken::Algorithm;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub default_admin: DefaultAdminSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        Ok(SqliteConnectOptions::from_str(&self.url)?.create_if_missing(true))
    }
}

/// Token signing and password hashing settings
///
/// Loaded once at startup and shared read-only with every request.
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

// keeps the secret out of debug output
impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret_key", &"[redacted]")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthSettings {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.secret_key".to_string()));
        }
        if self.secret_key.len() < 32 {
            tracing::warn!("auth.secret_key is shorter than 32 bytes");
        }
        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::InvalidValue(format!(
                "auth.algorithm must be an HMAC algorithm, got {:?}",
                self.algorithm
            )));
        }
        if self.access_token_expire_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "auth.access_token_expire_minutes must be positive".to_string(),
            ));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        Ok(())
    }
}

/// Seed account created at startup when missing
#[derive(serde::Deserialize, Clone)]
pub struct DefaultAdminSettings {
    pub username: String,
    pub email: String,
    pub password: String,
    pub organization: Option<String>,
}

impl std::fmt::Debug for DefaultAdminSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultAdminSettings")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

/// Reads `configuration.*` from the working directory, then `APP__*`
/// environment variables (e.g. `APP__AUTH__SECRET_KEY`).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.auth.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_settings() -> AuthSettings {
        AuthSettings {
            secret_key: "a".repeat(64),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    #[test]
    fn valid_auth_settings_pass() {
        assert!(auth_settings().validate().is_ok());
    }

    #[test]
    fn asymmetric_algorithm_is_rejected() {
        let mut settings = auth_settings();
        settings.algorithm = Algorithm::RS256;
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn empty_secret_is_rejected() {
        let mut settings = auth_settings();
        settings.secret_key = "  ".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn non_positive_expiry_is_rejected() {
        let mut settings = auth_settings();
        settings.access_token_expire_minutes = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", auth_settings());
        assert!(!rendered.contains(&"a".repeat(64)));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn settings_deserialize_from_yaml() {
        let raw = r#"
application:
  port: 8000
database:
  url: "sqlite::memory:"
auth:
  secret_key: "0123456789abcdef0123456789abcdef"
  algorithm: HS256
  access_token_expire_minutes: 15
default_admin:
  username: admin
  email: admin@example.com
  password: secret-admin
"#;
        let settings = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap();

        assert_eq!(settings.application.host, "127.0.0.1");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.auth.algorithm, Algorithm::HS256);
        assert_eq!(settings.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(settings.default_admin.organization.is_none());
    }
}
