use std::env;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use warden_core::{AppError, AppResult, TenantDomain};
use warden_domain::PRIMARY_ROLE_NAME_PATTERN;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub server_url: String,
    pub access_token: String,
    pub tenant: TenantDomain,
    pub http_timeout: Duration,
    pub primary_role_name_pattern: String,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = required_non_empty(&lookup, "WARDEN_SERVER_URL")?
            .trim()
            .trim_end_matches('/')
            .to_owned();
        let access_token = required_non_empty(&lookup, "WARDEN_ACCESS_TOKEN")?;
        let tenant = tenant_domain(&lookup)?;

        let timeout_secs = parse_u64(&lookup, "WARDEN_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "WARDEN_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let primary_role_name_pattern = lookup("WARDEN_PRIMARY_ROLE_NAME_REGEX")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| PRIMARY_ROLE_NAME_PATTERN.to_owned());

        Ok(Self {
            server_url,
            access_token,
            tenant,
            http_timeout: Duration::from_secs(timeout_secs),
            primary_role_name_pattern,
        })
    }
}

pub fn tenant_domain<F>(lookup: &F) -> AppResult<TenantDomain>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("WARDEN_TENANT_DOMAIN")
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| Ok(TenantDomain::super_tenant()), TenantDomain::new)
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty<F>(lookup: &F, name: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_u64<F>(lookup: &F, name: &str, default: u64) -> AppResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use warden_core::{AppError, AppResult};
    use warden_domain::PRIMARY_ROLE_NAME_PATTERN;

    use super::ConsoleConfig;

    fn load(pairs: &[(&str, &str)]) -> AppResult<ConsoleConfig> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ConsoleConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn applies_defaults() -> AppResult<()> {
        let config = load(&[
            ("WARDEN_SERVER_URL", "https://localhost:9443/"),
            ("WARDEN_ACCESS_TOKEN", "token"),
        ])?;

        assert_eq!(config.server_url, "https://localhost:9443");
        assert_eq!(config.tenant.as_str(), "carbon.super");
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.primary_role_name_pattern, PRIMARY_ROLE_NAME_PATTERN);
        Ok(())
    }

    #[test]
    fn reads_overrides() -> AppResult<()> {
        let config = load(&[
            ("WARDEN_SERVER_URL", "https://iam.example.com"),
            ("WARDEN_ACCESS_TOKEN", "token"),
            ("WARDEN_TENANT_DOMAIN", "Wso2.com"),
            ("WARDEN_HTTP_TIMEOUT_SECS", "3"),
            ("WARDEN_PRIMARY_ROLE_NAME_REGEX", "^[a-z]+$"),
        ])?;

        assert_eq!(config.tenant.as_str(), "wso2.com");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.primary_role_name_pattern, "^[a-z]+$");
        Ok(())
    }

    #[test]
    fn requires_server_url_and_token() {
        assert!(matches!(
            load(&[("WARDEN_ACCESS_TOKEN", "token")]),
            Err(AppError::Validation(message)) if message.contains("WARDEN_SERVER_URL")
        ));
        assert!(matches!(
            load(&[
                ("WARDEN_SERVER_URL", "https://iam.example.com"),
                ("WARDEN_ACCESS_TOKEN", "  ")
            ]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_invalid_timeouts() {
        for timeout in ["0", "soon", "-1"] {
            assert!(matches!(
                load(&[
                    ("WARDEN_SERVER_URL", "https://iam.example.com"),
                    ("WARDEN_ACCESS_TOKEN", "token"),
                    ("WARDEN_HTTP_TIMEOUT_SECS", timeout),
                ]),
                Err(AppError::Validation(_))
            ));
        }
    }
}
