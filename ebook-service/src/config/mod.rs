use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_env_or_default, is_production};
use service_core::error::AppError;
use std::time::Duration;

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_FROM_EMAIL: &str = "support@stemsphere.academy";
pub const DEFAULT_FROM_NAME: &str = "STEMSphere Academy";

#[derive(Debug, Clone)]
pub struct EbookConfig {
    pub common: core_config::Config,
    pub resend: ResendConfig,
    pub sender: SenderConfig,
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: Secret<String>,
    pub api_url: String,
    /// Whole-request timeout for the provider call. `None` keeps the HTTP
    /// client default, which never times out.
    pub timeout_secs: Option<u64>,
}

impl ResendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
pub struct SenderConfig {
    pub from_email: String,
    pub from_name: String,
}

impl SenderConfig {
    /// `Name <address>` form used in the provider's `from` field.
    pub fn mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl EbookConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let timeout_secs =
            parse_timeout_secs(std::env::var("RESEND_TIMEOUT_SECS").ok().as_deref())?;

        Ok(EbookConfig {
            common: common_config,
            resend: ResendConfig {
                // Required in every environment: without it nothing can be sent.
                api_key: Secret::new(get_env("RESEND_API_KEY", None, is_prod)?),
                api_url: get_env_or_default("RESEND_API_URL", DEFAULT_RESEND_API_URL),
                timeout_secs,
            },
            sender: SenderConfig {
                from_email: get_env_or_default("EMAIL_FROM_ADDRESS", DEFAULT_FROM_EMAIL),
                from_name: get_env_or_default("EMAIL_FROM_NAME", DEFAULT_FROM_NAME),
            },
        })
    }
}

/// `None` when unset; an error when set to anything but whole seconds.
fn parse_timeout_secs(raw: Option<&str>) -> Result<Option<u64>, AppError> {
    raw.map(|value| {
        value.trim().parse::<u64>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "RESEND_TIMEOUT_SECS must be a whole number of seconds: {}",
                e
            ))
        })
    })
    .transpose()
}
