use serde::Deserialize;

use registrar_core::config::Config;

/// Records service configuration, read from the environment by `envy`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsConfig {
    /// Database connection URL.
    pub database_url: String,
    /// HTTP port. Env var: `RECORDS_PORT`.
    #[serde(default = "default_port")]
    pub records_port: u16,

    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// STARTTLS when true, plain SMTP otherwise.
    #[serde(default = "default_true")]
    pub smtp_use_tls: bool,
    pub mail_sender_address: String,
    #[serde(default = "default_sender_name")]
    pub mail_sender_name: String,

    /// Seeded as the first Admin when both are set.
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default = "default_admin_name")]
    pub admin_full_name: String,
}

fn default_port() -> u16 {
    3114
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_sender_name() -> String {
    "Registrar".to_owned()
}

fn default_admin_name() -> String {
    "System Administrator".to_owned()
}

impl Config for RecordsConfig {}
