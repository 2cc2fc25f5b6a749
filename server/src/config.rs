use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
pub struct AccessControl {
    /// Caller identity that bypasses the hidden/deleted visibility filter
    /// in match listings. Identified by an unauthenticated query parameter,
    /// so only allowed when the server is started with `--insecure`.
    #[serde(default)]
    pub privileged_caller: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound on inbound JSON bodies, in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    #[serde(default)]
    pub access_control: AccessControl,
}

fn default_max_payload_bytes() -> usize {
    40 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server_config: ServerConfig,
    pub db_path: String,
}

pub enum Insecure {
    Deny,
    Allow,
}

pub fn validate(cfg: &Config, insecure: Insecure) -> Result<(), String> {
    match insecure {
        Insecure::Allow => {}
        Insecure::Deny => {
            if cfg
                .server_config
                .access_control
                .privileged_caller
                .is_some()
            {
                return Err("privileged_caller is not allowed in secure mode".to_owned());
            }
        }
    }
    if cfg.server_config.max_payload_bytes == 0 {
        return Err("max_payload_bytes must be positive".to_owned());
    }
    Ok(())
}
