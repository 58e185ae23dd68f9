use std::env;

use log::*;
use wallet_tools::WalletConfig;

const DEFAULT_WPS_HOST: &str = "127.0.0.1";
const DEFAULT_WPS_PORT: u16 = 3000;
const DEFAULT_ORIGIN: &str = "www.example.com";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The issuer account under which every pass class and object is namespaced. All composite
    /// ids issued by this server look like `{issuer_id}.{suffix}`.
    pub issuer_id: String,
    /// Web origins allowed to render the save button for tokens issued by this server.
    pub origins: Vec<String>,
    /// Remote pass store connection settings.
    pub wallet: WalletConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WPS_HOST.to_string(),
            port: DEFAULT_WPS_PORT,
            issuer_id: String::default(),
            origins: vec![DEFAULT_ORIGIN.to_string()],
            wallet: WalletConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WPS_HOST").ok().unwrap_or_else(|| DEFAULT_WPS_HOST.into());
        let port = env::var("WPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for WPS_PORT. {e} Using the default, {DEFAULT_WPS_PORT}, instead.");
                    DEFAULT_WPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WPS_PORT);
        let issuer_id = env::var("WPS_ISSUER_ID").ok().unwrap_or_else(|| {
            error!("🪛️ WPS_ISSUER_ID is not set. Every pass this server issues needs an issuer account id.");
            String::default()
        });
        let origins = match env::var("WPS_ALLOWED_ORIGINS") {
            Ok(s) => {
                let origins = s.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect::<Vec<_>>();
                if origins.is_empty() {
                    warn!("🪛️ WPS_ALLOWED_ORIGINS is set but empty. Save buttons will not render on any origin.");
                }
                origins
            },
            Err(_) => {
                info!("🪛️ WPS_ALLOWED_ORIGINS not set, using {DEFAULT_ORIGIN} as default");
                vec![DEFAULT_ORIGIN.to_string()]
            },
        };
        let wallet = WalletConfig::new_from_env_or_default();
        Self { host, port, issuer_id, origins, wallet }
    }
}

/// The subset of the configuration the request handlers need. Kept small, and it excludes secrets
/// so nothing sensitive gets passed around the handler graph.
#[derive(Clone, Debug)]
pub struct IssuerOptions {
    pub issuer_id: String,
}

impl IssuerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { issuer_id: config.issuer_id.clone() }
    }
}
