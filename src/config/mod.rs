// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

pub use state::AppState;
pub use types::{Config, HttpConfig};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable that overrides `server.port`
pub const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from the given file path (without extension),
    /// `CHATBOT_*` environment variables and the `PORT` variable
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let port = std::env::var(PORT_ENV).ok();
        Self::load_with_port(config_path, port.as_deref())
    }

    /// Same as [`Config::load_from`] with an explicit port override
    pub fn load_with_port(
        config_path: &str,
        port_override: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        let port = port_override.map(parse_port).transpose()?;

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 10)?
            .set_default("http.server_name", "netserve-chatbot")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 65_536)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CHATBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }

    /// Listen address; `server.host` must be an IPv4 or IPv6 literal
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let ip = self
            .server
            .host
            .parse::<IpAddr>()
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn parse_port(value: &str) -> Result<u16, config::ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| config::ConfigError::Message(format!("Invalid {PORT_ENV} value '{value}': {e}")))
}
