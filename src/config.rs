use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIAS_WINDOW: Duration = Duration::from_secs(4);

/// Runtime settings for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Minimum gap between two accepted biased grid requests.
    pub bias_window: Duration,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Loopback config on an OS-assigned port.
    pub fn ephemeral() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bias_window: DEFAULT_BIAS_WINDOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_address() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "0.0.0.0:3000");
        assert_eq!(config.bias_window, Duration::from_millis(4000));
    }

    #[test]
    fn test_ephemeral_address() {
        let config = ServerConfig::ephemeral();
        assert_eq!(config.address(), "127.0.0.1:0");
        assert_eq!(config.bias_window, DEFAULT_BIAS_WINDOW);
    }
}
