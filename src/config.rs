//! Runtime configuration loaded from a TOML file.
//!
//! Two tables: `[network]` says where and how often to send, `[rev_lights]`
//! tunes the wheel's RPM-bar derivation. Example:
//!
//! ```toml
//! [network]
//! ip = "127.0.0.1"
//! port = 20777
//! frequency_hz = 30
//!
//! [rev_lights]
//! min_rpm = 9000
//! max_rpm = 17000
//! max_percent = 90
//! ```

use crate::{Result, TelemetryError};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub rev_lights: RevLightConfig,
}

/// UDP target and send cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub ip: IpAddr,
    pub port: u16,
    /// Packets per second, per packet type. Each of the three packet sends in
    /// a cycle is followed by a full `1/frequency_hz` pacing delay.
    pub frequency_hz: u32,
}

/// Tuning for the rev-light intensity derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevLightConfig {
    /// RPM at or below which the bar stays dark.
    pub min_rpm: u16,
    /// RPM at which the bar reaches `max_percent`.
    pub max_rpm: u16,
    /// Ceiling for the emitted intensity value.
    pub max_percent: u8,
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Config`] if the file cannot be read, does not
    /// parse, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| TelemetryError::config(path, e))?;
        let config: AppConfig =
            toml::from_str(&raw).map_err(|e| TelemetryError::config(path, e.message()))?;
        config.validate().map_err(|reason| TelemetryError::config(path, reason))?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.network.frequency_hz == 0 {
            return Err("frequency_hz must be at least 1".to_string());
        }
        if self.rev_lights.max_rpm <= self.rev_lights.min_rpm {
            return Err(format!(
                "max_rpm ({}) must be greater than min_rpm ({})",
                self.rev_lights.max_rpm, self.rev_lights.min_rpm
            ));
        }
        Ok(())
    }

    /// Pacing delay inserted after each packet send.
    pub fn send_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.network.frequency_hz))
    }

    /// The peripheral's UDP address.
    pub fn target(&self) -> SocketAddr {
        SocketAddr::new(self.network.ip, self.network.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const EXAMPLE: &str = r#"
        [network]
        ip = "192.168.1.40"
        port = 20777
        frequency_hz = 30

        [rev_lights]
        min_rpm = 9000
        max_rpm = 17000
        max_percent = 90
    "#;

    #[test]
    fn parses_example_config() {
        let config: AppConfig = toml::from_str(EXAMPLE).unwrap();
        assert_eq!(config.network.ip, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 40)));
        assert_eq!(config.network.port, 20777);
        assert_eq!(config.network.frequency_hz, 30);
        assert_eq!(config.rev_lights.min_rpm, 9000);
        assert_eq!(config.rev_lights.max_rpm, 17000);
        assert_eq!(config.rev_lights.max_percent, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn send_interval_matches_frequency() {
        let config: AppConfig = toml::from_str(EXAMPLE).unwrap();
        let interval = config.send_interval();
        assert!((interval.as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn target_combines_ip_and_port() {
        let config: AppConfig = toml::from_str(EXAMPLE).unwrap();
        assert_eq!(config.target().to_string(), "192.168.1.40:20777");
    }

    #[test]
    fn rejects_inverted_rpm_range() {
        let raw = EXAMPLE.replace("max_rpm = 17000", "max_rpm = 8000");
        let config: AppConfig = toml::from_str(&raw).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_frequency() {
        let raw = EXAMPLE.replace("frequency_hz = 30", "frequency_hz = 0");
        let config: AppConfig = toml::from_str(&raw).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let error = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(error, TelemetryError::Config { .. }));
    }
}
