//! Startup configuration.
//!
//! Read from a YAML file, then overridden from the environment:
//!
//! ```yaml
//! wifi:
//!   ssid: "home"
//!   password: "secret"
//!   max_retries: 5
//!   retry_delay_ms: 2000
//! device:
//!   output_pin: 2
//! server:
//!   listen_addr: "0.0.0.0:80"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::net::LinkSettings;

pub const CONFIG_PATH_VAR: &str = "LEDSWITCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "ledswitch.yaml";

const MAX_SSID_LEN: usize = 32;
const MAX_PASSWORD_LEN: usize = 64;
/// Highest GPIO number on the ESP32
const MAX_OUTPUT_PIN: u8 = 39;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wifi: WifiConfig,
    pub device: DeviceConfig,
    pub server: ServerConfig,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    /// Empty for open networks
    pub password: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            max_retries: 5,
            retry_delay_ms: 2000,
        }
    }
}

impl std::fmt::Debug for WifiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WifiConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub output_pin: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { output_pin: 2 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:80".to_string(),
        }
    }
}

impl Config {
    /// Loads the file named by `LEDSWITCH_CONFIG` (or `ledswitch.yaml`),
    /// applies environment overrides and validates the result.
    ///
    /// A missing file is not an error; everything then comes from defaults
    /// and the environment.
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut cfg = if Path::new(&path).exists() {
            Self::load_from(&path)?
        } else {
            tracing::debug!(path = %path, "no config file, using defaults");
            Self::default()
        };

        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Overrides settings from `WIFI_SSID`, `WIFI_PASSWORD`, `OUTPUT_PIN` and
    /// `LISTEN`, looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ssid) = lookup("WIFI_SSID") {
            self.wifi.ssid = ssid;
        }
        if let Some(password) = lookup("WIFI_PASSWORD") {
            self.wifi.password = password;
        }
        if let Some(pin) = lookup("OUTPUT_PIN") {
            self.device.output_pin = pin
                .trim()
                .parse()
                .with_context(|| format!("OUTPUT_PIN is not a pin number: {pin}"))?;
        }
        if let Some(listen) = lookup("LISTEN") {
            self.server.listen_addr = listen;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.wifi.ssid.is_empty() {
            bail!("wifi.ssid is required");
        }
        if self.wifi.ssid.len() > MAX_SSID_LEN {
            bail!("wifi.ssid is longer than {MAX_SSID_LEN} bytes");
        }
        if self.wifi.password.len() > MAX_PASSWORD_LEN {
            bail!("wifi.password is longer than {MAX_PASSWORD_LEN} bytes");
        }
        if self.wifi.max_retries == 0 {
            bail!("wifi.max_retries must be at least 1");
        }
        if self.device.output_pin > MAX_OUTPUT_PIN {
            bail!(
                "device.output_pin {} is out of range (0..={MAX_OUTPUT_PIN})",
                self.device.output_pin
            );
        }
        Ok(())
    }

    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            max_retries: self.wifi.max_retries,
            retry_delay: Duration::from_millis(self.wifi.retry_delay_ms),
        }
    }
}
