use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{CodecError, Result};

/// Bluetooth SIG company id carried in pass-through vendor-unique frames and
/// returned by GetCapabilities(CompanyId).
pub const BT_SIG_COMPANY_ID: u32 = 0x001958;

/// AV/C opcode of vendor-dependent (metadata) frames
pub const OPCODE_VENDOR: u8 = 0x00;

/// AV/C opcode of pass-through frames
pub const OPCODE_PASS_THROUGH: u8 = 0x7C;

/// Pseudo opcode used for the browsing channel
pub const OPCODE_BROWSE: u8 = 0xFF;

/// Vendor header: pdu id + packet type + 2 byte parameter length
pub const VENDOR_HEADER_SIZE: usize = 4;

/// Browse header: pdu id + 2 byte parameter length
pub const BROWSE_HEADER_SIZE: usize = 3;

/// Pass-through header: 2 byte operation id, no length
pub const PASS_THROUGH_HEADER_SIZE: usize = 2;

/// Default capacity for vendor-dependent and pass-through packets
pub const DEFAULT_SMALL_CAPACITY: usize = 512;

/// Default capacity for browsing packets and GetElementAttributes responses
pub const DEFAULT_LARGE_CAPACITY: usize = 4096;

/// Smallest capacity that still holds any fixed-size PDU
pub const MIN_CAPACITY: usize = 16;

const ENV_SMALL_BUFFER: &str = "AVRCP_CODEC_SMALL_BUFFER";
const ENV_LARGE_BUFFER: &str = "AVRCP_CODEC_LARGE_BUFFER";
const ENV_LOG_LEVEL: &str = "AVRCP_CODEC_LOG_LEVEL";

/// Top-level codec configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodecConfig {
    pub buffers: BufferConfig,
    pub logging: LoggingConfig,
}

/// Output buffer sizing per opcode class
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BufferConfig {
    /// Capacity for vendor-dependent and pass-through envelopes
    pub small_capacity: usize,
    /// Capacity for browsing envelopes and GetElementAttributes responses
    pub large_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            small_capacity: DEFAULT_SMALL_CAPACITY,
            large_capacity: DEFAULT_LARGE_CAPACITY,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub app_name: String,
    #[serde(with = "level_serde")]
    pub log_level: Level,
    pub json_format: bool,
    /// Directory for rolling log files, None for stdout only
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: "avrcp-codec".to_string(),
            log_level: Level::INFO,
            json_format: false,
            log_dir: None,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| CodecError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the default configuration and apply `AVRCP_CODEC_*` overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_SMALL_BUFFER) {
            config.buffers.small_capacity = parse_env(ENV_SMALL_BUFFER, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_LARGE_BUFFER) {
            config.buffers.large_capacity = parse_env(ENV_LARGE_BUFFER, &value)?;
        }
        if let Ok(value) = std::env::var(ENV_LOG_LEVEL) {
            config.logging.log_level = Level::from_str(&value)
                .map_err(|_| CodecError::Config(format!("{ENV_LOG_LEVEL}: {value}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Default configuration with programmatic overrides
    pub fn default_with_overrides<F>(f: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        f(&mut config);
        config
    }

    /// Write configuration as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| CodecError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let buffers = &self.buffers;
        if buffers.small_capacity < MIN_CAPACITY {
            return Err(CodecError::Config(format!(
                "small_capacity must be at least {MIN_CAPACITY}"
            )));
        }
        if buffers.large_capacity < buffers.small_capacity {
            return Err(CodecError::Config(
                "large_capacity must not be below small_capacity".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env(name: &str, value: &str) -> Result<usize> {
    value
        .parse()
        .map_err(|_| CodecError::Config(format!("{name}: {value}")))
}

mod level_serde {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(level: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&level.to_string().to_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let s = String::deserialize(deserializer)?;
        Level::from_str(&s).map_err(serde::de::Error::custom)
    }
}
