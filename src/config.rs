use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::warn;

static CONFIG: OnceCell<MessageConfig> = OnceCell::new();
static DEFAULT: OnceCell<MessageConfig> = OnceCell::new();

/// Process-wide defaults and limits for messages and body parsing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Protocol version given to newly created messages.
    pub protocol_version: String,

    /// Maximum number of body bytes read when parsing form bodies.
    pub max_body_size: usize,

    /// Per-file limit for multipart uploads.
    pub max_file_size: usize,

    /// Uploaded files kept per request; extra parts are dropped.
    pub max_file_count: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            protocol_version: "1.1".to_string(),
            max_body_size: 8 * 1024 * 1024, // 8 MB
            max_file_size: 2 * 1024 * 1024, // 2 MB
            max_file_count: 20,
        }
    }
}

impl MessageConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<MessageConfig>(content)
    }

    /// Loads the config from a TOML file, falling back to the defaults when
    /// the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(%path, %err, "fail to read config, fall back to default");
                return MessageConfig::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(message_config) => message_config,
            Err(err) => {
                warn!(%path, %err, "fail to deserialize config, fall back to default");
                MessageConfig::default()
            }
        }
    }
}

/// Installs the process-wide config. Returns the rejected value if one was
/// already installed.
pub fn set_config(cfg: MessageConfig) -> Result<(), MessageConfig> {
    CONFIG.set(cfg)
}

/// The installed config, or the defaults when none was installed.
pub fn config() -> &'static MessageConfig {
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(MessageConfig::default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = MessageConfig::from_toml_str("max_file_count = 3\nprotocol_version = \"1.0\"")
            .unwrap();
        assert_eq!(cfg.max_file_count, 3);
        assert_eq!(cfg.protocol_version, "1.0");
        assert_eq!(cfg.max_body_size, MessageConfig::default().max_body_size);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(MessageConfig::from_toml_str("max_body_size = \"big\"").is_err());
    }

    #[test]
    fn from_file_falls_back_to_default() {
        assert_eq!(
            MessageConfig::from_file("/definitely/not/here.toml"),
            MessageConfig::default()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml =").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(MessageConfig::from_file(&path), MessageConfig::default());
    }

    #[test]
    fn from_file_reads_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_file_size = 1024").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert_eq!(MessageConfig::from_file(&path).max_file_size, 1024);
    }
}
