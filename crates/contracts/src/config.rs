//! RelayConfig - Config Loader output
//!
//! Describes one complete relay session: broker endpoint, topic, filter
//! rules, and local output flags.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Complete relay configuration
///
/// Assembled once at startup from config file, environment, and flags, then
/// handed to the dispatcher and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RelayConfig {
    /// Topic the filtered lines are published under (required, non-empty)
    #[validate(length(min = 1, message = "topic must not be empty"))]
    pub topic: String,

    /// TCP address of the nsqd daemon, e.g. `127.0.0.1:4150`
    #[validate(length(min = 1, message = "nsqd address must not be empty"))]
    pub nsqd_addr: String,

    /// Regex filter; lines that do not match are not published
    #[serde(default)]
    pub regex: Option<String>,

    /// Substring filter; a leading `!` negates the rule
    #[serde(default)]
    pub contains: Option<String>,

    /// Mirror every incoming line to stderr, unfiltered
    #[serde(default)]
    pub stderr_mirror: bool,

    /// Echo lines that passed the filters to stdout
    #[serde(default)]
    pub debug_echo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_deserializes() {
        let cfg: RelayConfig =
            serde_json::from_str(r#"{"topic":"logs","nsqd_addr":"localhost:4150"}"#).unwrap();
        assert_eq!(cfg.topic, "logs");
        assert_eq!(cfg.nsqd_addr, "localhost:4150");
        assert!(cfg.regex.is_none());
        assert!(cfg.contains.is_none());
        assert!(!cfg.stderr_mirror);
        assert!(!cfg.debug_echo);
    }

    #[test]
    fn test_validate_rejects_empty_topic() {
        let cfg = RelayConfig {
            topic: String::new(),
            nsqd_addr: "localhost:4150".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_full_config() {
        let cfg = RelayConfig {
            topic: "logs".to_string(),
            nsqd_addr: "localhost:4150".to_string(),
            regex: Some(r"http://".to_string()),
            contains: Some("!api".to_string()),
            stderr_mirror: true,
            debug_echo: true,
        };
        assert!(cfg.validate().is_ok());
    }
}
