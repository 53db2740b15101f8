use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// `[logger]` table of the agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter directives, e.g. `info` or `runway_core=debug,info`.
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Include the event target (module path).
    pub with_targets: bool,
    /// Colour text output. Ignored when stdout is not a terminal.
    pub use_color: bool,
    /// Let a valid `RUST_LOG` override `level`.
    pub env_override: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
            env_override: true,
        }
    }
}

impl LoggerConfig {
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }

    /// Level in effect: `RUST_LOG` when allowed and valid, else the configured one.
    pub fn effective_level(&self) -> LoggerLevel {
        if self.env_override {
            if let Some(lvl) = std::env::var("RUST_LOG")
                .ok()
                .and_then(|raw| LoggerLevel::new(raw).ok())
            {
                return lvl;
            }
        }
        self.level.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = LoggerConfig::default();
        assert_eq!(cfg.format, LoggerFormat::Text);
        assert_eq!(cfg.tz, LoggerTimeZone::Utc);
        assert_eq!(cfg.level.as_str(), "info");
        assert!(cfg.with_targets);
        assert!(cfg.env_override);
    }

    #[test]
    fn toml_table_with_missing_fields() {
        let cfg: LoggerConfig = toml::from_str(
            r#"
            format = "json"
            level = "runway_core=debug,info"
            tz = "local"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.format, LoggerFormat::Json);
        assert_eq!(cfg.tz, LoggerTimeZone::Local);
        assert_eq!(cfg.level.as_str(), "runway_core=debug,info");
        assert!(cfg.use_color);
    }

    #[test]
    fn invalid_level_fails_to_parse() {
        assert!(toml::from_str::<LoggerConfig>(r#"level = "x=loud""#).is_err());
    }

    #[test]
    fn without_override_configured_level_wins() {
        let cfg = LoggerConfig {
            level: "warn".parse().unwrap(),
            env_override: false,
            ..Default::default()
        };
        assert_eq!(cfg.effective_level().as_str(), "warn");
    }
}
