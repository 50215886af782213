//! Processor configuration shared between the core pipeline and its binaries.

use serde::{Deserialize, Serialize};

/// Default bound on events parked while waiting for a forward reference.
pub const DEFAULT_MAX_PENDING: usize = 4096;

/// Tuning knobs for the tracker event processor.
///
/// Every field has a default so partial TOML files are valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Log and skip records that fail to decode instead of stopping the stream.
    pub skip_malformed: bool,

    /// Park events with unresolved references and retry them when the
    /// referenced unit or player shows up later in the stream.
    pub retry_unresolved: bool,

    /// Maximum number of parked events. The oldest is dropped first and stays
    /// unresolved.
    pub max_pending: usize,

    /// Print every rendered event line (parse worker only).
    pub render_events: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            skip_malformed: true,
            retry_unresolved: true,
            max_pending: DEFAULT_MAX_PENDING,
            render_events: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config: ProcessorConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let config: ProcessorConfig = toml::from_str(
            r#"
            skip_malformed = false
            max_pending = 16
            "#,
        )
        .unwrap();

        assert!(!config.skip_malformed);
        assert_eq!(config.max_pending, 16);
        assert!(config.retry_unresolved, "unspecified field keeps its default");
        assert!(!config.render_events);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = ProcessorConfig {
            render_events: true,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: ProcessorConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
