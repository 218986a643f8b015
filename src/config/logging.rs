use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Logging {
    #[serde(default)]
    pub style: LoggingStyle,
    /// Logging targets in `EnvFilter` syntax. `RUST_LOG` is used
    /// instead if this is not set.
    ///
    /// **Environment variables**:
    /// - `YATUBE_LOGGING__TARGETS`
    #[serde(default)]
    pub targets: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    Compact,
    #[default]
    Full,
    Pretty,
}
