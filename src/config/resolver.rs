//! Data directory resolution.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. `--data-dir` CLI flag
//! 2. `INFOPAGES_DATA_DIR` environment variable
//! 3. Platform data directory (`~/.local/share/infopages` on Linux)
//! 4. `./infopages` in the current directory

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "INFOPAGES_DATA_DIR";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Platform default location
    Platform,
    /// Built-in fallback
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Platform => write!(f, "platform"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Resolve the data directory from the flag, environment and platform.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Resolved<PathBuf> {
    resolve_data_dir_with(explicit, std::env::var(DATA_DIR_ENV).ok(), dirs::data_dir())
}

/// Resolution with injected environment and platform lookups.
pub fn resolve_data_dir_with(
    explicit: Option<PathBuf>,
    env_value: Option<String>,
    platform_dir: Option<PathBuf>,
) -> Resolved<PathBuf> {
    if let Some(path) = explicit {
        return Resolved::new(path, ValueSource::CliFlag);
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Resolved::new(
            PathBuf::from(value),
            ValueSource::EnvVar(DATA_DIR_ENV.to_string()),
        );
    }
    if let Some(base) = platform_dir {
        return Resolved::new(base.join("infopages"), ValueSource::Platform);
    }
    Resolved::new(PathBuf::from("infopages"), ValueSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let resolved = resolve_data_dir_with(
            Some(PathBuf::from("/flag")),
            Some("/env".to_string()),
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(resolved.value, PathBuf::from("/flag"));
        assert_eq!(resolved.source, ValueSource::CliFlag);
    }

    #[test]
    fn test_env_over_platform() {
        let resolved = resolve_data_dir_with(
            None,
            Some("/env".to_string()),
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(resolved.value, PathBuf::from("/env"));
        assert_eq!(resolved.source.to_string(), "env:INFOPAGES_DATA_DIR");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let resolved =
            resolve_data_dir_with(None, Some("  ".to_string()), Some(PathBuf::from("/platform")));
        assert_eq!(resolved.value, PathBuf::from("/platform/infopages"));
        assert_eq!(resolved.source, ValueSource::Platform);
    }

    #[test]
    fn test_fallback_to_cwd() {
        let resolved = resolve_data_dir_with(None, None, None);
        assert_eq!(resolved.value, PathBuf::from("infopages"));
        assert_eq!(resolved.source, ValueSource::Default);
    }
}
