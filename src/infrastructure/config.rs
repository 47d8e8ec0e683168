use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::errors::{InfraError, InfraResult};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = "tsorder.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Menu catalog to load; the builtin menu when unset.
    pub menu_path: Option<PathBuf>,
    pub log_file: PathBuf,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    pub notification_secs: u64,
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            menu_path: None,
            log_file: PathBuf::from("tsorder.log"),
            log_filter: "info".into(),
            notification_secs: 5,
            tick_rate_ms: 250,
        }
    }
}

impl Settings {
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    /// Applies `TSORDER_*` overrides. Numbers that fail to parse keep the
    /// previous value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TSORDER_MENU") {
            self.menu_path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("TSORDER_LOG_FILE") {
            self.log_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("TSORDER_LOG") {
            self.log_filter = v;
        }
        if let Some(v) = lookup("TSORDER_NOTIFICATION_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.notification_secs = parsed;
            }
        }
        if let Some(v) = lookup("TSORDER_TICK_MS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.tick_rate_ms = parsed;
            }
        }
    }

    /// Applies command-line flags. They win over every other layer.
    pub fn apply_cli(&mut self, menu: Option<PathBuf>, log_file: Option<PathBuf>) {
        if let Some(menu) = menu {
            self.menu_path = Some(menu);
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
    }
}

/// Loads settings from defaults, the settings file and the environment.
///
/// An explicit `path` must exist. Without one, `tsorder.toml` in the
/// working directory is read if present.
pub fn load_settings(path: Option<&Path>) -> InfraResult<Settings> {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

/// Same as [`load_settings`], reading environment values through `lookup`.
pub fn load_settings_with_env<F>(path: Option<&Path>, lookup: F) -> InfraResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                read_settings_file(default_path)?
            } else {
                Settings::default()
            }
        }
    };

    settings.apply_env(lookup);
    Ok(settings)
}

fn read_settings_file(path: &Path) -> InfraResult<Settings> {
    let raw = fs::read_to_string(path).map_err(|source| InfraError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| InfraError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.notification_timeout(), Duration::from_secs(5));
        assert_eq!(settings.tick_rate(), Duration::from_millis(250));
        assert!(settings.menu_path.is_none());
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "menu_path = \"menu.csv\"\nnotification_secs = 2\n").unwrap();

        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.menu_path, Some(PathBuf::from("menu.csv")));
        assert_eq!(settings.notification_secs, 2);
        assert_eq!(settings.tick_rate_ms, 250);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, InfraError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "notification_secs = \"soon\"").unwrap();

        let err = read_settings_file(&path).unwrap_err();
        assert!(matches!(err, InfraError::Toml { .. }));
    }

    #[test]
    fn test_layers_apply_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsorder.toml");
        fs::write(
            &path,
            "menu_path = \"file.json\"\nlog_file = \"file.log\"\nlog_filter = \"warn\"\nnotification_secs = 2\n",
        )
        .unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("TSORDER_MENU", "env.json"),
            ("TSORDER_LOG_FILE", "env.log"),
            ("TSORDER_LOG", "debug"),
        ]);

        let mut settings =
            load_settings_with_env(Some(&path), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(settings.tick_rate_ms, 250);
        assert_eq!(settings.notification_secs, 2);
        assert_eq!(settings.log_filter, "debug");
        assert_eq!(settings.menu_path, Some(PathBuf::from("env.json")));
        assert_eq!(settings.log_file, PathBuf::from("env.log"));

        settings.apply_cli(Some(PathBuf::from("cli.csv")), None);
        assert_eq!(settings.menu_path, Some(PathBuf::from("cli.csv")));
        assert_eq!(settings.log_file, PathBuf::from("env.log"));

        settings.apply_cli(None, Some(PathBuf::from("cli.log")));
        assert_eq!(settings.menu_path, Some(PathBuf::from("cli.csv")));
        assert_eq!(settings.log_file, PathBuf::from("cli.log"));
        assert_eq!(settings.notification_secs, 2);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("TSORDER_MENU", "/srv/menu.json"),
            ("TSORDER_LOG", "tsorder=debug"),
            ("TSORDER_NOTIFICATION_SECS", "9"),
            ("TSORDER_TICK_MS", "not-a-number"),
        ]);

        let mut settings = Settings::default();
        settings.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.menu_path, Some(PathBuf::from("/srv/menu.json")));
        assert_eq!(settings.log_filter, "tsorder=debug");
        assert_eq!(settings.notification_secs, 9);
        assert_eq!(settings.tick_rate_ms, 250);
        assert_eq!(settings.log_file, PathBuf::from("tsorder.log"));
    }
}
