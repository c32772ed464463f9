//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.ccimport/config.toml` - User-wide defaults
//! - Project: `.ccimport/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::platform::{Platform, TargetOs};

/// ccimport configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target platform settings
    pub platform: PlatformConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Target platform overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Target triple (e.g., x86_64-pc-windows-msvc)
    pub triple: Option<String>,

    /// CPU tag for the staging directory (e.g., k8)
    pub cpu: Option<String>,

    /// Target operating system (linux, macos, windows)
    pub os: Option<TargetOs>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Emit JSON instead of text
    pub json: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.platform.triple.is_some() {
            self.platform.triple = other.platform.triple;
        }
        if other.platform.cpu.is_some() {
            self.platform.cpu = other.platform.cpu;
        }
        if other.platform.os.is_some() {
            self.platform.os = other.platform.os;
        }
        if other.output.json.is_some() {
            self.output.json = other.output.json;
        }
    }

    /// Whether output should be JSON.
    pub fn json_output(&self) -> bool {
        self.output.json.unwrap_or(false)
    }

    /// Resolve the target platform.
    ///
    /// Starts from the triple if one is configured (otherwise the host),
    /// then applies explicit `os` and `cpu` overrides.
    pub fn platform(&self) -> Result<Platform> {
        let mut platform = match &self.platform.triple {
            Some(triple) => Platform::from_triple(triple)
                .with_context(|| format!("invalid target triple `{}`", triple))?,
            None => Platform::host(),
        };

        if let Some(os) = self.platform.os {
            platform.os = os;
        }
        if let Some(cpu) = &self.platform.cpu {
            platform.cpu = cpu.clone();
        }

        Ok(platform)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ccimport/config.toml)
/// 2. Global config (~/.ccimport/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global config directory (~/.ccimport).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ccimport"))
}

/// Get the global config path (~/.ccimport/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.ccimport/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".ccimport").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.platform.cpu.is_none());
        assert!(config.platform.os.is_none());
        assert!(!config.json_output());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[platform]
cpu = "k8"
os = "linux"

[output]
json = true
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.platform.cpu.as_deref(), Some("k8"));
        assert_eq!(config.platform.os, Some(TargetOs::Linux));
        assert!(config.json_output());
    }

    #[test]
    fn test_config_load_or_default_on_garbage() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "platform = 3").unwrap();

        assert_eq!(Config::load_or_default(&config_path), Config::default());
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::write(&global, "[platform]\ncpu = \"k8\"\nos = \"linux\"\n").unwrap();
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(&project, "[platform]\ncpu = \"x64_windows\"\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.platform.cpu.as_deref(), Some("x64_windows"));
        assert_eq!(config.platform.os, Some(TargetOs::Linux));
    }

    #[test]
    fn test_platform_from_triple_with_overrides() {
        let config = Config {
            platform: PlatformConfig {
                triple: Some("x86_64-pc-windows-msvc".to_string()),
                cpu: Some("x64_windows_custom".to_string()),
                os: None,
            },
            ..Config::default()
        };

        let platform = config.platform().unwrap();
        assert!(platform.is_windows());
        assert_eq!(platform.cpu, "x64_windows_custom");
    }

    #[test]
    fn test_invalid_triple() {
        let config = Config {
            platform: PlatformConfig {
                triple: Some("nonsense".to_string()),
                ..PlatformConfig::default()
            },
            ..Config::default()
        };
        assert!(config.platform().is_err());
    }

    #[test]
    fn test_project_config_can_turn_json_off() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::write(&global, "[output]\njson = true\n").unwrap();
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(&project, "[output]\njson = false\n").unwrap();

        let missing = tmp.path().join("missing.toml");
        assert!(load_config(Some(&global), &missing).json_output());
        assert!(!load_config(Some(&global), &project).json_output());
    }

    #[test]
    fn test_unknown_os_in_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[platform]\nos = \"windwos\"\n").unwrap();

        assert!(Config::load(&path).is_err());
        assert_eq!(Config::load_or_default(&path), Config::default());
    }
}
