//! Global context for ccimport operations.
//!
//! Provides centralized access to configuration, paths, and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest_upward, ManifestError};
use crate::core::platform::Platform;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Merged global + project configuration
    config: Config,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Self::with_cwd(cwd)
    }

    /// Create a GlobalContext rooted at `cwd`.
    ///
    /// The project config is looked up next to the nearest manifest, or in
    /// `cwd` when there is none.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let project_root = find_manifest_upward(&cwd)
            .ok()
            .and_then(|m| m.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.clone());

        let global = global_config_path();
        let config = load_config(global.as_deref(), &project_config_path(&project_root));

        Ok(GlobalContext {
            cwd,
            config,
            color: true,
        })
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration (for CLI overrides).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Check if colored output is enabled.
    pub fn use_color(&self) -> bool {
        self.color
    }

    /// Set color mode.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Resolve the target platform from configuration.
    pub fn platform(&self) -> Result<Platform> {
        self.config.platform()
    }

    /// Find the manifest starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest_upward(&self.cwd)
    }

    /// Resolve an explicit manifest path (file or directory) relative to cwd,
    /// falling back to the nearest manifest.
    pub fn manifest_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => {
                let path = self.cwd.join(path);
                if path.is_dir() {
                    find_manifest_upward(&path).map_err(Into::into)
                } else {
                    Ok(path)
                }
            }
            None => Ok(self.find_manifest()?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::MANIFEST_NAME;
    use crate::core::platform::TargetOs;
    use tempfile::TempDir;

    #[test]
    fn test_find_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&manifest, "").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        assert_eq!(ctx.find_manifest().ok(), Some(manifest));
    }

    #[test]
    fn test_project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(MANIFEST_NAME), "").unwrap();
        let config = project_config_path(tmp.path());
        std::fs::create_dir_all(config.parent().unwrap()).unwrap();
        std::fs::write(&config, "[platform]\ncpu = \"ppc\"\nos = \"windows\"\n").unwrap();

        let nested = tmp.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        let ctx = GlobalContext::with_cwd(nested).unwrap();

        let platform = ctx.platform().unwrap();
        assert_eq!(platform.cpu, "ppc");
        assert_eq!(platform.os, TargetOs::Windows);
    }

    #[test]
    fn test_manifest_path_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        let path = ctx.manifest_path(Some(Path::new("x/Imports.toml"))).unwrap();
        assert_eq!(path, tmp.path().join("x/Imports.toml"));
    }
}
