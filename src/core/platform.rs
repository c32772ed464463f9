//! Target platform description.
//!
//! Import analysis only needs two facts about the platform: the cpu tag
//! that names the runtime staging directory (`_solib_<cpu>`) and whether
//! the platform links shared libraries the Windows way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operating system family of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Linux,
    #[serde(alias = "darwin")]
    Macos,
    Windows,
    /// Anything else (BSDs, bare metal, ...)
    Other,
}

impl TargetOs {
    /// Map an OS component (`linux`, `darwin`, `windows`, ...) to a family.
    pub fn from_component(os: &str) -> Self {
        match os {
            "linux" => TargetOs::Linux,
            "macos" | "darwin" | "ios" => TargetOs::Macos,
            "windows" | "win32" | "mingw32" => TargetOs::Windows,
            _ => TargetOs::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Linux => "linux",
            TargetOs::Macos => "macos",
            TargetOs::Windows => "windows",
            TargetOs::Other => "other",
        }
    }
}

/// An operating system name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operating system `{0}` (expected linux, macos, windows or other)")]
pub struct UnknownOs(pub String);

impl FromStr for TargetOs {
    type Err = UnknownOs;

    /// Parse an explicit OS name. Unlike [`TargetOs::from_component`],
    /// unknown names are an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(TargetOs::Linux),
            "macos" | "darwin" => Ok(TargetOs::Macos),
            "windows" => Ok(TargetOs::Windows),
            "other" => Ok(TargetOs::Other),
            _ => Err(UnknownOs(s.to_string())),
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The platform an import is analyzed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// CPU tag used in the staging directory name (`k8`, `aarch64`, `x64_windows`, ...)
    pub cpu: String,

    /// Operating system family
    pub os: TargetOs,
}

impl Platform {
    /// Create a platform from an explicit cpu tag and OS.
    pub fn new(cpu: impl Into<String>, os: TargetOs) -> Self {
        Platform {
            cpu: cpu.into(),
            os,
        }
    }

    /// Detect the host platform.
    pub fn host() -> Self {
        let os = TargetOs::from_component(std::env::consts::OS);
        Platform::new(cpu_tag(std::env::consts::ARCH, os), os)
    }

    /// Parse a target triple (`arch-vendor-os[-env]` or `arch-os[-env]`).
    ///
    /// The OS is the first component after the architecture that names a
    /// known OS family.
    pub fn from_triple(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        let os = parts[1..]
            .iter()
            .map(|c| TargetOs::from_component(c))
            .find(|os| *os != TargetOs::Other)
            .unwrap_or(TargetOs::Other);
        Some(Platform::new(cpu_tag(parts[0], os), os))
    }

    /// Whether shared libraries need an import library to link against.
    pub fn is_windows(&self) -> bool {
        self.os == TargetOs::Windows
    }

    /// Name of the runtime staging directory for this platform.
    pub fn solib_dir(&self) -> String {
        format!("_solib_{}", self.cpu)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::host()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.cpu, self.os)
    }
}

/// Conventional cpu tag for an architecture.
///
/// `x86_64` maps to `k8` on Linux, `darwin_x86_64` on macOS and
/// `x64_windows` on Windows; other architectures keep their name.
pub fn cpu_tag(arch: &str, os: TargetOs) -> String {
    match (arch, os) {
        ("x86_64", TargetOs::Linux) => "k8".to_string(),
        ("x86_64", TargetOs::Macos) => "darwin_x86_64".to_string(),
        ("aarch64", TargetOs::Macos) => "darwin_arm64".to_string(),
        ("x86_64", TargetOs::Windows) => "x64_windows".to_string(),
        ("aarch64", TargetOs::Windows) => "arm64_windows".to_string(),
        _ => arch.to_string(),
    }
}
