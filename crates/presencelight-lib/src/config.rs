//! Application configuration — TOML-based, platform-aware paths.
//!
//! This is the narrow key-value contract the rest of the app reads and
//! writes: light address, per-status colors, the Teams log directory, and
//! the override flags the GUI collaborators share.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::status::Status;

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# Presencelight configuration — changes made outside the app may be overwritten.\n\n";

/// Fixed path suffix of the light's JSON state API.
const LIGHT_STATE_PATH: &str = "/json/state";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IP address of the light. Default: "0.0.0.0" (unconfigured).
    #[serde(default = "default_light_ip")]
    pub light_ip: String,

    /// Light color while Busy or Do not disturb. Default: red.
    #[serde(default = "default_busy_color")]
    pub busy_color: Rgb,

    /// Light color while Away. Default: yellow.
    #[serde(default = "default_away_color")]
    pub away_color: Rgb,

    /// Light color while Available. Default: green.
    #[serde(default = "default_available_color")]
    pub available_color: Rgb,

    /// Directory containing the dated Teams log files. Empty = not configured.
    #[serde(default)]
    pub teams_log_path: String,

    /// Minimize to tray instead of closing (read by the GUI, stored here).
    #[serde(default)]
    pub tray_minimize: bool,

    /// When true, automatic polling is suspended and the status is only
    /// changed by explicit user action.
    #[serde(default)]
    pub manual_override: bool,

    /// Seconds between reconciliation polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_light_ip() -> String {
    "0.0.0.0".into()
}
fn default_busy_color() -> Rgb {
    Rgb::new(255, 0, 0)
}
fn default_away_color() -> Rgb {
    Rgb::new(255, 255, 0)
}
fn default_available_color() -> Rgb {
    Rgb::new(0, 255, 0)
}
fn default_poll_interval() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            light_ip: default_light_ip(),
            busy_color: default_busy_color(),
            away_color: default_away_color(),
            available_color: default_available_color(),
            teams_log_path: String::new(),
            tray_minimize: false,
            manual_override: false,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The `light_ip` field is not a parseable IP address.
    InvalidLightIp(String),
    /// The `teams_log_path` field points at something that is not a directory.
    InvalidLogDir(String),
    /// The poll interval is zero.
    ZeroInterval,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidLightIp(ip) => write!(f, "Invalid light IP: {ip}"),
            ValidationError::InvalidLogDir(dir) => {
                write!(f, "Teams log path is not a directory: {dir}")
            }
            ValidationError::ZeroInterval => write!(f, "Poll interval must be at least 1 second"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join("Presencelight"))
        }
        #[cfg(not(windows))]
        {
            dirs::config_dir().map(|p| p.join("presencelight"))
        }
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Save config to the default platform path.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory",
            ));
        };
        self.save_to(&path)
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// URL of the light's state API, derived from the stored IP.
    ///
    /// Recomputed on every call so an edited `light_ip` takes effect on the
    /// next cycle.
    pub fn light_url(&self) -> String {
        format!("http://{}{LIGHT_STATE_PATH}", self.light_ip)
    }

    /// The configured color for a status, or `None` for [`Status::Unknown`].
    ///
    /// Do not disturb shares Busy's color by policy.
    pub fn color_for(&self, status: Status) -> Option<Rgb> {
        match status {
            Status::Available => Some(self.available_color),
            Status::Busy | Status::DoNotDisturb => Some(self.busy_color),
            Status::Away => Some(self.away_color),
            Status::Unknown => None,
        }
    }

    /// Validate the config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.light_ip.parse::<std::net::IpAddr>().is_err() {
            errors.push(ValidationError::InvalidLightIp(self.light_ip.clone()));
        }

        if !self.teams_log_path.is_empty() {
            let p = Path::new(&self.teams_log_path);
            if p.exists() && !p.is_dir() {
                errors.push(ValidationError::InvalidLogDir(self.teams_log_path.clone()));
            }
        }

        if self.poll_interval_secs == 0 {
            errors.push(ValidationError::ZeroInterval);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
