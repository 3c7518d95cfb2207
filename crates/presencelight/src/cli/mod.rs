//! CLI subcommands — status display, watch loop, manual override, settings.

mod check;
mod config_cmd;
mod set_cmd;
mod status;
mod watch;

use std::path::Path;

use clap::{Subcommand, ValueEnum};
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use presencelight_lib::config::Config;
pub(super) use presencelight_lib::error::Result;
pub(super) use presencelight_lib::light::{Connectivity, LightClient};
pub(super) use presencelight_lib::status::Status;
pub(super) use presencelight_lib::{extractor, reconcile};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w);
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Load config from an explicit path or the platform default, logging any
/// parse warnings.
pub(super) fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => {
            let (config, warnings) = Config::load_from(p);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Save config to an explicit path or the platform default.
pub(super) fn save_config(config: &Config, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => config.save_to(p)?,
        None => config.save()?,
    }
    Ok(())
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub teams_status: Status,
    pub light: LightStatusJson,
    pub config: ConfigSummaryJson,
}

#[derive(Serialize)]
pub(super) struct LightStatusJson {
    pub connectivity: Connectivity,
    pub status: Status,
    pub url: String,
}

#[derive(Serialize)]
pub(super) struct ConfigSummaryJson {
    pub light_ip: String,
    pub busy_color: String,
    pub away_color: String,
    pub available_color: String,
    pub teams_log_path: String,
    pub manual_override: bool,
    pub poll_interval_secs: u64,
}

impl ConfigSummaryJson {
    pub(super) fn from_config(config: &Config) -> Self {
        ConfigSummaryJson {
            light_ip: config.light_ip.clone(),
            busy_color: config.busy_color.to_string(),
            away_color: config.away_color.to_string(),
            available_color: config.available_color.to_string(),
            teams_log_path: config.teams_log_path.clone(),
            manual_override: config.manual_override,
            poll_interval_secs: config.poll_interval_secs,
        }
    }
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

/// Target of the `set` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SetTarget {
    /// Manual override: show Available
    Available,
    /// Manual override: show Busy
    Busy,
    /// Manual override: show Away
    Away,
    /// Manual override: show Do not disturb
    Dnd,
    /// Manual override: turn the light off
    Off,
    /// Clear the override and resume automatic polling
    Auto,
}

impl SetTarget {
    /// The status this target pushes, or `None` for `Auto`.
    pub(super) fn status(self) -> Option<Status> {
        match self {
            SetTarget::Available => Some(Status::Available),
            SetTarget::Busy => Some(Status::Busy),
            SetTarget::Away => Some(Status::Away),
            SetTarget::Dnd => Some(Status::DoNotDisturb),
            SetTarget::Off => Some(Status::Unknown),
            SetTarget::Auto => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Watch the Teams log and mirror status changes to the light
    Watch {
        /// Override the light's IP address (persisted before the loop starts)
        light_ip: Option<String>,
    },

    /// Show extracted Teams status, light state, and configuration
    Status,

    /// Manually set the light (enables manual override) or resume polling
    Set {
        #[arg(value_enum)]
        target: SetTarget,
    },

    /// Check connectivity to the light (exit code 1 when unreachable)
    Check,

    /// Show or update configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommand>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Update one or more settings; unspecified fields are left unchanged
    Set {
        /// Light IP address
        #[arg(long, value_name = "IP")]
        light_ip: Option<String>,
        /// Busy / Do not disturb color (#RRGGBB or R,G,B)
        #[arg(long, value_name = "COLOR")]
        busy_color: Option<String>,
        /// Away color (#RRGGBB or R,G,B)
        #[arg(long, value_name = "COLOR")]
        away_color: Option<String>,
        /// Available color (#RRGGBB or R,G,B)
        #[arg(long, value_name = "COLOR")]
        available_color: Option<String>,
        /// Directory containing the dated Teams log files
        #[arg(long, value_name = "DIR")]
        log_dir: Option<String>,
        /// Seconds between polls
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Minimize to tray instead of closing (read by the GUI)
        #[arg(long, value_name = "BOOL")]
        tray_minimize: Option<bool>,
    },
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Watch { light_ip } => {
            if json {
                warn_json_unsupported("watch");
            }
            watch::cmd_watch(light_ip, config_path)
        }
        Command::Status => status::cmd_status(json, config_path),
        Command::Set { target } => {
            if json {
                warn_json_unsupported("set");
            }
            set_cmd::cmd_set(target, config_path)
        }
        Command::Check => {
            if json {
                warn_json_unsupported("check");
            }
            check::cmd_check(config_path)
        }
        Command::Config { action } => config_cmd::cmd_config(action, json, config_path),
    }
}
