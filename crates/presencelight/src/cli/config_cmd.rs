//! `config` subcommand — show or update configuration.

use std::path::Path;

use super::{Config, ConfigCommand, ConfigOutput, Result, kv, kv_indent, kv_width};
use presencelight_lib::color;

fn config_file(config_path: Option<&Path>) -> Option<std::path::PathBuf> {
    match config_path {
        Some(p) => Some(p.to_path_buf()),
        None => Config::path(),
    }
}

fn show(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path);
    let file = config_file(config_path);
    let exists = file.as_deref().is_some_and(Path::exists);

    if json {
        let output = ConfigOutput {
            config_file: file.map(|p| p.display().to_string()),
            config_file_exists: exists,
            settings: config,
        };
        let json_str = serde_json::to_string_pretty(&output).map_err(|e| {
            presencelight_lib::PresencelightError::Config(format!("JSON serialization failed: {e}"))
        })?;
        println!("{json_str}");
        return Ok(());
    }

    let w = kv_width(
        &["Config file:"],
        &[
            "Light IP:",
            "Light URL:",
            "Busy color:",
            "Away color:",
            "Available color:",
            "Log directory:",
            "Tray minimize:",
            "Override:",
            "Interval:",
        ],
    );

    match &file {
        Some(p) => {
            let suffix = if exists { "" } else { " (not created yet)" };
            kv("Config file:", format!("{}{suffix}", p.display()), w);
        }
        None => kv("Config file:", "not available", w),
    }
    println!();
    println!("Settings:");
    kv_indent("Light IP:", &config.light_ip, w);
    kv_indent("Light URL:", config.light_url(), w);
    kv_indent("Busy color:", config.busy_color, w);
    kv_indent("Away color:", config.away_color, w);
    kv_indent("Available color:", config.available_color, w);
    kv_indent(
        "Log directory:",
        if config.teams_log_path.is_empty() {
            "(not set)"
        } else {
            &config.teams_log_path
        },
        w,
    );
    kv_indent(
        "Tray minimize:",
        if config.tray_minimize { "on" } else { "off" },
        w,
    );
    kv_indent(
        "Override:",
        if config.manual_override { "on" } else { "off" },
        w,
    );
    kv_indent("Interval:", format!("{}s", config.poll_interval_secs), w);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn set(
    light_ip: Option<String>,
    busy_color: Option<String>,
    away_color: Option<String>,
    available_color: Option<String>,
    log_dir: Option<String>,
    interval: Option<u64>,
    tray_minimize: Option<bool>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = super::load_config(config_path);
    let mut changed = Vec::new();

    if let Some(ip) = light_ip {
        config.light_ip = ip;
        changed.push("light_ip");
    }
    if let Some(c) = busy_color {
        config.busy_color = color::parse_color(&c)?;
        changed.push("busy_color");
    }
    if let Some(c) = away_color {
        config.away_color = color::parse_color(&c)?;
        changed.push("away_color");
    }
    if let Some(c) = available_color {
        config.available_color = color::parse_color(&c)?;
        changed.push("available_color");
    }
    if let Some(dir) = log_dir {
        config.teams_log_path = dir;
        changed.push("teams_log_path");
    }
    if let Some(secs) = interval {
        config.poll_interval_secs = secs;
        changed.push("poll_interval_secs");
    }
    if let Some(tray) = tray_minimize {
        config.tray_minimize = tray;
        changed.push("tray_minimize");
    }

    if changed.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }

    if let Err(errors) = config.validate() {
        let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(presencelight_lib::PresencelightError::Config(
            msgs.join("; "),
        ));
    }

    super::save_config(&config, config_path)?;
    println!("Updated: {}", changed.join(", "));
    Ok(())
}

pub(super) fn cmd_config(
    action: Option<ConfigCommand>,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    match action {
        None => show(json, config_path),
        Some(ConfigCommand::Set {
            light_ip,
            busy_color,
            away_color,
            available_color,
            log_dir,
            interval,
            tray_minimize,
        }) => set(
            light_ip,
            busy_color,
            away_color,
            available_color,
            log_dir,
            interval,
            tray_minimize,
            config_path,
        ),
    }
}
