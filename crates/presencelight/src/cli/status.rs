//! `status` subcommand — show extracted Teams status, light state, and config.

use std::path::Path;

use super::{
    Config, ConfigSummaryJson, Connectivity, LightClient, LightStatusJson, Result, Status,
    StatusOutput, extractor, kv, kv_indent, kv_width,
};

/// Query the light once: connectivity plus classified state.
fn collect_light_status(config: &Config) -> LightStatusJson {
    let (connectivity, status) = match LightClient::http() {
        Ok(client) => (
            client.check_connectivity(config),
            client.read_status(config),
        ),
        Err(e) => {
            log::error!("[light] {e}");
            (Connectivity::Error, Status::Unknown)
        }
    };
    LightStatusJson {
        connectivity,
        status,
        url: config.light_url(),
    }
}

/// Print or serialize the status output.
fn print_status(
    teams_status: Status,
    light: LightStatusJson,
    config: &Config,
    json: bool,
) -> Result<()> {
    if json {
        let output = StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            teams_status,
            light,
            config: ConfigSummaryJson::from_config(config),
        };
        let json_str = serde_json::to_string_pretty(&output).map_err(|e| {
            presencelight_lib::PresencelightError::Config(format!("JSON serialization failed: {e}"))
        })?;
        println!("{json_str}");
        return Ok(());
    }

    // Human-readable output
    let w = kv_width(
        &["Version:", "Teams:", "Light:"],
        &[
            "Status:",
            "URL:",
            "Light IP:",
            "Busy color:",
            "Away color:",
            "Available color:",
            "Log directory:",
            "Override:",
            "Interval:",
        ],
    );

    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    println!();

    kv("Teams:", teams_status, w);
    println!();

    kv("Light:", light.connectivity, w);
    kv_indent("Status:", light.status, w);
    kv_indent("URL:", &light.url, w);

    println!();
    println!("Config:");
    kv_indent("Light IP:", &config.light_ip, w);
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
        "Override:",
        if config.manual_override { "on" } else { "off" },
        w,
    );
    kv_indent("Interval:", format!("{}s", config.poll_interval_secs), w);

    Ok(())
}

pub(super) fn cmd_status(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path);
    let teams_status = extractor::extract_status(Path::new(&config.teams_log_path));
    let light = collect_light_status(&config);
    print_status(teams_status, light, &config, json)
}
