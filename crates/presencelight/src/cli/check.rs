//! `check` subcommand — light connectivity, exit code 0/1.

use std::path::Path;

use super::{Connectivity, LightClient, Result};

pub(super) fn cmd_check(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path);
    let client = LightClient::http()?;
    match client.check_connectivity(&config) {
        Connectivity::Connected => {
            println!("Light: Connected ({})", config.light_url());
            Ok(())
        }
        Connectivity::Error => {
            println!("Light: Error ({})", config.light_url());
            println!("Check the light IP address in the settings.");
            std::process::exit(1);
        }
    }
}
