//! `set` subcommand — manual override and resume.

use std::path::Path;

use super::{Connectivity, LightClient, Result, SetTarget, Status};
use presencelight_lib::reconcile::Reconciler;

/// One-line result for the user. A failed push is reported as such even when
/// the device is otherwise reachable.
fn report_line(status: Status, delivered: bool, connectivity: Connectivity) -> String {
    if !delivered {
        return format!("Could not update the light to {status}.");
    }
    match connectivity {
        Connectivity::Connected => format!("Light set to {status}."),
        Connectivity::Error => format!("Light set to {status} (light: Error)."),
    }
}

pub(super) fn cmd_set(target: SetTarget, config_path: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(config_path);

    let Some(status) = target.status() else {
        // `set auto`: clear the override; the watch loop resumes polling on
        // its next tick.
        config.manual_override = false;
        super::save_config(&config, config_path)?;
        println!("Manual override cleared; automatic polling resumes.");
        return Ok(());
    };

    config.manual_override = true;
    super::save_config(&config, config_path)?;

    let client = LightClient::http()?;
    let mut reconciler = Reconciler::new();
    reconciler.set_override(true);

    let delivered = presencelight_lib::reconcile::apply_manual(
        &mut reconciler,
        &client,
        &config,
        status,
    );
    let connectivity = client.check_connectivity(&config);
    println!("{}", report_line(status, delivered, connectivity));
    if !delivered || connectivity == Connectivity::Error {
        println!("Check the light IP address in the settings.");
    }
    Ok(())
}
