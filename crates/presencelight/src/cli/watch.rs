//! `watch` subcommand — poll the Teams log and reconcile the light.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use super::{LightClient, RUNNING, Result, Status, reconcile};
use presencelight_lib::light::HttpTransport;
use presencelight_lib::reconcile::Reconciler;

/// Granularity of the shutdown check while waiting out a poll interval.
const TICK: Duration = Duration::from_millis(250);

/// Sleep for `interval`, returning early when RUNNING flips false.
fn wait_interval(interval: Duration) {
    let deadline = Instant::now() + interval;
    while RUNNING.load(Ordering::SeqCst) && Instant::now() < deadline {
        std::thread::sleep(TICK.min(deadline.saturating_duration_since(Instant::now())));
    }
}

/// Watch main loop: reload config, poll, push on change, wait.
fn watch_loop(
    reconciler: &mut Reconciler,
    client: &LightClient<HttpTransport>,
    config_path: Option<&Path>,
) {
    let mut was_overridden = false;
    while RUNNING.load(Ordering::SeqCst) {
        // Reload so settings edits (including `set`/`set auto` from another
        // invocation) take effect on the next cycle.
        let config = super::load_config(config_path);
        reconciler.set_override(config.manual_override);

        if reconciler.should_poll() {
            if was_overridden {
                println!("[mode]   Override cleared, resuming polling");
                was_overridden = false;
            }
            let outcome = reconcile::run_cycle(reconciler, client, &config);
            if outcome.changed {
                match outcome.light {
                    Some(conn) => println!("  {} -> light {conn}", outcome.status),
                    None => println!("  {}", outcome.status),
                }
            }
        } else if !was_overridden {
            println!("[mode]   Manual override active, polling suspended");
            was_overridden = true;
        }

        wait_interval(Duration::from_secs(config.poll_interval_secs.max(1)));
    }
}

pub(super) fn cmd_watch(light_ip: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let mut config = super::load_config(config_path);

    // A light IP given on the command line is persisted before the loop
    // starts, so later invocations and the GUI see it too.
    if let Some(ip) = light_ip {
        config.light_ip = ip;
        super::save_config(&config, config_path)?;
        log::info!("light IP updated from command line: {}", config.light_ip);
    }

    if let Err(errors) = config.validate() {
        for e in &errors {
            log::warn!("[config] {e}");
        }
    }

    println!("Presencelight — mirrors Teams presence onto {}", config.light_url());
    println!("  Poll interval: {}s", config.poll_interval_secs.max(1));
    println!(
        "  Log directory: {}",
        if config.teams_log_path.is_empty() {
            "(not set)"
        } else {
            &config.teams_log_path
        }
    );
    println!("Press Ctrl+C to exit.");
    println!();

    let client = LightClient::http()?;
    let mut reconciler = Reconciler::new();

    // First cycle runs immediately rather than waiting out the first tick.
    watch_loop(&mut reconciler, &client, config_path);

    // Leave the light dark on exit so it doesn't show stale presence.
    println!();
    println!("Turning light off...");
    let config = super::load_config(config_path);
    if !client.push(&config, Status::Unknown) {
        log::warn!("could not turn the light off on exit");
    }
    println!("Done.");
    Ok(())
}
