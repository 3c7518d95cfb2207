//! Reconciliation state machine — testable poll logic decoupled from I/O.
//!
//! [`Reconciler`] encapsulates the core transitions of the polling loop:
//! tracking the last displayed status, deciding when a freshly extracted
//! candidate warrants a light push, and gating automatic polling behind the
//! manual-override flag. The CLI `watch` command is a thin adapter that owns
//! the timer and wires the extractor and light client to this state machine.

use std::path::Path;

use crate::config::Config;
use crate::extractor;
use crate::light::{Connectivity, LightClient, LightTransport};
use crate::status::Status;

/// Where the loop currently sits between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the next timer tick.
    Idle,
    /// Suspended: status only changes through explicit user action.
    Overridden,
}

/// Decision for one observed candidate status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    /// The candidate differs from the displayed status — push it.
    Push,
    /// No state change — do nothing.
    NoChange,
}

/// Poll-loop state: last displayed status plus the override flag.
///
/// Starts with `Unknown` displayed, so the first real status extracted
/// after startup always triggers a push.
pub struct Reconciler {
    displayed: Status,
    overridden: bool,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Reconciler {
            displayed: Status::Unknown,
            overridden: false,
        }
    }

    /// The status the display layer currently shows.
    pub fn displayed(&self) -> Status {
        self.displayed
    }

    pub fn state(&self) -> LoopState {
        if self.overridden {
            LoopState::Overridden
        } else {
            LoopState::Idle
        }
    }

    /// Whether an automatic poll may run (and reschedule itself).
    pub fn should_poll(&self) -> bool {
        !self.overridden
    }

    /// Flip the manual-override flag. While set, `should_poll` is false and
    /// the loop stops rescheduling; clearing it resumes polling on the next
    /// tick.
    pub fn set_override(&mut self, on: bool) {
        self.overridden = on;
    }

    /// Feed an extracted candidate. Updates the displayed status when it
    /// changed and says whether to push.
    pub fn observe(&mut self, candidate: Status) -> ReconcileAction {
        if candidate == self.displayed {
            ReconcileAction::NoChange
        } else {
            self.displayed = candidate;
            ReconcileAction::Push
        }
    }

    /// Record a status chosen by explicit user action, bypassing change
    /// detection. The caller pushes to the light directly.
    pub fn force(&mut self, status: Status) {
        self.displayed = status;
    }
}

/// What one poll cycle produced, for the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleOutcome {
    /// The status extracted this cycle (already reflected in the reconciler).
    pub status: Status,
    /// Whether the light was pushed.
    pub changed: bool,
    /// Connectivity check result; only taken after a push.
    pub light: Option<Connectivity>,
}

/// Feed a candidate through the reconciler and drive the light on change.
pub fn apply_candidate<T: LightTransport>(
    reconciler: &mut Reconciler,
    client: &LightClient<T>,
    config: &Config,
    candidate: Status,
) -> CycleOutcome {
    match reconciler.observe(candidate) {
        ReconcileAction::Push => {
            log::info!("[poll] status change detected: {candidate}");
            client.push(config, candidate);
            let light = client.check_connectivity(config);
            CycleOutcome {
                status: candidate,
                changed: true,
                light: Some(light),
            }
        }
        ReconcileAction::NoChange => CycleOutcome {
            status: candidate,
            changed: false,
            light: None,
        },
    }
}

/// One full poll cycle: extract from the configured log directory, compare,
/// push on change, check connectivity.
pub fn run_cycle<T: LightTransport>(
    reconciler: &mut Reconciler,
    client: &LightClient<T>,
    config: &Config,
) -> CycleOutcome {
    let candidate = extractor::extract_status(Path::new(&config.teams_log_path));
    apply_candidate(reconciler, client, config, candidate)
}

/// Explicit user action under manual override: record the status and push it
/// directly (no extraction, no change detection).
pub fn apply_manual<T: LightTransport>(
    reconciler: &mut Reconciler,
    client: &LightClient<T>,
    config: &Config,
    status: Status,
) -> bool {
    reconciler.force(status);
    client.push(config, status)
}
