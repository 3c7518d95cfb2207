//! Light communication — JSON state protocol over HTTP.
//!
//! The light exposes a single state endpoint (`/json/state`): POST a
//! [`StatePayload`] to set it, GET a [`LightStateReport`] to read it back.
//! Every network operation is wrapped so failures never propagate past this
//! module: they degrade to a classification (`Error` / `Unknown`) plus a log
//! entry and are retried on the next poll.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::Config;
use crate::status::Status;

/// Brightness pushed with every on-state. The light keeps its own dimming
/// curve; we just ask for (almost) full.
const BRIGHTNESS: u8 = 254;

/// Bound on every state read or write.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ── Error type ──

/// Light communication errors.
///
/// String payloads follow the convention **"context: details"** where
/// *context* identifies the operation (e.g. `"POST"`, `"GET"`) and *details*
/// describes what went wrong.
#[derive(Debug)]
pub enum LightError {
    /// Request could not be built, sent, or returned a non-2xx status.
    Http(String),
    /// The device answered with a body we could not decode.
    BadResponse(String),
}

impl fmt::Display for LightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightError::Http(e) => write!(f, "Light request failed: {e}"),
            LightError::BadResponse(e) => write!(f, "Light sent a bad response: {e}"),
        }
    }
}

impl std::error::Error for LightError {}

pub type Result<T> = std::result::Result<T, LightError>;

// ── Wire types ──

/// One color segment of the push payload. The light addresses segments by
/// id; we only ever drive segment 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u8,
    pub col: Vec<Rgb>,
}

/// State-setting payload. `Unknown` maps to a bare `{"on": false}`; the
/// optional fields are omitted entirely so the light doesn't clamp
/// brightness or color while turning off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub on: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seg: Option<Vec<Segment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
}

/// State as the device reports it. Only `seg[0].col[0]` is inspected;
/// everything else the device sends is ignored by serde.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightStateReport {
    #[serde(default)]
    pub on: bool,
    #[serde(default)]
    pub seg: Vec<SegmentReport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentReport {
    #[serde(default)]
    pub col: Vec<Rgb>,
}

/// Build the device payload for a status under the configured color mapping.
pub fn payload_for(status: Status, config: &Config) -> StatePayload {
    match config.color_for(status) {
        Some(color) => StatePayload {
            on: true,
            seg: Some(vec![Segment {
                id: 0,
                col: vec![color],
            }]),
            bri: Some(BRIGHTNESS),
        },
        None => StatePayload {
            on: false,
            seg: None,
            bri: None,
        },
    }
}

/// Classify a reported device state against the configured mapping.
///
/// Off → `Unknown`. On → the first status (in [`Status::MAPPED`] order)
/// whose color equals `seg[0].col[0]` exactly, per channel; no tolerance, so
/// a device that rounds its reported values classifies as `Unknown`.
pub fn classify_state(report: &LightStateReport, config: &Config) -> Status {
    if !report.on {
        return Status::Unknown;
    }
    let Some(col) = report.seg.first().and_then(|s| s.col.first()) else {
        return Status::Unknown;
    };
    for status in Status::MAPPED {
        if config.color_for(status) == Some(*col) {
            return status;
        }
    }
    Status::Unknown
}

// ── Transport ──

/// Classification of a connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Connectivity {
    Connected,
    Error,
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Connected => f.write_str("Connected"),
            Connectivity::Error => f.write_str("Error"),
        }
    }
}

/// Transport seam between the client logic and the wire. Production uses
/// [`HttpTransport`]; tests inject [`mock::MockTransport`].
pub trait LightTransport {
    fn set_state(&self, url: &str, payload: &StatePayload) -> Result<()>;
    fn get_state(&self, url: &str) -> Result<LightStateReport>;
    /// Reachability check: any 2xx answer counts, the body is not decoded.
    fn ping(&self, url: &str) -> Result<()>;
}

/// Blocking HTTP transport with a bounded per-request timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LightError::Http(format!("client init: {e}")))?;
        Ok(HttpTransport { client })
    }
}

impl LightTransport for HttpTransport {
    fn set_state(&self, url: &str, payload: &StatePayload) -> Result<()> {
        self.client
            .post(url)
            .json(payload)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| LightError::Http(format!("POST {url}: {e}")))?;
        Ok(())
    }

    fn get_state(&self, url: &str) -> Result<LightStateReport> {
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| LightError::Http(format!("GET {url}: {e}")))?;
        resp.json()
            .map_err(|e| LightError::BadResponse(format!("GET {url}: {e}")))
    }

    fn ping(&self, url: &str) -> Result<()> {
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| LightError::Http(format!("GET {url}: {e}")))?;
        Ok(())
    }
}

// ── Client ──

/// State reconciliation client for one light.
pub struct LightClient<T: LightTransport> {
    transport: T,
}

impl LightClient<HttpTransport> {
    /// Client over real HTTP.
    pub fn http() -> crate::error::Result<Self> {
        Ok(LightClient::new(HttpTransport::new()?))
    }
}

impl<T: LightTransport> LightClient<T> {
    pub fn new(transport: T) -> Self {
        LightClient { transport }
    }

    /// Access to the underlying transport (tests inspect the mock's state).
    #[doc(hidden)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Push the device state for `status`. Returns whether the push was
    /// delivered; failures are logged and retried on the next poll.
    pub fn push(&self, config: &Config, status: Status) -> bool {
        let payload = payload_for(status, config);
        match self.transport.set_state(&config.light_url(), &payload) {
            Ok(()) => {
                log::info!("[light] updated to {status}");
                true
            }
            Err(e) => {
                log::error!("[light] update failed: {e}");
                false
            }
        }
    }

    /// Check the state endpoint is reachable: any 2xx answer is `Connected`
    /// even when the body is not decodable state. The caller owns any
    /// user-facing notice on `Error`; this only returns the classification.
    pub fn check_connectivity(&self, config: &Config) -> Connectivity {
        match self.transport.ping(&config.light_url()) {
            Ok(_) => Connectivity::Connected,
            Err(e) => {
                log::error!("[light] unreachable: {e}");
                Connectivity::Error
            }
        }
    }

    /// Read the device state back and classify it against the mapping.
    /// Any failure reads as `Unknown`.
    pub fn read_status(&self, config: &Config) -> Status {
        match self.transport.get_state(&config.light_url()) {
            Ok(report) => classify_state(&report, config),
            Err(e) => {
                log::error!("[light] state read failed: {e}");
                Status::Unknown
            }
        }
    }
}

// ── Mock transport for testing ──

/// In-memory mock transport for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Records pushes and serves canned (or echoed) state reports.
    pub struct MockTransport {
        /// Recorded set_state calls: (url, payload).
        pub pushes: RefCell<Vec<(String, StatePayload)>>,
        /// Report served by `get_state` when not echoing.
        pub report: RefCell<LightStateReport>,
        /// When true, `get_state` reflects the last pushed payload.
        pub echo: Cell<bool>,
        /// When true, every operation fails.
        pub fail: Cell<bool>,
        /// When true, the device answers 2xx but the state body does not
        /// decode (`get_state` fails, `ping` succeeds).
        pub bad_body: Cell<bool>,
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockTransport {
        pub fn new() -> Self {
            MockTransport {
                pushes: RefCell::new(Vec::new()),
                report: RefCell::new(LightStateReport::default()),
                echo: Cell::new(false),
                fail: Cell::new(false),
                bad_body: Cell::new(false),
            }
        }

        /// A transport that echoes pushed state back on reads, like a
        /// well-behaved device.
        pub fn echoing() -> Self {
            let t = Self::new();
            t.echo.set(true);
            t
        }

        /// A transport where every operation times out.
        pub fn failing() -> Self {
            let t = Self::new();
            t.fail.set(true);
            t
        }

        /// A transport whose device is reachable but reports state in a
        /// shape we cannot decode.
        pub fn garbled() -> Self {
            let t = Self::new();
            t.bad_body.set(true);
            t
        }

        pub fn last_push(&self) -> Option<StatePayload> {
            self.pushes.borrow().last().map(|(_, p)| p.clone())
        }
    }

    fn report_from(payload: &StatePayload) -> LightStateReport {
        LightStateReport {
            on: payload.on,
            seg: payload
                .seg
                .iter()
                .flatten()
                .map(|s| SegmentReport { col: s.col.clone() })
                .collect(),
        }
    }

    impl LightTransport for MockTransport {
        fn set_state(&self, url: &str, payload: &StatePayload) -> Result<()> {
            if self.fail.get() {
                return Err(LightError::Http("POST mock: timed out".into()));
            }
            self.pushes
                .borrow_mut()
                .push((url.to_string(), payload.clone()));
            Ok(())
        }

        fn get_state(&self, _url: &str) -> Result<LightStateReport> {
            if self.fail.get() {
                return Err(LightError::Http("GET mock: timed out".into()));
            }
            if self.bad_body.get() {
                return Err(LightError::BadResponse("GET mock: not JSON".into()));
            }
            if self.echo.get() {
                if let Some((_, payload)) = self.pushes.borrow().last() {
                    return Ok(report_from(payload));
                }
            }
            Ok(self.report.borrow().clone())
        }

        fn ping(&self, _url: &str) -> Result<()> {
            if self.fail.get() {
                return Err(LightError::Http("GET mock: timed out".into()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    fn config() -> Config {
        Config {
            light_ip: "192.168.1.42".into(),
            ..Config::default()
        }
    }

    // ── payload_for ──

    #[test]
    fn busy_payload_exact_json() {
        let payload = payload_for(Status::Busy, &config());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "on": true,
                "seg": [{"id": 0, "col": [[255, 0, 0]]}],
                "bri": 254
            })
        );
    }

    #[test]
    fn do_not_disturb_payload_equals_busy() {
        let cfg = config();
        assert_eq!(
            payload_for(Status::DoNotDisturb, &cfg),
            payload_for(Status::Busy, &cfg)
        );
    }

    #[test]
    fn unknown_payload_is_bare_off() {
        let payload = payload_for(Status::Unknown, &config());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"on": false}));
    }

    #[test]
    fn away_payload_uses_away_color() {
        let payload = payload_for(Status::Away, &config());
        let seg = payload.seg.unwrap();
        assert_eq!(seg[0].col, vec![Rgb::new(255, 255, 0)]);
        assert_eq!(payload.bri, Some(254));
    }

    // ── classify_state ──

    #[test]
    fn off_device_is_unknown_regardless_of_color() {
        let report = LightStateReport {
            on: false,
            seg: vec![SegmentReport {
                col: vec![Rgb::new(255, 0, 0)],
            }],
        };
        assert_eq!(classify_state(&report, &config()), Status::Unknown);
    }

    #[test]
    fn unmatched_color_is_unknown() {
        let report = LightStateReport {
            on: true,
            seg: vec![SegmentReport {
                col: vec![Rgb::new(254, 0, 0)], // one off from busy red
            }],
        };
        assert_eq!(classify_state(&report, &config()), Status::Unknown);
    }

    #[test]
    fn missing_segment_is_unknown() {
        let report = LightStateReport {
            on: true,
            seg: vec![],
        };
        assert_eq!(classify_state(&report, &config()), Status::Unknown);
    }

    #[test]
    fn classification_order_prefers_available() {
        // With duplicate colors in the mapping, Available wins the tie.
        let cfg = Config {
            available_color: Rgb::new(9, 9, 9),
            busy_color: Rgb::new(9, 9, 9),
            ..config()
        };
        let report = LightStateReport {
            on: true,
            seg: vec![SegmentReport {
                col: vec![Rgb::new(9, 9, 9)],
            }],
        };
        assert_eq!(classify_state(&report, &cfg), Status::Available);
    }

    #[test]
    fn only_first_color_of_first_segment_is_inspected() {
        let report = LightStateReport {
            on: true,
            seg: vec![SegmentReport {
                col: vec![Rgb::new(255, 255, 0), Rgb::new(255, 0, 0)],
            }],
        };
        assert_eq!(classify_state(&report, &config()), Status::Away);
    }

    // ── client round-trips ──

    #[test]
    fn push_then_read_round_trips_every_active_status() {
        let cfg = config();
        for status in [Status::Available, Status::Busy, Status::Away] {
            let client = LightClient::new(MockTransport::echoing());
            assert!(client.push(&cfg, status));
            assert_eq!(client.read_status(&cfg), status, "status {status}");
        }
    }

    #[test]
    fn do_not_disturb_reads_back_as_busy() {
        // Shared color mapping: the device cannot distinguish the two.
        let cfg = config();
        let client = LightClient::new(MockTransport::echoing());
        client.push(&cfg, Status::DoNotDisturb);
        assert_eq!(client.read_status(&cfg), Status::Busy);
    }

    #[test]
    fn push_unknown_turns_light_off() {
        let cfg = config();
        let client = LightClient::new(MockTransport::echoing());
        client.push(&cfg, Status::Unknown);
        assert_eq!(client.read_status(&cfg), Status::Unknown);
    }

    #[test]
    fn push_targets_derived_url() {
        let cfg = config();
        let transport = MockTransport::new();
        let client = LightClient::new(transport);
        client.push(&cfg, Status::Busy);
        let pushes = client.transport().pushes.borrow();
        assert_eq!(pushes[0].0, "http://192.168.1.42/json/state");
    }

    // ── failure handling ──

    #[test]
    fn push_failure_is_swallowed() {
        let client = LightClient::new(MockTransport::failing());
        assert!(!client.push(&config(), Status::Busy));
    }

    #[test]
    fn check_connectivity_classifies_timeout_as_error() {
        let client = LightClient::new(MockTransport::failing());
        assert_eq!(client.check_connectivity(&config()), Connectivity::Error);
    }

    #[test]
    fn check_connectivity_connected_on_success() {
        let client = LightClient::new(MockTransport::new());
        assert_eq!(
            client.check_connectivity(&config()),
            Connectivity::Connected
        );
    }

    #[test]
    fn check_connectivity_connected_despite_undecodable_body() {
        // A device answering 2xx with a body that is not state JSON is
        // reachable; only the status line decides the classification.
        let client = LightClient::new(MockTransport::garbled());
        assert_eq!(
            client.check_connectivity(&config()),
            Connectivity::Connected
        );
    }

    #[test]
    fn read_status_undecodable_body_is_unknown() {
        let client = LightClient::new(MockTransport::garbled());
        assert_eq!(client.read_status(&config()), Status::Unknown);
    }

    #[test]
    fn read_status_failure_is_unknown() {
        let client = LightClient::new(MockTransport::failing());
        assert_eq!(client.read_status(&config()), Status::Unknown);
    }

    #[test]
    fn report_deserializes_with_extra_fields() {
        // Real devices send far more state than we inspect.
        let report: LightStateReport = serde_json::from_str(
            r#"{"on": true, "bri": 128, "transition": 7,
                "seg": [{"id": 0, "start": 0, "stop": 30,
                         "col": [[255, 0, 0], [0, 0, 0], [0, 0, 0]]}]}"#,
        )
        .unwrap();
        assert_eq!(classify_state(&report, &config()), Status::Busy);
    }
}
