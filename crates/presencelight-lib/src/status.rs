//! Presence status — the value extracted from the Teams log and mirrored
//! onto the light.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Presence status inferred from the Teams log.
///
/// `DoNotDisturb` and `Busy` share a light color but stay distinct values:
/// the display layer shows the producer's original wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Available,
    Busy,
    Away,
    #[serde(rename = "Do not disturb")]
    DoNotDisturb,
    /// No status could be determined. Maps to light off.
    Unknown,
}

impl Status {
    /// Parse the exact token the Teams log writes after `"status "`.
    ///
    /// Anything that is not one of the four known words (including partial
    /// matches and different casing) is `Unknown`.
    pub fn from_log_token(token: &str) -> Status {
        match token.trim() {
            "Available" => Status::Available,
            "Busy" => Status::Busy,
            "Away" => Status::Away,
            "Do not disturb" => Status::DoNotDisturb,
            _ => Status::Unknown,
        }
    }

    /// Whether the light should be on for this status.
    pub fn is_active(self) -> bool {
        self != Status::Unknown
    }

    /// All statuses that carry a color mapping, in classification order.
    ///
    /// `read_status` compares device colors in this order; first exact
    /// match wins.
    pub const MAPPED: [Status; 3] = [Status::Available, Status::Busy, Status::Away];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Available => "Available",
            Status::Busy => "Busy",
            Status::Away => "Away",
            Status::DoNotDisturb => "Do not disturb",
            Status::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tokens() {
        assert_eq!(Status::from_log_token("Available"), Status::Available);
        assert_eq!(Status::from_log_token("Busy"), Status::Busy);
        assert_eq!(Status::from_log_token("Away"), Status::Away);
        assert_eq!(
            Status::from_log_token("Do not disturb"),
            Status::DoNotDisturb
        );
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Status::from_log_token("  Busy \r"), Status::Busy);
    }

    #[test]
    fn parse_unrecognized_is_unknown() {
        assert_eq!(Status::from_log_token("BeRightBack"), Status::Unknown);
        assert_eq!(Status::from_log_token("busy"), Status::Unknown);
        assert_eq!(Status::from_log_token(""), Status::Unknown);
        assert_eq!(Status::from_log_token("Available now"), Status::Unknown);
    }

    #[test]
    fn display_matches_log_wording() {
        assert_eq!(Status::DoNotDisturb.to_string(), "Do not disturb");
        assert_eq!(Status::Available.to_string(), "Available");
        assert_eq!(Status::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn serde_uses_log_wording_for_dnd() {
        let json = serde_json::to_string(&Status::DoNotDisturb).unwrap();
        assert_eq!(json, "\"Do not disturb\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::DoNotDisturb);
    }

    #[test]
    fn only_unknown_is_inactive() {
        assert!(Status::Available.is_active());
        assert!(Status::Busy.is_active());
        assert!(Status::Away.is_active());
        assert!(Status::DoNotDisturb.is_active());
        assert!(!Status::Unknown.is_active());
    }
}
