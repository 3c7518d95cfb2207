//! RGB color parsing and formatting for the light's JSON protocol.
//!
//! The wire format is a bare 3-element array `[R, G, B]`, each channel 0-255.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGB triple as the light reports and accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// Parse a color string into an [`Rgb`].
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#ff0000"`
/// - Comma triple: `"255,0,0"`, `"255, 0, 0"`
pub fn parse_color(s: &str) -> crate::error::Result<Rgb> {
    let s = s.trim();

    if s.contains(',') {
        let mut channels = [0u8; 3];
        let mut parts = s.split(',');
        for ch in &mut channels {
            let part = parts.next().unwrap_or("").trim();
            *ch = part.parse::<u8>().map_err(|_| {
                crate::PresencelightError::Config(format!(
                    "Invalid color: {s} (channels must be 0-255)"
                ))
            })?;
        }
        if parts.next().is_some() {
            return Err(crate::PresencelightError::Config(format!(
                "Invalid color: {s} (expected exactly three channels)"
            )));
        }
        return Ok(Rgb(channels));
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(crate::PresencelightError::Config(format!(
            "Invalid color: {s} (use #RRGGBB or R,G,B)"
        )));
    }
    let val = u32::from_str_radix(hex, 16).map_err(|_| {
        crate::PresencelightError::Config(format!("Invalid hex color: {s}"))
    })?;
    Ok(Rgb([
        ((val >> 16) & 0xFF) as u8,
        ((val >> 8) & 0xFF) as u8,
        (val & 0xFF) as u8,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex() {
        assert_eq!(parse_color("#FF0000").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_color("00ff00").unwrap(), Rgb([0, 255, 0]));
        assert_eq!(parse_color("#abcdef").unwrap(), Rgb([0xAB, 0xCD, 0xEF]));
    }

    #[test]
    fn parse_comma_triple() {
        assert_eq!(parse_color("255,0,0").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_color(" 255, 255, 0 ").unwrap(), Rgb([255, 255, 0]));
        assert_eq!(parse_color("0,0,0").unwrap(), Rgb([0, 0, 0]));
    }

    #[test]
    fn parse_rejects_out_of_range_channel() {
        assert!(parse_color("256,0,0").is_err());
        assert!(parse_color("-1,0,0").is_err());
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert!(parse_color("255,0").is_err());
        assert!(parse_color("255,0,0,0").is_err());
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!(parse_color("#F00").is_err());
        assert!(parse_color("#GGGGGG").is_err());
        assert!(parse_color("chartreuse").is_err());
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Rgb([255, 0, 0]).to_string(), "#FF0000");
        assert_eq!(Rgb([0, 255, 255]).to_string(), "#00FFFF");
    }

    #[test]
    fn serde_is_bare_array() {
        let json = serde_json::to_string(&Rgb([255, 255, 0])).unwrap();
        assert_eq!(json, "[255,255,0]");
        let back: Rgb = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(back, Rgb([1, 2, 3]));
    }
}
