//! Handicap parsing and banding.
//!
//! A free-text handicap becomes a signed value and one of seven bands.
//! Plus handicaps (better than scratch) are written with a leading `+` and
//! stored as negative numbers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{DrillError, Result};

static HANDICAP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+)?(\d+(?:\.\d+)?)$").expect("handicap pattern is a valid regex")
});

/// Coarse skill bucket used to tune drill difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HandicapBand {
    #[serde(rename = "plus_5_to_0")]
    Plus5To0,
    #[serde(rename = "0_to_5")]
    Scratch0To5,
    #[serde(rename = "6_to_12")]
    Low6To12,
    #[serde(rename = "13_to_20")]
    Mid13To20,
    #[serde(rename = "21_to_30")]
    High21To30,
    #[serde(rename = "31_plus")]
    Beginner31Plus,
    #[default]
    #[serde(rename = "no_hcp")]
    NoHcp,
}

impl HandicapBand {
    pub const ALL: [HandicapBand; 7] = [
        Self::Plus5To0,
        Self::Scratch0To5,
        Self::Low6To12,
        Self::Mid13To20,
        Self::High21To30,
        Self::Beginner31Plus,
        Self::NoHcp,
    ];

    /// Band for a numeric handicap; `None` means no handicap was given
    pub fn from_value(value: Option<f64>) -> Self {
        match value {
            None => Self::NoHcp,
            Some(v) if v < 0.0 => Self::Plus5To0,
            Some(v) if v <= 5.0 => Self::Scratch0To5,
            Some(v) if v <= 12.0 => Self::Low6To12,
            Some(v) if v <= 20.0 => Self::Mid13To20,
            Some(v) if v <= 30.0 => Self::High21To30,
            Some(_) => Self::Beginner31Plus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plus5To0 => "plus_5_to_0",
            Self::Scratch0To5 => "0_to_5",
            Self::Low6To12 => "6_to_12",
            Self::Mid13To20 => "13_to_20",
            Self::High21To30 => "21_to_30",
            Self::Beginner31Plus => "31_plus",
            Self::NoHcp => "no_hcp",
        }
    }

    /// Difficulty narrative embedded in user prompts
    pub fn difficulty_narrative(&self) -> &'static str {
        match self {
            Self::Plus5To0 => {
                "Elite player. Use tour-level targets: tight dispersion windows, long putts made \
                 rather than lagged, pressure built in through consecutive-success requirements."
            }
            Self::Scratch0To5 => {
                "Very strong player. Demand precision: small targets, few allowed misses, \
                 distances that expose small technical flaws."
            }
            Self::Low6To12 => {
                "Solid single-figure to low-teens player. Targets should be challenging but \
                 reachable in most sessions; mix stock shots with one or two demanding ones."
            }
            Self::Mid13To20 => {
                "Mid-handicap player. Prioritise consistency and contact: generous targets, \
                 clear scoring, success roughly half the time on first attempts."
            }
            Self::High21To30 => {
                "Higher-handicap player. Keep targets large and distances short, reward solid \
                 contact and direction over precision, and keep the scoring simple."
            }
            Self::Beginner31Plus => {
                "Beginner. Focus on fundamentals: very forgiving targets, short distances, \
                 lots of small wins, and no penalties that could end the drill early."
            }
            Self::NoHcp => {
                "Handicap unknown. Pitch difficulty at an average club golfer and make targets \
                 easy to scale up or down."
            }
        }
    }
}

impl fmt::Display for HandicapBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized handicap, computed once per request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedHandicap {
    /// Caller's input, trimmed; `None` when blank
    pub input: Option<String>,
    /// Signed value; negative for plus handicaps
    pub value: Option<f64>,
    pub band: HandicapBand,
}

impl ParsedHandicap {
    pub fn none() -> Self {
        Self::default()
    }

    /// Short human-readable description for prompts
    pub fn describe(&self) -> String {
        match (&self.input, self.value) {
            (Some(input), Some(_)) => format!("{} (band {})", input, self.band),
            _ => format!("not provided (band {})", self.band),
        }
    }
}

/// Parse a free-text handicap.
///
/// Blank or missing input yields `no_hcp`. Anything that is not an optional
/// `+` followed by a non-negative decimal is rejected as `DrillError::Input`.
pub fn parse_handicap(input: Option<&str>) -> Result<ParsedHandicap> {
    let trimmed = match input.map(str::trim) {
        None | Some("") => return Ok(ParsedHandicap::none()),
        Some(s) => s,
    };

    let captures = HANDICAP_PATTERN
        .captures(trimmed)
        .ok_or_else(|| DrillError::Input(format!("Invalid handicap: '{}'", trimmed)))?;

    let magnitude: f64 = captures[2]
        .parse()
        .map_err(|_| DrillError::Input(format!("Invalid handicap: '{}'", trimmed)))?;

    let is_plus = captures.get(1).is_some();
    let value = if is_plus && magnitude > 0.0 {
        -magnitude
    } else {
        magnitude
    };

    Ok(ParsedHandicap {
        input: Some(trimmed.to_string()),
        value: Some(value),
        band: HandicapBand::from_value(Some(value)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_blank_and_missing_are_no_hcp() {
        let expected = ParsedHandicap {
            input: None,
            value: None,
            band: HandicapBand::NoHcp,
        };
        assert_eq!(parse_handicap(None).unwrap(), expected);
        assert_eq!(parse_handicap(Some("")).unwrap(), expected);
        assert_eq!(parse_handicap(Some("   ")).unwrap(), expected);
    }

    #[test]
    fn test_plus_handicap_is_negative() {
        let hcp = parse_handicap(Some("+5")).unwrap();
        assert_eq!(hcp.value, Some(-5.0));
        assert_eq!(hcp.band, HandicapBand::Plus5To0);
        assert_eq!(hcp.input.as_deref(), Some("+5"));
    }

    #[test]
    fn test_band_thresholds() {
        let band = |s: &str| parse_handicap(Some(s)).unwrap().band;
        assert_eq!(band("5"), HandicapBand::Scratch0To5);
        assert_eq!(band("0"), HandicapBand::Scratch0To5);
        assert_eq!(band("5.1"), HandicapBand::Low6To12);
        assert_eq!(band("12"), HandicapBand::Low6To12);
        assert_eq!(band("18"), HandicapBand::Mid13To20);
        assert_eq!(band("20"), HandicapBand::Mid13To20);
        assert_eq!(band("30"), HandicapBand::High21To30);
        assert_eq!(band("31"), HandicapBand::Beginner31Plus);
        assert_eq!(band("+2.4"), HandicapBand::Plus5To0);
    }

    #[test]
    fn test_plus_zero_is_scratch() {
        let hcp = parse_handicap(Some("+0")).unwrap();
        assert_eq!(hcp.value, Some(0.0));
        assert_eq!(hcp.band, HandicapBand::Scratch0To5);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["-3", "abc", "+-2", "1.", ".5", "12 handicap", "++1", "1e3"] {
            let err = parse_handicap(Some(bad)).unwrap_err();
            assert!(matches!(err, DrillError::Input(_)), "accepted {bad}");
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_input_is_trimmed() {
        let hcp = parse_handicap(Some("  18 ")).unwrap();
        assert_eq!(hcp.input.as_deref(), Some("18"));
        assert_eq!(hcp.value, Some(18.0));
    }

    #[test]
    fn test_band_wire_names() {
        let names: Vec<String> = HandicapBand::ALL
            .iter()
            .map(|b| serde_json::to_value(b).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "plus_5_to_0",
                "0_to_5",
                "6_to_12",
                "13_to_20",
                "21_to_30",
                "31_plus",
                "no_hcp"
            ]
        );
        for band in HandicapBand::ALL {
            assert_eq!(serde_json::to_value(band).unwrap(), band.as_str());
        }
    }

    proptest! {
        #[test]
        fn prop_valid_strings_parse_deterministically(s in r"\+?[0-9]{1,3}(\.[0-9]{1,2})?") {
            let first = parse_handicap(Some(&s)).unwrap();
            let second = parse_handicap(Some(&s)).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.band, HandicapBand::from_value(first.value));
            let value = first.value.unwrap();
            if s.starts_with('+') && value != 0.0 {
                prop_assert!(value < 0.0);
            } else {
                prop_assert!(value >= 0.0);
            }
        }

        #[test]
        fn prop_band_is_monotonic(a in 0.0f64..60.0, b in 0.0f64..60.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let idx = |v: f64| HandicapBand::ALL
                .iter()
                .position(|x| *x == HandicapBand::from_value(Some(v)))
                .unwrap();
            prop_assert!(idx(lo) <= idx(hi));
        }
    }
}
