//! Due-date tightness scenarios.
//!
//! Each scenario fixes a tardiness factor (TF) and a relative range of due
//! dates (RDD). Due dates are then drawn from a window around
//! `(1 - TF) * Σp` of width `RDD * Σp`.
//!
//! | Scenario | TF  | RDD |
//! |----------|-----|-----|
//! | loose    | 0.2 | 0.6 |
//! | medium   | 0.5 | 0.5 |
//! | tight    | 0.8 | 0.4 |
//!
//! # Reference
//! Potts & Van Wassenhove (1985), "A decomposition algorithm for the single
//! machine total tardiness problem"

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A named due-date tightness scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Generous, widely spread due dates.
    Loose,
    /// Moderate tightness and spread.
    Medium,
    /// Early, similar due dates.
    Tight,
}

/// Closed integer window due dates are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateWindow {
    /// Lower bound (already clamped to >= 0).
    pub low: u64,
    /// Upper bound.
    pub high: u64,
}

impl DueDateWindow {
    /// Whether `d` lies in the window.
    pub fn contains(&self, d: u64) -> bool {
        self.low <= d && d <= self.high
    }
}

impl Scenario {
    /// All scenarios in the order the runner visits them.
    pub const ALL: [Scenario; 3] = [Scenario::Loose, Scenario::Medium, Scenario::Tight];

    /// `(TF, RDD)` pair of the scenario.
    pub fn factors(&self) -> (f64, f64) {
        match self {
            Scenario::Loose => (0.2, 0.6),
            Scenario::Medium => (0.5, 0.5),
            Scenario::Tight => (0.8, 0.4),
        }
    }

    /// Due-date sampling window for a total processing time `ptot`.
    ///
    /// `low = floor((1 - TF - RDD/2) * Ptot)` clamped to 0,
    /// `high = floor((1 - TF + RDD/2) * Ptot)`.
    pub fn due_date_window(&self, ptot: u64) -> DueDateWindow {
        let (tf, rdd) = self.factors();
        let total = ptot as f64;
        let low = ((1.0 - tf - rdd / 2.0) * total).floor();
        let high = ((1.0 - tf + rdd / 2.0) * total).floor();
        DueDateWindow {
            low: low.max(0.0) as u64,
            high: high.max(0.0) as u64,
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Loose => "loose",
            Scenario::Medium => "medium",
            Scenario::Tight => "tight",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loose" => Ok(Scenario::Loose),
            "medium" => Ok(Scenario::Medium),
            "tight" => Ok(Scenario::Tight),
            _ => Err(ScheduleError::InvalidScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_table() {
        assert_eq!(Scenario::Loose.factors(), (0.2, 0.6));
        assert_eq!(Scenario::Medium.factors(), (0.5, 0.5));
        assert_eq!(Scenario::Tight.factors(), (0.8, 0.4));
    }

    #[test]
    fn test_parse() {
        assert_eq!("loose".parse::<Scenario>().unwrap(), Scenario::Loose);
        assert_eq!("Medium".parse::<Scenario>().unwrap(), Scenario::Medium);
        assert_eq!(" TIGHT ".parse::<Scenario>().unwrap(), Scenario::Tight);

        let err = "harsh".parse::<Scenario>().unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidScenario(ref s) if s == "harsh"));
    }

    #[test]
    fn test_window_medium() {
        // Ptot = 44: low = floor(0.25 * 44) = 11, high = floor(0.75 * 44) = 33
        let w = Scenario::Medium.due_date_window(44);
        assert_eq!(w, DueDateWindow { low: 11, high: 33 });
        assert!(w.contains(11) && w.contains(33));
        assert!(!w.contains(34));
    }

    #[test]
    fn test_window_tight_clamped() {
        // 1 - 0.8 - 0.2 is a tiny negative float; the low bound clamps to 0.
        let w = Scenario::Tight.due_date_window(44);
        assert_eq!(w.low, 0);
        assert_eq!(w.high, 17);
    }

    #[test]
    fn test_window_loose() {
        let w = Scenario::Loose.due_date_window(44);
        assert_eq!(w, DueDateWindow { low: 22, high: 48 });
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Scenario::Tight).unwrap();
        assert_eq!(json, "\"tight\"");
        let back: Scenario = serde_json::from_str("\"loose\"").unwrap();
        assert_eq!(back, Scenario::Loose);
    }

    #[test]
    fn test_display() {
        assert_eq!(Scenario::Medium.to_string(), "medium");
        assert_eq!(Scenario::ALL.len(), 3);
    }
}
