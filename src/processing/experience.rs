//! Experience level estimation from resume wording

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse experience band derived from keywords and "N years" mentions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceBand {
    Fresher,
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    #[serde(rename = "Not Mentioned")]
    NotMentioned,
}

impl ExperienceBand {
    /// Band for an explicit number of years
    pub fn from_years(years: u64) -> Self {
        match years {
            0..=2 => ExperienceBand::Junior,
            3..=5 => ExperienceBand::MidLevel,
            _ => ExperienceBand::Senior,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBand::Fresher => "Fresher",
            ExperienceBand::Junior => "Junior",
            ExperienceBand::MidLevel => "Mid-Level",
            ExperienceBand::Senior => "Senior",
            ExperienceBand::NotMentioned => "Not Mentioned",
        }
    }
}

impl fmt::Display for ExperienceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub struct ExperienceEstimator {
    years_regex: Regex,
    entry_level_markers: Vec<&'static str>,
}

impl Default for ExperienceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperienceEstimator {
    pub fn new() -> Self {
        let years_regex = Regex::new(r"([0-9]+)\+?\s*(?:years|yrs)").expect("Invalid years regex");

        Self {
            years_regex,
            entry_level_markers: vec!["intern", "fresher"],
        }
    }

    /// Estimate the experience band of the raw resume text.
    ///
    /// Entry-level markers win over any years pattern. Otherwise only the
    /// first "N years" / "N+ yrs" mention in document order is used.
    pub fn estimate(&self, text: &str) -> ExperienceBand {
        let lowered = text.to_lowercase();

        if self
            .entry_level_markers
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            return ExperienceBand::Fresher;
        }

        match self.years_regex.captures(&lowered) {
            Some(caps) => {
                let digits = caps.get(1).map(|m| m.as_str()).unwrap_or("0");
                // overflow only; counts as Senior
                let years = digits.parse::<u64>().unwrap_or(u64::MAX);
                ExperienceBand::from_years(years)
            }
            None => ExperienceBand::NotMentioned,
        }
    }
}
