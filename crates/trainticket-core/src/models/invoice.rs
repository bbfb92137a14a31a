//! Invoice metadata read from the XBRL fragment of a railway e-invoice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NamingError;

/// Which invoice date names the output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateField {
    /// Date of travel (`TravelDate`).
    #[default]
    Travel,
    /// Date the invoice was issued (`DateOfIssue`).
    Issue,
}

impl DateField {
    /// XBRL local tag name holding this date.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Travel => "TravelDate",
            Self::Issue => "DateOfIssue",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Travel => "travel date",
            Self::Issue => "date of issue",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Travel => f.write_str("travel"),
            Self::Issue => f.write_str("issue"),
        }
    }
}

impl FromStr for DateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "travel" => Ok(Self::Travel),
            "issue" => Ok(Self::Issue),
            other => Err(format!("unknown date field: {other:?} (expected travel or issue)")),
        }
    }
}

/// Fields pulled from the XBRL fragment.
///
/// Each field holds the first non-empty, trimmed occurrence of its tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInfo {
    /// Date of travel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<String>,

    /// Date the invoice was issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_issue: Option<String>,

    /// Departure station name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_station: Option<String>,

    /// Destination station name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_station: Option<String>,
}

impl InvoiceInfo {
    /// Both stations and at least one date are present.
    pub fn is_usable(&self) -> bool {
        has_text(&self.departure_station)
            && has_text(&self.destination_station)
            && (has_text(&self.travel_date) || has_text(&self.date_of_issue))
    }

    /// The date selected by `field`, without falling back to the other one.
    pub fn date(&self, field: DateField) -> Result<&str, NamingError> {
        let value = match field {
            DateField::Travel => self.travel_date.as_deref(),
            DateField::Issue => self.date_of_issue.as_deref(),
        };
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or(NamingError::MissingDate(field))
    }

    /// Slot for a recognised XBRL local tag name.
    pub(crate) fn slot_mut(&mut self, local_name: &[u8]) -> Option<&mut Option<String>> {
        match local_name {
            b"TravelDate" => Some(&mut self.travel_date),
            b"DateOfIssue" => Some(&mut self.date_of_issue),
            b"DepartureStation" => Some(&mut self.departure_station),
            b"DestinationStation" => Some(&mut self.destination_station),
            _ => None,
        }
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// PDFs counted after deduplication.
    pub found_pdf: u64,
    /// PDFs renamed and written.
    pub succeeded: u64,
    /// Files, archives or entries that failed.
    pub failed: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {} PDF(s), {} succeeded, {} failed",
            self.found_pdf, self.succeeded, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(travel: &str, issue: &str, dep: &str, dst: &str) -> InvoiceInfo {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        InvoiceInfo {
            travel_date: opt(travel),
            date_of_issue: opt(issue),
            departure_station: opt(dep),
            destination_station: opt(dst),
        }
    }

    #[test]
    fn test_usable_requires_both_stations() {
        assert!(info("2026-02-24", "", "A", "B").is_usable());
        assert!(info("", "2026-02-28", "A", "B").is_usable());
        assert!(!info("2026-02-24", "", "A", "").is_usable());
        assert!(!info("", "", "A", "B").is_usable());
    }

    #[test]
    fn test_date_does_not_fall_back() {
        let only_issue = info("", "2026-02-28", "A", "B");
        assert_eq!(only_issue.date(DateField::Issue).unwrap(), "2026-02-28");
        assert!(matches!(
            only_issue.date(DateField::Travel),
            Err(NamingError::MissingDate(DateField::Travel))
        ));
    }

    #[test]
    fn test_date_field_from_str() {
        assert_eq!("Travel".parse::<DateField>().unwrap(), DateField::Travel);
        assert_eq!(" issue ".parse::<DateField>().unwrap(), DateField::Issue);
        assert!("departure".parse::<DateField>().is_err());
        assert_eq!(DateField::Issue.to_string(), "issue");
    }
}
