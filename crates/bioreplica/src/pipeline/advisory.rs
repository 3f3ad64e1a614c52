//! Non-fatal findings attached to a generation result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level of an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Result is usable but should be reviewed.
    Warning,
    /// Result should not be printed without sign-off.
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// What an advisory is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCode {
    /// Scaled volume lies outside the organ's typical anatomical range.
    AtypicalVolume,
    /// Scaled volume lies outside what the printer can produce.
    UnprintableVolume,
    /// Patient is past the senescence onset age.
    SenescenceApplied,
    /// Bioink patient weight was non-positive; cell density is unadjusted.
    WeightAdjustmentSkipped,
}

impl AdvisoryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCode::AtypicalVolume => "atypical_volume",
            AdvisoryCode::UnprintableVolume => "unprintable_volume",
            AdvisoryCode::SenescenceApplied => "senescence_applied",
            AdvisoryCode::WeightAdjustmentSkipped => "weight_adjustment_skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub code: AdvisoryCode,
    pub severity: Severity,
    pub message: String,
}

impl Advisory {
    pub fn new(code: AdvisoryCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
        }
    }

    pub fn info(code: AdvisoryCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Info, message)
    }

    pub fn warning(code: AdvisoryCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }

    pub fn error(code: AdvisoryCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity.label(),
            self.code.as_str(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_display() {
        let advisory = Advisory::warning(AdvisoryCode::AtypicalVolume, "volume 900 ml");
        assert_eq!(
            advisory.to_string(),
            "[Warning] atypical_volume: volume 900 ml"
        );
    }

    #[test]
    fn test_error_advisory() {
        let advisory = Advisory::error(AdvisoryCode::AtypicalVolume, "volume 240 ml");
        assert_eq!(advisory.severity, Severity::Error);
        assert!(advisory.to_string().starts_with("[Error] "));
    }

    #[test]
    fn test_serialized_code_matches_as_str() {
        let json = serde_json::to_string(&AdvisoryCode::WeightAdjustmentSkipped).unwrap();
        assert_eq!(json, format!("\"{}\"", AdvisoryCode::WeightAdjustmentSkipped.as_str()));
    }
}
