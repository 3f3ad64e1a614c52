//! Supported organ archetypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReplicaError;

/// Organ archetype a replica can be generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganType {
    Heart,
    Liver,
    Kidney,
    Ear,
}

impl OrganType {
    /// All supported archetypes, in catalog display order.
    pub fn all() -> &'static [OrganType] {
        &[
            OrganType::Heart,
            OrganType::Liver,
            OrganType::Kidney,
            OrganType::Ear,
        ]
    }

    /// Stable lowercase key used in requests, catalogs and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganType::Heart => "heart",
            OrganType::Liver => "liver",
            OrganType::Kidney => "kidney",
            OrganType::Ear => "ear",
        }
    }

    /// Human-readable label for UI population.
    pub fn label(&self) -> &'static str {
        match self {
            OrganType::Heart => "Human Heart",
            OrganType::Liver => "Human Liver",
            OrganType::Kidney => "Human Kidney",
            OrganType::Ear => "Human Ear",
        }
    }
}

impl FromStr for OrganType {
    type Err = ReplicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heart" => Ok(OrganType::Heart),
            "liver" => Ok(OrganType::Liver),
            "kidney" => Ok(OrganType::Kidney),
            "ear" => Ok(OrganType::Ear),
            _ => Err(ReplicaError::UnsupportedOrgan(s.to_string())),
        }
    }
}

impl fmt::Display for OrganType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Heart".parse::<OrganType>().unwrap(), OrganType::Heart);
        assert_eq!(" KIDNEY ".parse::<OrganType>().unwrap(), OrganType::Kidney);
    }

    #[test]
    fn test_unknown_organ_rejected() {
        let err = "brain".parse::<OrganType>().unwrap_err();
        assert!(matches!(err, ReplicaError::UnsupportedOrgan(ref name) if name == "brain"));
    }

    #[test]
    fn test_round_trip_through_display() {
        for organ in OrganType::all() {
            assert_eq!(organ.to_string().parse::<OrganType>().unwrap(), *organ);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        let json = serde_json::to_string(&OrganType::Liver).unwrap();
        assert_eq!(json, "\"liver\"");
    }
}
