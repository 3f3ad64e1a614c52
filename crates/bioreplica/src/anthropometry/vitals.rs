//! Patient vitals and their validation.

use serde::{Deserialize, Serialize};

use crate::error::{ReplicaError, Result};

/// Anthropometric inputs for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientVitals {
    /// Height (cm).
    pub height_cm: f64,
    /// Weight (kg).
    pub weight_kg: f64,
    /// Age (whole years).
    pub age_years: u32,
}

impl PatientVitals {
    /// Create validated vitals. Height and weight must be finite and positive.
    pub fn new(height_cm: f64, weight_kg: f64, age_years: u32) -> Result<Self> {
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(ReplicaError::InvalidInput(format!(
                "height must be a positive number of centimetres, got {}",
                height_cm
            )));
        }
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(ReplicaError::InvalidInput(format!(
                "weight must be a positive number of kilograms, got {}",
                weight_kg
            )));
        }
        Ok(Self {
            height_cm,
            weight_kg,
            age_years,
        })
    }

    /// Coerce textual vitals (form fields, CLI arguments) into validated vitals.
    ///
    /// Height and weight parse as floats, age as a non-negative integer.
    pub fn parse(height: &str, weight: &str, age: &str) -> Result<Self> {
        let height_cm = parse_number(height, "height")?;
        let weight_kg = parse_number(weight, "weight")?;
        let age_years = age.trim().parse::<u32>().map_err(|e| {
            ReplicaError::InvalidInput(format!(
                "age must be a non-negative whole number, got '{}': {}",
                age, e
            ))
        })?;
        Self::new(height_cm, weight_kg, age_years)
    }
}

fn parse_number(value: &str, field: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|e| {
        ReplicaError::InvalidInput(format!("{} must be numeric, got '{}': {}", field, value, e))
    })
}
