//! Power-law scaling of reference organ geometry to a patient.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{OrganType, ReferenceCatalog};
use crate::error::Result;

use super::vitals::PatientVitals;

/// Linear organ extents (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Multiply every extent by the same factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.length * factor, self.width * factor, self.height * factor)
    }

    pub fn is_positive(&self) -> bool {
        self.length > 0.0 && self.width > 0.0 && self.height > 0.0
    }
}

/// Patient-specific organ size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledGeometry {
    /// Scaled organ volume (ml).
    pub volume_ml: f64,
    /// Scaled linear dimensions (cm).
    pub dimensions: Dimensions,
    /// Combined height, weight and age multiplier.
    pub scale_factor: f64,
    /// Age contribution to the scale factor.
    pub age_factor: f64,
}

/// Derives organ size from patient vitals.
#[derive(Debug, Clone, Copy)]
pub struct AnthropometricScaler<'a> {
    catalog: &'a ReferenceCatalog,
}

impl<'a> AnthropometricScaler<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Scale the archetype's reference geometry to the patient.
    ///
    /// The age factor is not clamped: sufficiently old ages yield a zero or
    /// negative scale factor, which callers must reject.
    pub fn scale(&self, organ: OrganType, vitals: &PatientVitals) -> Result<ScaledGeometry> {
        let profile = self.catalog.geometry_profile(organ)?;
        let policy = &self.catalog.scaling;

        let height_factor =
            (vitals.height_cm / policy.reference_height_cm).powf(profile.height_exponent);
        let weight_factor =
            (vitals.weight_kg / policy.reference_weight_kg).powf(profile.weight_exponent);
        let age_factor = self.age_factor(vitals.age_years);

        let scale_factor = height_factor * weight_factor * age_factor;
        // Isotropic linear scaling; dimensions are for rendering, volume drives chemistry.
        let linear = scale_factor.powf(1.0 / 3.0);

        let geometry = ScaledGeometry {
            volume_ml: profile.base_volume_ml * scale_factor,
            dimensions: profile.base_dimensions.scaled(linear),
            scale_factor,
            age_factor,
        };

        debug!(
            organ = %organ,
            height_factor,
            weight_factor,
            age_factor,
            scale_factor,
            volume_ml = geometry.volume_ml,
            "scaled organ geometry"
        );

        Ok(geometry)
    }

    /// Linear senescence shrinkage past the onset age.
    pub fn age_factor(&self, age_years: u32) -> f64 {
        let policy = &self.catalog.scaling;
        if age_years <= policy.senescence_onset_years {
            1.0
        } else {
            let years_past = f64::from(age_years - policy.senescence_onset_years);
            1.0 - years_past * policy.senescence_rate_per_year
        }
    }
}
