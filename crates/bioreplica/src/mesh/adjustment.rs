//! Uniform size adjustments requested in free-text special requirements.

use serde::{Deserialize, Serialize};

use super::types::Mesh;

/// Size adjustment applied to a generated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeAdjustment {
    #[default]
    None,
    Enlarged,
    Reduced,
}

impl SizeAdjustment {
    /// Keywords checked in order; the first one found wins.
    const KEYWORDS: [(&'static str, SizeAdjustment); 2] = [
        ("enlarged", SizeAdjustment::Enlarged),
        ("reduced", SizeAdjustment::Reduced),
    ];

    /// Detect an adjustment by case-insensitive substring match.
    ///
    /// "enlarged" takes precedence over "reduced" when both appear.
    pub fn from_requirements(text: &str) -> Self {
        let lowered = text.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, adjustment)| *adjustment)
            .unwrap_or_default()
    }

    /// Uniform scale factor for this adjustment.
    pub fn factor(&self) -> f64 {
        match self {
            SizeAdjustment::None => 1.0,
            SizeAdjustment::Enlarged => 1.1,
            SizeAdjustment::Reduced => 0.9,
        }
    }

    /// Scale the mesh about the origin. `None` leaves it untouched.
    pub fn apply(&self, mesh: &mut Mesh) {
        if *self != SizeAdjustment::None {
            mesh.scale_uniform(self.factor());
        }
    }
}
