//! Anthropometric scaling of reference organs to a patient.

mod scaler;
mod vitals;

pub use scaler::{AnthropometricScaler, Dimensions, ScaledGeometry};
pub use vitals::PatientVitals;
