//! Surface mesh synthesis and export.
//!
//! Each archetype's parametric surface is sampled on a fixed grid, fitted to
//! the patient's dimensions and wrapped in its convex hull. The hull loses
//! concavities such as the kidney hilum; downstream chemistry uses the
//! analytic volume, not the mesh volume.

mod adjustment;
mod export;
mod generator;
mod hull;
mod surface;
mod types;

pub use adjustment::SizeAdjustment;
pub use export::{StlFormat, export_stl, write_stl};
pub use generator::ParametricMeshGenerator;
pub use hull::convex_hull;
pub use types::{Bounds, Mesh};
