//! Property-based tests for the scaling, formulation and costing engines.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p bioreplica --test property_tests
//!
//! # Run with more cases
//! PROPTEST_CASES=10000 cargo test -p bioreplica --test property_tests
//! ```

use proptest::prelude::*;

use bioreplica::mesh::{SizeAdjustment, convex_hull};
use bioreplica::{
    AnthropometricScaler, BioinkFormulationEngine, MaterialRequirementEngine, OrganType,
    PatientVitals, ReferenceCatalog,
};
use nalgebra::Point3;

// =============================================================================
// Test Strategies
// =============================================================================

fn organ() -> impl Strategy<Value = OrganType> {
    prop::sample::select(OrganType::all().to_vec())
}

fn height() -> impl Strategy<Value = f64> {
    50.0f64..230.0
}

fn weight() -> impl Strategy<Value = f64> {
    3.0f64..250.0
}

fn volume() -> impl Strategy<Value = f64> {
    0.5f64..3000.0
}

// =============================================================================
// Scaling
// =============================================================================

proptest! {
    #[test]
    fn volume_increases_with_height(
        organ in organ(),
        h in height(),
        dh in 0.5f64..40.0,
        w in weight(),
        age in 0u32..120,
    ) {
        let scaler = AnthropometricScaler::new(ReferenceCatalog::builtin());
        let short = scaler.scale(organ, &PatientVitals::new(h, w, age).unwrap()).unwrap();
        let tall = scaler.scale(organ, &PatientVitals::new(h + dh, w, age).unwrap()).unwrap();
        prop_assert!(tall.volume_ml > short.volume_ml);
    }

    #[test]
    fn volume_increases_with_weight(
        organ in organ(),
        h in height(),
        w in weight(),
        dw in 0.5f64..40.0,
        age in 0u32..120,
    ) {
        let scaler = AnthropometricScaler::new(ReferenceCatalog::builtin());
        let light = scaler.scale(organ, &PatientVitals::new(h, w, age).unwrap()).unwrap();
        let heavy = scaler.scale(organ, &PatientVitals::new(h, w + dw, age).unwrap()).unwrap();
        prop_assert!(heavy.volume_ml > light.volume_ml);
    }

    #[test]
    fn dimensions_scale_by_cube_root(organ in organ(), h in height(), w in weight(), age in 0u32..100) {
        let catalog = ReferenceCatalog::builtin();
        let geometry = AnthropometricScaler::new(catalog)
            .scale(organ, &PatientVitals::new(h, w, age).unwrap())
            .unwrap();
        let base = catalog.geometry_profile(organ).unwrap().base_dimensions;
        let linear = geometry.dimensions.length / base.length;
        prop_assert!((linear.powi(3) - geometry.scale_factor).abs() < 1e-9 * geometry.scale_factor);
        prop_assert!((geometry.dimensions.width / base.width - linear).abs() < 1e-12);
    }
}

// =============================================================================
// Formulation
// =============================================================================

proptest! {
    #[test]
    fn adjustment_factor_is_bounded(w in -500.0f64..5000.0) {
        let engine = BioinkFormulationEngine::new(ReferenceCatalog::builtin());
        let factor = engine.patient_adjustment_factor(w);
        if w > 0.0 {
            prop_assert!((0.5..=1.5).contains(&factor));
        } else {
            prop_assert_eq!(factor, 1.0);
        }
    }

    #[test]
    fn components_fill_total_volume(organ in organ(), v in volume(), w in weight()) {
        let formulation = BioinkFormulationEngine::new(ReferenceCatalog::builtin())
            .formulate(organ, v, w)
            .unwrap();
        let total = formulation.total_volume_ml;
        prop_assert_eq!(formulation.component_volume_ml(), total);
        prop_assert!(formulation.solvent().unwrap().volume_ml > 0.0);
        prop_assert_eq!(total, v * 1.25);
    }
}

// =============================================================================
// Costing
// =============================================================================

proptest! {
    #[test]
    fn total_cost_is_subtotal_plus_overhead(organ in organ(), v in volume()) {
        let requirement = MaterialRequirementEngine::new(ReferenceCatalog::builtin())
            .calculate(organ, v)
            .unwrap();
        let costs = &requirement.cost_breakdown;
        prop_assert_eq!(costs.total_estimated_cost, costs.subtotal * 1.2);
        prop_assert!(costs.subtotal >= 2500.0 + 800.0 + 750.0);
    }

    #[test]
    fn material_amounts_are_linear_in_volume(organ in organ(), v in volume()) {
        let engine = MaterialRequirementEngine::new(ReferenceCatalog::builtin());
        let single = engine.calculate(organ, v).unwrap();
        let double = engine.calculate(organ, 2.0 * v).unwrap();
        for (name, item) in &single.scaffold_materials {
            let scaled = double.scaffold_materials[name].mass_g;
            prop_assert!((scaled - 2.0 * item.mass_g).abs() <= 1e-12 * scaled);
        }
        prop_assert_eq!(
            double.post_processing.culture_medium.volume_ml,
            2.0 * single.post_processing.culture_medium.volume_ml
        );
    }
}

// =============================================================================
// Geometry
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hull_of_random_cloud_is_closed(
        coords in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0), 8..120)
    ) {
        let mut points: Vec<Point3<f64>> =
            coords.into_iter().map(|(x, y, z)| Point3::new(x, y, z)).collect();
        // guarantee a non-degenerate cloud
        points.extend([
            Point3::new(-20.0, -20.0, -20.0),
            Point3::new(20.0, -20.0, -20.0),
            Point3::new(0.0, 20.0, -20.0),
            Point3::new(0.0, 0.0, 20.0),
        ]);
        // repeated samples must not become extra hull vertices
        let distinct = points.len();
        points.extend_from_within(..distinct / 2);
        let faces = convex_hull(&points).unwrap();
        prop_assert!(faces.iter().flatten().all(|&i| (i as usize) < distinct));
        let mesh = bioreplica::Mesh::new(points, faces);
        prop_assert!(mesh.is_closed());
        prop_assert!(mesh.enclosed_volume() > 0.0);
        // Euler characteristic of a sphere for a triangulated hull
        let v = mesh.referenced_vertex_count() as i64;
        let f = mesh.face_count() as i64;
        prop_assert_eq!(v - f / 2, 2);
    }

    #[test]
    fn size_keyword_detection_is_case_insensitive(prefix in "[a-z ]{0,10}", upper in any::<bool>()) {
        let word = if upper { "ENLARGED" } else { "Enlarged" };
        let text = format!("{}{} organ", prefix, word);
        prop_assert_eq!(SizeAdjustment::from_requirements(&text), SizeAdjustment::Enlarged);
    }
}
