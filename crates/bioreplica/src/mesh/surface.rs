//! Parametric surface equations for each organ archetype.
//!
//! These are illustrative families, not anatomy. Raw coordinates are in
//! unit-less surface space; [`SurfaceFamily::nominal_extent`] gives the extent
//! used to map them onto patient dimensions.

use std::f64::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};

use crate::catalog::SurfaceFamily;

impl SurfaceFamily {
    /// Parameter range of `u`.
    pub fn u_range(&self) -> (f64, f64) {
        match self {
            SurfaceFamily::LobedEllipsoid => (0.0, PI),
            SurfaceFamily::Cardioid | SurfaceFamily::Bean | SurfaceFamily::FoldedEllipsoid => {
                (0.0, TAU)
            }
        }
    }

    /// Parameter range of `v`.
    pub fn v_range(&self) -> (f64, f64) {
        match self {
            SurfaceFamily::Cardioid => (-1.0, 1.0),
            SurfaceFamily::LobedEllipsoid => (0.0, TAU),
            SurfaceFamily::Bean | SurfaceFamily::FoldedEllipsoid => (0.0, PI),
        }
    }

    /// Unscaled extent along x, y, z, which map to width, length, height.
    pub fn nominal_extent(&self) -> Vector3<f64> {
        match self {
            SurfaceFamily::Cardioid => Vector3::new(32.0, 26.0, 10.0),
            _ => Vector3::new(2.0, 2.0, 2.0),
        }
    }

    /// Evaluate the surface at `(u, v)`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point3<f64> {
        match self {
            SurfaceFamily::Cardioid => {
                let x = 16.0 * u.sin().powi(3);
                let y = 13.0 * u.cos()
                    - 5.0 * (2.0 * u).cos()
                    - 2.0 * (3.0 * u).cos()
                    - (4.0 * u).cos();
                Point3::new(x, y, v * 5.0)
            }
            SurfaceFamily::LobedEllipsoid => {
                // u is the polar angle, v the azimuth
                let r = 1.0 + 0.3 * (3.0 * v).sin() * (2.0 * u).sin();
                Point3::new(
                    r * u.sin() * v.cos(),
                    r * u.sin() * v.sin(),
                    r * u.cos(),
                )
            }
            SurfaceFamily::Bean => {
                let r = 1.0 - 0.3 * u.cos();
                spherical(r, u, v)
            }
            SurfaceFamily::FoldedEllipsoid => {
                let r = 1.0 + 0.5 * (2.0 * u).sin() * v.sin();
                let p = spherical(r, u, v);
                Point3::new(p.x, p.y, p.z + 0.3 * (3.0 * u).sin())
            }
        }
    }

    /// Sample the surface on a `u_samples` x `v_samples` grid.
    ///
    /// Points are ordered with `v` as the outer loop and `u` as the inner one.
    pub fn sample_grid(&self, u_samples: usize, v_samples: usize) -> Vec<Point3<f64>> {
        let us = linspace(self.u_range(), u_samples);
        let vs = linspace(self.v_range(), v_samples);
        let mut points = Vec::with_capacity(us.len() * vs.len());
        for &v in &vs {
            for &u in &us {
                points.push(self.evaluate(u, v));
            }
        }
        points
    }
}

/// Radius-modulated sphere with `u` as azimuth and `v` as polar angle.
fn spherical(r: f64, u: f64, v: f64) -> Point3<f64> {
    Point3::new(r * v.sin() * u.cos(), r * v.sin() * u.sin(), r * v.cos())
}

/// Evenly spaced samples including both endpoints.
fn linspace((start, end): (f64, f64), n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
