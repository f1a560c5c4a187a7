//! Fundamental geometric and simulation types.
//!
//! Simulation math uses a Z-up convention (theta measured from +Z). World
//! positions are stored in display coordinates (Y up); `from_gl` / `to_gl`
//! remap between the two.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Point in spherical coordinates.
///
/// `theta` (colatitude) always lies in [0, π] and `phi` (longitude) in
/// [0, 2π). Angles only change through [`SphericalVector::add_theta`] and
/// [`SphericalVector::add_phi`], which renormalize both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SphericalVector {
    radius: f64,
    theta: f64,
    phi: f64,
}

impl SphericalVector {
    pub fn new(radius: f64, theta: f64, phi: f64) -> Self {
        let mut v = Self { radius, theta, phi };
        v.regularize();
        v
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    pub fn add_theta(&mut self, delta: f64) -> &mut Self {
        self.theta += delta;
        self.regularize();
        self
    }

    pub fn add_phi(&mut self, delta: f64) -> &mut Self {
        self.phi += delta;
        self.regularize();
        self
    }

    /// Crossing a pole reflects theta back into range and moves phi to the
    /// opposite meridian.
    fn regularize(&mut self) {
        let mut theta = self.theta.rem_euclid(TAU);
        if theta > PI {
            theta = TAU - theta;
            self.phi += PI;
        }
        self.theta = theta;
        self.phi = wrap_angle(self.phi);
    }
}

/// Wrap an angle into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Display coordinates (Y up) to simulation coordinates (Z up).
pub fn from_gl(v: DVec3) -> DVec3 {
    DVec3::new(v.z, v.x, v.y)
}

/// Simulation coordinates (Z up) to display coordinates (Y up).
pub fn to_gl(v: DVec3) -> DVec3 {
    DVec3::new(v.y, v.z, v.x)
}

/// Near-zero vectors map to theta = 0.
pub fn cartesian_to_spherical(v: DVec3) -> SphericalVector {
    let radius = v.length();
    let theta = if radius > 1e-6 {
        (v.z / radius).clamp(-1.0, 1.0).acos()
    } else {
        0.0
    };
    SphericalVector::new(radius, theta, v.y.atan2(v.x))
}

pub fn spherical_to_cartesian(s: &SphericalVector) -> DVec3 {
    let (sin_theta, cos_theta) = s.theta.sin_cos();
    let (sin_phi, cos_phi) = s.phi.sin_cos();
    DVec3::new(
        s.radius * sin_theta * cos_phi,
        s.radius * sin_theta * sin_phi,
        s.radius * cos_theta,
    )
}

/// Spherical coordinates straight to a display-space position.
pub fn spherical_to_gl(s: &SphericalVector) -> DVec3 {
    to_gl(spherical_to_cartesian(s))
}

/// Display-space position straight to spherical coordinates.
pub fn gl_to_spherical(v: DVec3) -> SphericalVector {
    cartesian_to_spherical(from_gl(v))
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
