//! Constrained, damped orbit around a target.
//!
//! The eye sits on a sphere around the target: azimuth `theta` is measured
//! around +Y from +Z, polar `phi` down from +Y. Rotation input accumulates
//! into a pending delta; each [`OrbitControls::update`] applies the damping
//! fraction of that delta, clamps the result into the allowed window and
//! decays what remains.

use std::f32::consts::PI;

use glam::Vec3;

use super::core::Camera;
use crate::options::CameraOptions;

const EPS: f32 = 1e-6;

/// Spherical coordinates relative to the orbit target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the target.
    pub radius: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    /// Azimuth around +Y, zero along +Z.
    pub theta: f32,
}

impl Spherical {
    /// Coordinates of `offset`.
    #[must_use]
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPS {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Cartesian offset.
    #[must_use]
    pub fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Orbit camera controls with angle windows, fixed distance and damping.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    target: Vec3,
    azimuth: (f32, f32),
    polar: (f32, f32),
    distance: (f32, f32),
    damping: f32,
    rotate_speed: f32,
    enable_zoom: bool,
    enable_pan: bool,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl OrbitControls {
    /// Controls configured from `options`, targeting the origin.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            target: Vec3::ZERO,
            azimuth: sorted(options.min_azimuth, options.max_azimuth),
            polar: sorted(options.min_polar, options.max_polar),
            distance: (options.distance, options.distance),
            damping: options.damping.clamp(EPS, 1.0),
            rotate_speed: options.rotate_speed,
            enable_zoom: options.enable_zoom,
            enable_pan: options.enable_pan,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    /// Orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Move the orbit target. Takes effect on the next update.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Allowed polar window, lower bound first.
    #[must_use]
    pub fn polar_window(&self) -> (f32, f32) {
        self.polar
    }

    /// Allowed azimuth window, lower bound first.
    #[must_use]
    pub fn azimuth_window(&self) -> (f32, f32) {
        self.azimuth
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels on a
    /// viewport `height` pixels tall.
    pub fn rotate(&mut self, dx: f32, dy: f32, height: f32) {
        let height = height.max(1.0);
        self.rotate_by(
            2.0 * PI * dx / height * self.rotate_speed,
            2.0 * PI * dy / height * self.rotate_speed,
        );
    }

    /// Queue a rotation in radians.
    pub fn rotate_by(&mut self, left: f32, up: f32) {
        self.delta_theta -= left;
        self.delta_phi -= up;
    }

    /// Queue a zoom by `factor` (>1 moves closer). Ignored when zoom is
    /// disabled.
    pub fn zoom(&mut self, factor: f32) {
        if !self.enable_zoom || factor <= 0.0 {
            log::debug!("zoom ignored");
            return;
        }
        self.scale /= factor;
    }

    /// Pan the target by a world-space offset. Ignored when panning is
    /// disabled.
    pub fn pan(&mut self, offset: Vec3) {
        if !self.enable_pan {
            log::debug!("pan ignored");
            return;
        }
        self.target += offset;
    }

    /// Whether rotation input is still being applied.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > EPS || self.delta_phi.abs() > EPS
    }

    /// Apply damped input and constraints to `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        let mut s = Spherical::from_offset(camera.eye - self.target);

        s.theta += self.delta_theta * self.damping;
        s.phi += self.delta_phi * self.damping;

        s.theta = s.theta.clamp(self.azimuth.0, self.azimuth.1);
        s.phi = s.phi.clamp(self.polar.0, self.polar.1).clamp(EPS, PI - EPS);
        s.radius = (s.radius * self.scale).clamp(self.distance.0, self.distance.1);

        camera.eye = self.target + s.to_offset();
        camera.target = self.target;

        self.delta_theta *= 1.0 - self.damping;
        self.delta_phi *= 1.0 - self.damping;
        self.scale = 1.0;
    }
}

fn sorted(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, Camera) {
        let opts = CameraOptions::default();
        (OrbitControls::new(&opts), Camera::new(&opts, 1.5))
    }

    #[test]
    fn inverted_polar_bounds_are_sorted() {
        let (controls, _) = setup();
        let (lo, hi) = controls.polar_window();
        assert!(lo < hi);
        assert!((lo - PI / 2.15).abs() < 1e-6);
        assert!((hi - PI / 2.05).abs() < 1e-6);
    }

    #[test]
    fn distance_is_fixed_and_angles_stay_in_window() {
        let (mut controls, mut camera) = setup();
        controls.set_target(Vec3::new(0.0, 1.1, 0.6));
        controls.rotate_by(10.0, -10.0);
        for _ in 0..500 {
            controls.update(&mut camera);
            let s = Spherical::from_offset(camera.eye - controls.target());
            assert!((s.radius - 3.6).abs() < 1e-3);
            assert!(s.theta >= -1.0 - 1e-4 && s.theta <= 0.05 + 1e-4);
            assert!(s.phi >= PI / 2.15 - 1e-4 && s.phi <= PI / 2.05 + 1e-4);
        }
        assert_eq!(camera.target, Vec3::new(0.0, 1.1, 0.6));
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let (mut controls, mut camera) = setup();
        controls.update(&mut camera);
        let start = Spherical::from_offset(camera.eye).theta;
        controls.rotate_by(0.5, 0.0);
        controls.update(&mut camera);
        let first = Spherical::from_offset(camera.eye).theta;
        assert!(((start - first) - 0.5 * 0.05).abs() < 1e-4);
        assert!(controls.is_moving());
        for _ in 0..400 {
            controls.update(&mut camera);
        }
        assert!(!controls.is_moving());
    }

    #[test]
    fn zoom_and_pan_are_disabled() {
        let (mut controls, mut camera) = setup();
        controls.zoom(2.0);
        controls.pan(Vec3::X);
        controls.update(&mut camera);
        assert_eq!(controls.target(), Vec3::ZERO);
        assert!((camera.eye.length() - 3.6).abs() < 1e-4);
    }

    #[test]
    fn spherical_round_trip_matches_axes() {
        let s = Spherical::from_offset(Vec3::new(0.0, 0.0, 2.0));
        assert!((s.phi - PI / 2.0).abs() < 1e-6);
        assert!(s.theta.abs() < 1e-6);
        let v = Spherical {
            radius: 1.0,
            phi: PI / 2.0,
            theta: PI / 2.0,
        }
        .to_offset();
        assert!((v - Vec3::X).length() < 1e-5);
    }
}
