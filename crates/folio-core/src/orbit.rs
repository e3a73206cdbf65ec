//! Orbit camera with locked elevation
//!
//! The camera circles the target on a horizontal ring: azimuth is free, the
//! polar angle is pinned at π/2 and the radius never changes (no zoom).
//! Coordinates are Y-up.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::render_config::Damping;

/// Rotation below this is treated as settled
const SETTLE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    azimuth: f32,
    radius: f32,
    target: [f32; 3],
    pending_azimuth: f32,
    damping: Damping,
    rotate_speed: f32,
}

impl OrbitController {
    /// Start from a camera position looking at `target`. The radius is the full
    /// 3D distance; the polar lock then moves the camera onto the horizontal ring.
    pub fn new(position: [f32; 3], target: [f32; 3], damping: Damping) -> Self {
        let dx = position[0] - target[0];
        let dy = position[1] - target[1];
        let dz = position[2] - target[2];
        Self {
            azimuth: dx.atan2(dz),
            radius: (dx * dx + dy * dy + dz * dz).sqrt(),
            target,
            pending_azimuth: 0.0,
            damping,
            rotate_speed: 1.0,
        }
    }

    /// Fixed polar angle (radians from +Y)
    pub fn polar(&self) -> f32 {
        FRAC_PI_2
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> [f32; 3] {
        self.target
    }

    pub fn set_damping(&mut self, damping: Damping) {
        self.damping = damping;
    }

    /// Queue a horizontal drag of `delta_x` pixels on a viewport `viewport_height` tall.
    /// Vertical drag is ignored because elevation is locked.
    pub fn drag(&mut self, delta_x: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_azimuth -= 2.0 * PI * delta_x / viewport_height * self.rotate_speed;
    }

    /// Advance one frame. Returns true while the camera is still moving.
    pub fn update(&mut self) -> bool {
        if self.pending_azimuth.abs() < SETTLE_EPSILON {
            self.pending_azimuth = 0.0;
            return false;
        }

        match self.damping {
            Damping::Enabled { factor } => {
                self.azimuth += self.pending_azimuth * factor;
                self.pending_azimuth *= 1.0 - factor;
            }
            Damping::Disabled => {
                self.azimuth += self.pending_azimuth;
                self.pending_azimuth = 0.0;
            }
        }
        self.azimuth = self.azimuth.rem_euclid(2.0 * PI);
        true
    }

    /// Camera position on the ring
    pub fn position(&self) -> [f32; 3] {
        let polar = self.polar();
        [
            self.target[0] + self.radius * polar.sin() * self.azimuth.sin(),
            self.target[1] + self.radius * polar.cos(),
            self.target[2] + self.radius * polar.sin() * self.azimuth.cos(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_config::{CAMERA_POSITION, DEFAULT_DAMPING_FACTOR};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_radius_keeps_full_distance_and_elevation_is_locked() {
        let orbit = OrbitController::new(CAMERA_POSITION, [0.0; 3], Damping::Disabled);
        let position = orbit.position();
        assert!(approx(position[1], 0.0));
        let expected = (20.0f32 * 20.0 + 3.0 * 3.0 + 5.0 * 5.0).sqrt();
        assert!(approx(orbit.radius(), expected));
        // Height is not discarded
        assert!(orbit.radius() > (20.0f32 * 20.0 + 5.0 * 5.0).sqrt() + 0.1);
    }

    #[test]
    fn test_undamped_rotation_applies_immediately() {
        let mut orbit = OrbitController::new([0.0, 0.0, 10.0], [0.0; 3], Damping::Disabled);
        orbit.drag(-100.0, 400.0);
        assert!(orbit.update());
        assert!(approx(orbit.azimuth(), FRAC_PI_2));
        assert!(!orbit.update());

        let position = orbit.position();
        assert!(approx(position[0], 10.0));
        assert!(approx(position[1], 0.0));
        assert!(approx(position[2], 0.0));
    }

    #[test]
    fn test_damped_rotation_eases_in() {
        let damping = Damping::Enabled {
            factor: DEFAULT_DAMPING_FACTOR,
        };
        let mut orbit = OrbitController::new([0.0, 0.0, 10.0], [0.0; 3], damping);
        orbit.drag(-100.0, 400.0);

        assert!(orbit.update());
        assert!(approx(orbit.azimuth(), FRAC_PI_2 * DEFAULT_DAMPING_FACTOR));

        let mut frames = 1;
        while orbit.update() {
            frames += 1;
            assert!(frames < 1000, "damping never settled");
        }
        assert!(orbit.azimuth() < FRAC_PI_2);
        assert!(approx(orbit.azimuth(), FRAC_PI_2) || (FRAC_PI_2 - orbit.azimuth()) < 1e-2);
    }

    #[test]
    fn test_radius_never_changes() {
        let mut orbit = OrbitController::new(CAMERA_POSITION, [0.0; 3], Damping::Disabled);
        let radius = orbit.radius();
        for _ in 0..10 {
            orbit.drag(37.0, 300.0);
            orbit.update();
        }
        let p = orbit.position();
        assert!(approx((p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt(), radius));
    }

    #[test]
    fn test_zero_height_viewport_ignored() {
        let mut orbit = OrbitController::new(CAMERA_POSITION, [0.0; 3], Damping::Disabled);
        orbit.drag(50.0, 0.0);
        assert!(!orbit.update());
    }
}
