//! Render configuration derived from the capability class
//!
//! Only rendering cost varies with the class; framing (camera position and
//! field of view) is the same everywhere.

use crate::capability::CapabilityClass;

/// Fixed camera position, Y up
pub const CAMERA_POSITION: [f32; 3] = [20.0, 3.0, 5.0];
/// Vertical field of view in degrees
pub const CAMERA_FOV_DEGREES: f32 = 25.0;

pub const SPOT_LIGHT_POSITION: [f32; 3] = [-20.0, 50.0, 10.0];
/// Spot cone half-angle in radians
pub const SPOT_LIGHT_ANGLE: f32 = 0.12;

/// Clear colour of every scene surface, sRGBA. Fully transparent for every
/// class so the page background shows through.
pub const CLEAR_RGBA: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Damping factor used when camera damping is enabled
pub const DEFAULT_DAMPING_FACTOR: f32 = 0.05;

/// Whether the surface redraws every frame or only after input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoop {
    Continuous,
    OnDemand,
}

/// GPU adapter selection hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerPreference {
    LowPower,
    HighPerformance,
}

/// Light intensities in scene-relative units (1.0 = a plain white light)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub hemisphere: f32,
    pub spot: f32,
    pub point: f32,
}

impl Lighting {
    pub const REDUCED: Lighting = Lighting {
        hemisphere: 0.25,
        spot: 1.2,
        point: 0.8,
    };

    pub const NORMAL: Lighting = Lighting {
        hemisphere: 0.35,
        spot: 1.8,
        point: 1.2,
    };

    /// Everything dark, for a scene that has been torn down
    pub const OFF: Lighting = Lighting {
        hemisphere: 0.0,
        spot: 0.0,
        point: 0.0,
    };
}

/// Orbit camera damping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Damping {
    Disabled,
    Enabled { factor: f32 },
}

/// Everything the scene host needs to set up and drive the render surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfiguration {
    pub frame_loop: FrameLoop,
    pub pixel_ratio_ceiling: f32,
    pub antialias: bool,
    pub power_preference: PowerPreference,
    pub lighting: Lighting,
    pub damping: Damping,
}

impl RenderConfiguration {
    /// Derive the configuration for a capability class
    pub fn for_class(class: CapabilityClass) -> Self {
        if class.is_low_power_device() {
            Self {
                frame_loop: FrameLoop::OnDemand,
                pixel_ratio_ceiling: 1.0,
                antialias: false,
                power_preference: PowerPreference::LowPower,
                lighting: Lighting::REDUCED,
                damping: Damping::Disabled,
            }
        } else {
            Self {
                frame_loop: FrameLoop::Continuous,
                pixel_ratio_ceiling: 1.5,
                antialias: true,
                power_preference: PowerPreference::HighPerformance,
                lighting: Lighting::NORMAL,
                damping: Damping::Enabled {
                    factor: DEFAULT_DAMPING_FACTOR,
                },
            }
        }
    }

    /// Clamp the device pixel ratio into `[1, ceiling]`.
    ///
    /// Unusable readings (zero, negative, NaN) fall back to 1.
    pub fn effective_pixel_ratio(&self, device_pixel_ratio: f64) -> f32 {
        let ratio = device_pixel_ratio as f32;
        if !ratio.is_finite() || ratio <= 0.0 {
            return 1.0;
        }
        ratio.clamp(1.0, self.pixel_ratio_ceiling)
    }

    /// Physical size of the offscreen scene image for a logical viewport.
    ///
    /// The window keeps the browser's own pixel ratio; only the scene is drawn
    /// at the clamped ratio and then stretched over the canvas. Never zero.
    pub fn render_target_size(&self, logical_width: f32, logical_height: f32, device_pixel_ratio: f64) -> [u32; 2] {
        let ratio = self.effective_pixel_ratio(device_pixel_ratio);
        let scale = |logical: f32| {
            if logical.is_finite() && logical > 0.0 {
                ((logical * ratio).round() as u32).max(1)
            } else {
                1
            }
        };
        [scale(logical_width), scale(logical_height)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn low_power() -> RenderConfiguration {
        RenderConfiguration::for_class(CapabilityClass::new(true, false))
    }

    fn desktop() -> RenderConfiguration {
        RenderConfiguration::for_class(CapabilityClass::new(false, false))
    }

    #[test]
    fn test_low_power_configuration() {
        let config = low_power();
        assert!(!config.antialias);
        assert_eq!(config.pixel_ratio_ceiling, 1.0);
        assert_eq!(config.frame_loop, FrameLoop::OnDemand);
        assert_eq!(config.damping, Damping::Disabled);
        assert_eq!(config.power_preference, PowerPreference::LowPower);
    }

    #[test]
    fn test_default_configuration() {
        let config = desktop();
        assert!(config.antialias);
        assert_eq!(config.pixel_ratio_ceiling, 1.5);
        assert_eq!(config.frame_loop, FrameLoop::Continuous);
        assert_eq!(config.damping, Damping::Enabled { factor: 0.05 });
        assert_eq!(config.power_preference, PowerPreference::HighPerformance);
    }

    #[test]
    fn test_android_alone_selects_low_power() {
        let config = RenderConfiguration::for_class(CapabilityClass::new(false, true));
        assert_eq!(config, low_power());
    }

    #[test]
    fn test_light_intensities_within_ranges() {
        let reduced = low_power().lighting;
        assert!((0.1..=0.35).contains(&reduced.hemisphere));
        assert!((1.0..=1.5).contains(&reduced.spot));
        assert!((0.7..=1.0).contains(&reduced.point));

        let normal = desktop().lighting;
        assert!((0.15..=0.5).contains(&normal.hemisphere));
        assert!((1.5..=2.0).contains(&normal.spot));
        assert!((1.0..=1.5).contains(&normal.point));

        assert!(reduced.hemisphere < normal.hemisphere);
        assert!(reduced.spot < normal.spot);
        assert!(reduced.point < normal.point);
    }

    #[test]
    fn test_pixel_ratio_clamping() {
        assert_eq!(low_power().effective_pixel_ratio(3.0), 1.0);
        assert_eq!(low_power().effective_pixel_ratio(1.0), 1.0);
        assert_eq!(desktop().effective_pixel_ratio(2.0), 1.5);
        assert_eq!(desktop().effective_pixel_ratio(1.25), 1.25);
        assert_eq!(desktop().effective_pixel_ratio(0.5), 1.0);
        assert_eq!(desktop().effective_pixel_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn test_clear_colour_is_transparent() {
        assert_eq!(CLEAR_RGBA[3], 0.0);
    }

    #[test]
    fn test_render_target_size_follows_ceiling() {
        // A 3x phone renders at one physical pixel per logical pixel
        assert_eq!(low_power().render_target_size(390.0, 844.0, 3.0), [390, 844]);
        // A 2x laptop is capped at 1.5
        assert_eq!(desktop().render_target_size(1280.0, 720.0, 2.0), [1920, 1080]);
        assert_eq!(desktop().render_target_size(1280.0, 720.0, 1.0), [1280, 720]);
    }

    #[test]
    fn test_render_target_size_never_zero() {
        assert_eq!(desktop().render_target_size(0.0, 0.0, 2.0), [1, 1]);
        assert_eq!(desktop().render_target_size(f32::NAN, -5.0, 2.0), [1, 1]);
        assert_eq!(low_power().render_target_size(0.4, 300.0, 1.0), [1, 300]);
    }

    #[test]
    fn test_rebuilt_not_mutated() {
        let class = CapabilityClass::new(false, false);
        let before = RenderConfiguration::for_class(class);
        let after = RenderConfiguration::for_class(class.with_narrow_viewport(true));
        assert_ne!(before, after);
        assert_eq!(before, desktop());
    }
}
