use std::f64::consts::TAU;

/// Radii below this always get the minimum fragment count.
const GRID_FINE: f64 = 1.0 / 1_048_576.0;

/// Scene-level resolution settings for round shapes.
///
/// Mirrors the `$fn`, `$fa` and `$fs` variables of SCAD-like scene
/// descriptions. The count is only a hint stored on each circle; the
/// tessellator that consumes it decides how to honour it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentParams {
    /// Fixed fragment count; `0` derives it from the angle and size limits.
    pub fragments: u32,
    /// Maximum angle in degrees covered by one fragment.
    pub min_angle_deg: f64,
    /// Maximum length of one fragment.
    pub min_size: f64,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            fragments: 0,
            min_angle_deg: 12.0,
            min_size: 2.0,
        }
    }
}

impl SegmentParams {
    /// Number of fragments to approximate a full circle of `radius` with.
    #[must_use]
    pub fn segments(&self, radius: f64) -> u32 {
        if radius < GRID_FINE {
            return 3;
        }
        if self.fragments > 0 {
            return self.fragments.max(3);
        }
        let by_angle = 360.0 / self.min_angle_deg;
        let by_size = radius * TAU / self.min_size;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = by_angle.min(by_size).ceil() as u32;
        n.max(5)
    }
}
