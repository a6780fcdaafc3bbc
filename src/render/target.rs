use serde::{Deserialize, Serialize};

use crate::foundation::error::{FourcutError, FourcutResult};

/// Logical width of the canonical composite.
pub const CANONICAL_WIDTH: u32 = 1200;
/// Logical height of the canonical composite.
pub const CANONICAL_HEIGHT: u32 = 1600;
/// Largest surface edge the raster backend accepts.
pub const MAX_SURFACE_DIM: u32 = u16::MAX as u32;

/// Output resolution for one compose call.
///
/// Final renders use the canonical 1200x1600 logical size scaled by the device pixel ratio, so
/// the exported image does not depend on the viewport. Previews re-run the same pipeline at a
/// smaller size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderTarget {
    /// Logical width.
    pub logical_width: u32,
    /// Logical height.
    pub logical_height: u32,
    /// Pixels per logical unit.
    pub device_pixel_scale: f64,
}

impl RenderTarget {
    /// Validated target.
    pub fn new(logical_width: u32, logical_height: u32, device_pixel_scale: f64) -> FourcutResult<Self> {
        let target = Self {
            logical_width,
            logical_height,
            device_pixel_scale,
        };
        target.validate()?;
        Ok(target)
    }

    /// Canonical print-resolution target.
    pub fn canonical(device_pixel_scale: f64) -> FourcutResult<Self> {
        Self::new(CANONICAL_WIDTH, CANONICAL_HEIGHT, device_pixel_scale)
    }

    /// Preview target `width` pixels wide with the canonical 3:4 aspect.
    pub fn preview(width: u32) -> FourcutResult<Self> {
        let height = (f64::from(width) * f64::from(CANONICAL_HEIGHT) / f64::from(CANONICAL_WIDTH))
            .round() as u32;
        Self::new(width, height, 1.0)
    }

    /// Output raster size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            scaled(self.logical_width, self.device_pixel_scale),
            scaled(self.logical_height, self.device_pixel_scale),
        )
    }

    /// Check that the target describes a surface the backend can allocate.
    pub fn validate(&self) -> FourcutResult<()> {
        if self.logical_width == 0 || self.logical_height == 0 {
            return Err(FourcutError::validation("render target size must be > 0"));
        }
        if !self.device_pixel_scale.is_finite() || self.device_pixel_scale <= 0.0 {
            return Err(FourcutError::validation(
                "devicePixelScale must be finite and > 0",
            ));
        }
        let (w, h) = self.pixel_size();
        if w == 0 || h == 0 || w > MAX_SURFACE_DIM || h > MAX_SURFACE_DIM {
            return Err(FourcutError::validation(format!(
                "render target pixel size {w}x{h} is outside 1..={MAX_SURFACE_DIM}"
            )));
        }
        Ok(())
    }
}

fn scaled(logical: u32, scale: f64) -> u32 {
    let px = (f64::from(logical) * scale).round();
    if px >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        px as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
