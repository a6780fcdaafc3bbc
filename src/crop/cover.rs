use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Rect, Vec2};

/// User pan translation in destination-rectangle pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl PanOffset {
    /// No translation; the crop window stays centered.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Construct an offset.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, used to accumulate drag deltas.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Symmetric pan limits: offsets are valid within `[-max_x, max_x]` x `[-max_y, max_y]`.
///
/// Only the axis on which the cover-scaled photo overflows its slot has a non-zero range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanRange {
    /// Largest horizontal offset magnitude.
    pub max_x: f64,
    /// Largest vertical offset magnitude.
    pub max_y: f64,
}

impl PanRange {
    /// Clamp `pan` into range. Non-finite components collapse to zero.
    pub fn clamp(&self, pan: PanOffset) -> PanOffset {
        fn axis(v: f64, max: f64) -> f64 {
            if !v.is_finite() || max <= 0.0 {
                return 0.0;
            }
            v.clamp(-max, max)
        }
        PanOffset {
            x: axis(pan.x, self.max_x),
            y: axis(pan.y, self.max_y),
        }
    }

    /// Express `pan` as a fraction of this range, each axis in `[-1, 1]`.
    ///
    /// Fractions survive a change of output resolution; pixel offsets do not.
    pub fn to_fraction(&self, pan: PanOffset) -> PanOffset {
        let pan = self.clamp(pan);
        fn axis(v: f64, max: f64) -> f64 {
            if max <= 0.0 { 0.0 } else { v / max }
        }
        PanOffset {
            x: axis(pan.x, self.max_x),
            y: axis(pan.y, self.max_y),
        }
    }

    /// Pixel offset for `fraction` of this range; inverse of [`PanRange::to_fraction`].
    pub fn from_fraction(&self, fraction: PanOffset) -> PanOffset {
        fn axis(f: f64, max: f64) -> f64 {
            if !f.is_finite() || max <= 0.0 {
                return 0.0;
            }
            f.clamp(-1.0, 1.0) * max
        }
        PanOffset {
            x: axis(fraction.x, self.max_x),
            y: axis(fraction.y, self.max_y),
        }
    }
}

/// Result of a cover-fit crop: which part of the photo fills the destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverCrop {
    /// Crop window in source pixels; always inside the photo and with the destination's aspect.
    pub source: Rect,
    /// Limits for pan offsets on this photo/destination pair.
    pub pan_range: PanRange,
    /// The pan offset after clamping.
    pub pan: PanOffset,
    /// Destination pixels per source pixel.
    pub scale: f64,
}

/// Transform mapping the `source` window onto `dest`.
pub(crate) fn window_transform(source: Rect, dest: Rect) -> Affine {
    let sx = dest.width() / source.width();
    let sy = dest.height() / source.height();
    Affine::translate(Vec2::new(dest.x0, dest.y0))
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(Vec2::new(-source.x0, -source.y0))
}

/// Compute the cover-fit crop of a `natural_w` x `natural_h` photo into a `dest_w` x `dest_h`
/// destination.
///
/// The crop window keeps the destination's aspect ratio and uses the photo's full extent on the
/// tighter axis, so the blit fills the destination exactly without distortion. `pan` is clamped
/// against the returned [`PanRange`] before use; a positive offset moves the window towards the
/// photo's left/top edge. Returns `None` when any dimension is zero or non-finite.
pub fn cover_crop(
    natural_w: u32,
    natural_h: u32,
    dest_w: f64,
    dest_h: f64,
    pan: PanOffset,
) -> Option<CoverCrop> {
    if natural_w == 0 || natural_h == 0 {
        return None;
    }
    if !dest_w.is_finite() || !dest_h.is_finite() || dest_w <= 0.0 || dest_h <= 0.0 {
        return None;
    }

    let nw = f64::from(natural_w);
    let nh = f64::from(natural_h);
    let img_aspect = nw / nh;
    let dest_aspect = dest_w / dest_h;

    let (crop_w, crop_h) = if img_aspect > dest_aspect {
        ((nh * dest_aspect).min(nw), nh)
    } else {
        (nw, (nw / dest_aspect).min(nh))
    };

    let scale = dest_w / crop_w;
    let pan_range = PanRange {
        max_x: ((nw * scale - dest_w) / 2.0).max(0.0),
        max_y: ((nh * scale - dest_h) / 2.0).max(0.0),
    };
    let pan = pan_range.clamp(pan);

    let source_x = shifted_origin(nw, crop_w, pan.x, pan_range.max_x);
    let source_y = shifted_origin(nh, crop_h, pan.y, pan_range.max_y);

    Some(CoverCrop {
        source: Rect::new(source_x, source_y, source_x + crop_w, source_y + crop_h),
        pan_range,
        pan,
        scale,
    })
}

fn shifted_origin(natural: f64, crop: f64, pan: f64, max_move: f64) -> f64 {
    let slack = (natural - crop).max(0.0);
    let centered = slack / 2.0;
    if max_move <= 0.0 {
        return centered;
    }
    let max_shift = slack / 2.0;
    (centered - (pan / max_move) * max_shift).clamp(0.0, slack)
}

#[cfg(test)]
#[path = "../../tests/unit/crop/cover.rs"]
mod tests;
