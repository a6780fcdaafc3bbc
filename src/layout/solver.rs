use kurbo::Line;

use crate::{
    foundation::core::{PixelRect, Rect},
    foundation::math::reference_scale,
    layout::frame::{FrameLayout, SLOT_COUNT, SlotRect},
};

/// Absolute geometry of a frame at one canvas size.
///
/// All values are in output pixels. The interior is the region inside the border and above the
/// footer band; slots are resolved against it and tile it without gaps.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGeometry {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Multiplier from reference units to pixels.
    pub scale: f64,
    /// Outer border stroke width in pixels.
    pub border_px: f64,
    /// Divider stroke width in pixels.
    pub divider_px: f64,
    /// Interior area (may be zero-sized on degenerate canvases).
    pub interior: Rect,
    /// Footer band.
    pub footer: Rect,
    /// Resolved slot rectangles in slot order.
    pub slots: [PixelRect; SLOT_COUNT],
    /// Divider segments along internal slot edges.
    pub dividers: Vec<Line>,
}

impl FrameGeometry {
    /// Resolve `layout` for a `width_px` x `height_px` canvas.
    pub fn new(layout: &FrameLayout, width_px: u32, height_px: u32) -> Self {
        let w = f64::from(width_px);
        let h = f64::from(height_px);
        let scale = reference_scale(w);
        let border_px = layout.border_width * scale;
        let footer_px = h * layout.footer_height_ratio;

        let interior = interior_rect(w, h, border_px, footer_px);
        let bounds = pixel_bounds(interior, width_px, height_px);
        let slots = layout
            .slots
            .map(|slot| resolve_slot(&slot, interior, bounds));
        let dividers = divider_segments(&layout.slots, interior);

        tracing::debug!(
            width_px,
            height_px,
            border_px,
            footer_px,
            ?slots,
            "resolved frame geometry"
        );

        Self {
            canvas_width: width_px,
            canvas_height: height_px,
            scale,
            border_px,
            divider_px: layout.divider_width() * scale,
            interior,
            footer: Rect::new(0.0, (h - footer_px).max(0.0), w, h),
            slots,
            dividers,
        }
    }

    /// Integer pixel bounds that the slots tile.
    pub fn interior_pixels(&self) -> PixelRect {
        pixel_bounds(self.interior, self.canvas_width, self.canvas_height)
    }
}

/// Resolve the four slot rectangles of `layout` for a canvas of the given size.
///
/// Slots that touch the interior's right or bottom edge are snapped to it, origins round down and
/// far edges round up, so neighbouring slots share at most a one-pixel seam and never leave a gap.
/// Degenerate canvases yield zero-area rectangles which callers skip.
pub fn resolve_slots(layout: &FrameLayout, width_px: u32, height_px: u32) -> [PixelRect; SLOT_COUNT] {
    FrameGeometry::new(layout, width_px, height_px).slots
}

fn interior_rect(w: f64, h: f64, border_px: f64, footer_px: f64) -> Rect {
    let x0 = border_px.min(w);
    let y0 = border_px.min(h);
    let x1 = (w - border_px).max(x0);
    let y1 = (h - footer_px).max(y0);
    Rect::new(x0, y0, x1, y1)
}

fn pixel_bounds(interior: Rect, width_px: u32, height_px: u32) -> PixelRect {
    let left = interior.x0.floor().max(0.0) as u32;
    let top = interior.y0.floor().max(0.0) as u32;
    let right = (interior.x1.ceil() as u32).min(width_px);
    let bottom = (interior.y1.ceil() as u32).min(height_px);
    if interior.width() <= 0.0 || interior.height() <= 0.0 {
        return PixelRect::new(left, top, 0, 0);
    }
    PixelRect::from_edges(left, top, right, bottom)
}

fn resolve_slot(slot: &SlotRect, interior: Rect, bounds: PixelRect) -> PixelRect {
    if bounds.is_empty() {
        return PixelRect::new(bounds.x, bounds.y, 0, 0);
    }
    let iw = interior.width();
    let ih = interior.height();

    let mut left = interior.x0 + slot.x * iw;
    let mut top = interior.y0 + slot.y * ih;
    let mut right = left + slot.width * iw;
    let mut bottom = top + slot.height * ih;

    if slot.at_origin() {
        left = interior.x0;
        top = interior.y0;
    }
    if slot.reaches_right() {
        right = interior.x1;
    }
    if slot.reaches_bottom() {
        bottom = interior.y1;
    }

    // Origin rounds down and the far edge rounds up; both are then held inside the interior.
    let lo_x = f64::from(bounds.x);
    let hi_x = f64::from(bounds.right());
    let lo_y = f64::from(bounds.y);
    let hi_y = f64::from(bounds.bottom());
    let px_left = left.floor().clamp(lo_x, hi_x);
    let px_top = top.floor().clamp(lo_y, hi_y);
    let px_right = right.ceil().clamp(px_left, hi_x);
    let px_bottom = bottom.ceil().clamp(px_top, hi_y);

    PixelRect::from_edges(
        px_left as u32,
        px_top as u32,
        px_right as u32,
        px_bottom as u32,
    )
}

fn divider_segments(slots: &[SlotRect; SLOT_COUNT], interior: Rect) -> Vec<Line> {
    let mut out = Vec::<Line>::new();
    if interior.width() <= 0.0 || interior.height() <= 0.0 {
        return out;
    }
    let iw = interior.width();
    let ih = interior.height();
    let edge_x = |f: f64| interior.x0 + f * iw;
    let edge_y = |f: f64| interior.y0 + f * ih;

    for slot in slots {
        if slot.width <= 0.0 || slot.height <= 0.0 {
            continue;
        }
        let top = edge_y(slot.y);
        let bottom = if slot.reaches_bottom() {
            interior.y1
        } else {
            edge_y(slot.y + slot.height)
        };
        let left = edge_x(slot.x);
        let right = if slot.reaches_right() {
            interior.x1
        } else {
            edge_x(slot.x + slot.width)
        };

        if !slot.reaches_right() {
            push_unique(&mut out, Line::new((right, top), (right, bottom)));
        }
        if !slot.reaches_bottom() {
            push_unique(&mut out, Line::new((left, bottom), (right, bottom)));
        }
    }
    out
}

fn push_unique(out: &mut Vec<Line>, line: Line) {
    if !out.contains(&line) {
        out.push(line);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
