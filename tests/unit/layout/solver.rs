use super::*;

fn grid_layout(border_width: f64) -> FrameLayout {
    FrameLayout {
        border_width,
        ..FrameLayout::default()
    }
}

fn uneven_layout() -> FrameLayout {
    FrameLayout {
        border_width: 12.0,
        slots: [
            SlotRect::new(0.0, 0.0, 0.3, 0.6),
            SlotRect::new(0.3, 0.0, 0.7, 0.6),
            SlotRect::new(0.0, 0.6, 0.55, 0.4),
            SlotRect::new(0.55, 0.6, 0.45, 0.4),
        ],
        ..FrameLayout::default()
    }
}

fn strips_layout() -> FrameLayout {
    FrameLayout {
        border_width: 7.0,
        slots: [
            SlotRect::new(0.0, 0.0, 1.0, 0.25),
            SlotRect::new(0.0, 0.25, 1.0, 0.25),
            SlotRect::new(0.0, 0.5, 1.0, 0.25),
            SlotRect::new(0.0, 0.75, 1.0, 0.25),
        ],
        ..FrameLayout::default()
    }
}

#[test]
fn canonical_canvas_matches_reference_values() {
    let geo = FrameGeometry::new(&grid_layout(15.0), 1200, 1600);
    assert_eq!(geo.border_px, 90.0);
    assert_eq!(geo.footer, Rect::new(0.0, 1472.0, 1200.0, 1600.0));
    assert_eq!(geo.interior, Rect::new(90.0, 90.0, 1110.0, 1472.0));

    assert_eq!(geo.slots[0], PixelRect::new(90, 90, 510, 691));
    assert_eq!(geo.slots[1], PixelRect::new(600, 90, 510, 691));
    assert_eq!(geo.slots[2], PixelRect::new(90, 781, 510, 691));
    assert_eq!(geo.slots[3].right(), 1110);
    assert_eq!(geo.slots[3].bottom(), 1472);
}

#[test]
fn resolve_slots_matches_geometry() {
    let layout = grid_layout(18.0);
    assert_eq!(
        resolve_slots(&layout, 400, 533),
        FrameGeometry::new(&layout, 400, 533).slots
    );
}

fn assert_tiles_interior(layout: &FrameLayout, w: u32, h: u32) {
    let geo = FrameGeometry::new(layout, w, h);
    let bounds = geo.interior_pixels();
    assert!(!bounds.is_empty(), "{w}x{h} interior should not be empty");

    for py in bounds.y..bounds.bottom() {
        for px in bounds.x..bounds.right() {
            assert!(
                geo.slots.iter().any(|s| s.contains(px, py)),
                "{w}x{h}: pixel ({px},{py}) not covered by any slot"
            );
        }
    }

    for s in &geo.slots {
        assert!(s.x >= bounds.x && s.right() <= bounds.right(), "{w}x{h}: {s:?} overflows");
        assert!(s.y >= bounds.y && s.bottom() <= bounds.bottom(), "{w}x{h}: {s:?} overflows");
    }

    for i in 0..geo.slots.len() {
        for j in (i + 1)..geo.slots.len() {
            let a = geo.slots[i];
            let b = geo.slots[j];
            let ow = a.right().min(b.right()).saturating_sub(a.x.max(b.x));
            let oh = a.bottom().min(b.bottom()).saturating_sub(a.y.max(b.y));
            assert!(
                ow <= 1 || oh <= 1,
                "{w}x{h}: slots {i} and {j} overlap by {ow}x{oh}"
            );
        }
    }
}

#[test]
fn slots_tile_interior_across_canvas_sizes() {
    let sizes = [(400, 533), (300, 400), (123, 457), (601, 333), (64, 85), (250, 251)];
    for layout in [grid_layout(15.0), grid_layout(18.5), uneven_layout(), strips_layout()] {
        for (w, h) in sizes {
            assert_tiles_interior(&layout, w, h);
        }
    }
}

#[test]
fn union_area_matches_interior_at_canonical_size() {
    let geo = FrameGeometry::new(&uneven_layout(), 2400, 3200);
    let bounds = geo.interior_pixels();
    let total: u64 = geo.slots.iter().map(|s| s.area()).sum();
    let mut overlap = 0u64;
    for i in 0..4 {
        for j in (i + 1)..4 {
            overlap += geo.slots[i].overlap_area(geo.slots[j]);
        }
    }
    // Overlaps are limited to one-pixel seams, so the union equals the interior exactly.
    let seam_budget = 4 * u64::from(bounds.width.max(bounds.height));
    assert!(overlap <= seam_budget);
    assert!(total - overlap <= bounds.area());
    assert!(total >= bounds.area());
}

#[test]
fn degenerate_canvases_yield_empty_slots() {
    for (w, h) in [(0, 0), (0, 100), (100, 0)] {
        let geo = FrameGeometry::new(&grid_layout(15.0), w, h);
        assert!(geo.slots.iter().all(|s| s.is_empty()), "{w}x{h}");
        assert!(geo.dividers.is_empty());
    }

    // Border consumes the full width.
    let geo = FrameGeometry::new(&grid_layout(100.0), 200, 300);
    assert!(geo.slots.iter().all(|s| s.is_empty()));
}

#[test]
fn grid_dividers_form_a_cross() {
    let geo = FrameGeometry::new(&grid_layout(15.0), 1200, 1600);
    assert_eq!(geo.dividers.len(), 4);
    assert!(geo.dividers.contains(&Line::new((600.0, 90.0), (600.0, 781.0))));
    assert!(geo.dividers.contains(&Line::new((600.0, 781.0), (600.0, 1472.0))));
    assert!(geo.dividers.contains(&Line::new((90.0, 781.0), (600.0, 781.0))));
    assert!(geo.dividers.contains(&Line::new((600.0, 781.0), (1110.0, 781.0))));
}

#[test]
fn strips_have_only_horizontal_dividers() {
    let geo = FrameGeometry::new(&strips_layout(), 600, 800);
    assert_eq!(geo.dividers.len(), 3);
    assert!(geo.dividers.iter().all(|l| l.p0.y == l.p1.y));
}

#[test]
fn divider_width_scales_with_canvas() {
    let mut layout = grid_layout(15.0);
    layout.divider_width = Some(10.0);
    let geo = FrameGeometry::new(&layout, 400, 533);
    assert_eq!(geo.divider_px, 20.0);
    assert_eq!(geo.border_px, 30.0);
}
