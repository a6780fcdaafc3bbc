use super::*;

fn solid_photo(w: u32, h: u32, rgba: [u8; 4]) -> PhotoBuffer {
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        bytes.extend_from_slice(&rgba);
    }
    PhotoBuffer::from_rgba8(w, h, bytes).unwrap()
}

#[test]
fn canvas_rejects_oversized_and_empty_surfaces() {
    assert!(CpuCanvas::new(70_000, 10).is_err());
    assert!(CpuCanvas::new(10, 0).is_err());
    assert!(CpuCanvas::new(10, 10).is_ok());
}

#[test]
fn fill_rect_on_pixel_grid_is_exact() {
    let mut canvas = CpuCanvas::new(8, 8).unwrap();
    canvas.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::WHITE);
    canvas.fill_rect(Rect::new(2.0, 2.0, 6.0, 6.0), Color::rgb(255, 0, 0));
    let s = canvas.finish();
    assert_eq!(s.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(2, 2), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(5, 5), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(6, 6), Some([255, 255, 255, 255]));
}

#[test]
fn undrawn_pixels_are_transparent() {
    let s = CpuCanvas::new(2, 2).unwrap().finish();
    assert!(s.data.iter().all(|&b| b == 0));
}

#[test]
fn draw_image_stays_inside_destination() {
    let photo = solid_photo(40, 20, [0, 0, 255, 255]);
    let mut canvas = CpuCanvas::new(16, 16).unwrap();
    canvas.fill_rect(Rect::new(0.0, 0.0, 16.0, 16.0), Color::WHITE);
    canvas
        .draw_image(
            &photo,
            Rect::new(10.0, 0.0, 30.0, 20.0),
            Rect::new(4.0, 4.0, 12.0, 12.0),
        )
        .unwrap();
    let s = canvas.finish();
    assert_eq!(s.pixel(3, 8), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(12, 8), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(8, 3), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(8, 8), Some([0, 0, 255, 255]));
}

#[test]
fn draw_image_skips_empty_destination_and_rejects_empty_source() {
    let photo = solid_photo(2, 2, [1, 2, 3, 255]);
    let mut canvas = CpuCanvas::new(4, 4).unwrap();
    assert!(
        canvas
            .draw_image(&photo, Rect::ZERO, Rect::new(1.0, 1.0, 1.0, 3.0))
            .is_ok()
    );
    assert!(
        canvas
            .draw_image(&photo, Rect::ZERO, Rect::new(0.0, 0.0, 2.0, 2.0))
            .is_err()
    );
}

#[test]
fn star_path_has_ten_vertices_and_points_up() {
    let star = star_path(Point::new(50.0, 50.0), 10.0, 4.0);
    let verts: Vec<_> = star
        .elements()
        .iter()
        .filter_map(|el| match el {
            kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(verts.len(), 10);
    assert!((verts[0].x - 50.0).abs() < 1e-9);
    assert!((verts[0].y - 40.0).abs() < 1e-9);
}

#[test]
fn stroke_rect_paints_the_edge() {
    let mut canvas = CpuCanvas::new(20, 20).unwrap();
    canvas.fill_rect(Rect::new(0.0, 0.0, 20.0, 20.0), Color::WHITE);
    canvas.stroke_rect(Rect::new(2.0, 2.0, 18.0, 18.0), 4.0, Color::rgb(0, 0, 0));
    let s = canvas.finish();
    assert_eq!(s.pixel(0, 10), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(10, 10), Some([255, 255, 255, 255]));
}

#[test]
fn draw_text_spreads_glyphs_along_the_baseline_inside_the_line_box() {
    let mut fonts = crate::assets::text::FontLibrary::new();
    fonts
        .add_font(std::fs::read("tests/data/fonts/Tuffy.ttf").unwrap())
        .unwrap();
    let black = crate::assets::text::TextBrushRgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
    let line = fonts.layout_line("HHHHHH", "Tuffy", 20.0, black).unwrap().unwrap();

    let mut canvas = CpuCanvas::new(200, 60).unwrap();
    canvas.fill_rect(Rect::new(0.0, 0.0, 200.0, 60.0), Color::WHITE);
    canvas.draw_text(&line, Point::new(10.0, 10.0));
    let s = canvas.finish();

    let mut dark = Vec::new();
    for y in 0..s.height {
        for x in 0..s.width {
            if s.pixel(x, y).is_some_and(|p| p[0] < 128) {
                dark.push((f64::from(x), f64::from(y)));
            }
        }
    }
    assert!(!dark.is_empty());
    let min_x = dark.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = dark.iter().map(|p| p.0).fold(0.0, f64::max);
    let min_y = dark.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = dark.iter().map(|p| p.1).fold(0.0, f64::max);

    assert!(max_x - min_x > 0.6 * line.width());
    assert!(min_x >= 9.0 && max_x <= 11.0 + line.width());
    assert!(min_y >= 9.0 && max_y <= 11.0 + line.height());
}
