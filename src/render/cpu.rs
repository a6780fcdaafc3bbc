use std::sync::Arc;

use crate::{
    assets::{photo::PhotoBuffer, text::TextLine},
    crop::cover::window_transform,
    foundation::core::{Affine, BezPath, Point, Rect},
    foundation::error::{FourcutError, FourcutResult},
    layout::color::Color,
    render::surface::RasterSurface,
};

/// Thin drawing layer over a `vello_cpu` render context sized to one surface.
pub(crate) struct CpuCanvas {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl CpuCanvas {
    pub(crate) fn new(width: u32, height: u32) -> FourcutResult<Self> {
        let width: u16 = width
            .try_into()
            .map_err(|_| FourcutError::render("surface width exceeds u16"))?;
        let height: u16 = height
            .try_into()
            .map_err(|_| FourcutError::render("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(FourcutError::render("surface must be at least 1x1"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
        })
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.set_paint(color.to_peniko());
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.set_paint(color.to_peniko());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke an open or closed path with mitered joins and butt caps.
    pub(crate) fn stroke_path(&mut self, path: &BezPath, width: f64, color: Color) {
        if width <= 0.0 {
            return;
        }
        self.reset_transforms(Affine::IDENTITY);
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_join(vello_cpu::kurbo::Join::Miter)
                .with_caps(vello_cpu::kurbo::Cap::Butt),
        );
        self.ctx.set_paint(color.to_peniko());
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) {
        use kurbo::Shape as _;
        self.stroke_path(&rect.to_path(0.1), width, color);
    }

    /// Draw `photo` so that `source` (photo pixels) lands on `dest` (surface pixels).
    ///
    /// Only the mapped source window is filled, so nothing outside `dest` is touched.
    pub(crate) fn draw_image(&mut self, photo: &PhotoBuffer, source: Rect, dest: Rect) -> FourcutResult<()> {
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        if source.width() <= 0.0 || source.height() <= 0.0 {
            return Err(FourcutError::render("image source window is empty"));
        }
        let transform = window_transform(source, dest);

        let paint = image_paint(photo)?;
        self.reset_transforms(transform);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&rect_to_cpu(source));
        Ok(())
    }

    /// Draw a shaped line with its line box's top-left corner at `origin`.
    pub(crate) fn draw_text(&mut self, line: &TextLine, origin: Point) {
        self.reset_transforms(Affine::translate((origin.x, origin.y)));

        for layout_line in line.layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&line.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far; undrawn pixels stay transparent.
    pub(crate) fn finish(mut self) -> RasterSurface {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        RasterSurface {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }

    fn reset_transforms(&mut self, transform: Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

fn image_paint(photo: &PhotoBuffer) -> FourcutResult<vello_cpu::Image> {
    let pixmap = premul_bytes_to_pixmap(photo.rgba8_premul.as_slice(), photo.width, photo.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> FourcutResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FourcutError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FourcutError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(FourcutError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Five-pointed star centred on `center`, first point straight up.
pub(crate) fn star_path(center: Point, outer_radius: f64, inner_radius: f64) -> BezPath {
    let mut path = BezPath::new();
    for i in 0..10 {
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        let angle = -std::f64::consts::FRAC_PI_2 + f64::from(i) * std::f64::consts::PI / 5.0;
        let p = Point::new(center.x + r * angle.cos(), center.y + r * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// Ellipse inscribed in `rect` as a Bézier path.
pub(crate) fn ellipse_path(rect: Rect) -> BezPath {
    use kurbo::Shape as _;
    kurbo::Ellipse::from_rect(rect).to_path(0.1)
}

/// Two-point open path for a divider segment.
pub(crate) fn segment_path(line: kurbo::Line) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(line.p0);
    path.line_to(line.p1);
    path
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
