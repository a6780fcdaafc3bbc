use crate::{
    assets::{
        logo::LogoStore,
        photo::SlotPhoto,
        text::{FontLibrary, TextBrushRgba8},
    },
    crop::cover::{PanOffset, cover_crop},
    foundation::core::{Point, Rect},
    foundation::error::FourcutResult,
    layout::{
        color::Color,
        frame::{FooterContent, FrameLayout, SLOT_COUNT},
        solver::FrameGeometry,
    },
    render::{
        cpu::{CpuCanvas, ellipse_path, segment_path, star_path},
        surface::RasterSurface,
        target::RenderTarget,
    },
};

/// Caption size in reference units.
pub const FOOTER_FONT_SIZE: f64 = 12.0;
/// Caption size multiplier when the footer shows two lines.
pub const TWO_LINE_FONT_RATIO: f64 = 0.8;
/// Badge second-line size relative to the caption size.
pub const BADGE_SECONDARY_RATIO: f64 = 0.6;
/// Logo margin as a fraction of the footer band height.
pub const LOGO_MARGIN_RATIO: f64 = 0.1;

/// Draws a frame, its four photos and the footer decoration onto a fresh surface.
///
/// Every call starts from a blank surface and reads only its arguments plus the fonts and logos
/// the compositor was built with, so equal inputs give byte-identical output.
#[derive(Debug, Default)]
pub struct Compositor {
    fonts: FontLibrary,
    logos: LogoStore,
}

impl Compositor {
    /// Compositor using `fonts` for captions and `logos` for footer images.
    pub fn new(fonts: FontLibrary, logos: LogoStore) -> Self {
        Self { fonts, logos }
    }

    /// Registered caption fonts.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Loaded footer logos.
    pub fn logos(&self) -> &LogoStore {
        &self.logos
    }

    /// Compose at the resolution described by `target`.
    pub fn compose(
        &mut self,
        layout: &FrameLayout,
        photos: &[SlotPhoto; SLOT_COUNT],
        pans: &[PanOffset; SLOT_COUNT],
        target: RenderTarget,
    ) -> FourcutResult<RasterSurface> {
        target.validate()?;
        let (width, height) = target.pixel_size();
        self.compose_pixels(layout, photos, pans, width, height)
    }

    /// Compose onto a `width` x `height` pixel surface.
    ///
    /// Slots whose photo failed to decode or cannot be drawn show the slot fill colour; empty
    /// slots stay white.
    /// Borders, dividers and the footer are drawn after every photo so they sit on top.
    #[tracing::instrument(skip(self, layout, photos, pans))]
    pub fn compose_pixels(
        &mut self,
        layout: &FrameLayout,
        photos: &[SlotPhoto; SLOT_COUNT],
        pans: &[PanOffset; SLOT_COUNT],
        width: u32,
        height: u32,
    ) -> FourcutResult<RasterSurface> {
        let geometry = FrameGeometry::new(layout, width, height);
        let mut canvas = CpuCanvas::new(width, height)?;
        let full = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));

        canvas.fill_rect(full, Color::WHITE);

        for (idx, slot) in geometry.slots.iter().enumerate() {
            if slot.is_empty() {
                continue;
            }
            let dest = slot.to_rect();
            match &photos[idx] {
                SlotPhoto::Empty => {}
                SlotPhoto::Failed(reason) => {
                    tracing::debug!(slot = idx, reason = %reason, "slot left at fill colour");
                    canvas.fill_rect(dest, layout.slot_fill_color);
                }
                SlotPhoto::Ready(photo) => {
                    canvas.fill_rect(dest, layout.slot_fill_color);
                    let Some(crop) = cover_crop(
                        photo.width,
                        photo.height,
                        dest.width(),
                        dest.height(),
                        pans[idx],
                    ) else {
                        continue;
                    };
                    if let Err(e) = canvas.draw_image(photo, crop.source, dest) {
                        tracing::warn!(slot = idx, error = %e, "photo not drawable; slot left at fill colour");
                    }
                }
            }
        }

        if geometry.border_px > 0.0 {
            let inset = geometry.border_px / 2.0;
            let border = Rect::new(inset, inset, full.x1 - inset, full.y1 - inset);
            if border.width() > 0.0 && border.height() > 0.0 {
                canvas.stroke_rect(border, geometry.border_px, layout.border_color);
            }
        }
        for divider in &geometry.dividers {
            canvas.stroke_path(&segment_path(*divider), geometry.divider_px, layout.border_color);
        }

        canvas.fill_rect(geometry.footer, layout.border_color);
        self.draw_footer(&mut canvas, layout, &geometry)?;

        Ok(canvas.finish())
    }

    fn draw_footer(
        &mut self,
        canvas: &mut CpuCanvas,
        layout: &FrameLayout,
        geometry: &FrameGeometry,
    ) -> FourcutResult<()> {
        let band = geometry.footer;
        if band.width() <= 0.0 || band.height() <= 0.0 {
            return Ok(());
        }
        let font_px = FOOTER_FONT_SIZE * geometry.scale;

        match layout.footer() {
            FooterContent::Empty => Ok(()),
            FooterContent::Logo(reference) => self.draw_logo(canvas, reference, band),
            FooterContent::Badge { primary, secondary } => {
                self.draw_badge(canvas, layout, band, font_px, primary, secondary)
            }
            FooterContent::Lines(lines) => {
                let size = if lines.len() >= 2 {
                    font_px * TWO_LINE_FONT_RATIO
                } else {
                    font_px
                };
                let n = lines.len() as f64;
                for (i, text) in lines.iter().enumerate() {
                    let cy = band.y0 + band.height() * (i as f64 + 1.0) / (n + 1.0);
                    self.draw_centered_text(canvas, layout, text, size, Point::new(band.center().x, cy))?;
                }
                Ok(())
            }
        }
    }

    fn draw_logo(&self, canvas: &mut CpuCanvas, reference: &str, band: Rect) -> FourcutResult<()> {
        let Some(logo) = self.logos.get(reference) else {
            tracing::warn!(reference, "footer logo not loaded; band left plain");
            return Ok(());
        };
        let margin = band.height() * LOGO_MARGIN_RATIO;
        let avail = Rect::new(
            band.x0 + margin,
            band.y0 + margin,
            band.x1 - margin,
            band.y1 - margin,
        );
        let (nw, nh) = logo.natural_size();
        if avail.width() <= 0.0 || avail.height() <= 0.0 || nw <= 0.0 || nh <= 0.0 {
            return Ok(());
        }

        let fit = (avail.width() / nw).min(avail.height() / nh);
        let size = (nw * fit, nh * fit);
        let center = avail.center();
        let dest = Rect::from_center_size(center, size);
        let raster_w = dest.width().round().max(1.0) as u32;
        let raster_h = dest.height().round().max(1.0) as u32;

        let pixels = logo.raster_for(raster_w, raster_h)?;
        let source = Rect::new(0.0, 0.0, f64::from(pixels.width), f64::from(pixels.height));
        canvas.draw_image(&pixels, source, dest)
    }

    fn draw_badge(
        &mut self,
        canvas: &mut CpuCanvas,
        layout: &FrameLayout,
        band: Rect,
        font_px: f64,
        primary: &str,
        secondary: Option<&str>,
    ) -> FourcutResult<()> {
        let primary_px = if secondary.is_some() {
            font_px * TWO_LINE_FONT_RATIO
        } else {
            font_px
        };
        let cy = if secondary.is_some() {
            band.y0 + band.height() * 0.4
        } else {
            band.center().y
        };
        let center = Point::new(band.center().x, cy);

        let Some(line) = self.fonts.layout_line(
            primary,
            &layout.font_family,
            primary_px as f32,
            brush(layout.footer_text_color),
        )?
        else {
            tracing::warn!("no fonts registered; footer badge skipped");
            return Ok(());
        };

        let rx = line.width() / 2.0 + primary_px * 0.8;
        let ry = line.height() * 0.65;
        let ellipse = Rect::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry);
        let stroke = (primary_px * 0.08).max(1.0);
        canvas.stroke_path(&ellipse_path(ellipse), stroke, layout.footer_text_color);

        let star_r = primary_px * 0.35;
        let gap = primary_px * 0.3 + star_r;
        for x in [ellipse.x0 - gap, ellipse.x1 + gap] {
            canvas.fill_path(
                &star_path(Point::new(x, center.y), star_r, star_r * 0.4),
                layout.footer_text_color,
            );
        }
        canvas.draw_text(
            &line,
            Point::new(center.x - line.width() / 2.0, center.y - line.height() / 2.0),
        );

        if let Some(text) = secondary {
            let cy2 = band.y0 + band.height() * 0.82;
            self.draw_centered_text(
                canvas,
                layout,
                text,
                font_px * BADGE_SECONDARY_RATIO,
                Point::new(band.center().x, cy2),
            )?;
        }
        Ok(())
    }

    fn draw_centered_text(
        &mut self,
        canvas: &mut CpuCanvas,
        layout: &FrameLayout,
        text: &str,
        size_px: f64,
        center: Point,
    ) -> FourcutResult<()> {
        let Some(line) = self.fonts.layout_line(
            text,
            &layout.font_family,
            size_px as f32,
            brush(layout.footer_text_color),
        )?
        else {
            tracing::warn!(text, "no fonts registered; caption skipped");
            return Ok(());
        };
        canvas.draw_text(
            &line,
            Point::new(center.x - line.width() / 2.0, center.y - line.height() / 2.0),
        );
        Ok(())
    }
}

fn brush(color: Color) -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
