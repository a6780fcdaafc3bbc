use std::{io::Cursor, path::Path};

use anyhow::Context;
use base64::Engine as _;
use sha2::Digest as _;

use crate::{
    foundation::error::{FourcutError, FourcutResult},
    foundation::math::unpremultiply_rgba8_in_place,
};

/// Encoding used when handing a composite to export collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless PNG.
    Png,
    /// Baseline JPEG at the given quality (1..=100).
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

impl ExportFormat {
    /// MIME type for data URLs and uploads.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Finished composite in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl RasterSurface {
    /// Premultiplied RGBA of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy as an `image` buffer.
    pub fn to_rgba_image(&self) -> FourcutResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| FourcutError::render("surface byte length does not match its size"))
    }

    /// Encode as PNG.
    pub fn to_png_bytes(&self) -> FourcutResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(self.to_rgba_image()?)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(buf)
    }

    /// Encode as JPEG; alpha is dropped.
    pub fn to_jpeg_bytes(&self, quality: u8) -> FourcutResult<Vec<u8>> {
        let rgb = image::DynamicImage::ImageRgba8(self.to_rgba_image()?).to_rgb8();
        let mut buf = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        encoder.encode_image(&rgb).context("encode jpeg")?;
        Ok(buf)
    }

    /// Encode in `format`.
    pub fn encode(&self, format: ExportFormat) -> FourcutResult<Vec<u8>> {
        match format {
            ExportFormat::Png => self.to_png_bytes(),
            ExportFormat::Jpeg { quality } => self.to_jpeg_bytes(quality),
        }
    }

    /// `data:<mime>;base64,...` form accepted by upload collaborators.
    pub fn to_data_url(&self, format: ExportFormat) -> FourcutResult<String> {
        let bytes = self.encode(format)?;
        Ok(format!(
            "data:{};base64,{}",
            format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ))
    }

    /// Write a PNG file, creating parent directories.
    pub fn write_png(&self, path: &Path) -> FourcutResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let img = self.to_rgba_image()?;
        image::save_buffer_with_format(
            path,
            img.as_raw(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    /// Lowercase hex SHA-256 of the PNG encoding; used as the public retrieval key.
    pub fn content_key(&self) -> FourcutResult<String> {
        Ok(sha256_hex(&self.to_png_bytes()?))
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
