use std::{path::Path, sync::Arc};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    assets::photo::PhotoBuffer,
    foundation::error::{FourcutError, FourcutResult},
    foundation::math::premultiply_rgba8_in_place,
};

/// Decode an encoded raster (PNG, JPEG, ...) into a premultiplied [`PhotoBuffer`].
pub fn decode_image(bytes: &[u8]) -> FourcutResult<PhotoBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(FourcutError::decode("image has zero natural size"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PhotoBuffer {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Decode a `data:image/<type>;base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> FourcutResult<PhotoBuffer> {
    let bytes = data_uri_bytes(uri)?;
    decode_image(&bytes)
}

/// Extract the payload bytes of a base64 image data URI.
pub(crate) fn data_uri_bytes(uri: &str) -> FourcutResult<Vec<u8>> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| FourcutError::decode("data uri must start with 'data:'"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| FourcutError::decode("data uri has no ',' separator"))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| FourcutError::decode("only base64 data uris are supported"))?;
    if !media_type.to_ascii_lowercase().starts_with("image/") {
        return Err(FourcutError::decode(format!(
            "data uri media type '{media_type}' is not an image"
        )));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| FourcutError::decode(format!("invalid base64 payload: {e}")))
}

/// Parse SVG bytes; relative `href`s resolve against `resources_dir`.
pub fn parse_svg(bytes: &[u8], resources_dir: Option<&Path>) -> FourcutResult<Arc<usvg::Tree>> {
    let opts = usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(Arc::new(tree))
}

/// Rasterize `tree` into a `width` x `height` premultiplied buffer, stretching the viewbox.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> FourcutResult<PhotoBuffer> {
    const MAX_DIM: u32 = 16_384;
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(FourcutError::render(format!(
            "svg raster size {width}x{height} is out of range"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FourcutError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    Ok(PhotoBuffer {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
