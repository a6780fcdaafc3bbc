use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    assets::decode,
    foundation::error::{FourcutError, FourcutResult},
    foundation::math::premultiply_rgba8_in_place,
    layout::frame::SLOT_COUNT,
};

/// Decoded photo in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoBuffer {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PhotoBuffer {
    /// Wrap an already-decoded straight-alpha RGBA8 bitmap.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> FourcutResult<Self> {
        if width == 0 || height == 0 {
            return Err(FourcutError::decode("bitmap has zero natural size"));
        }
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(FourcutError::decode(format!(
                "bitmap byte length {} does not match {width}x{height}",
                rgba8.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// `(naturalWidth, naturalHeight)`.
    pub fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Where a slot's photo comes from before decoding.
#[derive(Clone, Debug)]
pub enum PhotoSource {
    /// Encoded PNG/JPEG/... bytes.
    Encoded(Arc<Vec<u8>>),
    /// `data:image/...;base64,` URI.
    DataUri(String),
    /// Already decoded bitmap.
    Decoded(PhotoBuffer),
}

impl PhotoSource {
    /// Decode into a [`PhotoBuffer`].
    pub fn decode(&self) -> FourcutResult<PhotoBuffer> {
        match self {
            Self::Encoded(bytes) => decode::decode_image(bytes),
            Self::DataUri(uri) => decode::decode_data_uri(uri),
            Self::Decoded(photo) => Ok(photo.clone()),
        }
    }
}

/// Per-slot decode outcome handed to the compositor.
#[derive(Clone, Debug, Default)]
pub enum SlotPhoto {
    /// No photo assigned; the slot stays at the white background.
    #[default]
    Empty,
    /// Decoding failed; the slot shows its fill colour.
    Failed(String),
    /// Decoded photo ready for blitting.
    Ready(PhotoBuffer),
}

impl SlotPhoto {
    /// The decoded photo, if any.
    pub fn photo(&self) -> Option<&PhotoBuffer> {
        match self {
            Self::Ready(p) => Some(p),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    /// `true` for a slot that had a source, whether or not it decoded.
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Decode every present source in parallel and wait for all of them.
///
/// Failures are reported per slot as [`SlotPhoto::Failed`]; the call itself cannot fail.
#[tracing::instrument(skip(sources))]
pub fn decode_slots(sources: [Option<PhotoSource>; SLOT_COUNT]) -> [SlotPhoto; SLOT_COUNT] {
    let decoded: Vec<SlotPhoto> = Vec::from(sources)
        .into_par_iter()
        .enumerate()
        .map(|(idx, source)| match source {
            None => SlotPhoto::Empty,
            Some(source) => match source.decode() {
                Ok(photo) => SlotPhoto::Ready(photo),
                Err(e) => {
                    tracing::warn!(slot = idx, error = %e, "photo decode failed");
                    SlotPhoto::Failed(e.to_string())
                }
            },
        })
        .collect();

    let mut out: [SlotPhoto; SLOT_COUNT] = Default::default();
    for (slot, photo) in out.iter_mut().zip(decoded) {
        *slot = photo;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/photo.rs"]
mod tests;
