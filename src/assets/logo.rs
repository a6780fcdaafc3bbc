use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::{decode, photo::PhotoBuffer},
    foundation::error::{FourcutError, FourcutResult},
    layout::{catalog::FrameCatalog, frame::FooterContent},
};

/// Footer logo, either a decoded bitmap or an SVG tree rasterised on demand.
#[derive(Clone, Debug)]
pub enum FooterLogo {
    /// Decoded PNG/JPEG logo.
    Raster(PhotoBuffer),
    /// Parsed SVG logo.
    Vector(Arc<usvg::Tree>),
}

impl FooterLogo {
    /// Decode logo bytes, sniffing SVG markup before trying raster codecs.
    pub fn from_bytes(bytes: &[u8], resources_dir: Option<&Path>) -> FourcutResult<Self> {
        if looks_like_svg(bytes) {
            return Ok(Self::Vector(decode::parse_svg(bytes, resources_dir)?));
        }
        Ok(Self::Raster(decode::decode_image(bytes)?))
    }

    /// Intrinsic size used for aspect-preserving fitting.
    pub fn natural_size(&self) -> (f64, f64) {
        match self {
            Self::Raster(p) => (f64::from(p.width), f64::from(p.height)),
            Self::Vector(tree) => (
                f64::from(tree.size().width()),
                f64::from(tree.size().height()),
            ),
        }
    }

    /// Pixels to blit at a fitted size of `width` x `height`.
    ///
    /// Bitmaps are returned as-is and scaled by the draw transform; SVGs are rasterised at the
    /// target size so they stay sharp.
    pub(crate) fn raster_for(&self, width: u32, height: u32) -> FourcutResult<PhotoBuffer> {
        match self {
            Self::Raster(p) => Ok(p.clone()),
            Self::Vector(tree) => decode::rasterize_svg(tree, width, height),
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Logos referenced by a catalog, keyed by their `footerLogoImage` reference.
#[derive(Clone, Debug, Default)]
pub struct LogoStore {
    logos: HashMap<String, FooterLogo>,
}

impl LogoStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every logo referenced by `catalog`, resolving paths against `root`.
    #[tracing::instrument(skip(catalog), fields(frames = catalog.frames().len()))]
    pub fn prepare(catalog: &FrameCatalog, root: &Path) -> FourcutResult<Self> {
        let mut store = Self::new();
        for frame in catalog.frames() {
            let FooterContent::Logo(reference) = frame.layout.footer() else {
                continue;
            };
            if store.logos.contains_key(reference) {
                continue;
            }
            let logo = Self::load(root, reference)
                .with_context(|| format!("load logo for frame {} '{}'", frame.id, frame.name))?;
            store.insert(reference, logo);
        }
        Ok(store)
    }

    /// Load one logo from a data URI or a path relative to `root`.
    pub fn load(root: &Path, reference: &str) -> FourcutResult<FooterLogo> {
        if reference.trim_start().starts_with("data:") {
            let bytes = decode::data_uri_bytes(reference)?;
            return FooterLogo::from_bytes(&bytes, None);
        }
        let path = root.join(normalize_rel_path(reference)?);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read logo bytes from '{}'", path.display()))?;
        FooterLogo::from_bytes(&bytes, path.parent())
    }

    /// Register a logo under `reference`.
    pub fn insert(&mut self, reference: impl Into<String>, logo: FooterLogo) {
        self.logos.insert(reference.into(), logo);
    }

    /// Lookup a logo by reference.
    pub fn get(&self, reference: &str) -> Option<&FooterLogo> {
        self.logos.get(reference)
    }

    /// Number of loaded logos.
    pub fn len(&self) -> usize {
        self.logos.len()
    }

    /// `true` when no logos are loaded.
    pub fn is_empty(&self) -> bool {
        self.logos.is_empty()
    }
}

/// Normalize an assets-root-relative path.
///
/// The result uses `/` separators with `.` segments removed; absolute paths and `..` segments
/// are rejected.
pub fn normalize_rel_path(source: &str) -> FourcutResult<PathBuf> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(FourcutError::validation("asset path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(FourcutError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FourcutError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(FourcutError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(PathBuf::from(out.join("/")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/logo.rs"]
mod tests;
