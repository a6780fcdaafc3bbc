use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    assets::{logo::LogoStore, text::FontLibrary},
    foundation::error::{FourcutError, FourcutResult},
    layout::catalog::FrameCatalog,
    render::{
        compose::Compositor,
        target::{CANONICAL_HEIGHT, CANONICAL_WIDTH, RenderTarget},
    },
};

/// Overrides `render.devicePixelScale`.
pub const ENV_DEVICE_PIXEL_SCALE: &str = "FOURCUT_DEVICE_PIXEL_SCALE";
/// Overrides `render.previewWidth`.
pub const ENV_PREVIEW_WIDTH: &str = "FOURCUT_PREVIEW_WIDTH";
/// Overrides `fontsDir`.
pub const ENV_FONTS_DIR: &str = "FOURCUT_FONTS_DIR";

/// Output resolution settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Logical composite width.
    pub logical_width: u32,
    /// Logical composite height.
    pub logical_height: u32,
    /// Pixels per logical unit for final renders.
    pub device_pixel_scale: f64,
    /// Preview surface width in pixels.
    pub preview_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            logical_width: CANONICAL_WIDTH,
            logical_height: CANONICAL_HEIGHT,
            device_pixel_scale: 2.0,
            preview_width: 400,
        }
    }
}

/// Booth configuration file.
///
/// Relative paths are resolved against the directory of the file they were loaded from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoothConfig {
    /// Output resolution settings.
    pub render: RenderConfig,
    /// Frame catalog JSON; the built-in catalog is used when unset.
    pub catalog: Option<PathBuf>,
    /// Directory of caption fonts.
    pub fonts_dir: Option<PathBuf>,
    /// Root for footer logo paths.
    pub assets_root: Option<PathBuf>,
}

impl BoothConfig {
    /// Parse from a JSON reader without resolving paths.
    pub fn from_reader<R: std::io::Read>(r: R) -> FourcutResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| FourcutError::serde(format!("parse booth config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a JSON file and resolve its relative paths.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> FourcutResult<Self> {
        let f = File::open(path).map_err(|e| {
            FourcutError::validation(format!("open booth config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        if let Some(base) = path.parent() {
            cfg.resolve_relative_to(base);
        }
        Ok(cfg)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for p in [&mut self.catalog, &mut self.fonts_dir, &mut self.assets_root]
            .into_iter()
            .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// Apply `FOURCUT_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> FourcutResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup; malformed numbers are logged and ignored.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> FourcutResult<()> {
        if let Some(raw) = lookup(ENV_DEVICE_PIXEL_SCALE) {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => self.render.device_pixel_scale = v,
                _ => tracing::warn!(key = ENV_DEVICE_PIXEL_SCALE, raw = %raw, "ignoring invalid override"),
            }
        }
        if let Some(raw) = lookup(ENV_PREVIEW_WIDTH) {
            match raw.trim().parse::<u32>() {
                Ok(v) if v > 0 => self.render.preview_width = v,
                _ => tracing::warn!(key = ENV_PREVIEW_WIDTH, raw = %raw, "ignoring invalid override"),
            }
        }
        if let Some(raw) = lookup(ENV_FONTS_DIR)
            && !raw.trim().is_empty()
        {
            self.fonts_dir = Some(PathBuf::from(raw.trim()));
        }
        self.validate()
    }

    /// Check that both render targets can be allocated.
    pub fn validate(&self) -> FourcutResult<()> {
        self.final_target()?;
        self.preview_target()?;
        Ok(())
    }

    /// Target for exported composites.
    pub fn final_target(&self) -> FourcutResult<RenderTarget> {
        RenderTarget::new(
            self.render.logical_width,
            self.render.logical_height,
            self.render.device_pixel_scale,
        )
    }

    /// Target for live previews.
    pub fn preview_target(&self) -> FourcutResult<RenderTarget> {
        RenderTarget::preview(self.render.preview_width)
    }

    /// Configured catalog, or the built-in frames.
    pub fn load_catalog(&self) -> FourcutResult<FrameCatalog> {
        match &self.catalog {
            Some(path) => FrameCatalog::from_path(path),
            None => Ok(FrameCatalog::builtin()),
        }
    }

    /// Fonts from `fontsDir`, or an empty library.
    pub fn load_fonts(&self) -> FourcutResult<FontLibrary> {
        match &self.fonts_dir {
            Some(dir) => FontLibrary::load_dir(dir),
            None => Ok(FontLibrary::new()),
        }
    }

    /// Compositor with the configured fonts and the logos `catalog` references.
    pub fn build_compositor(&self, catalog: &FrameCatalog) -> FourcutResult<Compositor> {
        let root = self
            .assets_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let logos = LogoStore::prepare(catalog, &root)?;
        Ok(Compositor::new(self.load_fonts()?, logos))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
