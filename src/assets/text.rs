use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{FourcutError, FourcutResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

struct FontFace {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// A single shaped line of footer text plus the font its glyph ids refer to.
pub struct TextLine {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl TextLine {
    /// Advance width of the line in pixels.
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    /// Line box height in pixels.
    pub fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

/// Fonts available for footer captions, with Parley contexts for shaping.
///
/// Faces are registered from bytes, so rendering never depends on fonts installed on the host.
pub struct FontLibrary {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Vec<FontFace>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("families", &self.families().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    /// Empty library; captions are skipped until a font is added.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    /// Load every `.ttf`/`.otf`/`.ttc` file in `dir` (non-recursive, sorted by file name).
    ///
    /// Files that fail to register are logged and skipped.
    pub fn load_dir(dir: &Path) -> FourcutResult<Self> {
        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("read fonts dir '{}'", dir.display()))?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_font_file(path))
            .collect::<Vec<_>>();
        paths.sort();

        let mut lib = Self::new();
        for path in paths {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read font '{}'", path.display()))?;
            match lib.add_font(bytes) {
                Ok(family) => tracing::debug!(path = %path.display(), family = %family, "registered font"),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font"),
            }
        }
        Ok(lib)
    }

    /// Register a font from raw bytes and return its family name.
    pub fn add_font(&mut self, bytes: Vec<u8>) -> FourcutResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            FourcutError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FourcutError::validation("registered font family has no name"))?
            .to_string();

        self.faces.push(FontFace {
            family: family.clone(),
            data: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
        });
        Ok(family)
    }

    /// `true` when no fonts are registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Registered family names in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }

    /// Resolve a CSS-style family list (`"Playfair Display", serif`) to a registered family.
    ///
    /// Names match case-insensitively; unmatched lists fall back to the first registered face.
    pub fn resolve(&self, family_list: &str) -> Option<&str> {
        self.resolve_index(family_list)
            .map(|idx| self.faces[idx].family.as_str())
    }

    fn resolve_index(&self, family_list: &str) -> Option<usize> {
        if self.faces.is_empty() {
            return None;
        }
        family_list
            .split(',')
            .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|name| !name.is_empty())
            .find_map(|name| {
                self.faces
                    .iter()
                    .position(|f| f.family.eq_ignore_ascii_case(name))
            })
            .or(Some(0))
    }

    /// Shape `text` as a single unwrapped line.
    ///
    /// Returns `Ok(None)` when the library has no fonts.
    pub fn layout_line(
        &mut self,
        text: &str,
        family_list: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> FourcutResult<Option<TextLine>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(FourcutError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(idx) = self.resolve_index(family_list) else {
            return Ok(None);
        };
        let face = &self.faces[idx];

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(Some(TextLine {
            layout,
            font: face.data.clone(),
        }))
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
