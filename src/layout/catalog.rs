use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{FourcutError, FourcutResult},
    layout::{
        color::Color,
        frame::{FrameLayout, SlotRect},
    },
};

/// Catalog document version understood by this crate.
pub const CATALOG_VERSION: u32 = 1;

/// A named, selectable frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDef {
    /// Stable identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Layout parameters.
    pub layout: FrameLayout,
}

#[derive(Serialize, Deserialize)]
struct CatalogDoc {
    #[serde(default = "default_version")]
    version: u32,
    frames: Vec<FrameDef>,
}

fn default_version() -> u32 {
    CATALOG_VERSION
}

/// Versioned, immutable list of frames.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameCatalog {
    version: u32,
    frames: Vec<FrameDef>,
}

impl FrameCatalog {
    /// Build and validate a catalog from frame definitions.
    pub fn new(frames: Vec<FrameDef>) -> FourcutResult<Self> {
        let catalog = Self {
            version: CATALOG_VERSION,
            frames,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The frames shipped with the booth.
    pub fn builtin() -> Self {
        let frames = vec![
            FrameDef {
                id: 1,
                name: "Hope".to_string(),
                layout: FrameLayout {
                    border_width: 18.0,
                    border_color: Color::rgb(0x00, 0x1f, 0x3f),
                    slot_fill_color: Color::rgb(0xf5, 0xf5, 0xf0),
                    footer_text: Some("Hope".to_string()),
                    footer_text_color: Color::WHITE,
                    font_family: "Inter, sans-serif".to_string(),
                    use_badge_style: true,
                    slots: SlotRect::GRID_2X2,
                    ..FrameLayout::default()
                },
            },
            FrameDef {
                id: 2,
                name: "Merry Christmas".to_string(),
                layout: FrameLayout {
                    border_width: 20.0,
                    border_color: Color::rgb(0xb2, 0x22, 0x22),
                    slot_fill_color: Color::WHITE,
                    footer_text: Some("MERRY\nCHRISTMAS".to_string()),
                    footer_text_color: Color::rgb(0xff, 0xd7, 0x00),
                    font_family: "Playfair Display, serif".to_string(),
                    slots: SlotRect::GRID_2X2,
                    ..FrameLayout::default()
                },
            },
            FrameDef {
                id: 3,
                name: "Pyeong-an".to_string(),
                layout: FrameLayout {
                    border_width: 18.0,
                    border_color: Color::rgb(0x6b, 0x46, 0xc1),
                    slot_fill_color: Color::rgb(0xf5, 0xf5, 0xf0),
                    footer_text: Some("PEACE ATTIC".to_string()),
                    footer_text_color: Color::rgb(0xff, 0xd7, 0x00),
                    font_family: "Playfair Display, serif".to_string(),
                    slots: SlotRect::GRID_2X2,
                    ..FrameLayout::default()
                },
            },
        ];
        Self {
            version: CATALOG_VERSION,
            frames,
        }
    }

    /// Parse and validate a catalog from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FourcutResult<Self> {
        let doc: CatalogDoc = serde_json::from_reader(r)
            .map_err(|e| FourcutError::serde(format!("parse frame catalog JSON: {e}")))?;
        Self::from_doc(doc)
    }

    /// Parse and validate a catalog from a JSON string.
    pub fn from_json_str(s: &str) -> FourcutResult<Self> {
        let doc: CatalogDoc = serde_json::from_str(s)
            .map_err(|e| FourcutError::serde(format!("parse frame catalog JSON: {e}")))?;
        Self::from_doc(doc)
    }

    /// Parse and validate a catalog from a JSON file on disk.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> FourcutResult<Self> {
        let f = File::open(path).map_err(|e| {
            FourcutError::validation(format!("open frame catalog '{}': {e}", path.display()))
        })?;
        let catalog = Self::from_reader(BufReader::new(f))?;
        tracing::debug!(frames = catalog.frames.len(), "loaded frame catalog");
        Ok(catalog)
    }

    fn from_doc(doc: CatalogDoc) -> FourcutResult<Self> {
        let catalog = Self {
            version: doc.version,
            frames: doc.frames,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize back to the catalog JSON document.
    pub fn to_json_string(&self) -> FourcutResult<String> {
        let doc = CatalogDoc {
            version: self.version,
            frames: self.frames.clone(),
        };
        serde_json::to_string_pretty(&doc)
            .map_err(|e| FourcutError::serde(format!("serialize frame catalog: {e}")))
    }

    /// Validate version, id uniqueness and every layout.
    pub fn validate(&self) -> FourcutResult<()> {
        if self.version != CATALOG_VERSION {
            return Err(FourcutError::validation(format!(
                "unsupported frame catalog version {} (expected {CATALOG_VERSION})",
                self.version
            )));
        }
        if self.frames.is_empty() {
            return Err(FourcutError::validation(
                "frame catalog must contain at least one frame",
            ));
        }
        let mut seen = HashSet::new();
        for frame in &self.frames {
            if !seen.insert(frame.id) {
                return Err(FourcutError::validation(format!(
                    "duplicate frame id {}",
                    frame.id
                )));
            }
            frame.layout.validate().map_err(|e| {
                FourcutError::validation(format!("frame {} ('{}'): {e}", frame.id, frame.name))
            })?;
        }
        Ok(())
    }

    /// Catalog document version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All frames in declaration order.
    pub fn frames(&self) -> &[FrameDef] {
        &self.frames
    }

    /// Lookup a frame by id.
    pub fn get(&self, id: u32) -> FourcutResult<&FrameDef> {
        self.frames
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| FourcutError::validation(format!("unknown frame id {id}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/catalog.rs"]
mod tests;
