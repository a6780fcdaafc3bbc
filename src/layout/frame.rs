use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{FourcutError, FourcutResult},
    layout::color::Color,
};

/// Canvas width at which `borderWidth`, `dividerWidth` and footer font sizes are specified.
pub const REFERENCE_WIDTH: f64 = 200.0;

/// Footer band height as a fraction of canvas height used by every shipped frame.
pub const DEFAULT_FOOTER_HEIGHT_RATIO: f64 = 0.08;

/// Number of photo slots in every frame.
pub const SLOT_COUNT: usize = 4;

// Fractions are compared with a small slack so that values such as `0.1 + 0.9` still count as
// reaching the interior edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Slot rectangle expressed as fractions of the frame interior.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotRect {
    /// Left edge, `0..1` of interior width.
    pub x: f64,
    /// Top edge, `0..1` of interior height.
    pub y: f64,
    /// Width, `0..1` of interior width.
    pub width: f64,
    /// Height, `0..1` of interior height.
    pub height: f64,
}

impl SlotRect {
    /// Construct a fractional slot.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Quadrants of a 2x2 grid in reading order.
    pub const GRID_2X2: [SlotRect; SLOT_COUNT] = [
        SlotRect::new(0.0, 0.0, 0.5, 0.5),
        SlotRect::new(0.5, 0.0, 0.5, 0.5),
        SlotRect::new(0.0, 0.5, 0.5, 0.5),
        SlotRect::new(0.5, 0.5, 0.5, 0.5),
    ];

    /// `true` when the slot is anchored at the interior's top-left corner.
    pub fn at_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// `true` when the slot's right edge reaches the interior's right edge.
    pub fn reaches_right(&self) -> bool {
        self.x + self.width >= 1.0 - EDGE_EPSILON
    }

    /// `true` when the slot's bottom edge reaches the interior's bottom edge.
    pub fn reaches_bottom(&self) -> bool {
        self.y + self.height >= 1.0 - EDGE_EPSILON
    }

    fn validate(&self, idx: usize) -> FourcutResult<()> {
        for (name, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(FourcutError::validation(format!(
                    "slot {idx} {name} must be finite and within [0, 1]"
                )));
            }
        }
        if self.x + self.width > 1.0 + EDGE_EPSILON || self.y + self.height > 1.0 + EDGE_EPSILON {
            return Err(FourcutError::validation(format!(
                "slot {idx} extends past the frame interior"
            )));
        }
        Ok(())
    }
}

/// Decorative four-slot frame definition.
///
/// Layouts are immutable configuration: they come from the built-in catalog or from a catalog
/// JSON document and are only ever read by the compositor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameLayout {
    /// Outer border stroke width in reference units (see [`REFERENCE_WIDTH`]).
    #[serde(default = "default_border_width", alias = "frameWidth")]
    pub border_width: f64,
    /// Cross divider stroke width in reference units; defaults to `border_width`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divider_width: Option<f64>,
    /// Fraction of canvas height reserved for the footer band.
    #[serde(default = "default_footer_height_ratio")]
    pub footer_height_ratio: f64,
    /// Colour of the outer border, dividers and footer band.
    #[serde(default = "default_border_color", alias = "frameColor")]
    pub border_color: Color,
    /// Colour painted under each photo.
    #[serde(default = "default_slot_fill_color", alias = "slotColor")]
    pub slot_fill_color: Color,
    /// Caption colour (also used for badge decorations).
    #[serde(default = "default_footer_text_color", alias = "textColor")]
    pub footer_text_color: Color,
    /// Caption; a `\n` requests two centered lines.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bottomText")]
    pub footer_text: Option<String>,
    /// Logo image reference (path relative to the assets root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_logo_image: Option<String>,
    /// CSS-like font family list used for the caption.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Render the caption as an ellipse badge flanked by stars.
    #[serde(default, alias = "logoStyle")]
    pub use_badge_style: bool,
    /// Slot rectangles as fractions of the interior.
    pub slots: [SlotRect; SLOT_COUNT],
}

fn default_border_width() -> f64 {
    15.0
}

fn default_footer_height_ratio() -> f64 {
    DEFAULT_FOOTER_HEIGHT_RATIO
}

fn default_border_color() -> Color {
    Color::rgb(0x80, 0x80, 0x80)
}

fn default_slot_fill_color() -> Color {
    Color::rgb(0xf5, 0xf5, 0xf5)
}

fn default_footer_text_color() -> Color {
    Color::WHITE
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            border_width: default_border_width(),
            divider_width: None,
            footer_height_ratio: default_footer_height_ratio(),
            border_color: default_border_color(),
            slot_fill_color: default_slot_fill_color(),
            footer_text_color: default_footer_text_color(),
            footer_text: None,
            footer_logo_image: None,
            font_family: default_font_family(),
            use_badge_style: false,
            slots: SlotRect::GRID_2X2,
        }
    }
}

/// What the footer band shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FooterContent<'a> {
    /// Plain band.
    Empty,
    /// Logo image reference.
    Logo(&'a str),
    /// First line inside an ellipse with flanking stars, optional smaller second line.
    Badge {
        /// Line drawn inside the ellipse.
        primary: &'a str,
        /// Smaller line beneath the badge.
        secondary: Option<&'a str>,
    },
    /// Centered lines distributed vertically.
    Lines(Vec<&'a str>),
}

impl FrameLayout {
    /// Validate numeric ranges, slot bounds and footer exclusivity.
    pub fn validate(&self) -> FourcutResult<()> {
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(FourcutError::validation(
                "borderWidth must be finite and >= 0",
            ));
        }
        if let Some(w) = self.divider_width
            && (!w.is_finite() || w < 0.0)
        {
            return Err(FourcutError::validation(
                "dividerWidth must be finite and >= 0",
            ));
        }
        if !self.footer_height_ratio.is_finite() || !(0.0..1.0).contains(&self.footer_height_ratio)
        {
            return Err(FourcutError::validation(
                "footerHeightRatio must be finite and within [0, 1)",
            ));
        }
        if self.caption().is_some() && self.footer_logo_image.is_some() {
            return Err(FourcutError::validation(
                "footerText and footerLogoImage are mutually exclusive",
            ));
        }
        for (idx, slot) in self.slots.iter().enumerate() {
            slot.validate(idx)?;
        }
        Ok(())
    }

    /// Divider stroke width in reference units.
    pub fn divider_width(&self) -> f64 {
        self.divider_width.unwrap_or(self.border_width)
    }

    /// Non-empty caption text, if any.
    pub fn caption(&self) -> Option<&str> {
        self.footer_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Resolve which footer decoration applies.
    pub fn footer(&self) -> FooterContent<'_> {
        if let Some(logo) = self.footer_logo_image.as_deref() {
            return FooterContent::Logo(logo);
        }
        let Some(text) = self.caption() else {
            return FooterContent::Empty;
        };
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if self.use_badge_style {
            FooterContent::Badge {
                primary: lines.first().copied().unwrap_or(text),
                secondary: lines.get(1).copied(),
            }
        } else {
            FooterContent::Lines(lines)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/frame.rs"]
mod tests;
