//! fourcut composes four-cut photo booth strips.
//!
//! A frame layout (border, footer decoration, four fractional slot rectangles) plus four photos
//! and their pan offsets becomes one raster image. Each photo is cover-fit cropped into its slot
//! and never distorted, the slots tile the frame interior without seams, and the same pipeline
//! renders both small live previews and the print-resolution export.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `FrameLayout + canvas size -> FrameGeometry` (slot pixel rects, footer band,
//!    divider segments)
//! 2. **Crop**: `photo size + slot rect + PanOffset -> CoverCrop` (source window, pan range)
//! 3. **Compose**: `Compositor::compose` draws photos, then border, dividers and footer, into a
//!    [`RasterSurface`]
//! 4. **Export**: PNG/JPEG bytes, a data URL, or the SHA-256 content key
//!
//! [`BoothSession`] is the explicit screen-flow state that gates composing on four filled slots
//! and discards results from stale compose jobs.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: equal inputs compose to byte-identical surfaces.
//! - **No IO while composing**: photos, fonts and logos are decoded before [`Compositor::compose`].
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod crop;
mod foundation;
mod layout;
mod render;
mod session;

pub use assets::decode::{decode_data_uri, decode_image, parse_svg, rasterize_svg};
pub use assets::logo::{FooterLogo, LogoStore, normalize_rel_path};
pub use assets::photo::{PhotoBuffer, PhotoSource, SlotPhoto, decode_slots};
pub use assets::text::{FontLibrary, TextBrushRgba8, TextLine};
pub use config::{
    BoothConfig, ENV_DEVICE_PIXEL_SCALE, ENV_FONTS_DIR, ENV_PREVIEW_WIDTH, RenderConfig,
};
pub use crop::cover::{CoverCrop, PanOffset, PanRange, cover_crop};
pub use foundation::core::{Affine, BezPath, PixelRect, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{FourcutError, FourcutResult};
pub use layout::catalog::{CATALOG_VERSION, FrameCatalog, FrameDef};
pub use layout::color::Color;
pub use layout::frame::{
    DEFAULT_FOOTER_HEIGHT_RATIO, FooterContent, FrameLayout, REFERENCE_WIDTH, SLOT_COUNT,
    SlotRect,
};
pub use layout::solver::{FrameGeometry, resolve_slots};
pub use render::compose::{
    BADGE_SECONDARY_RATIO, Compositor, FOOTER_FONT_SIZE, LOGO_MARGIN_RATIO, TWO_LINE_FONT_RATIO,
};
pub use render::surface::{ExportFormat, RasterSurface};
pub use render::target::{CANONICAL_HEIGHT, CANONICAL_WIDTH, MAX_SURFACE_DIM, RenderTarget};
pub use session::job::{ComposeJob, ComposeOutput};
pub use session::state::{BoothSession, PhotoSlotState, Screen};
