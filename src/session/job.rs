use crate::{
    assets::photo::{PhotoSource, SlotPhoto, decode_slots},
    crop::cover::{PanOffset, cover_crop},
    foundation::error::FourcutResult,
    layout::{
        frame::{FrameLayout, SLOT_COUNT},
        solver::FrameGeometry,
    },
    render::{compose::Compositor, surface::RasterSurface, target::RenderTarget},
};

/// Self-contained compose request; owns its inputs so it can run on any thread.
#[derive(Clone, Debug)]
pub struct ComposeJob {
    pub(crate) generation: u64,
    pub(crate) layout: FrameLayout,
    pub(crate) sources: [Option<PhotoSource>; SLOT_COUNT],
    pub(crate) pans: [PanOffset; SLOT_COUNT],
}

/// Composite produced by a [`ComposeJob`].
#[derive(Clone, Debug)]
pub struct ComposeOutput {
    /// Session generation the job was started in.
    pub generation: u64,
    /// The composite.
    pub surface: RasterSurface,
    /// Slots whose photo failed to decode.
    pub failed_slots: Vec<usize>,
}

impl ComposeJob {
    /// Session generation this job belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frame layout being composed.
    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Pan offsets captured at job creation, as fractions of each slot's pan range.
    pub fn pans(&self) -> &[PanOffset; SLOT_COUNT] {
        &self.pans
    }

    /// Decode every photo (waiting for all of them), then compose.
    ///
    /// Pan fractions are resolved against the slot sizes of `target`.
    #[tracing::instrument(skip(self, compositor), fields(generation = self.generation))]
    pub fn run(self, compositor: &mut Compositor, target: RenderTarget) -> FourcutResult<ComposeOutput> {
        target.validate()?;
        let (width, height) = target.pixel_size();
        let photos = decode_slots(self.sources);
        let failed_slots = photos
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p, SlotPhoto::Failed(_)))
            .map(|(idx, _)| idx)
            .collect();
        let geometry = FrameGeometry::new(&self.layout, width, height);
        let pans = pixel_pans(&geometry, &photos, &self.pans);
        let surface = compositor.compose_pixels(&self.layout, &photos, &pans, width, height)?;
        Ok(ComposeOutput {
            generation: self.generation,
            surface,
            failed_slots,
        })
    }
}

/// Pixel pan offsets for `geometry` from per-slot pan fractions.
fn pixel_pans(
    geometry: &FrameGeometry,
    photos: &[SlotPhoto; SLOT_COUNT],
    fractions: &[PanOffset; SLOT_COUNT],
) -> [PanOffset; SLOT_COUNT] {
    std::array::from_fn(|idx| {
        let slot = geometry.slots[idx];
        photos[idx]
            .photo()
            .and_then(|p| {
                cover_crop(
                    p.width,
                    p.height,
                    f64::from(slot.width),
                    f64::from(slot.height),
                    PanOffset::ZERO,
                )
            })
            .map(|crop| crop.pan_range.from_fraction(fractions[idx]))
            .unwrap_or(PanOffset::ZERO)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/job.rs"]
mod tests;
