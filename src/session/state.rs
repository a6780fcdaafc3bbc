use serde::{Deserialize, Serialize};

use crate::{
    assets::photo::PhotoSource,
    crop::cover::{PanOffset, PanRange},
    foundation::error::{FourcutError, FourcutResult},
    layout::{
        catalog::{FrameCatalog, FrameDef},
        frame::SLOT_COUNT,
    },
    render::surface::RasterSurface,
    session::job::{ComposeJob, ComposeOutput},
};

/// Booth screens in flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Taking or uploading photos.
    Capture,
    /// Reviewing captured candidates.
    CandidateSelect,
    /// Choosing a frame.
    FrameSelect,
    /// Placing photos into slots and panning them.
    SlotPlacement,
    /// Waiting for the composite.
    Compose,
    /// Showing the finished composite.
    Result,
}

/// One slot's placement: the assigned photo and its pan offset.
///
/// The pan is kept as a fraction of the slot's pan range so the same placement holds at the
/// preview size and at the final export size.
#[derive(Clone, Debug, Default)]
pub struct PhotoSlotState {
    source: Option<PhotoSource>,
    candidate: Option<usize>,
    pan: PanOffset,
}

impl PhotoSlotState {
    /// Assigned photo, if any.
    pub fn source(&self) -> Option<&PhotoSource> {
        self.source.as_ref()
    }

    /// Index of the candidate the photo came from.
    pub fn candidate(&self) -> Option<usize> {
        self.candidate
    }

    /// Current pan as a fraction of the pan range, each axis in `[-1, 1]`.
    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    /// Current pan in pixels of a slot whose pan limits are `range`.
    pub fn pan_in(&self, range: PanRange) -> PanOffset {
        range.from_fraction(self.pan)
    }

    /// `true` once a photo is assigned.
    pub fn is_filled(&self) -> bool {
        self.source.is_some()
    }
}

/// Explicit state for one customer's pass through the booth.
///
/// Compose work runs outside the session: [`BoothSession::begin_compose`] hands out a job
/// stamped with the current generation, and [`BoothSession::accept`] only stores results whose
/// generation still matches. Resetting or leaving the compose screen bumps the generation.
#[derive(Debug)]
pub struct BoothSession {
    catalog: FrameCatalog,
    screen: Screen,
    candidates: Vec<PhotoSource>,
    frame: Option<u32>,
    slots: [PhotoSlotState; SLOT_COUNT],
    generation: u64,
    result: Option<RasterSurface>,
}

impl BoothSession {
    /// Fresh session on the capture screen.
    pub fn new(catalog: FrameCatalog) -> Self {
        Self {
            catalog,
            screen: Screen::Capture,
            candidates: Vec::new(),
            frame: None,
            slots: Default::default(),
            generation: 0,
            result: None,
        }
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Current compose generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frame catalog the session selects from.
    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }

    /// Captured candidates in capture order.
    pub fn candidates(&self) -> &[PhotoSource] {
        &self.candidates
    }

    /// Selected (or pre-assigned) frame.
    pub fn frame(&self) -> Option<&FrameDef> {
        self.frame.and_then(|id| self.catalog.get(id).ok())
    }

    /// Slot states in slot order.
    pub fn slots(&self) -> &[PhotoSlotState; SLOT_COUNT] {
        &self.slots
    }

    /// Finished composite, once accepted.
    pub fn result(&self) -> Option<&RasterSurface> {
        self.result.as_ref()
    }

    /// Add a captured or uploaded photo; returns its candidate index.
    pub fn add_candidate(&mut self, source: PhotoSource) -> FourcutResult<usize> {
        self.expect_screen(&[Screen::Capture, Screen::CandidateSelect], "add a candidate")?;
        self.candidates.push(source);
        Ok(self.candidates.len() - 1)
    }

    /// Capture -> CandidateSelect.
    pub fn show_candidates(&mut self) -> FourcutResult<()> {
        self.expect_screen(&[Screen::Capture], "show candidates")?;
        self.expect_candidates()?;
        self.screen = Screen::CandidateSelect;
        Ok(())
    }

    /// Fix the frame before capture finishes so the frame screen is skipped.
    pub fn preassign_frame(&mut self, id: u32) -> FourcutResult<()> {
        self.expect_screen(&[Screen::Capture, Screen::CandidateSelect], "pre-assign a frame")?;
        self.catalog.get(id)?;
        self.frame = Some(id);
        Ok(())
    }

    /// Leave capture: to FrameSelect, or straight to SlotPlacement with a pre-assigned frame.
    pub fn finish_capture(&mut self) -> FourcutResult<Screen> {
        self.expect_screen(&[Screen::Capture, Screen::CandidateSelect], "finish capture")?;
        self.expect_candidates()?;
        self.screen = if self.frame.is_some() {
            Screen::SlotPlacement
        } else {
            Screen::FrameSelect
        };
        Ok(self.screen)
    }

    /// FrameSelect -> SlotPlacement.
    pub fn select_frame(&mut self, id: u32) -> FourcutResult<()> {
        self.expect_screen(&[Screen::FrameSelect], "select a frame")?;
        self.catalog.get(id)?;
        self.frame = Some(id);
        self.screen = Screen::SlotPlacement;
        Ok(())
    }

    /// Put candidate `candidate` into an empty slot. Its pan starts centered.
    pub fn assign_photo(&mut self, slot: usize, candidate: usize) -> FourcutResult<()> {
        self.expect_screen(&[Screen::SlotPlacement], "assign a photo")?;
        let source = self
            .candidates
            .get(candidate)
            .cloned()
            .ok_or_else(|| FourcutError::session(format!("unknown candidate {candidate}")))?;
        let state = self.slot_mut(slot)?;
        if state.is_filled() {
            return Err(FourcutError::session(format!(
                "slot {slot} is already filled; remove its photo first"
            )));
        }
        *state = PhotoSlotState {
            source: Some(source),
            candidate: Some(candidate),
            pan: PanOffset::ZERO,
        };
        Ok(())
    }

    /// Clear a slot and its pan.
    pub fn remove_photo(&mut self, slot: usize) -> FourcutResult<()> {
        self.expect_screen(&[Screen::SlotPlacement], "remove a photo")?;
        *self.slot_mut(slot)? = PhotoSlotState::default();
        Ok(())
    }

    /// Accumulate a drag delta on `slot` and clamp it against `range`; returns the new offset.
    ///
    /// `dx`/`dy` and the returned offset are in the pixels `range` was computed for, normally the
    /// live preview slot.
    pub fn pan_by(&mut self, slot: usize, dx: f64, dy: f64, range: PanRange) -> FourcutResult<PanOffset> {
        self.expect_screen(&[Screen::SlotPlacement], "pan a photo")?;
        let state = self.slot_mut(slot)?;
        if !state.is_filled() {
            return Err(FourcutError::session(format!("slot {slot} has no photo to pan")));
        }
        let pan = range.clamp(state.pan_in(range).translated(dx, dy));
        state.pan = range.to_fraction(pan);
        Ok(pan)
    }

    /// `true` when every slot is filled on the placement screen.
    pub fn can_compose(&self) -> bool {
        self.screen == Screen::SlotPlacement
            && self.frame.is_some()
            && self.slots.iter().all(PhotoSlotState::is_filled)
    }

    /// SlotPlacement -> Compose, returning the job to run.
    pub fn begin_compose(&mut self) -> FourcutResult<ComposeJob> {
        self.expect_screen(&[Screen::SlotPlacement], "compose")?;
        if !self.can_compose() {
            return Err(FourcutError::session(
                "all four slots must be filled before composing",
            ));
        }
        let (frame_id, layout) = self
            .frame()
            .map(|f| (f.id, f.layout.clone()))
            .ok_or_else(|| FourcutError::session("no frame selected"))?;
        let job = ComposeJob {
            generation: self.generation,
            layout,
            sources: self.slots.clone().map(|s| s.source),
            pans: self.slots.each_ref().map(|s| s.pan),
        };
        self.screen = Screen::Compose;
        tracing::debug!(generation = self.generation, frame = frame_id, "compose started");
        Ok(job)
    }

    /// Store a finished composite unless it belongs to an older generation.
    ///
    /// Returns `true` when the output was accepted (Compose -> Result).
    pub fn accept(&mut self, output: ComposeOutput) -> bool {
        if output.generation != self.generation || self.screen != Screen::Compose {
            tracing::warn!(
                stale = output.generation,
                current = self.generation,
                screen = ?self.screen,
                "discarding stale compose result"
            );
            return false;
        }
        self.result = Some(output.surface);
        self.screen = Screen::Result;
        true
    }

    /// Compose -> SlotPlacement; any in-flight result becomes stale.
    pub fn cancel_compose(&mut self) -> FourcutResult<()> {
        self.expect_screen(&[Screen::Compose], "cancel compose")?;
        self.generation += 1;
        self.screen = Screen::SlotPlacement;
        Ok(())
    }

    /// Back to Capture with no candidates, frame, placements or result.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.screen = Screen::Capture;
        self.candidates.clear();
        self.frame = None;
        self.slots = Default::default();
        self.result = None;
    }

    fn slot_mut(&mut self, slot: usize) -> FourcutResult<&mut PhotoSlotState> {
        self.slots
            .get_mut(slot)
            .ok_or_else(|| FourcutError::session(format!("slot index {slot} out of range")))
    }

    fn expect_screen(&self, allowed: &[Screen], action: &str) -> FourcutResult<()> {
        if allowed.contains(&self.screen) {
            return Ok(());
        }
        Err(FourcutError::session(format!(
            "cannot {action} on the {:?} screen",
            self.screen
        )))
    }

    fn expect_candidates(&self) -> FourcutResult<()> {
        if self.candidates.is_empty() {
            return Err(FourcutError::session("no photos captured yet"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
