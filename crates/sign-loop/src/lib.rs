//! Detection loop controller for the signwave pipeline.
//!
//! `DetectionLoop` drives the poll cycle: sample a frame, estimate
//! landmarks, classify when a hand is clearly visible, and keep a
//! stable latest result for the display layer to snapshot.

pub mod controller;
pub mod history;

pub use controller::{DetectionLoop, LoopState};
pub use history::{HistoryEntry, MAX_HISTORY, TranslationHistory};
