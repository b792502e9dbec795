//! Narration script planner core.
//!
//! Holds the fixed section catalogs for the two episodes, the per-episode
//! script store, the character-count based runtime estimator, progress
//! aggregation, and the PDF export pipeline.
//!
//! # Usage
//!
//! ```rust
//! use script_planner::{Episode, EpisodeProgress, Planner};
//!
//! let mut planner = Planner::new();
//! planner.update_script("intro", "안녕하세요. 오늘은 소방관에 대해 알아봅니다.");
//! planner.select_episode(Episode::Two);
//! planner.select_episode(Episode::One);
//!
//! let progress = EpisodeProgress::compute(&planner.snapshot());
//! assert_eq!(progress.total_target_secs, 1510);
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod catalog;
pub mod estimate;
pub mod export;
pub mod progress;
pub mod state;

pub use catalog::{Capabilities, Episode, Section};
pub use estimate::{counted_chars, estimate_secs, format_time, target_chars};
pub use export::{
    export_file_name, DeliveryMethod, DeliveryRuntime, DirectoryRuntime, ExportError, ExportJob,
    ExportLimits, ExportOptions, ExportOutcome, ExportPipeline, ExportReport, ExportState,
    PageGeometry, RasterError, RasterImage, Rasterizer, RenderedPdf, EXPORT_FAILURE_MESSAGE,
};
pub use progress::{EpisodeProgress, SectionProgress, Tier};
pub use state::{
    DocumentSnapshot, EditorEvent, EpisodeScript, InterviewField, InterviewPair, KeywordSlots,
    ObjectiveField, ObjectivePair, Planner, ScriptBook,
};
