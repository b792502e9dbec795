//! View models, render IR and print layout for `script-planner`.

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

mod render_ir;
mod render_layout;
pub mod view;

pub use render_ir::{
    palette, tier_color, DrawCommand, PrintLayout, RectCommand, Rgb, RuleCommand, TextCommand,
    TextStyle,
};
pub use render_layout::{
    is_wide, wrap_text, HeuristicMeasurer, LayoutConfig, PrintLayoutEngine, TextMeasurer,
};
pub use view::{
    CardInput, EditorView, EpisodeTab, ExportButton, GuideItem, KeywordSlotView, PrintField,
    PrintSection, PrintView, SectionCard, TextField, TotalSummary,
};
