//! Browser host helpers for `script-planner`.
//!
//! Renders the editor and print views to static HTML with the planner state
//! embedded as JSON, and provides a [`DeliveryRuntime`] for browsers that
//! decides between direct save and object URLs from the user agent.
//!
//! [`DeliveryRuntime`]: script_planner::DeliveryRuntime

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

mod browser;
mod html;

use serde::Serialize;

use script_planner::{DocumentSnapshot, EpisodeProgress, ExportOptions, ExportState};
use script_planner_render::{EditorView, PrintView};

pub use browser::{
    data_uri, pdf_data_uri, supports_direct_save, BrowserAction, BrowserRuntime, PDF_MIME,
    PNG_MIME,
};
pub use html::{
    build_html, embed_json, escape_html, render_editor_body, render_print_body, tier_class,
    STATE_ELEMENT_ID,
};

/// State embedded in the page for a scripted host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PagePayload {
    pub editor: EditorView,
    pub print: PrintView,
    /// Downloads produced by the last export, if any.
    pub actions: Vec<BrowserAction>,
}

impl PagePayload {
    pub fn build(snapshot: &DocumentSnapshot, export_state: ExportState) -> Self {
        let progress = EpisodeProgress::compute(snapshot);
        Self {
            editor: EditorView::build(snapshot, &progress, export_state),
            print: PrintView::build(snapshot, &progress),
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<BrowserAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Full HTML document for the payload.
    pub fn to_html(&self, options: &ExportOptions) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        let mut html = build_html(&self.editor, &self.print, options.layout_width_px, &json);
        if !self.actions.is_empty() {
            let links = self
                .actions
                .iter()
                .map(BrowserAction::to_html)
                .collect::<Result<String, _>>()?;
            html = html.replacen(
                "</main>",
                &format!("<div class=\"downloads\">{}</div>\n</main>", links),
                1,
            );
        }
        Ok(html)
    }
}

/// Render the page for a snapshot in one step.
pub fn render_page(
    snapshot: &DocumentSnapshot,
    export_state: ExportState,
    options: &ExportOptions,
) -> Result<String, serde_json::Error> {
    PagePayload::build(snapshot, export_state).to_html(options)
}
