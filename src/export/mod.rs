//! PDF export pipeline.
//!
//! The pipeline is a two-state machine (`Idle` / `Generating`). A trigger
//! while generating is ignored. A job owns a frozen [`DocumentSnapshot`],
//! asks a [`Rasterizer`] for one tall RGB image of the print view, slices it
//! into A4 pages, writes the PDF and hands it to a [`DeliveryRuntime`].
//! Whatever happens, the pipeline ends up `Idle` again.

mod delivery;
mod geometry;
mod pdf;

use core::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::catalog::Episode;
use crate::state::{DocumentSnapshot, Planner};

pub use delivery::{deliver, DeliveryMethod, DeliveryRuntime, DirectoryRuntime};
pub use geometry::{mm_to_pt, PageGeometry, PageSlice, SlicePlan};

use pdf::PdfBuilder;

/// Blocking message shown for every export failure.
pub const EXPORT_FAILURE_MESSAGE: &str = "PDF 생성 중 오류가 발생했습니다.\n\n\
다음을 확인해주세요:\n\
1. 팝업 차단이 해제되어 있는지\n\
2. 원고 내용이 너무 길지 않은지\n\
3. 다른 브라우저(Chrome 권장)로 시도해보세요.";

/// Export button label while idle.
pub const EXPORT_BUTTON_IDLE: &str = "PDF 다운로드";
/// Export button label while generating.
pub const EXPORT_BUTTON_BUSY: &str = "PDF 생성 중...";

/// `{week_number}_{week_title}_{n}차시.pdf`, with empty fields kept empty.
pub fn export_file_name(week_number: &str, week_title: &str, episode: Episode) -> String {
    format!("{}_{}_{}차시.pdf", week_number, week_title, episode.number())
}

/// Capacity limits for one export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportLimits {
    /// Hard cap on `width * height` of the rasterized print view.
    pub max_raster_pixels: u64,
    /// Hard cap on the number of PDF pages.
    pub max_pages: usize,
}

impl Default for ExportLimits {
    fn default() -> Self {
        Self {
            max_raster_pixels: 64 * 1024 * 1024,
            max_pages: 200,
        }
    }
}

impl ExportLimits {
    /// Limits matching the smallest canvas area common mobile browsers allow.
    pub fn compact() -> Self {
        Self {
            max_raster_pixels: 16 * 1024 * 1024,
            max_pages: 60,
        }
    }
}

/// Export configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportOptions {
    /// Fixed layout width of the print view in CSS pixels.
    pub layout_width_px: u32,
    /// Device pixels per layout pixel.
    pub scale: u32,
    pub page: PageGeometry,
    /// Wait between making the print view present and rasterizing it.
    pub settle_delay: Duration,
    /// Lifetime of an object URL handed to the user.
    pub revoke_delay: Duration,
    pub limits: ExportLimits,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout_width_px: 800,
            scale: 2,
            page: PageGeometry::a4_portrait(15.0),
            settle_delay: Duration::from_millis(100),
            revoke_delay: Duration::from_millis(100),
            limits: ExportLimits::default(),
        }
    }
}

impl ExportOptions {
    /// Raster width in device pixels.
    pub fn raster_width(&self) -> u32 {
        self.layout_width_px.saturating_mul(self.scale.max(1))
    }
}

/// Tightly packed 8-bit RGB image, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgb.len())
            .finish()
    }
}

impl RasterImage {
    /// Wrap RGB bytes. Fails when the buffer does not match the dimensions.
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self, RasterError> {
        let expected = u64::from(width) * u64::from(height) * 3;
        if rgb.len() as u64 != expected {
            return Err(RasterError::new(format!(
                "rgb buffer is {} bytes, expected {} for {}x{}",
                rgb.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self { width, height, rgb })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn as_rgb(&self) -> &[u8] {
        &self.rgb
    }

    pub fn into_rgb(self) -> Vec<u8> {
        self.rgb
    }

    /// `count` rows starting at `y`, or `None` when out of bounds.
    pub fn rows(&self, y: u32, count: u32) -> Option<&[u8]> {
        let stride = self.width as usize * 3;
        let start = (y as usize).checked_mul(stride)?;
        let end = start.checked_add((count as usize).checked_mul(stride)?)?;
        self.rgb.get(start..end)
    }
}

/// Failure reported by a [`Rasterizer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    /// Drawing or encoding failed.
    Failed(String),
    /// The surface would exceed a capacity limit; nothing was allocated.
    LimitExceeded {
        kind: &'static str,
        actual: u64,
        limit: u64,
    },
}

impl RasterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(message) => f.write_str(message),
            Self::LimitExceeded {
                kind,
                actual,
                limit,
            } => write!(
                f,
                "raster limit exceeded: {} (actual={} limit={})",
                kind, actual, limit
            ),
        }
    }
}

impl std::error::Error for RasterError {}

/// Turns the print view of a snapshot into one tall RGB image.
pub trait Rasterizer {
    /// Rasterize at `options.raster_width()` device pixels wide.
    ///
    /// Implementations should refuse surfaces larger than
    /// `options.limits.max_raster_pixels` before allocating them.
    fn rasterize(
        &mut self,
        snapshot: &DocumentSnapshot,
        options: &ExportOptions,
    ) -> Result<RasterImage, RasterError>;
}

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    /// No print view was available to rasterize.
    RenderTargetMissing,
    /// The rasterizer failed.
    Raster(RasterError),
    /// The rasterized image has no area.
    EmptyRaster { width: u32, height: u32 },
    /// Margins leave no printable area.
    InvalidGeometry {
        width_mm: f64,
        height_mm: f64,
        margin_mm: f64,
    },
    /// The document exceeded a configured capacity limit.
    LimitExceeded {
        kind: &'static str,
        actual: u64,
        limit: u64,
    },
    /// The runtime could not deliver the file.
    Delivery(std::io::Error),
}

impl ExportError {
    /// Message shown to the user; identical for every failure kind.
    pub fn user_message(&self) -> &'static str {
        EXPORT_FAILURE_MESSAGE
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenderTargetMissing => write!(f, "print view is not available"),
            Self::Raster(err) => write!(f, "rasterization failed: {}", err),
            Self::EmptyRaster { width, height } => {
                write!(f, "rasterized image is empty ({}x{})", width, height)
            }
            Self::InvalidGeometry {
                width_mm,
                height_mm,
                margin_mm,
            } => write!(
                f,
                "page {}x{} mm has no printable area with {} mm margins",
                width_mm, height_mm, margin_mm
            ),
            Self::LimitExceeded {
                kind,
                actual,
                limit,
            } => write!(
                f,
                "export limit exceeded: {} (actual={} limit={})",
                kind, actual, limit
            ),
            Self::Delivery(err) => write!(f, "delivery failed: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Raster(err) => Some(err),
            Self::Delivery(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RasterError> for ExportError {
    fn from(value: RasterError) -> Self {
        match value {
            RasterError::LimitExceeded {
                kind,
                actual,
                limit,
            } => Self::LimitExceeded {
                kind,
                actual,
                limit,
            },
            other => Self::Raster(other),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Delivery(value)
    }
}

/// Pipeline state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportState {
    #[default]
    Idle,
    Generating,
}

impl ExportState {
    /// Label of the export button in this state.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Idle => EXPORT_BUTTON_IDLE,
            Self::Generating => EXPORT_BUTTON_BUSY,
        }
    }
}

/// A PDF rendered in memory, not yet delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPdf {
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Successful export summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub file_name: String,
    pub page_count: usize,
    pub byte_len: usize,
    pub method: DeliveryMethod,
}

/// Result of one trigger.
#[derive(Debug)]
pub enum ExportOutcome {
    /// Triggered while an export was already running.
    Ignored,
    Delivered(ExportReport),
    Failed(ExportError),
}

impl ExportOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    /// Message to show the user, if any.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

/// One accepted export, bound to a frozen snapshot.
#[derive(Clone, Debug)]
pub struct ExportJob {
    snapshot: DocumentSnapshot,
    options: ExportOptions,
    file_name: String,
}

impl ExportJob {
    pub fn new(snapshot: DocumentSnapshot, options: ExportOptions) -> Self {
        let file_name = export_file_name(
            &snapshot.week_number,
            &snapshot.week_title,
            snapshot.episode,
        );
        Self {
            snapshot,
            options,
            file_name,
        }
    }

    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Rasterize, slice and write the PDF without delivering it.
    pub fn render(&self, target: Option<&mut dyn Rasterizer>) -> Result<RenderedPdf, ExportError> {
        let target = target.ok_or(ExportError::RenderTargetMissing)?;
        let image = target.rasterize(&self.snapshot, &self.options)?;
        let limits = self.options.limits;
        if image.pixel_count() > limits.max_raster_pixels {
            return Err(ExportError::LimitExceeded {
                kind: "raster_pixels",
                actual: image.pixel_count(),
                limit: limits.max_raster_pixels,
            });
        }

        let plan = SlicePlan::plan(image.width(), image.height(), &self.options.page)?;
        if plan.page_count() > limits.max_pages {
            return Err(ExportError::LimitExceeded {
                kind: "pages",
                actual: plan.page_count() as u64,
                limit: limits.max_pages as u64,
            });
        }
        log::debug!(
            "slicing {}x{} raster into {} page(s), {} rows per page",
            image.width(),
            image.height(),
            plan.page_count(),
            plan.rows_per_page
        );

        let title = self.file_name.trim_end_matches(".pdf");
        let mut pdf = PdfBuilder::new(self.options.page).with_title(title);
        for slice in &plan.pages {
            let rows = image
                .rows(slice.src_y, slice.src_height)
                .ok_or(ExportError::EmptyRaster {
                    width: image.width(),
                    height: image.height(),
                })?;
            pdf.add_image_page(rows, image.width(), *slice);
        }
        let page_count = pdf.page_count();
        let bytes = pdf.finish();
        Ok(RenderedPdf {
            file_name: self.file_name.clone(),
            page_count,
            bytes,
        })
    }

    /// Render and deliver.
    pub fn run(
        self,
        target: Option<&mut dyn Rasterizer>,
        runtime: &mut dyn DeliveryRuntime,
    ) -> Result<ExportReport, ExportError> {
        let rendered = self.render(target)?;
        let method = deliver(
            runtime,
            &rendered.file_name,
            &rendered.bytes,
            self.options.revoke_delay,
        )?;
        Ok(ExportReport {
            file_name: rendered.file_name,
            page_count: rendered.page_count,
            byte_len: rendered.bytes.len(),
            method,
        })
    }
}

/// Idle/Generating state machine guarding the export trigger.
#[derive(Clone, Debug, Default)]
pub struct ExportPipeline {
    state: ExportState,
    options: ExportOptions,
}

impl ExportPipeline {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            state: ExportState::Idle,
            options,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn is_generating(&self) -> bool {
        self.state == ExportState::Generating
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Accept a trigger. Returns `None` while another export is running.
    pub fn begin(&mut self, snapshot: DocumentSnapshot) -> Option<ExportJob> {
        if self.is_generating() {
            log::warn!("export already in progress; ignoring trigger");
            return None;
        }
        self.state = ExportState::Generating;
        let job = ExportJob::new(snapshot, self.options);
        log::info!("export started: {}", job.file_name());
        Some(job)
    }

    /// Accept a trigger for the planner's active episode.
    pub fn begin_for(&mut self, planner: &Planner) -> Option<ExportJob> {
        self.begin(planner.snapshot())
    }

    /// Complete the running export and return to `Idle`.
    pub fn finish(&mut self, result: Result<ExportReport, ExportError>) -> ExportOutcome {
        self.state = ExportState::Idle;
        match result {
            Ok(report) => {
                log::info!(
                    "export finished: {} ({} page(s), {} bytes, {:?})",
                    report.file_name,
                    report.page_count,
                    report.byte_len,
                    report.method
                );
                ExportOutcome::Delivered(report)
            }
            Err(err) => {
                log::error!("export failed: {}", err);
                ExportOutcome::Failed(err)
            }
        }
    }

    /// Run a whole export synchronously.
    pub fn export(
        &mut self,
        snapshot: DocumentSnapshot,
        target: Option<&mut dyn Rasterizer>,
        runtime: &mut dyn DeliveryRuntime,
    ) -> ExportOutcome {
        let Some(job) = self.begin(snapshot) else {
            return ExportOutcome::Ignored;
        };
        let result = job.run(target, runtime);
        self.finish(result)
    }

    /// Run a whole export, waiting `settle_delay` before rasterizing.
    #[cfg(feature = "async")]
    pub async fn export_async(
        &mut self,
        snapshot: DocumentSnapshot,
        target: Option<&mut dyn Rasterizer>,
        runtime: &mut dyn DeliveryRuntime,
    ) -> ExportOutcome {
        let Some(job) = self.begin(snapshot) else {
            return ExportOutcome::Ignored;
        };
        tokio::time::sleep(job.options().settle_delay).await;
        let result = job.run(target, runtime);
        self.finish(result)
    }
}
