mod common;

use common::budget_alloc::BudgetAlloc;
use common::fixtures::{filled_planner, hangul_text, BlankRasterizer};
use script_planner::{EpisodeProgress, ExportJob, ExportOptions, Planner};

// A 1600x5000 RGB raster is 24000000 bytes; the PDF adds compressed copies of
// its slices. Keep the guardrail at twice the raster.
const EXPORT_BUDGET_BYTES: usize = 48 * 1024 * 1024;
// Editing allocates one record per episode plus the edited strings.
const EDIT_BUDGET_BYTES: usize = 256 * 1024;

#[global_allocator]
static ALLOC: BudgetAlloc = BudgetAlloc::new();

// One test per binary: the counting allocator is process-wide.
#[test]
fn export_and_editing_stay_under_budget() {
    check_export_budget();
    check_edit_budget();
}

fn check_export_budget() {
    let snapshot = filled_planner().snapshot();
    let job = ExportJob::new(snapshot, ExportOptions::default());
    let mut target = BlankRasterizer::new(5000);

    ALLOC.reset();
    let rendered = job.render(Some(&mut target)).expect("render");
    let peak = ALLOC.peak_bytes();

    assert_eq!(rendered.page_count, 3);
    assert!(
        peak <= EXPORT_BUDGET_BYTES,
        "export peak over budget: {} bytes ({:.1}MiB), budget: {}MiB",
        peak,
        peak as f64 / (1024.0 * 1024.0),
        EXPORT_BUDGET_BYTES / (1024 * 1024)
    );
    println!(
        "export peak_mib={:.1} allocs={} pdf_bytes={}",
        peak as f64 / (1024.0 * 1024.0),
        ALLOC.alloc_count(),
        rendered.bytes.len()
    );
}

fn check_edit_budget() {
    let text = hangul_text(2000);

    ALLOC.reset();
    let mut planner = Planner::new();
    for _ in 0..20 {
        planner.update_script("movie", text.as_str());
        let progress = EpisodeProgress::compute(&planner.snapshot());
        assert!(progress.total_actual_secs > 0);
    }
    let peak = ALLOC.peak_bytes();

    assert!(
        peak <= EDIT_BUDGET_BYTES,
        "edit peak over budget: {} bytes ({:.1}KiB), budget: {}KiB",
        peak,
        peak as f64 / 1024.0,
        EDIT_BUDGET_BYTES / 1024
    );
}
