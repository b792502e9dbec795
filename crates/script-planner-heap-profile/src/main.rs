//! DHAT heap profiler for the script-planner export path.
//!
//! Profiles allocation patterns of one export at growing script lengths:
//! layout -> raster -> pdf, or all of them in one pass.
//!
//! Usage:
//!   cargo run -p script-planner-heap-profile --release -- [OPTIONS] [CHARS...]
//!
//! Outputs dhat-<phase>-<chars>.json files in the output directory (default: target/memory).
//! Open in https://nnethercote.github.io/dh_view/dh_view.html

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::process::Command;

use script_planner::{Episode, ExportJob, ExportOptions, Planner};
use script_planner_embedded_graphics::EgRasterizer;
use script_planner_render::{HeuristicMeasurer, LayoutConfig, PrintLayoutEngine, PrintView};

const DEFAULT_SIZES: &[usize] = &[500, 5_000, 20_000];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Layout,
    Raster,
    Pdf,
}

impl Phase {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "layout" => Some(Self::Layout),
            "raster" => Some(Self::Raster),
            "pdf" | "full" => Some(Self::Pdf),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Raster => "raster",
            Self::Pdf => "pdf",
        }
    }
}

fn planner_with_chars(chars: usize) -> Planner {
    let mut planner = Planner::new();
    planner.set_week_number("2주차");
    planner.set_week_title("소방관");
    planner.select_episode(Episode::One);
    let sentence = "불길 속으로 뛰어드는 소방관의 모습을 따라갑니다. ";
    let body: String = sentence.chars().cycle().take(chars).collect();
    planner.update_script("movie", body);
    planner
}

fn profile_size(chars: usize, phase: Phase) {
    let snapshot = planner_with_chars(chars).snapshot();
    let options = ExportOptions::default();

    match phase {
        Phase::Layout => {
            let view = PrintView::from_snapshot(&snapshot);
            let engine = PrintLayoutEngine::new(
                LayoutConfig::for_surface(options.layout_width_px, options.scale),
                &HeuristicMeasurer,
            );
            let _layout = engine.layout(&view);
        }
        Phase::Raster => {
            let rasterizer = EgRasterizer::new();
            let layout = rasterizer.layout(&snapshot, &options);
            let _bitmap = rasterizer
                .paint(&layout, options.limits.max_raster_pixels)
                .unwrap_or_else(|e| panic!("paint {} chars: {}", chars, e));
        }
        Phase::Pdf => {
            let mut rasterizer = EgRasterizer::new();
            let job = ExportJob::new(snapshot, options);
            let rendered = job
                .render(Some(&mut rasterizer))
                .unwrap_or_else(|e| panic!("render {} chars: {}", chars, e));
            eprintln!(
                "    {} page(s), {} bytes",
                rendered.page_count,
                rendered.bytes.len()
            );
        }
    }
}

fn usage() {
    eprintln!("Usage: heap-profile [OPTIONS] [CHARS...]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --phase <phase>   layout|raster|pdf (default: pdf)");
    eprintln!("  --out-dir <dir>   Output directory (default: target/memory)");
    eprintln!("  --aggregate       Profile all sizes in one DHAT session");
    eprintln!("  -h, --help        Show this help");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut phase = Phase::Pdf;
    let mut out_dir = PathBuf::from("target/memory");
    let mut aggregate = false;
    let mut single_size_mode = false;
    let mut sizes: Vec<usize> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--phase" => {
                i += 1;
                let raw = args.get(i).map(String::as_str).unwrap_or("");
                phase = Phase::from_str(raw).unwrap_or_else(|| {
                    eprintln!("Unknown phase: {:?}", raw);
                    usage();
                    std::process::exit(1);
                });
            }
            "--out-dir" => {
                i += 1;
                out_dir = PathBuf::from(args.get(i).map(String::as_str).unwrap_or("target/memory"));
            }
            "--aggregate" => {
                aggregate = true;
            }
            "--single-size" => {
                // Child process mode: profile exactly one size with DHAT active.
                single_size_mode = true;
            }
            "--help" | "-h" => {
                usage();
                std::process::exit(0);
            }
            other => match other.parse::<usize>() {
                Ok(chars) => sizes.push(chars),
                Err(_) => {
                    eprintln!("Invalid character count: {}", other);
                    std::process::exit(1);
                }
            },
        }
        i += 1;
    }

    if sizes.is_empty() {
        sizes.extend_from_slice(DEFAULT_SIZES);
    }

    std::fs::create_dir_all(&out_dir).unwrap_or_else(|e| {
        eprintln!("Failed to create output dir {}: {}", out_dir.display(), e);
        std::process::exit(1);
    });

    let phase_name = phase.name();

    if single_size_mode {
        assert!(sizes.len() == 1, "--single-size expects exactly one size");
        let chars = sizes[0];
        let json_path = out_dir.join(format!("dhat-{phase_name}-{chars}.json"));

        let _profiler = dhat::Profiler::builder().file_name(json_path).build();

        profile_size(chars, phase);
        return;
    }

    if aggregate {
        let json_path = out_dir.join(format!("dhat-{phase_name}.json"));
        eprintln!(
            "heap-profile: phase={}, sizes={} (aggregate), out={}",
            phase_name,
            sizes.len(),
            out_dir.display()
        );

        let _profiler = dhat::Profiler::builder()
            .file_name(json_path.clone())
            .build();

        for &chars in &sizes {
            eprintln!("  profiling: {} chars", chars);
            profile_size(chars, phase);
        }

        eprintln!(
            "Done. Open {} in https://nnethercote.github.io/dh_view/dh_view.html",
            json_path.display()
        );
        return;
    }

    // One child process per size keeps each DHAT session clean.
    let self_exe = std::env::current_exe().unwrap_or_else(|e| {
        eprintln!("Failed to determine own executable path: {}", e);
        std::process::exit(1);
    });

    eprintln!(
        "heap-profile: phase={}, sizes={} (per-size), out={}",
        phase_name,
        sizes.len(),
        out_dir.display()
    );

    let mut any_failed = false;
    for &chars in &sizes {
        eprintln!(
            "  profiling: {} chars -> dhat-{}-{}.json",
            chars, phase_name, chars
        );

        let status = Command::new(&self_exe)
            .arg("--single-size")
            .arg("--phase")
            .arg(phase_name)
            .arg("--out-dir")
            .arg(&out_dir)
            .arg(chars.to_string())
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(s) => {
                eprintln!("    FAILED (exit {})", s.code().unwrap_or(-1));
                any_failed = true;
            }
            Err(e) => {
                eprintln!("    FAILED to spawn: {}", e);
                any_failed = true;
            }
        }
    }

    eprintln!();
    eprintln!("Profiles saved to {}:", out_dir.display());
    for &chars in &sizes {
        let json_path = out_dir.join(format!("dhat-{phase_name}-{chars}.json"));
        if json_path.exists() {
            eprintln!("  {}", json_path.display());
        }
    }
    eprintln!();
    eprintln!("Open in https://nnethercote.github.io/dh_view/dh_view.html");

    if any_failed {
        std::process::exit(1);
    }
}
