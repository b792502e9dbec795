use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use script_planner::{
    DirectoryRuntime, Episode, ExportOptions, ExportOutcome, ExportPipeline, InterviewField,
    ObjectiveField, Planner,
};
use script_planner_embedded_graphics::{
    encode_png, EgRasterizer, FontBackend, MonoFontBackend, OutlineFontBackend,
};

#[derive(Clone, Debug)]
struct Args {
    out_dir: PathBuf,
    episode: Episode,
    week_number: String,
    week_title: String,
    script_chars: usize,
    scale: u32,
    font: Option<PathBuf>,
    bold_font: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let cfg = parse_args(args)?;
    std::fs::create_dir_all(&cfg.out_dir).map_err(|e| e.to_string())?;

    match (&cfg.font, &cfg.bold_font) {
        (Some(path), bold) => {
            let mut backend = OutlineFontBackend::from_file(path).map_err(|e| e.to_string())?;
            if let Some(bold) = bold {
                backend = backend.with_bold_file(bold).map_err(|e| e.to_string())?;
            }
            render(&cfg, EgRasterizer::with_backend(backend))
        }
        (None, Some(_)) => Err("--bold-font needs --font".to_string()),
        (None, None) => {
            eprintln!("warning: no --font given; Hangul draws as replacement glyphs");
            render(&cfg, EgRasterizer::<MonoFontBackend>::new())
        }
    }
}

fn render<B>(cfg: &Args, mut rasterizer: EgRasterizer<B>) -> Result<(), String>
where
    B: FontBackend + Sync,
{
    let planner = sample_planner(cfg);
    let options = ExportOptions {
        scale: cfg.scale,
        ..ExportOptions::default()
    };

    let layout = rasterizer.layout(&planner.snapshot(), &options);
    let bitmap = rasterizer
        .paint(&layout, options.limits.max_raster_pixels)
        .map_err(|e| e.to_string())?;
    let png = encode_png(&bitmap.into_raster_image().map_err(|e| e.to_string())?)
        .map_err(|e| e.to_string())?;
    let png_path = cfg.out_dir.join("print-view.png");
    std::fs::write(&png_path, png).map_err(|e| e.to_string())?;
    println!(
        "wrote {} ({}x{})",
        png_path.display(),
        layout.width,
        layout.height
    );

    let mut pipeline = ExportPipeline::new(options);
    let mut runtime = DirectoryRuntime::new(&cfg.out_dir);
    match pipeline.export(planner.snapshot(), Some(&mut rasterizer), &mut runtime) {
        ExportOutcome::Delivered(report) => {
            println!(
                "wrote {} ({} page(s), {} bytes)",
                runtime.path_for(&report.file_name).display(),
                report.page_count,
                report.byte_len
            );
            Ok(())
        }
        ExportOutcome::Failed(err) => Err(err.to_string()),
        ExportOutcome::Ignored => Err("export already running".to_string()),
    }
}

fn sample_planner(cfg: &Args) -> Planner {
    let mut planner = Planner::new();
    planner.set_week_number(cfg.week_number.clone());
    planner.set_week_title(cfg.week_title.clone());
    planner.select_episode(cfg.episode);

    for (idx, keyword) in ["희생", "훈련", "체력"].iter().enumerate() {
        planner.update_keyword("hook", idx, *keyword);
    }
    planner.update_objective(
        "objectives",
        ObjectiveField::Goal,
        "1. 소방관의 역할을 설명할 수 있다.\n2. 영화와 현실을 비교할 수 있다.",
    );
    planner.update_objective(
        "objectives",
        ObjectiveField::Content,
        "1. 직무 소개\n2. 구조 활동\n3. 장비와 안전 수칙",
    );
    planner.update_interview(
        "interview",
        InterviewField::Source,
        "https://www.youtube.com/watch?v=example",
    );

    let sentence = "연기가 짙어지는 건물 안으로 대원들이 진입합니다. ";
    let body: String = sentence
        .chars()
        .cycle()
        .take(cfg.script_chars)
        .collect();
    for section in cfg.episode.sections() {
        if section.is_timed_by_text() {
            planner.update_script(section.id, body.clone());
        }
    }
    planner
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    let mut cfg = Args {
        out_dir: PathBuf::from("target/print-preview"),
        episode: Episode::One,
        week_number: "2주차".to_string(),
        week_title: "소방관".to_string(),
        script_chars: 600,
        scale: 2,
        font: None,
        bold_font: None,
    };
    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("missing value for {}", name))
        };
        match arg.as_str() {
            "--out" => cfg.out_dir = PathBuf::from(value("--out")?),
            "--episode" => {
                let raw = value("--episode")?;
                let number: u8 = raw
                    .parse()
                    .map_err(|_| format!("invalid episode: {}", raw))?;
                cfg.episode = Episode::from_number(number)
                    .ok_or_else(|| format!("unknown episode: {}", raw))?;
            }
            "--font" => cfg.font = Some(PathBuf::from(value("--font")?)),
            "--bold-font" => cfg.bold_font = Some(PathBuf::from(value("--bold-font")?)),
            "--week" => cfg.week_number = value("--week")?,
            "--title" => cfg.week_title = value("--title")?,
            "--chars" => {
                let raw = value("--chars")?;
                cfg.script_chars = raw
                    .parse()
                    .map_err(|_| format!("invalid --chars: {}", raw))?;
            }
            "--scale" => {
                let raw = value("--scale")?;
                cfg.scale = raw
                    .parse()
                    .map_err(|_| format!("invalid --scale: {}", raw))?;
            }
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(cfg)
}

fn help_text() -> &'static str {
    "usage: print-preview [--out DIR] [--episode 1|2] [--week TEXT] [--title TEXT] \
     [--chars N] [--scale N] [--font TTF] [--bold-font TTF]"
}
