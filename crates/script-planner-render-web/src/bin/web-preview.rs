use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use script_planner::export::deliver;
use script_planner::{EditorEvent, ExportOptions, ExportState, Planner};
use script_planner_render_web::{BrowserRuntime, PagePayload};

const DEFAULT_OUT_PATH: &str = "target/web-preview/index.html";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) Chrome/126.0 Safari/537.36";

#[derive(Clone, Debug)]
struct Args {
    out_path: PathBuf,
    events_path: Option<PathBuf>,
    pdf_path: Option<PathBuf>,
    user_agent: String,
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
    let cli = parse_args(args)?;
    let mut planner = Planner::new();
    if let Some(path) = &cli.events_path {
        let events = load_events(path)?;
        let count = events.len();
        for event in events {
            planner.apply(event);
        }
        println!("applied {} event(s) from {}", count, path.display());
    }

    let options = ExportOptions::default();
    let mut payload = PagePayload::build(&planner.snapshot(), ExportState::Idle);
    if let Some(path) = &cli.pdf_path {
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let file_name = script_planner::export_file_name(
            planner.week_number(),
            planner.week_title(),
            planner.episode(),
        );
        let mut runtime = BrowserRuntime::new(cli.user_agent.clone());
        let method = deliver(&mut runtime, &file_name, &bytes, options.revoke_delay)
            .map_err(|e| e.to_string())?;
        println!("embedded {} as {:?}", file_name, method);
        payload = payload.with_actions(runtime.take_actions());
    }

    let html = payload.to_html(&options).map_err(|e| e.to_string())?;
    if let Some(parent) = cli.out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    std::fs::write(&cli.out_path, html).map_err(|e| e.to_string())?;
    println!(
        "wrote web preview to {} (episode={}, sections={}, total={} / {})",
        cli.out_path.display(),
        planner.episode().number(),
        payload.editor.cards.len(),
        payload.editor.summary.actual,
        payload.editor.summary.target,
    );
    Ok(())
}

fn load_events(path: &Path) -> Result<Vec<EditorEvent>, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path.display(), e))
}

fn parse_args(args: Vec<String>) -> Result<Args, String> {
    let mut cfg = Args {
        out_path: PathBuf::from(DEFAULT_OUT_PATH),
        events_path: None,
        pdf_path: None,
        user_agent: DEFAULT_USER_AGENT.to_string(),
    };
    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("missing value for {}", name))
        };
        match arg.as_str() {
            "--out" => cfg.out_path = PathBuf::from(value("--out")?),
            "--events" => cfg.events_path = Some(PathBuf::from(value("--events")?)),
            "--pdf" => cfg.pdf_path = Some(PathBuf::from(value("--pdf")?)),
            "--user-agent" => cfg.user_agent = value("--user-agent")?,
            "-h" | "--help" => {
                println!("{}", help_text());
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    if cfg.out_path.as_os_str().is_empty() {
        return Err("--out must not be empty".to_string());
    }
    Ok(cfg)
}

fn help_text() -> &'static str {
    "usage: web-preview [--out PATH] [--events EVENTS.json] [--pdf FILE.pdf] [--user-agent UA]\n\
     \n\
     --events  JSON array of editor events applied before rendering\n\
     --pdf     existing PDF embedded as a download link"
}
