mod common;

use common::bar_font::bar_font;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use script_planner::{ExportOptions, Planner, Rasterizer};
use script_planner_embedded_graphics::{
    EgRasterizer, EgRenderer, EgTextMeasurer, FontBackend, OutlineFontBackend, RgbBitmap,
};
use script_planner_render::{
    palette, DrawCommand, PrintLayout, TextCommand, TextMeasurer, TextStyle,
};

const FIRE_SCRIPT: &str = "소방관은 불길 속으로 들어간다";
const POLICE_SCRIPT: &str = "경찰관은 물길 밖으로 나온다다";

fn planner_with(script: &str) -> Planner {
    let mut planner = Planner::new();
    planner.set_week_number("3주차");
    planner.set_week_title("구조대");
    planner.update_keyword("hook", 0, "협동");
    planner.update_script("movie", script);
    planner
}

fn text_of(layout: &PrintLayout) -> String {
    layout
        .commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}

/// Face with a glyph for every character either print view draws.
fn covering_backend(options: &ExportOptions) -> OutlineFontBackend {
    let mono = EgRasterizer::new();
    let mut chars = String::new();
    for script in [FIRE_SCRIPT, POLICE_SCRIPT] {
        chars.push_str(&text_of(&mono.layout(&planner_with(script).snapshot(), options)));
    }
    OutlineFontBackend::from_vec(bar_font(chars.chars())).expect("face")
}

fn style(size_px: u32, bold: bool) -> TextStyle {
    TextStyle {
        size_px,
        line_height_px: size_px,
        bold,
        color: palette::NEUTRAL_900,
    }
}

#[test]
fn different_hangul_scripts_rasterize_to_different_bitmaps() {
    let options = ExportOptions::default();
    let mut rasterizer = EgRasterizer::with_backend(covering_backend(&options));

    let fire = rasterizer
        .rasterize(&planner_with(FIRE_SCRIPT).snapshot(), &options)
        .expect("rasterize");
    let police = rasterizer
        .rasterize(&planner_with(POLICE_SCRIPT).snapshot(), &options)
        .expect("rasterize");

    assert_eq!(fire.width(), 1600);
    assert_eq!((fire.width(), fire.height()), (police.width(), police.height()));
    assert_ne!(fire.as_rgb(), police.as_rgb());
}

#[test]
fn outline_face_covers_what_the_mono_faces_cannot() {
    let options = ExportOptions::default();
    let snapshot = planner_with(FIRE_SCRIPT).snapshot();

    let mono = EgRasterizer::new();
    let mono_layout = mono.layout(&snapshot, &options);
    assert!(mono.missing_glyphs(&mono_layout) >= FIRE_SCRIPT.chars().count() - 3);

    let outline = EgRasterizer::with_backend(covering_backend(&options));
    let outline_layout = outline.layout(&snapshot, &options);
    assert_eq!(outline.missing_glyphs(&outline_layout), 0);
    assert!(text_of(&outline_layout).contains("소방관은"));
}

#[test]
fn layout_is_measured_with_the_drawing_face() {
    let backend = OutlineFontBackend::from_vec(bar_font("소방관 ".chars())).expect("face");
    let regular = backend.resolve_font(&style(14, false)).font_id;
    let bold = backend.resolve_font(&style(14, true)).font_id;

    // One em per syllable, half an em per space.
    assert_eq!(backend.text_width(regular, "소방관"), 42);
    assert_eq!(backend.text_width(regular, "소 방"), 35);
    assert_eq!(backend.text_width(bold, "소방관"), 43);
    assert_eq!(backend.text_width(regular, ""), 0);

    let measurer = EgTextMeasurer::new(&backend);
    assert_eq!(measurer.measure_text_px("소방관", &style(14, false)), 42);
    assert!(backend.covers('소'));
    assert!(!backend.covers('경'));
}

#[test]
fn glyph_outline_is_inked_below_the_ascent() {
    let backend = OutlineFontBackend::from_vec(bar_font("가".chars())).expect("face");
    let renderer = EgRenderer::with_backend(backend);
    let layout = PrintLayout {
        width: 120,
        height: 100,
        background: Some(palette::WHITE),
        commands: vec![DrawCommand::Text(TextCommand {
            x: 0,
            y: 0,
            text: "가".to_string(),
            style: style(100, false),
        })],
    };
    let mut bitmap = RgbBitmap::new(120, 100, Rgb888::BLACK);
    renderer.render_layout(&layout, &mut bitmap).expect("render");

    // Glyph 1 is a single bar spanning x 6..12 and the 70 px above the baseline at y 80.
    let ink = Rgb888::new(
        palette::NEUTRAL_900.r,
        palette::NEUTRAL_900.g,
        palette::NEUTRAL_900.b,
    );
    assert_eq!(bitmap.pixel(9, 50), Some(ink));
    assert_eq!(bitmap.pixel(9, 12), Some(ink));
    assert_eq!(bitmap.pixel(9, 5), Some(Rgb888::WHITE));
    assert_eq!(bitmap.pixel(9, 90), Some(Rgb888::WHITE));
    assert_eq!(bitmap.pixel(30, 50), Some(Rgb888::WHITE));
}
