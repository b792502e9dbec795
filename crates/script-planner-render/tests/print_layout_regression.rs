use script_planner::{Episode, ObjectiveField, Planner};
use script_planner_render::{
    DrawCommand, HeuristicMeasurer, LayoutConfig, PrintLayout, PrintLayoutEngine, PrintView,
    TextMeasurer,
};

fn layout_for(planner: &Planner, scale: u32) -> PrintLayout {
    let view = PrintView::from_snapshot(&planner.snapshot());
    let engine = PrintLayoutEngine::new(LayoutConfig::for_surface(800, scale), &HeuristicMeasurer);
    engine.layout(&view)
}

fn filled_planner(movie_chars: usize) -> Planner {
    let mut planner = Planner::new();
    planner.set_week_number("2주차");
    planner.set_week_title("소방관");
    planner.update_keyword("hook", 0, "희생정신");
    planner.update_objective("objectives", ObjectiveField::Goal, "소방관의 역할을 설명할 수 있다.");
    planner.update_script("intro", "안녕하세요. 오늘은 재난 영화 속 소방관을 만나봅니다.");
    planner.update_script("movie", "불길 속으로 뛰어드는 장면. ".repeat(movie_chars / 14 + 1));
    planner
}

#[test]
fn empty_document_starts_with_title_and_ends_with_footer() {
    let layout = layout_for(&Planner::new(), 1);
    let lines: Vec<_> = layout.text_lines().collect();
    assert_eq!(lines.first(), Some(&"1차시 원고"));
    assert_eq!(
        lines.last(),
        Some(&"재난영화로 알아보는 직업이야기 - 나레이션 원고")
    );
    assert_eq!(layout.width, 800);
    assert!(layout.height > 0);
}

#[test]
fn every_command_stays_inside_the_surface() {
    let planner = filled_planner(3000);
    let layout = layout_for(&planner, 2);
    let config = LayoutConfig::for_surface(800, 2);
    let right_edge = (config.width_px - config.padding_px) as i32;

    for command in &layout.commands {
        assert!(command.bottom() <= layout.height as i32, "{:?}", command);
        match command {
            DrawCommand::Text(text) => {
                let width = HeuristicMeasurer.measure_text_px(&text.text, &text.style) as i32;
                assert!(text.x + width <= right_edge, "{:?}", text);
            }
            DrawCommand::Rule(rule) => assert!(rule.x + rule.length as i32 <= right_edge),
            DrawCommand::Rect(rect) => assert!(rect.x + rect.width as i32 <= right_edge),
        }
    }
}

#[test]
fn commands_are_painted_top_to_bottom() {
    let layout = layout_for(&filled_planner(500), 1);
    let tops: Vec<i32> = layout
        .commands
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Rule(rule) => Some(rule.y),
            _ => None,
        })
        .collect();
    assert!(tops.windows(2).all(|w| w[0] < w[1]));
    // header rule plus one rule per section
    assert_eq!(tops.len(), 1 + Episode::One.sections().len());
}

#[test]
fn script_sections_get_a_background_box() {
    let layout = layout_for(&filled_planner(200), 1);
    let boxes = layout
        .commands
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::Rect(_)))
        .count();
    // intro and movie carry text
    assert_eq!(boxes, 2);
}

#[test]
fn longer_scripts_make_a_taller_surface() {
    let short = layout_for(&filled_planner(200), 2);
    let long = layout_for(&filled_planner(6000), 2);
    assert!(long.height > short.height * 2);
}

#[test]
fn scale_doubles_the_surface() {
    let planner = filled_planner(1000);
    let one = layout_for(&planner, 1);
    let two = layout_for(&planner, 2);
    assert_eq!(two.width, one.width * 2);
    assert!(two.height > one.height * 3 / 2);
    assert!(two.height < one.height * 3);
}
