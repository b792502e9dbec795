mod common;

use common::fixtures::{filled_planner, hangul_text};
use script_planner::{
    counted_chars, estimate_secs, EditorEvent, Episode, EpisodeProgress, InterviewField,
    ObjectiveField, Planner, Tier,
};

#[test]
fn switching_episodes_and_back_keeps_both_records() {
    let mut planner = filled_planner();
    let before_one = planner.script_for(Episode::One).clone();
    let before_two = planner.script_for(Episode::Two).clone();

    planner.select_episode(Episode::Two);
    planner.select_episode(Episode::One);
    planner.select_episode(Episode::Two);
    planner.select_episode(Episode::One);

    assert_eq!(planner.script_for(Episode::One), &before_one);
    assert_eq!(planner.script_for(Episode::Two), &before_two);
    assert_eq!(planner.week_number(), "2주차");
}

#[test]
fn episodes_with_shared_section_ids_do_not_share_text() {
    let mut planner = Planner::new();
    planner.update_script("intro", "첫 번째 차시 인사");
    planner.select_episode(Episode::Two);
    assert_eq!(planner.current().script("intro"), "");
    planner.update_script("intro", "두 번째 차시 인사");
    planner.select_episode(Episode::One);
    assert_eq!(planner.current().script("intro"), "첫 번째 차시 인사");
}

#[test]
fn keyword_edit_leaves_other_slots_and_sections_alone() {
    let mut planner = filled_planner();
    let before = planner.current().clone();
    assert!(planner.update_keyword("hook", 4, "신속한 판단력"));

    let after = planner.current();
    for idx in 0..4 {
        assert_eq!(after.keywords("hook")[idx], before.keywords("hook")[idx]);
    }
    assert_eq!(after.keywords("hook")[4], "신속한 판단력");
    assert_eq!(after.script("movie"), before.script("movie"));
    assert_eq!(after.objective("objectives"), before.objective("objectives"));
}

#[test]
fn host_events_deserialize_and_apply() {
    let raw = r#"[
        {"type": "set_week_number", "value": "3주차"},
        {"type": "select_episode", "episode": 2},
        {"type": "set_script", "section": "lecture", "text": "본강의 원고"},
        {"type": "set_keyword", "section": "hook", "index": 0, "value": "용기"},
        {"type": "set_objective", "section": "objectives", "field": "content", "value": "1. 장비"},
        {"type": "set_interview", "section": "interview", "field": "content", "value": "현장 이야기"}
    ]"#;
    let events: Vec<EditorEvent> = serde_json::from_str(raw).expect("events");
    let mut planner = Planner::new();
    for event in events {
        planner.apply(event);
    }

    assert_eq!(planner.episode(), Episode::Two);
    assert_eq!(planner.week_number(), "3주차");
    let script = planner.current();
    assert_eq!(script.script("lecture"), "본강의 원고");
    assert_eq!(script.keywords("hook")[0], "용기");
    assert_eq!(script.objective("objectives").content, "1. 장비");
    assert_eq!(script.objective("objectives").goal, "");
    assert_eq!(script.interview("interview").content, "현장 이야기");
    assert_eq!(planner.script_for(Episode::One).script("lecture"), "");
}

#[test]
fn unknown_episode_number_is_rejected() {
    let raw = r#"{"type": "select_episode", "episode": 3}"#;
    assert!(serde_json::from_str::<EditorEvent>(raw).is_err());
}

#[test]
fn estimator_counts_non_whitespace_only() {
    assert_eq!(estimate_secs(""), 0);
    assert_eq!(estimate_secs(" \n\t "), 0);
    assert_eq!(counted_chars("가 나\n다"), 3);
    assert_eq!(estimate_secs(&hangul_text(725)), 120);
    assert!(estimate_secs(&hangul_text(100)) <= estimate_secs(&hangul_text(101)));
}

#[test]
fn movie_section_at_5430_chars_is_on_target() {
    let progress = EpisodeProgress::compute(&filled_planner().snapshot());
    let movie = progress.section("movie").expect("movie");
    assert_eq!(movie.char_count, 5430);
    assert_eq!(movie.actual_secs, 899);
    assert_eq!(movie.percent, 100);
    assert_eq!(movie.tier, Tier::OnTarget);
    assert_eq!(movie.overage_secs(), None);
}

#[test]
fn movie_section_at_950_seconds_is_over_budget() {
    let mut planner = Planner::new();
    planner.update_script("movie", hangul_text(5739));
    let progress = EpisodeProgress::compute(&planner.snapshot());
    let movie = progress.section("movie").expect("movie");
    assert_eq!(movie.actual_secs, 950);
    assert_eq!(movie.percent, 106);
    assert_eq!(movie.tier, Tier::Over);
    assert_eq!(movie.overage_secs(), Some(50));
}

#[test]
fn totals_cover_the_active_catalog() {
    let planner = filled_planner();
    let progress = EpisodeProgress::compute(&planner.snapshot());
    assert_eq!(progress.sections.len(), Episode::One.sections().len());
    assert_eq!(progress.total_target_secs, 1510);
    assert_eq!(progress.total_actual_secs, 10 + 30 + 60 + 20 + 899 + 10);
    assert_eq!(progress.percent, 68);
    assert_eq!(progress.tier, Tier::Under);
    assert_eq!(progress.overage_secs(), None);

    for section in &progress.sections {
        if !section.section.is_timed_by_text() {
            assert_eq!(section.actual_secs, section.target_secs, "{}", section.section.id);
        }
    }
}

#[test]
fn interview_episode_counts_interview_at_target() {
    let mut planner = Planner::new();
    planner.select_episode(Episode::Two);
    planner.update_interview("interview", InterviewField::Content, "아주 긴 인터뷰 내용");
    planner.update_objective("objectives", ObjectiveField::Goal, "목표");
    let progress = EpisodeProgress::compute(&planner.snapshot());
    assert_eq!(progress.total_actual_secs, 10 + 30 + 20 + 600 + 10);
    assert_eq!(progress.percent, 42);
}
