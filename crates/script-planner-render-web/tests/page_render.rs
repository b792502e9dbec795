use std::time::Duration;

use script_planner::export::deliver;
use script_planner::{DeliveryMethod, Episode, ExportOptions, ExportState, Planner};
use script_planner_render_web::{render_page, BrowserRuntime, PagePayload, STATE_ELEMENT_ID};

fn sample_planner() -> Planner {
    let mut planner = Planner::new();
    planner.set_week_number("2주차");
    planner.set_week_title("소방관 <특집>");
    planner.update_keyword("hook", 1, "팀워크");
    planner.update_script("intro", "안녕하세요.\n오늘은 </script> 태그가 들어간 원고입니다.");
    planner
}

#[test]
fn editor_page_lists_every_card_of_the_active_episode() {
    let planner = sample_planner();
    let html = render_page(&planner.snapshot(), ExportState::Idle, &ExportOptions::default())
        .expect("render");
    for section in Episode::One.sections() {
        assert!(
            html.contains(&format!("data-section=\"{}\"", section.id)),
            "missing {}",
            section.id
        );
    }
    assert!(html.contains("PDF 다운로드"));
    assert!(html.contains("소방관 &lt;특집&gt;"));
    assert!(html.contains(r#"class="active">1차시 (25분)"#));
}

#[test]
fn state_script_survives_hostile_text() {
    let planner = sample_planner();
    let html = render_page(&planner.snapshot(), ExportState::Idle, &ExportOptions::default())
        .expect("render");
    let marker = format!("id=\"{}\">", STATE_ELEMENT_ID);
    let start = html.find(&marker).expect("state element") + marker.len();
    let end = start + html[start..].find("</script>").expect("closing tag");
    let json = html[start..end].replace("<\\/", "</");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(
        value["editor"]["week_title"]["value"],
        serde_json::json!("소방관 <특집>")
    );
    assert_eq!(value["print"]["title"], serde_json::json!("2주차 소방관 <특집> 1차시 원고"));
}

#[test]
fn busy_export_disables_the_button() {
    let html = render_page(
        &Planner::new().snapshot(),
        ExportState::Generating,
        &ExportOptions::default(),
    )
    .expect("render");
    assert!(html.contains(r#"<button id="export" disabled>PDF 생성 중...</button>"#));
}

#[test]
fn print_view_uses_the_layout_width() {
    let options = ExportOptions {
        layout_width_px: 640,
        ..ExportOptions::default()
    };
    let html =
        render_page(&Planner::new().snapshot(), ExportState::Idle, &options).expect("render");
    assert!(html.contains("width: 640px"));
    assert!(html.contains("재난영화로 알아보는 직업이야기 - 나레이션 원고"));
}

const SAFARI_IOS: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
    AppleWebKit/605.1.15 Mobile Safari/604.1";
const CHROME_LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

fn delivered_page(user_agent: &str) -> (DeliveryMethod, String) {
    let mut runtime = BrowserRuntime::new(user_agent);
    let method = deliver(
        &mut runtime,
        "2주차_소방관_1차시.pdf",
        b"%PDF-1.4",
        Duration::from_millis(100),
    )
    .expect("deliver");
    let actions = runtime.take_actions();
    assert_eq!(actions.len(), 1);
    assert!(runtime.actions().is_empty());

    let html = PagePayload::build(&sample_planner().snapshot(), ExportState::Idle)
        .with_actions(actions)
        .to_html(&ExportOptions::default())
        .expect("render");
    (method, html)
}

#[test]
fn safari_export_embeds_an_object_url_download() {
    let (method, html) = delivered_page(SAFARI_IOS);
    assert_eq!(method, DeliveryMethod::ObjectUrl);

    let downloads = &html[html.find(r#"<div class="downloads">"#).expect("downloads")..];
    assert!(downloads.contains(r#"atob("JVBERi0xLjQ=")"#));
    assert!(downloads.contains("URL.createObjectURL(new Blob([bytes]"));
    assert!(downloads.contains(r#"link.download = "2주차_소방관_1차시.pdf";"#));
    assert!(downloads.contains("link.click();"));
    assert!(downloads.contains("URL.revokeObjectURL(url);\n  }, 100);"));
    assert!(!downloads.contains(r#"href="data:"#));
}

#[test]
fn direct_save_and_object_url_pages_differ() {
    let (safari_method, safari) = delivered_page(SAFARI_IOS);
    let (chrome_method, chrome) = delivered_page(CHROME_LINUX);
    assert_ne!(safari_method, chrome_method);
    assert_ne!(safari, chrome);

    assert_eq!(chrome_method, DeliveryMethod::DirectSave);
    assert!(chrome.contains(
        r#"<a href="data:application/pdf;base64,JVBERi0xLjQ=" download="2주차_소방관_1차시.pdf">"#
    ));
    assert!(!chrome.contains("createObjectURL"));
    assert!(!chrome.contains("revokeObjectURL"));
}
