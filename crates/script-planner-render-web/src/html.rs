//! Static HTML for the editor and print views.

use std::borrow::Cow;
use std::fmt::Write as _;

use script_planner::Tier;
use script_planner_render::{
    palette, tier_color, CardInput, EditorView, PrintView, SectionCard, TextField,
};

/// Element id of the embedded JSON state.
pub const STATE_ELEMENT_ID: &str = "planner-state";

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Make a JSON document safe inside a `<script>` element.
pub fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}

/// CSS class carrying a tier's accent color.
pub fn tier_class(tier: Tier) -> &'static str {
    match tier {
        Tier::Under => "tier-under",
        Tier::OnTarget => "tier-on-target",
        Tier::Over => "tier-over",
    }
}

fn stylesheet() -> String {
    format!(
        r#"
    * {{ box-sizing: border-box; }}
    body {{ margin: 0; background: {bg}; color: {ink}; font-family: "Pretendard", "Noto Sans KR", sans-serif; }}
    main {{ max-width: 960px; margin: 0 auto; padding: 32px 16px; }}
    header h1 {{ margin: 0; font-size: 24px; }}
    header p {{ margin: 4px 0 16px; color: {muted}; }}
    .meta {{ display: flex; gap: 8px; margin-bottom: 16px; }}
    .meta input {{ flex: 1; padding: 8px; border: 1px solid {line}; border-radius: 6px; }}
    .tabs {{ display: flex; gap: 8px; margin-bottom: 16px; }}
    .tabs button {{ padding: 8px 16px; border: 1px solid {line}; border-radius: 6px; background: {panel}; }}
    .tabs button.active {{ background: {ink}; color: {panel}; }}
    .summary, .card, .guide {{ background: {panel}; border: 1px solid {line}; border-radius: 8px; padding: 16px; margin-bottom: 16px; }}
    .bar {{ height: 6px; background: {track}; border-radius: 3px; overflow: hidden; }}
    .bar > span {{ display: block; height: 100%; background: currentColor; }}
    .badge {{ font-size: 12px; padding: 2px 6px; border-radius: 4px; background: {track}; color: {muted}; }}
    .note {{ color: {muted}; font-size: 13px; }}
    textarea {{ width: 100%; min-height: 120px; padding: 8px; border: 1px solid {line}; border-radius: 6px; }}
    .chips span {{ display: inline-block; margin: 4px 4px 0 0; padding: 2px 8px; border-radius: 12px; background: {track}; }}
    .tier-under {{ color: {under}; }}
    .tier-on-target {{ color: {on_target}; }}
    .tier-over {{ color: {over}; }}
    .export button[disabled] {{ opacity: 0.6; }}
"#,
        bg = palette::NEUTRAL_50.to_hex(),
        ink = palette::NEUTRAL_900.to_hex(),
        muted = palette::NEUTRAL_500.to_hex(),
        line = palette::NEUTRAL_200.to_hex(),
        panel = palette::WHITE.to_hex(),
        track = palette::NEUTRAL_100.to_hex(),
        under = tier_color(Tier::Under, palette::NEUTRAL_400).to_hex(),
        on_target = tier_color(Tier::OnTarget, palette::NEUTRAL_400).to_hex(),
        over = tier_color(Tier::Over, palette::NEUTRAL_400).to_hex(),
    )
}

fn text_input(out: &mut String, name: &str, field: &TextField) {
    let _ = write!(
        out,
        r#"<input name="{}" value="{}" placeholder="{}" />"#,
        escape_html(name),
        escape_html(&field.value),
        escape_html(field.placeholder)
    );
}

fn text_area(out: &mut String, name: &str, value: &str, placeholder: &str) {
    let _ = write!(
        out,
        r#"<textarea name="{}" placeholder="{}">{}</textarea>"#,
        escape_html(name),
        escape_html(placeholder),
        escape_html(value)
    );
}

fn progress_bar(out: &mut String, tier: Tier, bar_percent: u32) {
    let _ = write!(
        out,
        r#"<div class="bar {}"><span style="width: {}%"></span></div>"#,
        tier_class(tier),
        bar_percent
    );
}

fn render_card(out: &mut String, card: &SectionCard) {
    let _ = write!(
        out,
        r#"<section class="card" data-section="{}"><div class="card-head"><span class="index">{}</span> <strong>{}</strong>"#,
        escape_html(card.id),
        escape_html(&card.index_label),
        escape_html(card.name)
    );
    if let Some(badge) = card.badge {
        let _ = write!(out, r#" <span class="badge">{}</span>"#, escape_html(badge));
    }
    if let Some(note) = card.note {
        let _ = write!(out, r#" <span class="note">({})</span>"#, escape_html(note));
    }
    let _ = write!(
        out,
        r#"<span class="time {}">{} ({}%)</span></div>"#,
        tier_class(card.tier),
        escape_html(&card.time_label),
        card.percent
    );
    progress_bar(out, card.tier, card.bar_percent);

    for input in &card.inputs {
        match input {
            CardInput::FreeText {
                value,
                placeholder,
                char_count_label,
                status,
            } => {
                text_area(out, &format!("{}.script", card.id), value, placeholder);
                let _ = write!(
                    out,
                    r#"<div class="counter">{}"#,
                    escape_html(char_count_label)
                );
                if let Some(status) = status {
                    let _ = write!(
                        out,
                        r#" <span class="{}">{}</span>"#,
                        tier_class(card.tier),
                        escape_html(status)
                    );
                }
                out.push_str("</div>");
            }
            CardInput::Keywords {
                title,
                help,
                slots,
                chips,
            } => {
                let _ = write!(
                    out,
                    r#"<div class="keywords"><h3>{}</h3><p class="note">{}</p>"#,
                    escape_html(title),
                    escape_html(help)
                );
                for slot in slots {
                    let _ = write!(
                        out,
                        r#"<input name="{}.keyword.{}" value="{}" placeholder="{}" />"#,
                        escape_html(card.id),
                        slot.index,
                        escape_html(&slot.value),
                        escape_html(&slot.placeholder)
                    );
                }
                if !chips.is_empty() {
                    out.push_str(r#"<div class="chips">"#);
                    for chip in chips {
                        let _ = write!(out, "<span>{}</span>", escape_html(chip));
                    }
                    out.push_str("</div>");
                }
                out.push_str("</div>");
            }
            CardInput::Interview {
                content_label,
                content,
                source_label,
                source,
            } => {
                let _ = write!(out, "<label>{}</label>", escape_html(content_label));
                text_area(
                    out,
                    &format!("{}.interview.content", card.id),
                    &content.value,
                    content.placeholder,
                );
                let _ = write!(out, "<label>{}</label>", escape_html(source_label));
                text_input(out, &format!("{}.interview.source", card.id), source);
            }
            CardInput::Objectives {
                goal_label,
                goal,
                content_label,
                content,
            } => {
                let _ = write!(out, "<label>{}</label>", escape_html(goal_label));
                text_area(
                    out,
                    &format!("{}.objective.goal", card.id),
                    &goal.value,
                    goal.placeholder,
                );
                let _ = write!(out, "<label>{}</label>", escape_html(content_label));
                text_area(
                    out,
                    &format!("{}.objective.content", card.id),
                    &content.value,
                    content.placeholder,
                );
            }
        }
    }
    out.push_str("</section>\n");
}

/// Editor page body, without the document shell.
pub fn render_editor_body(view: &EditorView) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let _ = write!(
        out,
        "<header><h1>{}</h1><p>{}</p></header>\n",
        escape_html(view.title),
        escape_html(view.subtitle)
    );

    out.push_str(r#"<div class="meta">"#);
    text_input(&mut out, "week_number", &view.week_number);
    text_input(&mut out, "week_title", &view.week_title);
    out.push_str("</div>\n");

    out.push_str(r#"<nav class="tabs">"#);
    for tab in &view.tabs {
        let _ = write!(
            out,
            r#"<button data-episode="{}"{}>{}</button>"#,
            tab.episode,
            if tab.active { r#" class="active""# } else { "" },
            escape_html(tab.label)
        );
    }
    out.push_str("</nav>\n");

    let summary = &view.summary;
    let _ = write!(
        out,
        r#"<div class="summary"><span>{}</span> <strong class="{}">{} / {} ({}%)</strong>"#,
        escape_html(summary.caption),
        tier_class(summary.tier),
        escape_html(&summary.actual),
        escape_html(&summary.target),
        summary.percent
    );
    progress_bar(&mut out, summary.tier, summary.bar_percent);
    if let Some(overage) = &summary.overage {
        let _ = write!(
            out,
            r#"<p class="{}">{}</p>"#,
            tier_class(Tier::Over),
            escape_html(overage)
        );
    }
    out.push_str("</div>\n");

    for card in &view.cards {
        render_card(&mut out, card);
    }

    let _ = write!(
        out,
        r#"<div class="guide"><h2>{}</h2><ul>"#,
        escape_html(view.guide_title)
    );
    for item in &view.guide {
        out.push_str("<li>");
        if let Some(emphasis) = item.emphasis {
            let _ = write!(out, "<strong>{}</strong> ", escape_html(emphasis));
        }
        out.push_str(&escape_html(item.text));
        out.push_str("</li>");
    }
    out.push_str("</ul></div>\n");

    let _ = write!(
        out,
        r#"<div class="export"><button id="export"{}>{}</button></div>"#,
        if view.export_button.disabled {
            " disabled"
        } else {
            ""
        },
        escape_html(view.export_button.label)
    );
    out
}

/// Print view markup, sized to the print surface width.
pub fn render_print_body(view: &PrintView, width_px: u32) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let _ = write!(
        out,
        r#"<article class="print" style="width: {}px; padding: 32px; background: {}">"#,
        width_px,
        palette::WHITE.to_hex()
    );
    let _ = write!(
        out,
        "<h1>{}</h1><p>{}</p><hr />",
        escape_html(&view.title),
        escape_html(&view.summary)
    );
    for section in &view.sections {
        let _ = write!(out, "<section><h2>{}", escape_html(&section.heading));
        if let Some(note) = &section.note {
            let _ = write!(out, r#" <span class="note">{}</span>"#, escape_html(note));
        }
        let _ = write!(
            out,
            r#"</h2><p class="time">{}</p>"#,
            escape_html(&section.time_label)
        );
        for field in &section.fields {
            let _ = write!(
                out,
                "<p><strong>{}</strong> {}</p>",
                escape_html(&field.label),
                escape_html(&field.value)
            );
        }
        if let Some(script) = &section.script {
            let _ = write!(
                out,
                r#"<div class="script" style="white-space: pre-wrap; background: {}">{}</div>"#,
                palette::NEUTRAL_50.to_hex(),
                escape_html(script)
            );
        }
        out.push_str("<hr /></section>");
    }
    let _ = write!(
        out,
        r#"<footer class="note">{}</footer></article>"#,
        escape_html(&view.footer)
    );
    out
}

/// Full editor document with the print view and the JSON state embedded.
///
/// The print view sits off screen, where a browser host rasterizes it.
pub fn build_html(
    editor: &EditorView,
    print: &PrintView,
    print_width_px: u32,
    state_json: &str,
) -> String {
    let mut out = String::with_capacity(32 * 1024);
    let _ = write!(
        out,
        "<!doctype html>\n<html lang=\"ko\">\n<head>\n  <meta charset=\"utf-8\" />\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n  \
         <title>{}</title>\n  <style>{}</style>\n</head>\n<body>\n<main>\n",
        escape_html(editor.title),
        stylesheet()
    );
    out.push_str(&render_editor_body(editor));
    out.push_str("\n</main>\n");
    out.push_str(r#"<div id="print-root" style="position: absolute; left: -9999px; top: 0">"#);
    out.push_str(&render_print_body(print, print_width_px));
    let _ = write!(
        out,
        "</div>\n<script type=\"application/json\" id=\"{}\">{}</script>\n</body>\n</html>\n",
        STATE_ELEMENT_ID,
        embed_json(state_json)
    );
    out
}
