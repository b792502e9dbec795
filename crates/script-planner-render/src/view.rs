//! Presentation models for the editor and the print view.
//!
//! Both views are derived from one [`EpisodeProgress`] computed over a
//! [`DocumentSnapshot`], so the figures the editor shows and the figures the
//! printed document carries can never disagree.

use serde::Serialize;

use script_planner::catalog::{KEYWORD_EXAMPLES, SERIES_TITLE, TOOL_TITLE, USAGE_GUIDE};
use script_planner::{
    format_time, target_chars, DocumentSnapshot, Episode, EpisodeProgress, ExportState,
    SectionProgress, Tier,
};

pub const WEEK_NUMBER_PLACEHOLDER: &str = "주차 (예: 2주차)";
pub const WEEK_TITLE_PLACEHOLDER: &str = "주차명 (예: 소방관)";
pub const TOTAL_CAPTION: &str = "전체 러닝타임";
pub const AUTOMATIC_BADGE: &str = "자동";
pub const ON_TARGET_LABEL: &str = "적정";
pub const KEYWORDS_TITLE: &str = "핵심 키워드 (5개)";
pub const KEYWORDS_HELP: &str = "영화에서 중요한 직업의 핵심 특성이나 역량 키워드를 입력하세요.";
pub const INTERVIEW_CONTENT_LABEL: &str = "영상내용";
pub const INTERVIEW_SOURCE_LABEL: &str = "영상출처";
pub const INTERVIEW_CONTENT_PLACEHOLDER: &str = "전문가 인터뷰 영상의 주요 내용을 입력하세요.";
pub const INTERVIEW_SOURCE_PLACEHOLDER: &str =
    "영상 출처 링크 (예: https://www.youtube.com/watch?v=...)";
pub const OBJECTIVE_GOAL_LABEL: &str = "학습목표";
pub const OBJECTIVE_CONTENT_LABEL: &str = "학습내용";
pub const OBJECTIVE_GOAL_PLACEHOLDER: &str = "이 차시를 통해 학습자가 달성해야 할 목표를 입력하세요.\n\
예: 1. 소방관의 역할과 책임을 이해하고, 소방활동의 중요성을 설명할 수 있다.\n\
2. 영화 속 직업과 실제 직업을 비교하여 설명할 수 있다.";
pub const OBJECTIVE_CONTENT_PLACEHOLDER: &str = "이 차시에서 다룰 주요 내용을 입력하세요.\n\
예: 1. 소방관의 주요 역할과 업무\n\
2. 화재 진압 과정과 구조 활동\n\
3. 소방 장비와 안전 규정";
pub const GUIDE_TITLE: &str = "사용 가이드";
pub const KEYWORDS_PRINT_LABEL: &str = "키워드:";
pub const EMPTY_PRINT_VALUE: &str = "-";

/// `m:ss 초과`.
pub fn overage_label(secs: u32) -> String {
    format!("{} 초과", format_time(secs))
}

/// `m:ss / m:ss`.
pub fn time_label(actual_secs: u32, target_secs: u32) -> String {
    format!("{} / {}", format_time(actual_secs), format_time(target_secs))
}

/// Placeholder of a free-text area: target time and approximate length.
pub fn script_placeholder(target_secs: u32) -> String {
    format!(
        "원고를 입력하세요 (목표: {}, 약 {}자)",
        format_time(target_secs),
        target_chars(target_secs)
    )
}

/// Print document heading; empty week fields are left out.
pub fn print_title(week_number: &str, week_title: &str, episode: Episode) -> String {
    let mut title = String::new();
    for part in [week_number, week_title] {
        if !part.is_empty() {
            title.push_str(part);
            title.push(' ');
        }
    }
    title.push_str(&format!("{}차시 원고", episode.number()));
    title
}

/// Print footer line.
pub fn print_footer() -> String {
    format!("{} - 나레이션 원고", SERIES_TITLE)
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        EMPTY_PRINT_VALUE.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextField {
    pub value: String,
    pub placeholder: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EpisodeTab {
    pub episode: u8,
    pub label: &'static str,
    pub active: bool,
}

/// Whole-episode runtime panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TotalSummary {
    pub caption: &'static str,
    pub actual: String,
    pub target: String,
    pub percent: u32,
    pub tier: Tier,
    pub bar_percent: u32,
    pub overage: Option<String>,
}

impl TotalSummary {
    fn from_progress(progress: &EpisodeProgress) -> Self {
        Self {
            caption: TOTAL_CAPTION,
            actual: format_time(progress.total_actual_secs),
            target: format_time(progress.total_target_secs),
            percent: progress.percent,
            tier: progress.tier,
            bar_percent: progress.bar_percent(),
            overage: progress.overage_secs().map(overage_label),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeywordSlotView {
    pub index: usize,
    pub value: String,
    pub placeholder: String,
}

/// Editable inputs of a section card, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardInput {
    FreeText {
        value: String,
        placeholder: String,
        /// `N자`, non-whitespace characters.
        char_count_label: String,
        /// Overage or on-target note.
        status: Option<String>,
    },
    Keywords {
        title: &'static str,
        help: &'static str,
        slots: Vec<KeywordSlotView>,
        /// Non-blank keywords.
        chips: Vec<String>,
    },
    Interview {
        content_label: &'static str,
        content: TextField,
        source_label: &'static str,
        source: TextField,
    },
    Objectives {
        goal_label: &'static str,
        goal: TextField,
        content_label: &'static str,
        content: TextField,
    },
}

/// One section card of the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionCard {
    pub id: &'static str,
    /// `#n`, 1-based.
    pub index_label: String,
    pub name: &'static str,
    /// Label of the "automatic" badge when shown.
    pub badge: Option<&'static str>,
    pub note: Option<&'static str>,
    pub time_label: String,
    pub percent: u32,
    pub tier: Tier,
    pub bar_percent: u32,
    pub inputs: Vec<CardInput>,
}

impl SectionCard {
    fn build(progress: &SectionProgress, snapshot: &DocumentSnapshot) -> Self {
        let section = &progress.section;
        let caps = section.capabilities;
        let script = &snapshot.script;
        let mut inputs = Vec::new();

        if caps.free_text {
            let status = match progress.tier {
                Tier::Over => progress.overage_secs().map(overage_label),
                Tier::OnTarget => Some(ON_TARGET_LABEL.to_string()),
                Tier::Under => None,
            };
            inputs.push(CardInput::FreeText {
                value: script.script(section.id).to_string(),
                placeholder: script_placeholder(section.target_secs),
                char_count_label: format!("{}자", progress.char_count),
                status,
            });
        }
        if caps.keywords {
            let slots = script
                .keywords(section.id)
                .iter()
                .zip(KEYWORD_EXAMPLES)
                .enumerate()
                .map(|(index, (value, example))| KeywordSlotView {
                    index,
                    value: value.clone(),
                    placeholder: format!("예: {}", example),
                })
                .collect();
            inputs.push(CardInput::Keywords {
                title: KEYWORDS_TITLE,
                help: KEYWORDS_HELP,
                slots,
                chips: script
                    .filled_keywords(section.id)
                    .map(str::to_string)
                    .collect(),
            });
        }
        if caps.interview {
            let pair = script.interview(section.id);
            inputs.push(CardInput::Interview {
                content_label: INTERVIEW_CONTENT_LABEL,
                content: TextField {
                    value: pair.content.clone(),
                    placeholder: INTERVIEW_CONTENT_PLACEHOLDER,
                },
                source_label: INTERVIEW_SOURCE_LABEL,
                source: TextField {
                    value: pair.source.clone(),
                    placeholder: INTERVIEW_SOURCE_PLACEHOLDER,
                },
            });
        }
        if caps.objectives {
            let pair = script.objective(section.id);
            inputs.push(CardInput::Objectives {
                goal_label: OBJECTIVE_GOAL_LABEL,
                goal: TextField {
                    value: pair.goal.clone(),
                    placeholder: OBJECTIVE_GOAL_PLACEHOLDER,
                },
                content_label: OBJECTIVE_CONTENT_LABEL,
                content: TextField {
                    value: pair.content.clone(),
                    placeholder: OBJECTIVE_CONTENT_PLACEHOLDER,
                },
            });
        }

        Self {
            id: section.id,
            index_label: format!("#{}", progress.index + 1),
            name: section.name,
            badge: section.is_automatic().then_some(AUTOMATIC_BADGE),
            note: section.note,
            time_label: time_label(progress.actual_secs, progress.target_secs),
            percent: progress.percent,
            tier: progress.tier,
            bar_percent: progress.bar_percent(),
            inputs,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GuideItem {
    pub emphasis: Option<&'static str>,
    pub text: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportButton {
    pub label: &'static str,
    pub disabled: bool,
}

/// Everything the editor screen displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditorView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub week_number: TextField,
    pub week_title: TextField,
    pub tabs: Vec<EpisodeTab>,
    pub summary: TotalSummary,
    pub cards: Vec<SectionCard>,
    pub guide_title: &'static str,
    pub guide: Vec<GuideItem>,
    pub export_button: ExportButton,
}

impl EditorView {
    pub fn build(
        snapshot: &DocumentSnapshot,
        progress: &EpisodeProgress,
        export_state: ExportState,
    ) -> Self {
        Self {
            title: TOOL_TITLE,
            subtitle: SERIES_TITLE,
            week_number: TextField {
                value: snapshot.week_number.clone(),
                placeholder: WEEK_NUMBER_PLACEHOLDER,
            },
            week_title: TextField {
                value: snapshot.week_title.clone(),
                placeholder: WEEK_TITLE_PLACEHOLDER,
            },
            tabs: Episode::ALL
                .iter()
                .map(|episode| EpisodeTab {
                    episode: episode.number(),
                    label: episode.tab_label(),
                    active: *episode == snapshot.episode,
                })
                .collect(),
            summary: TotalSummary::from_progress(progress),
            cards: progress
                .sections
                .iter()
                .map(|section| SectionCard::build(section, snapshot))
                .collect(),
            guide_title: GUIDE_TITLE,
            guide: USAGE_GUIDE
                .iter()
                .map(|&(emphasis, text)| GuideItem { emphasis, text })
                .collect(),
            export_button: ExportButton {
                label: export_state.button_label(),
                disabled: export_state == ExportState::Generating,
            },
        }
    }

    /// Serialize for a host UI.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Labelled value of the print view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrintField {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrintSection {
    /// `#n name`.
    pub heading: String,
    /// `(note)`.
    pub note: Option<String>,
    pub time_label: String,
    pub fields: Vec<PrintField>,
    /// Free text, when the section has any.
    pub script: Option<String>,
}

impl PrintSection {
    fn build(progress: &SectionProgress, snapshot: &DocumentSnapshot) -> Self {
        let section = &progress.section;
        let caps = section.capabilities;
        let script = &snapshot.script;
        let mut fields = Vec::new();

        if caps.keywords {
            let joined = script
                .filled_keywords(section.id)
                .collect::<Vec<_>>()
                .join(", ");
            fields.push(PrintField {
                label: KEYWORDS_PRINT_LABEL.to_string(),
                value: or_dash(&joined),
            });
        }
        if caps.interview {
            let pair = script.interview(section.id);
            fields.push(PrintField {
                label: format!("{}:", INTERVIEW_CONTENT_LABEL),
                value: or_dash(&pair.content),
            });
            fields.push(PrintField {
                label: format!("{}:", INTERVIEW_SOURCE_LABEL),
                value: or_dash(&pair.source),
            });
        }
        if caps.objectives {
            let pair = script.objective(section.id);
            fields.push(PrintField {
                label: format!("{}:", OBJECTIVE_GOAL_LABEL),
                value: or_dash(&pair.goal),
            });
            fields.push(PrintField {
                label: format!("{}:", OBJECTIVE_CONTENT_LABEL),
                value: or_dash(&pair.content),
            });
        }

        let text = script.script(section.id);
        Self {
            heading: format!("#{} {}", progress.index + 1, section.name),
            note: section.note.map(|note| format!("({})", note)),
            time_label: time_label(progress.actual_secs, progress.target_secs),
            fields,
            script: (caps.free_text && !text.is_empty()).then(|| text.to_string()),
        }
    }
}

/// The printable document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrintView {
    pub title: String,
    /// `전체 러닝타임: a / b (p%)`.
    pub summary: String,
    pub sections: Vec<PrintSection>,
    pub footer: String,
}

impl PrintView {
    pub fn build(snapshot: &DocumentSnapshot, progress: &EpisodeProgress) -> Self {
        Self {
            title: print_title(&snapshot.week_number, &snapshot.week_title, snapshot.episode),
            summary: format!(
                "{}: {} ({}%)",
                TOTAL_CAPTION,
                time_label(progress.total_actual_secs, progress.total_target_secs),
                progress.percent
            ),
            sections: progress
                .sections
                .iter()
                .map(|section| PrintSection::build(section, snapshot))
                .collect(),
            footer: print_footer(),
        }
    }

    /// Compute progress and build in one step.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Self {
        Self::build(snapshot, &EpisodeProgress::compute(snapshot))
    }
}
