//! Fixed section catalogs for both episodes.
//!
//! Sections are plain records carrying capability flags. Whether a section
//! is edited as free text, as a keyword list, as an objective pair or as an
//! interview pair is decided by its [`Capabilities`], never by its type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Series title shown in the editor header and the print footer.
pub const SERIES_TITLE: &str = "재난영화로 알아보는 직업이야기";

/// Editor page title.
pub const TOOL_TITLE: &str = "나레이션 원고 작성";

/// Number of keyword slots per keyword-capable section.
pub const KEYWORD_SLOTS: usize = 5;

/// Example keywords shown as placeholders, one per slot.
pub const KEYWORD_EXAMPLES: [&str; KEYWORD_SLOTS] = [
    "희생정신",
    "고도의 훈련",
    "강인한 신체능력",
    "신속한 판단력",
    "팀워크",
];

/// Episode selector. The whole editor shows exactly one episode at a time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Episode {
    #[default]
    One,
    Two,
}

impl Episode {
    /// Both episodes in display order.
    pub const ALL: [Episode; 2] = [Episode::One, Episode::Two];

    /// 1-based episode number.
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Map a 1-based episode number back to an episode.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    /// Tab label used by the episode switch.
    pub fn tab_label(self) -> &'static str {
        match self {
            Self::One => "1차시 (25분)",
            Self::Two => "2차시 (25분)",
        }
    }

    /// Section catalog for this episode.
    pub fn sections(self) -> &'static [Section] {
        match self {
            Self::One => EPISODE_ONE_SECTIONS,
            Self::Two => EPISODE_TWO_SECTIONS,
        }
    }

    /// Look up a section of this episode by identifier.
    pub fn section(self, id: &str) -> Option<&'static Section> {
        self.sections().iter().find(|section| section.id == id)
    }

    /// Sum of all section targets in seconds.
    pub fn total_target_secs(self) -> u32 {
        self.sections().iter().map(|section| section.target_secs).sum()
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}차시", self.number())
    }
}

impl TryFrom<u8> for Episode {
    type Error = UnknownEpisode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(UnknownEpisode(value))
    }
}

impl From<Episode> for u8 {
    fn from(value: Episode) -> Self {
        value.number()
    }
}

/// Returned when an episode number outside `1..=2` is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownEpisode(pub u8);

impl fmt::Display for UnknownEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown episode number {}", self.0)
    }
}

impl std::error::Error for UnknownEpisode {}

/// Input capabilities of a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Capabilities {
    /// Free narration text; the only input that drives the runtime estimate.
    pub free_text: bool,
    /// Fixed list of [`KEYWORD_SLOTS`] keywords.
    pub keywords: bool,
    /// Learning goal / learning content pair.
    pub objectives: bool,
    /// Interview video content / source pair.
    pub interview: bool,
}

impl Capabilities {
    /// No inputs at all (logo bumpers).
    pub const NONE: Self = Self {
        free_text: false,
        keywords: false,
        objectives: false,
        interview: false,
    };
    pub const FREE_TEXT: Self = Self {
        free_text: true,
        ..Self::NONE
    };
    pub const KEYWORDS: Self = Self {
        keywords: true,
        ..Self::NONE
    };
    pub const OBJECTIVES: Self = Self {
        objectives: true,
        ..Self::NONE
    };
    pub const INTERVIEW: Self = Self {
        interview: true,
        ..Self::NONE
    };
}

/// One timed section of an episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Identifier, unique within its catalog.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Target duration in seconds. Always non-zero.
    pub target_secs: u32,
    /// Input capability flags.
    pub capabilities: Capabilities,
    /// Optional production note.
    pub note: Option<&'static str>,
}

impl Section {
    const fn new(
        id: &'static str,
        name: &'static str,
        target_secs: u32,
        capabilities: Capabilities,
        note: Option<&'static str>,
    ) -> Self {
        Self {
            id,
            name,
            target_secs,
            capabilities,
            note,
        }
    }

    /// Whether the section's runtime is estimated from free text.
    pub fn is_timed_by_text(&self) -> bool {
        self.capabilities.free_text
    }

    /// Sections the editor marks with the "자동" badge.
    ///
    /// Interview sections still get the badge: their length is counted at
    /// the nominal target even though they carry inputs.
    pub fn is_automatic(&self) -> bool {
        !self.capabilities.free_text && !self.capabilities.keywords && !self.capabilities.objectives
    }
}

/// Episode 1 catalog: movie-driven episode.
pub const EPISODE_ONE_SECTIONS: &[Section] = &[
    Section::new("logo1", "로고영상", 10, Capabilities::NONE, None),
    Section::new("hook", "오픈훅(타이틀)", 30, Capabilities::KEYWORDS, None),
    Section::new("intro", "강의 시작멘트", 60, Capabilities::FREE_TEXT, None),
    Section::new(
        "objectives",
        "학습목표/학습내용",
        20,
        Capabilities::OBJECTIVES,
        Some("디자인 페이지"),
    ),
    Section::new(
        "guide",
        "영화시청 가이드 (영화소개)",
        120,
        Capabilities::FREE_TEXT,
        None,
    ),
    Section::new(
        "movie",
        "영화 하이라이트",
        900,
        Capabilities::FREE_TEXT,
        Some("줄거리는 AI음성으로 대체"),
    ),
    Section::new("analysis", "영화시청 후 분석", 270, Capabilities::FREE_TEXT, None),
    Section::new("preview", "다음차시 예고", 60, Capabilities::FREE_TEXT, None),
    Section::new("summary", "정리하기", 30, Capabilities::FREE_TEXT, Some("AI음성")),
    Section::new("logo2", "로고영상", 10, Capabilities::NONE, None),
];

/// Episode 2 catalog: lecture and expert interview episode.
pub const EPISODE_TWO_SECTIONS: &[Section] = &[
    Section::new("logo1", "로고영상", 10, Capabilities::NONE, None),
    Section::new("hook", "오픈훅(타이틀)", 30, Capabilities::KEYWORDS, None),
    Section::new("intro", "강의 시작멘트", 60, Capabilities::FREE_TEXT, None),
    Section::new(
        "objectives",
        "학습목표/학습내용",
        20,
        Capabilities::OBJECTIVES,
        Some("디자인 페이지"),
    ),
    Section::new("lecture", "본강의", 720, Capabilities::FREE_TEXT, Some("크로마키+PPT")),
    Section::new("interview", "전문가 인터뷰", 600, Capabilities::INTERVIEW, None),
    Section::new("closing", "마무리멘트", 120, Capabilities::FREE_TEXT, None),
    Section::new("summary", "정리하기", 30, Capabilities::FREE_TEXT, Some("AI음성")),
    Section::new("logo2", "로고영상", 10, Capabilities::NONE, None),
];

/// Usage guide shown under the section cards, as (emphasis, text) pairs.
pub const USAGE_GUIDE: &[(Option<&str>, &str)] = &[
    (
        Some("오픈훅 키워드:"),
        "영상 시작 부분에 표현할 직업의 핵심 특성 5가지 이내로 입력하세요",
    ),
    (
        Some("학습목표/학습내용:"),
        "디자인 페이지에 표시될 학습목표와 학습내용을 입력하세요",
    ),
    (
        Some("나레이션 원고:"),
        "각 섹션의 목표 시간에 맞춰 원고를 작성하세요",
    ),
    (None, "한글 기준 2분당 725자 (초당 약 6자)로 자동 계산됩니다"),
    (None, "95~100%가 적정 분량이며, 100% 초과 시 원고를 줄여주세요"),
    (
        None,
        "실시간으로 러닝타임이 계산되어 촬영 전 정확한 분량 조절이 가능합니다",
    ),
    (
        None,
        "작성한 원고는 브라우저에 자동 저장되지 않으니 PDF저장을 통해 별도로 저장해주세요",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn catalog_targets_sum_to_episode_totals() {
        assert_eq!(Episode::One.total_target_secs(), 1510);
        assert_eq!(Episode::Two.total_target_secs(), 1600);
    }

    #[test]
    fn section_ids_are_unique_per_episode() {
        for episode in Episode::ALL {
            let ids: BTreeSet<_> = episode.sections().iter().map(|s| s.id).collect();
            assert_eq!(ids.len(), episode.sections().len(), "{}", episode);
        }
    }

    #[test]
    fn every_target_is_non_zero() {
        for episode in Episode::ALL {
            assert!(episode.sections().iter().all(|s| s.target_secs > 0));
        }
    }

    #[test]
    fn automatic_badge_follows_capabilities() {
        let logo = Episode::One.section("logo1").expect("logo1");
        let hook = Episode::One.section("hook").expect("hook");
        let interview = Episode::Two.section("interview").expect("interview");
        assert!(logo.is_automatic());
        assert!(!hook.is_automatic());
        assert!(interview.is_automatic());
        assert!(!interview.is_timed_by_text());
    }

    #[test]
    fn episode_numbers_round_trip_through_serde_repr() {
        assert_eq!(Episode::try_from(2), Ok(Episode::Two));
        assert_eq!(Episode::try_from(3), Err(UnknownEpisode(3)));
        assert_eq!(u8::from(Episode::One), 1);
        assert_eq!(Episode::Two.to_string(), "2차시");
    }

    #[test]
    fn episode_specific_sections_are_not_shared() {
        assert!(Episode::One.section("movie").is_some());
        assert!(Episode::Two.section("movie").is_none());
        assert!(Episode::Two.section("interview").is_some());
        assert!(Episode::One.section("interview").is_none());
    }
}
