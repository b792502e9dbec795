//! Actual-vs-target runtime aggregation.

use serde::Serialize;

use crate::catalog::Section;
use crate::estimate::{counted_chars, secs_for_chars};
use crate::state::{DocumentSnapshot, EpisodeScript};

/// Lower bound of the on-target band, in percent.
pub const ON_TARGET_MIN_PERCENT: u32 = 95;
/// Upper bound of the on-target band, in percent.
pub const ON_TARGET_MAX_PERCENT: u32 = 100;

/// Presentation tier derived from a percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Below 95 %.
    Under,
    /// 95 % to 100 % inclusive.
    OnTarget,
    /// Above 100 %.
    Over,
}

impl Tier {
    pub fn from_percent(percent: u32) -> Self {
        if percent > ON_TARGET_MAX_PERCENT {
            Self::Over
        } else if percent >= ON_TARGET_MIN_PERCENT {
            Self::OnTarget
        } else {
            Self::Under
        }
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Under => "under",
            Self::OnTarget => "on_target",
            Self::Over => "over",
        }
    }
}

/// `round(actual / target * 100)` with halves rounded up.
pub fn percent_of(actual: u32, target: u32) -> u32 {
    if target == 0 {
        return 0;
    }
    let actual = u64::from(actual);
    let target = u64::from(target);
    let percent = (actual * 200 + target) / (target * 2);
    u32::try_from(percent).unwrap_or(u32::MAX)
}

/// Derived runtime figures for one section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionProgress {
    /// 0-based position in the catalog.
    pub index: usize,
    pub section: Section,
    /// Non-whitespace characters of the free text; 0 for other sections.
    pub char_count: usize,
    pub actual_secs: u32,
    pub target_secs: u32,
    pub percent: u32,
    pub tier: Tier,
}

impl SectionProgress {
    /// Figures for one section of an episode record.
    pub fn compute(index: usize, section: &Section, script: &EpisodeScript) -> Self {
        let (char_count, actual_secs) = if section.is_timed_by_text() {
            let chars = counted_chars(script.script(section.id));
            (chars, secs_for_chars(chars))
        } else {
            (0, section.target_secs)
        };
        let percent = percent_of(actual_secs, section.target_secs);
        Self {
            index,
            section: *section,
            char_count,
            actual_secs,
            target_secs: section.target_secs,
            percent,
            tier: Tier::from_percent(percent),
        }
    }

    /// Seconds over target when the section is over budget.
    pub fn overage_secs(&self) -> Option<u32> {
        (self.tier == Tier::Over).then(|| self.actual_secs.saturating_sub(self.target_secs))
    }

    /// Progress bar fill, capped at 100.
    pub fn bar_percent(&self) -> u32 {
        self.percent.min(100)
    }
}

/// Derived runtime figures for the active episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EpisodeProgress {
    pub sections: Vec<SectionProgress>,
    pub total_actual_secs: u32,
    pub total_target_secs: u32,
    pub percent: u32,
    pub tier: Tier,
}

impl EpisodeProgress {
    /// Aggregate a snapshot over its episode's full catalog.
    pub fn compute(snapshot: &DocumentSnapshot) -> Self {
        let sections: Vec<_> = snapshot
            .sections()
            .iter()
            .enumerate()
            .map(|(index, section)| SectionProgress::compute(index, section, &snapshot.script))
            .collect();
        let total_actual_secs = sections.iter().map(|s| s.actual_secs).sum();
        let total_target_secs = sections.iter().map(|s| s.target_secs).sum();
        let percent = percent_of(total_actual_secs, total_target_secs);
        Self {
            sections,
            total_actual_secs,
            total_target_secs,
            percent,
            tier: Tier::from_percent(percent),
        }
    }

    /// Seconds over the episode target when over budget.
    pub fn overage_secs(&self) -> Option<u32> {
        (self.tier == Tier::Over)
            .then(|| self.total_actual_secs.saturating_sub(self.total_target_secs))
    }

    /// Progress bar fill, capped at 100.
    pub fn bar_percent(&self) -> u32 {
        self.percent.min(100)
    }

    /// Progress of one section by identifier.
    pub fn section(&self, id: &str) -> Option<&SectionProgress> {
        self.sections.iter().find(|progress| progress.section.id == id)
    }
}
