//! In-memory script store.
//!
//! Each episode owns an independent [`EpisodeScript`] record behind an
//! [`Arc`]. Mutations go through [`Arc::make_mut`], so a
//! [`DocumentSnapshot`] taken for rendering or export stays frozen while
//! editing continues, and the two episodes never share a map.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Episode, Section, KEYWORD_SLOTS};

/// Fixed keyword list of a keyword-capable section.
pub type KeywordSlots = [String; KEYWORD_SLOTS];

static EMPTY_KEYWORDS: KeywordSlots = [
    String::new(),
    String::new(),
    String::new(),
    String::new(),
    String::new(),
];
static EMPTY_OBJECTIVE: ObjectivePair = ObjectivePair {
    goal: String::new(),
    content: String::new(),
};
static EMPTY_INTERVIEW: InterviewPair = InterviewPair {
    content: String::new(),
    source: String::new(),
};

/// Learning goal / learning content pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectivePair {
    pub goal: String,
    pub content: String,
}

impl ObjectivePair {
    fn field_mut(&mut self, field: ObjectiveField) -> &mut String {
        match field {
            ObjectiveField::Goal => &mut self.goal,
            ObjectiveField::Content => &mut self.content,
        }
    }
}

/// Interview video content / source pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPair {
    pub content: String,
    pub source: String,
}

impl InterviewPair {
    fn field_mut(&mut self, field: InterviewField) -> &mut String {
        match field {
            InterviewField::Content => &mut self.content,
            InterviewField::Source => &mut self.source,
        }
    }
}

/// Field selector for [`ObjectivePair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveField {
    Goal,
    Content,
}

/// Field selector for [`InterviewPair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewField {
    Content,
    Source,
}

/// All editable content of one episode, keyed by section identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EpisodeScript {
    episode: Episode,
    scripts: BTreeMap<String, String>,
    keywords: BTreeMap<String, KeywordSlots>,
    objectives: BTreeMap<String, ObjectivePair>,
    interviews: BTreeMap<String, InterviewPair>,
}

impl EpisodeScript {
    /// Empty record with an entry for every map each catalog section needs.
    pub fn new(episode: Episode) -> Self {
        let mut script = Self {
            episode,
            scripts: BTreeMap::new(),
            keywords: BTreeMap::new(),
            objectives: BTreeMap::new(),
            interviews: BTreeMap::new(),
        };
        for section in episode.sections() {
            script.seed(section);
        }
        script
    }

    fn seed(&mut self, section: &Section) {
        let caps = section.capabilities;
        if caps.free_text {
            self.scripts.insert(section.id.to_string(), String::new());
        }
        if caps.keywords {
            self.keywords
                .insert(section.id.to_string(), EMPTY_KEYWORDS.clone());
        }
        if caps.objectives {
            self.objectives
                .insert(section.id.to_string(), ObjectivePair::default());
        }
        if caps.interview {
            self.interviews
                .insert(section.id.to_string(), InterviewPair::default());
        }
    }

    /// Episode this record belongs to.
    pub fn episode(&self) -> Episode {
        self.episode
    }

    /// Free text of a section; missing entries read as empty.
    pub fn script(&self, section_id: &str) -> &str {
        self.scripts.get(section_id).map_or("", String::as_str)
    }

    /// Keyword slots of a section; missing entries read as five empty slots.
    pub fn keywords(&self, section_id: &str) -> &KeywordSlots {
        self.keywords.get(section_id).unwrap_or(&EMPTY_KEYWORDS)
    }

    /// Non-blank keywords in slot order.
    pub fn filled_keywords(&self, section_id: &str) -> impl Iterator<Item = &str> {
        self.keywords(section_id)
            .iter()
            .map(String::as_str)
            .filter(|keyword| !keyword.trim().is_empty())
    }

    /// Objective pair of a section; missing entries read as empty.
    pub fn objective(&self, section_id: &str) -> &ObjectivePair {
        self.objectives.get(section_id).unwrap_or(&EMPTY_OBJECTIVE)
    }

    /// Interview pair of a section; missing entries read as empty.
    pub fn interview(&self, section_id: &str) -> &InterviewPair {
        self.interviews.get(section_id).unwrap_or(&EMPTY_INTERVIEW)
    }

    /// Replace the free text of a section.
    pub fn set_script(&mut self, section_id: &str, text: impl Into<String>) {
        let text = text.into();
        log::debug!(
            "episode {} script {} <- {} bytes",
            self.episode.number(),
            section_id,
            text.len()
        );
        self.scripts.insert(section_id.to_string(), text);
    }

    /// Replace one keyword slot. Returns `false` for an index outside the list.
    pub fn set_keyword(
        &mut self,
        section_id: &str,
        index: usize,
        value: impl Into<String>,
    ) -> bool {
        if index >= KEYWORD_SLOTS {
            log::debug!(
                "ignoring keyword index {} for section {} (slots={})",
                index,
                section_id,
                KEYWORD_SLOTS
            );
            return false;
        }
        let slots = self
            .keywords
            .entry(section_id.to_string())
            .or_insert_with(|| EMPTY_KEYWORDS.clone());
        slots[index] = value.into();
        true
    }

    /// Replace one field of an objective pair.
    pub fn set_objective(
        &mut self,
        section_id: &str,
        field: ObjectiveField,
        value: impl Into<String>,
    ) {
        *self
            .objectives
            .entry(section_id.to_string())
            .or_default()
            .field_mut(field) = value.into();
    }

    /// Replace one field of an interview pair.
    pub fn set_interview(
        &mut self,
        section_id: &str,
        field: InterviewField,
        value: impl Into<String>,
    ) {
        *self
            .interviews
            .entry(section_id.to_string())
            .or_default()
            .field_mut(field) = value.into();
    }
}

/// Sibling per-episode records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptBook {
    episode_one: Arc<EpisodeScript>,
    episode_two: Arc<EpisodeScript>,
}

impl Default for ScriptBook {
    fn default() -> Self {
        Self {
            episode_one: Arc::new(EpisodeScript::new(Episode::One)),
            episode_two: Arc::new(EpisodeScript::new(Episode::Two)),
        }
    }
}

impl ScriptBook {
    /// Shared handle to an episode's record.
    pub fn get(&self, episode: Episode) -> &Arc<EpisodeScript> {
        match episode {
            Episode::One => &self.episode_one,
            Episode::Two => &self.episode_two,
        }
    }

    /// Mutable access; clones the record first if a snapshot still holds it.
    pub fn make_mut(&mut self, episode: Episode) -> &mut EpisodeScript {
        match episode {
            Episode::One => Arc::make_mut(&mut self.episode_one),
            Episode::Two => Arc::make_mut(&mut self.episode_two),
        }
    }
}

/// Frozen view of everything the renderer and the exporter need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub episode: Episode,
    pub week_number: String,
    pub week_title: String,
    pub script: Arc<EpisodeScript>,
}

impl DocumentSnapshot {
    /// Catalog of the snapshot's episode.
    pub fn sections(&self) -> &'static [Section] {
        self.episode.sections()
    }
}

/// Editor event as dispatched by a UI host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    SelectEpisode {
        episode: Episode,
    },
    SetWeekNumber {
        value: String,
    },
    SetWeekTitle {
        value: String,
    },
    SetScript {
        section: String,
        text: String,
    },
    SetKeyword {
        section: String,
        index: usize,
        value: String,
    },
    SetObjective {
        section: String,
        field: ObjectiveField,
        value: String,
    },
    SetInterview {
        section: String,
        field: InterviewField,
        value: String,
    },
}

/// Whole editor state: metadata, active episode and both episode records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Planner {
    episode: Episode,
    week_number: String,
    week_title: String,
    book: ScriptBook,
}

impl Planner {
    /// Fresh editor showing episode 1 with empty content everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected episode.
    pub fn episode(&self) -> Episode {
        self.episode
    }

    /// Switch the active episode. Both episodes' content is kept.
    pub fn select_episode(&mut self, episode: Episode) {
        if self.episode != episode {
            log::debug!("switching to episode {}", episode.number());
        }
        self.episode = episode;
    }

    pub fn week_number(&self) -> &str {
        &self.week_number
    }

    pub fn week_title(&self) -> &str {
        &self.week_title
    }

    pub fn set_week_number(&mut self, value: impl Into<String>) {
        self.week_number = value.into();
    }

    pub fn set_week_title(&mut self, value: impl Into<String>) {
        self.week_title = value.into();
    }

    /// Catalog of the active episode.
    pub fn sections(&self) -> &'static [Section] {
        self.episode.sections()
    }

    /// Record of the active episode.
    pub fn current(&self) -> &EpisodeScript {
        self.book.get(self.episode)
    }

    /// Record of any episode.
    pub fn script_for(&self, episode: Episode) -> &EpisodeScript {
        self.book.get(episode)
    }

    /// Set the free text of a section in the active episode.
    pub fn update_script(&mut self, section_id: &str, text: impl Into<String>) {
        self.book.make_mut(self.episode).set_script(section_id, text);
    }

    /// Set one keyword slot of a section in the active episode.
    pub fn update_keyword(
        &mut self,
        section_id: &str,
        index: usize,
        value: impl Into<String>,
    ) -> bool {
        self.book
            .make_mut(self.episode)
            .set_keyword(section_id, index, value)
    }

    /// Set one objective field of a section in the active episode.
    pub fn update_objective(
        &mut self,
        section_id: &str,
        field: ObjectiveField,
        value: impl Into<String>,
    ) {
        self.book
            .make_mut(self.episode)
            .set_objective(section_id, field, value);
    }

    /// Set one interview field of a section in the active episode.
    pub fn update_interview(
        &mut self,
        section_id: &str,
        field: InterviewField,
        value: impl Into<String>,
    ) {
        self.book
            .make_mut(self.episode)
            .set_interview(section_id, field, value);
    }

    /// Apply a host-dispatched event.
    pub fn apply(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::SelectEpisode { episode } => self.select_episode(episode),
            EditorEvent::SetWeekNumber { value } => self.set_week_number(value),
            EditorEvent::SetWeekTitle { value } => self.set_week_title(value),
            EditorEvent::SetScript { section, text } => self.update_script(&section, text),
            EditorEvent::SetKeyword {
                section,
                index,
                value,
            } => {
                self.update_keyword(&section, index, value);
            }
            EditorEvent::SetObjective {
                section,
                field,
                value,
            } => self.update_objective(&section, field, value),
            EditorEvent::SetInterview {
                section,
                field,
                value,
            } => self.update_interview(&section, field, value),
        }
    }

    /// Freeze the active episode for rendering or export.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            episode: self.episode,
            week_number: self.week_number.clone(),
            week_title: self.week_title.clone(),
            script: Arc::clone(self.book.get(self.episode)),
        }
    }
}
