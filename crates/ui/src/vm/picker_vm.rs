use quiz_core::model::{Catalog, Difficulty, SubjectId};
use services::QuizView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectCardVm {
    pub id: SubjectId,
    pub name: String,
    pub description: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifficultyOptionVm {
    pub difficulty: Difficulty,
    pub name: &'static str,
    pub description: &'static str,
    pub selected: bool,
}

/// The "ready to start" page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyVm {
    pub headline: String,
    pub start_label: &'static str,
    pub start_enabled: bool,
    pub error: Option<String>,
}

#[must_use]
pub fn map_subject_cards(catalog: &Catalog, selected: Option<&SubjectId>) -> Vec<SubjectCardVm> {
    catalog
        .subjects()
        .iter()
        .map(|subject| SubjectCardVm {
            id: subject.id().clone(),
            name: subject.name().to_string(),
            description: subject.description().to_string(),
            selected: selected == Some(subject.id()),
        })
        .collect()
}

#[must_use]
pub fn map_difficulty_options(selected: Option<Difficulty>) -> Vec<DifficultyOptionVm> {
    Difficulty::ALL
        .into_iter()
        .map(|difficulty| DifficultyOptionVm {
            difficulty,
            name: difficulty.name(),
            description: difficulty.description(),
            selected: selected == Some(difficulty),
        })
        .collect()
}

#[must_use]
pub fn map_ready(view: &QuizView) -> ReadyVm {
    let subject = view.subject.as_ref().map_or("?", |s| s.name());
    let level = view.difficulty.map_or("?", Difficulty::name);
    ReadyVm {
        headline: format!("You've selected {subject} at {level} level."),
        start_label: if view.loading { "Loading..." } else { "Start Quiz" },
        start_enabled: !view.loading,
        error: view.error.clone(),
    }
}
