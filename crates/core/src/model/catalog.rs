use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::SubjectId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Challenge level requested from the question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Stable id sent to the question source.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Perfect for those just starting out",
            Difficulty::Intermediate => "For developers with some experience",
            Difficulty::Advanced => "Challenge yourself with complex problems",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownDifficulty(s.to_string()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A quiz subject offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    id: SubjectId,
    name: String,
    description: String,
}

impl Subject {
    #[must_use]
    pub fn new(id: SubjectId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

const DEFAULT_SUBJECTS: [(&str, &str, &str); 8] = [
    (
        "machine-learning",
        "Machine Learning",
        "Explore machine learning concepts and build predictive models",
    ),
    (
        "cybersecurity",
        "Cybersecurity",
        "Learn how to protect systems and networks from cyber threats",
    ),
    (
        "cloud-computing",
        "Cloud Computing",
        "Understand cloud infrastructure and deployment strategies",
    ),
    (
        "data-science",
        "Data Science",
        "Analyze and interpret complex data using statistical methods",
    ),
    (
        "web-development",
        "Web Development",
        "Master the art of building interactive websites and web apps",
    ),
    (
        "blockchain",
        "Blockchain",
        "Explore decentralized systems and distributed ledger technology",
    ),
    (
        "iot",
        "Internet of Things",
        "Discover how devices connect and communicate in a smart ecosystem",
    ),
    (
        "digital-marketing",
        "Digital Marketing",
        "Learn strategies to enhance online presence and drive engagement",
    ),
];

/// Subjects the user can pick from, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    subjects: Vec<Subject>,
}

impl Catalog {
    #[must_use]
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id() == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_SUBJECTS
                .iter()
                .map(|(id, name, description)| {
                    Subject::new(SubjectId::new(*id), *name, *description)
                })
                .collect(),
        )
    }
}

/// The user's subject and difficulty choice, filled in before a quiz starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSelection {
    pub subject: Option<SubjectId>,
    pub difficulty: Option<Difficulty>,
}

impl QuizSelection {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.subject.is_some() && self.difficulty.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lists_all_subjects() {
        let catalog = Catalog::default();
        assert_eq!(catalog.subjects().len(), 8);
        let iot = catalog.subject(&SubjectId::new("iot")).unwrap();
        assert_eq!(iot.name(), "Internet of Things");
        assert!(catalog.subject(&SubjectId::new("astrology")).is_none());
    }

    #[test]
    fn difficulty_parses_ids_case_insensitively() {
        assert_eq!("beginner".parse::<Difficulty>(), Ok(Difficulty::Beginner));
        assert_eq!(" Advanced ".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn selection_requires_both_choices() {
        let mut selection = QuizSelection::default();
        assert!(!selection.is_complete());
        selection.subject = Some(SubjectId::new("iot"));
        assert!(!selection.is_complete());
        selection.difficulty = Some(Difficulty::Intermediate);
        assert!(selection.is_complete());
    }
}
