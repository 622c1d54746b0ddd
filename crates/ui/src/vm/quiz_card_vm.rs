use quiz_core::model::QuestionId;
use quiz_core::SessionSnapshot;

use super::percent::percent;

/// What the primary button does on the question card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardAction {
    Next,
    Skip,
}

impl CardAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Next => "Next",
            CardAction::Skip => "Skip",
        }
    }

    /// Terminal shortcut for the action.
    #[must_use]
    pub fn key(self) -> char {
        match self {
            CardAction::Next => 'n',
            CardAction::Skip => 's',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    /// 1-based key the terminal front-end accepts for this option.
    pub shortcut: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub question_id: QuestionId,
    pub text: String,
    pub code: Option<String>,
    pub options: Vec<OptionVm>,
    pub timer_label: String,
    /// Remaining time as a share of the limit, for the countdown bar.
    pub timer_percent: u32,
    pub action: CardAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub label: String,
    pub percent_label: String,
    pub percent: u32,
}

/// `None` unless a question is showing.
#[must_use]
pub fn map_quiz_card(snapshot: &SessionSnapshot) -> Option<QuizCardVm> {
    let question = snapshot.current_question.as_ref()?;
    let selected = snapshot.selected_answer.as_deref();

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(idx, option)| OptionVm {
            shortcut: idx + 1,
            label: option.clone(),
            selected: selected == Some(option.as_str()),
        })
        .collect();

    Some(QuizCardVm {
        question_id: question.id().clone(),
        text: question.text().to_string(),
        code: question.code().map(str::to_owned),
        options,
        timer_label: format!("{}s", snapshot.time_remaining),
        timer_percent: percent(
            snapshot.time_remaining as usize,
            snapshot.time_limit as usize,
        ),
        action: if selected.is_some() {
            CardAction::Next
        } else {
            CardAction::Skip
        },
    })
}

/// Progress counts questions already left behind, so the first question shows 0%.
#[must_use]
pub fn map_progress(snapshot: &SessionSnapshot) -> ProgressVm {
    let pct = percent(snapshot.current_index, snapshot.total);
    ProgressVm {
        label: format!(
            "Question {} of {}",
            (snapshot.current_index + 1).min(snapshot.total.max(1)),
            snapshot.total
        ),
        percent_label: format!("{pct}% Complete"),
        percent: pct,
    }
}
