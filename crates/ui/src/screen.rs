use quiz_core::QuizStatus;
use services::QuizView;

/// Which page the front-end should show for a given view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    PickSubject,
    PickDifficulty,
    /// Subject and difficulty chosen; waiting for the user to start (or for the fetch).
    Ready,
    Question,
    Summary,
}

#[must_use]
pub fn screen_for(view: &QuizView) -> Screen {
    match view.session.status {
        QuizStatus::InProgress => Screen::Question,
        QuizStatus::Completed => Screen::Summary,
        QuizStatus::Idle if view.subject.is_none() => Screen::PickSubject,
        QuizStatus::Idle if view.difficulty.is_none() => Screen::PickDifficulty,
        QuizStatus::Idle => Screen::Ready,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::test_support::{idle_view, in_progress_view};
    use quiz_core::model::{Catalog, Difficulty};

    #[test]
    fn idle_screens_follow_selection() {
        let mut view = idle_view();
        assert_eq!(screen_for(&view), Screen::PickSubject);

        view.subject = Catalog::default().subjects().first().cloned();
        assert_eq!(screen_for(&view), Screen::PickDifficulty);

        view.difficulty = Some(Difficulty::Beginner);
        assert_eq!(screen_for(&view), Screen::Ready);
    }

    #[test]
    fn running_and_finished_screens() {
        let mut view = in_progress_view(None);
        assert_eq!(screen_for(&view), Screen::Question);
        view.session.status = QuizStatus::Completed;
        assert_eq!(screen_for(&view), Screen::Summary);
    }
}
