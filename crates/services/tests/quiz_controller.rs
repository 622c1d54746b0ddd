use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use quiz_core::model::{Difficulty, Question, QuestionId, Subject, SubjectId};
use quiz_core::{QuizStatus, TIMER_MAX};
use services::{
    ClockTick, LOAD_ERROR_MESSAGE, QuestionSource, QuestionSourceError, QuizController, QuizEvent,
    QuizSettings,
};

fn question(id: &str) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question {id}?"),
        vec!["A".into(), "B".into(), "C".into()],
        "A",
        "A is correct.",
    )
    .unwrap()
}

struct FixedSource {
    questions: Vec<Question>,
}

#[async_trait]
impl QuestionSource for FixedSource {
    async fn fetch_questions(
        &self,
        _subject: &Subject,
        _difficulty: Difficulty,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        Ok(self.questions.clone())
    }
}

#[derive(Default)]
struct FailingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl QuestionSource for FailingSource {
    async fn fetch_questions(
        &self,
        _subject: &Subject,
        _difficulty: Difficulty,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(QuestionSourceError::Empty)
    }
}

fn fixed(n: usize) -> Arc<dyn QuestionSource> {
    Arc::new(FixedSource {
        questions: (1..=n).map(|i| question(&format!("q{i}"))).collect(),
    })
}

fn controller(source: Arc<dyn QuestionSource>) -> (QuizController, UnboundedReceiver<QuizEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QuizController::new(source, tx, QuizSettings::default()), rx)
}

/// Feed the next queued event (fetch result or tick) into the controller.
async fn pump(controller: &mut QuizController, rx: &mut UnboundedReceiver<QuizEvent>) {
    let event = rx.recv().await.expect("event queue closed");
    controller.handle(event);
}

fn choose(controller: &mut QuizController) {
    controller.handle(QuizEvent::SelectSubject(SubjectId::new("data-science")));
    controller.handle(QuizEvent::SelectDifficulty(Difficulty::Beginner));
}

async fn started(n: usize) -> (QuizController, UnboundedReceiver<QuizEvent>) {
    let (mut controller, mut rx) = controller(fixed(n));
    choose(&mut controller);
    controller.handle(QuizEvent::Start);
    pump(&mut controller, &mut rx).await;
    assert_eq!(controller.session().status(), QuizStatus::InProgress);
    (controller, rx)
}

#[tokio::test(start_paused = true)]
async fn start_requires_subject_and_difficulty() {
    let (mut controller, mut rx) = controller(fixed(2));
    controller.handle(QuizEvent::Start);
    assert!(!controller.view().loading);

    controller.handle(QuizEvent::SelectSubject(SubjectId::new("no-such-subject")));
    assert!(controller.view().subject.is_none());

    choose(&mut controller);
    controller.handle(QuizEvent::Start);
    let view = controller.view();
    assert!(view.loading);
    assert_eq!(view.subject.as_ref().map(Subject::name), Some("Data Science"));
    assert_eq!(view.session.status, QuizStatus::Idle);

    pump(&mut controller, &mut rx).await;
    let view = controller.view();
    assert!(!view.loading);
    assert_eq!(view.session.status, QuizStatus::InProgress);
    assert_eq!(view.session.total, 2);
    assert_eq!(view.session.time_remaining, TIMER_MAX);
    assert!(controller.is_clock_armed());
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_stays_idle_and_can_retry() {
    let source = Arc::new(FailingSource::default());
    let (mut controller, mut rx) = controller(source.clone());
    choose(&mut controller);

    controller.handle(QuizEvent::Start);
    pump(&mut controller, &mut rx).await;

    let view = controller.view();
    assert_eq!(view.session.status, QuizStatus::Idle);
    assert_eq!(view.session.total, 0);
    assert_eq!(view.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(!view.loading);
    assert!(!controller.is_clock_armed());

    controller.handle(QuizEvent::Start);
    assert!(controller.view().loading);
    assert!(controller.view().error.is_none());
    pump(&mut controller, &mut rx).await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(controller.view().error.as_deref(), Some(LOAD_ERROR_MESSAGE));
}

#[tokio::test(start_paused = true)]
async fn full_countdown_moves_to_next_question() {
    let (mut controller, mut rx) = started(2).await;

    for _ in 0..TIMER_MAX {
        pump(&mut controller, &mut rx).await;
    }

    let session = controller.session();
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.time_remaining(), TIMER_MAX);
    assert_eq!(session.answers().get(&QuestionId::new("q1")), Some(&None));
    assert!(controller.is_clock_armed());
}

#[tokio::test(start_paused = true)]
async fn answers_and_skips_produce_results() {
    let (mut controller, _rx) = started(3).await;

    controller.handle(QuizEvent::SelectAnswer {
        question_id: QuestionId::new("q1"),
        answer: "A".into(),
    });
    controller.handle(QuizEvent::Next);
    controller.handle(QuizEvent::Skip);
    controller.handle(QuizEvent::Next);

    let view = controller.view();
    assert_eq!(view.session.status, QuizStatus::Completed);
    assert!(!controller.is_clock_armed());
    let results = view.results.expect("results for completed quiz");
    assert_eq!(results.score, 1);
    assert_eq!(results.total, 3);
    assert_eq!(controller.session().answers().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn stale_tick_is_dropped() {
    let (mut controller, mut rx) = started(2).await;
    pump(&mut controller, &mut rx).await;
    assert_eq!(controller.session().time_remaining(), TIMER_MAX - 1);

    controller.handle(QuizEvent::Tick(ClockTick { epoch: 9_999 }));
    assert_eq!(controller.session().time_remaining(), TIMER_MAX - 1);
}

#[tokio::test(start_paused = true)]
async fn tick_from_previous_question_does_not_count() {
    let (mut controller, mut rx) = started(2).await;
    let tick = match rx.recv().await.expect("tick") {
        QuizEvent::Tick(tick) => tick,
        other => panic!("expected a tick, got {other:?}"),
    };

    // The user moves on before the queued tick is processed.
    controller.handle(QuizEvent::Next);
    controller.handle(QuizEvent::Tick(tick));

    assert_eq!(controller.session().current_index(), 1);
    assert_eq!(controller.session().time_remaining(), TIMER_MAX);
}

#[tokio::test(start_paused = true)]
async fn reset_stops_the_clock_and_clears_selection() {
    let (mut controller, mut rx) = started(2).await;
    pump(&mut controller, &mut rx).await;

    controller.handle(QuizEvent::Reset);
    let view = controller.view();
    assert_eq!(view.session.status, QuizStatus::Idle);
    assert!(view.subject.is_none());
    assert!(view.difficulty.is_none());
    assert!(!controller.is_clock_armed());

    let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
    assert!(waited.is_err(), "no events expected after reset");
}

#[tokio::test(start_paused = true)]
async fn load_arriving_after_reset_is_discarded() {
    let (mut controller, mut rx) = controller(fixed(2));
    choose(&mut controller);
    controller.handle(QuizEvent::Start);
    controller.handle(QuizEvent::Reset);

    pump(&mut controller, &mut rx).await;
    let view = controller.view();
    assert_eq!(view.session.status, QuizStatus::Idle);
    assert_eq!(view.session.total, 0);
    assert!(view.error.is_none());
    assert!(!controller.is_clock_armed());
}

#[tokio::test(start_paused = true)]
async fn selection_is_locked_while_in_progress() {
    let (mut controller, _rx) = started(1).await;
    controller.handle(QuizEvent::SelectDifficulty(Difficulty::Advanced));
    controller.handle(QuizEvent::Start);
    assert_eq!(controller.view().difficulty, Some(Difficulty::Beginner));
    assert!(!controller.view().loading);
}

#[tokio::test(start_paused = true)]
async fn completed_quiz_ignores_late_events() {
    let (mut controller, _rx) = started(1).await;
    controller.handle(QuizEvent::SelectAnswer {
        question_id: QuestionId::new("q1"),
        answer: "A".into(),
    });
    controller.handle(QuizEvent::Next);
    let before = controller.view();
    assert_eq!(before.session.status, QuizStatus::Completed);

    controller.handle(QuizEvent::Next);
    controller.handle(QuizEvent::Skip);
    controller.handle(QuizEvent::Tick(ClockTick { epoch: 1 }));
    controller.handle(QuizEvent::SelectAnswer {
        question_id: QuestionId::new("q1"),
        answer: "B".into(),
    });
    assert_eq!(controller.view(), before);
    assert_eq!(before.results.map(|r| (r.score, r.total)), Some((1, 1)));
}
