use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use quiz_core::model::{
    Catalog, Difficulty, Question, QuestionId, QuizSelection, Subject, SubjectId,
};
use quiz_core::{QuizResults, QuizSession, QuizStatus, SessionSnapshot, Transition};

use super::clock::{ClockTick, SessionClock};
use crate::config::QuizSettings;
use crate::error::QuestionSourceError;
use crate::question_source::QuestionSource;

/// Message shown when the question source fails.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load questions. Please try again.";

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Everything that can mutate quiz state. User actions, clock ticks and fetch
/// completions all travel through the same queue.
#[derive(Debug)]
pub enum QuizEvent {
    SelectSubject(SubjectId),
    SelectDifficulty(Difficulty),
    Start,
    QuestionsLoaded {
        epoch: u64,
        result: Result<Vec<Question>, QuestionSourceError>,
    },
    SelectAnswer {
        question_id: QuestionId,
        answer: String,
    },
    Next,
    Skip,
    Tick(ClockTick),
    Reset,
    Shutdown,
}

impl From<ClockTick> for QuizEvent {
    fn from(tick: ClockTick) -> Self {
        QuizEvent::Tick(tick)
    }
}

//
// ─── VIEW ──────────────────────────────────────────────────────────────────────
//

/// Everything the presentation layer needs to render the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizView {
    pub subject: Option<Subject>,
    pub difficulty: Option<Difficulty>,
    pub loading: bool,
    pub error: Option<String>,
    pub session: SessionSnapshot,
    pub results: Option<QuizResults>,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Single owner of the quiz session.
///
/// Not shared between tasks: events are applied one at a time, so each
/// transition is atomic with respect to anyone reading [`view`](Self::view).
/// Owns the clock and arms it only while the session is in progress.
pub struct QuizController {
    catalog: Catalog,
    source: Arc<dyn QuestionSource>,
    events: UnboundedSender<QuizEvent>,
    session: QuizSession,
    selection: QuizSelection,
    loading: bool,
    error: Option<String>,
    load_epoch: u64,
    clock: SessionClock,
}

impl QuizController {
    /// `events` must feed back into whoever calls [`handle`](Self::handle); the
    /// clock and the question fetch post their results there.
    #[must_use]
    pub fn new(
        source: Arc<dyn QuestionSource>,
        events: UnboundedSender<QuizEvent>,
        settings: QuizSettings,
    ) -> Self {
        Self {
            catalog: Catalog::default(),
            source,
            events,
            session: QuizSession::new().with_time_limit(settings.time_limit_secs()),
            selection: QuizSelection::default(),
            loading: false,
            error: None,
            load_epoch: 0,
            clock: SessionClock::new(settings.tick_period()),
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn is_clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    #[must_use]
    pub fn view(&self) -> QuizView {
        QuizView {
            subject: self.selected_subject().cloned(),
            difficulty: self.selection.difficulty,
            loading: self.loading,
            error: self.error.clone(),
            session: self.session.snapshot(),
            results: QuizResults::from_session(&self.session).ok(),
        }
    }

    /// Apply one event. Events that do not fit the current state are dropped.
    pub fn handle(&mut self, event: QuizEvent) {
        match event {
            QuizEvent::SelectSubject(id) => self.select_subject(id),
            QuizEvent::SelectDifficulty(difficulty) => self.select_difficulty(difficulty),
            QuizEvent::Start => self.request_questions(),
            QuizEvent::QuestionsLoaded { epoch, result } => self.questions_loaded(epoch, result),
            QuizEvent::SelectAnswer {
                question_id,
                answer,
            } => {
                let transition = self.session.select_answer_for(&question_id, answer);
                self.settle("select", transition);
            }
            QuizEvent::Next => {
                let transition = self.session.advance();
                self.settle("next", transition);
            }
            QuizEvent::Skip => {
                let transition = self.session.skip();
                self.settle("skip", transition);
            }
            QuizEvent::Tick(tick) => {
                if !self.clock.is_current(tick) {
                    log::debug!("dropping stale tick from epoch {}", tick.epoch);
                    return;
                }
                let transition = self.session.tick();
                self.settle("tick", transition);
            }
            QuizEvent::Reset => self.reset(),
            QuizEvent::Shutdown => self.clock.disarm(),
        }
    }

    fn selected_subject(&self) -> Option<&Subject> {
        self.selection
            .subject
            .as_ref()
            .and_then(|id| self.catalog.subject(id))
    }

    fn accepts_selection(&self) -> bool {
        self.session.status() == QuizStatus::Idle && !self.loading
    }

    fn select_subject(&mut self, id: SubjectId) {
        if !self.accepts_selection() {
            log::debug!("ignoring subject selection while {:?}", self.session.status());
            return;
        }
        if self.catalog.subject(&id).is_none() {
            log::debug!("ignoring unknown subject {id}");
            return;
        }
        self.selection.subject = Some(id);
        self.error = None;
    }

    fn select_difficulty(&mut self, difficulty: Difficulty) {
        if !self.accepts_selection() {
            log::debug!("ignoring difficulty selection while {:?}", self.session.status());
            return;
        }
        self.selection.difficulty = Some(difficulty);
        self.error = None;
    }

    fn request_questions(&mut self) {
        if !self.accepts_selection() {
            log::debug!(
                "ignoring start: session {:?}, loading {}",
                self.session.status(),
                self.loading
            );
            return;
        }
        let (Some(subject), Some(difficulty)) =
            (self.selected_subject().cloned(), self.selection.difficulty)
        else {
            log::debug!("ignoring start without subject and difficulty");
            return;
        };

        self.loading = true;
        self.error = None;
        self.load_epoch = self.load_epoch.wrapping_add(1);
        let epoch = self.load_epoch;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        log::info!("requesting questions for {} ({})", subject.id(), difficulty.id());
        tokio::spawn(async move {
            let result = source.fetch_questions(&subject, difficulty).await;
            if events.send(QuizEvent::QuestionsLoaded { epoch, result }).is_err() {
                log::debug!("quiz runtime stopped before questions arrived");
            }
        });
    }

    fn questions_loaded(&mut self, epoch: u64, result: Result<Vec<Question>, QuestionSourceError>) {
        if !self.loading || epoch != self.load_epoch {
            log::debug!("dropping stale question load from epoch {epoch}");
            return;
        }
        self.loading = false;

        let questions = match result {
            Ok(questions) => questions,
            Err(err) => {
                log::warn!("question source failed: {err}");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                return;
            }
        };

        match self.session.start(questions) {
            Ok(Transition::Started) => {
                log::info!("quiz started with {} questions", self.session.total());
                self.clock.arm(self.events.clone());
            }
            Ok(transition) => self.settle("start", transition),
            Err(err) => {
                log::warn!("question source returned an unusable set: {err}");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    fn settle(&mut self, action: &str, transition: Transition) {
        match transition {
            Transition::Advanced { index } => {
                log::debug!("{action}: moved to question {}", index + 1);
                self.clock.arm(self.events.clone());
            }
            Transition::Completed => {
                self.clock.disarm();
                match QuizResults::from_session(&self.session) {
                    Ok(results) => log::info!("quiz completed: {}", results.feedback()),
                    Err(err) => log::warn!("completed session has no results: {err}"),
                }
            }
            Transition::Ignored => {
                log::debug!("{action} ignored while {:?}", self.session.status());
            }
            Transition::Started
            | Transition::Recorded
            | Transition::Ticked { .. }
            | Transition::Reset => {}
        }
    }

    fn reset(&mut self) {
        self.clock.disarm();
        self.session.reset();
        self.selection = QuizSelection::default();
        self.loading = false;
        self.error = None;
        // Invalidate any fetch still in flight.
        self.load_epoch = self.load_epoch.wrapping_add(1);
        log::debug!("quiz reset");
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("status", &self.session.status())
            .field("current", &self.session.current_index())
            .field("total", &self.session.total())
            .field("selection", &self.selection)
            .field("loading", &self.loading)
            .field("load_epoch", &self.load_epoch)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
