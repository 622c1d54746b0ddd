use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use quiz_core::model::{Difficulty, QuestionId, SubjectId};

use super::controller::{QuizController, QuizEvent, QuizView};
use crate::config::QuizSettings;
use crate::error::RuntimeError;
use crate::question_source::QuestionSource;

/// Cloneable inbound surface of a running quiz.
///
/// Every call only enqueues an event; state changes are observed through
/// [`subscribe`](Self::subscribe).
#[derive(Clone, Debug)]
pub struct QuizHandle {
    events: mpsc::UnboundedSender<QuizEvent>,
    view: watch::Receiver<QuizView>,
}

impl QuizHandle {
    fn send(&self, event: QuizEvent) -> Result<(), RuntimeError> {
        self.events.send(event).map_err(|_| RuntimeError::Closed)
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn select_subject(&self, id: SubjectId) -> Result<(), RuntimeError> {
        self.send(QuizEvent::SelectSubject(id))
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn select_difficulty(&self, difficulty: Difficulty) -> Result<(), RuntimeError> {
        self.send(QuizEvent::SelectDifficulty(difficulty))
    }

    /// Fetch questions for the current selection and begin the quiz.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn start(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Start)
    }

    /// Choose `answer` for `question_id`; ignored if that question is no longer active.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn select_answer(
        &self,
        question_id: QuestionId,
        answer: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        self.send(QuizEvent::SelectAnswer {
            question_id,
            answer: answer.into(),
        })
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn next(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Next)
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn skip(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Skip)
    }

    /// # Errors
    ///
    /// Returns `RuntimeError::Closed` once the runtime has stopped.
    pub fn reset(&self) -> Result<(), RuntimeError> {
        self.send(QuizEvent::Reset)
    }

    /// Latest published view.
    #[must_use]
    pub fn view(&self) -> QuizView {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QuizView> {
        self.view.clone()
    }
}

/// A quiz controller running on its own task.
pub struct QuizRuntime {
    handle: QuizHandle,
    task: JoinHandle<()>,
}

impl QuizRuntime {
    /// Spawn the event loop. Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(source: Arc<dyn QuestionSource>, settings: QuizSettings) -> Self {
        let (events, mut inbox) = mpsc::unbounded_channel();
        let mut controller = QuizController::new(source, events.clone(), settings);
        let (publisher, view) = watch::channel(controller.view());

        let task = tokio::spawn(async move {
            while let Some(event) = inbox.recv().await {
                let stop = matches!(event, QuizEvent::Shutdown);
                controller.handle(event);
                let next = controller.view();
                publisher.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
                if stop {
                    break;
                }
            }
            log::debug!("quiz runtime stopped");
        });

        Self {
            handle: QuizHandle { events, view },
            task,
        }
    }

    #[must_use]
    pub fn handle(&self) -> QuizHandle {
        self.handle.clone()
    }

    /// Stop the event loop and wait for it to finish.
    pub async fn shutdown(mut self) {
        if self.handle.send(QuizEvent::Shutdown).is_err() {
            return;
        }
        if let Err(err) = (&mut self.task).await {
            log::warn!("quiz runtime task ended abnormally: {err}");
        }
    }
}

/// Dropping the runtime without [`shutdown`](QuizRuntime::shutdown) still stops
/// the loop; the controller and its clock go down with the task.
impl Drop for QuizRuntime {
    fn drop(&mut self) {
        self.task.abort();
    }
}
