mod clock;
mod controller;
mod runtime;

// Public API of the session subsystem.
pub use clock::{ClockTick, SessionClock};
pub use controller::{LOAD_ERROR_MESSAGE, QuizController, QuizEvent, QuizView};
pub use runtime::{QuizHandle, QuizRuntime};
