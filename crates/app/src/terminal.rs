use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_core::model::{Catalog, QuestionId};
use services::{QuizApiClient, QuizHandle, QuizView, RuntimeError};
use ui::vm::{
    map_difficulty_options, map_progress, map_quiz_card, map_ready, map_subject_cards,
    map_summary,
};
use ui::{Screen, screen_for};

/// One line typed by the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Empty,
    Number(usize),
    Word(String),
    Next,
    Skip,
    Reset,
    Start,
    Explain(usize),
    Quit,
}

pub(crate) fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "q" | "quit" | "exit" => Input::Quit,
        "n" | "next" => Input::Next,
        "s" | "skip" => Input::Skip,
        "r" | "reset" => Input::Reset,
        "start" | "go" => Input::Start,
        other => {
            if let Some(rest) = other.strip_prefix("e ") {
                if let Ok(n) = rest.trim().parse() {
                    return Input::Explain(n);
                }
            }
            match other.parse::<usize>() {
                Ok(n) => Input::Number(n),
                Err(_) => Input::Word(other.to_string()),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The parts of a view that require a full redraw when they change.
/// Countdown ticks alone only print a short timer line.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Frame {
    screen: Screen,
    question: Option<QuestionId>,
    selected: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl Frame {
    fn of(view: &QuizView) -> Self {
        Self {
            screen: screen_for(view),
            question: view
                .session
                .current_question
                .as_ref()
                .map(|q| q.id().clone()),
            selected: view.session.selected_answer.clone(),
            loading: view.loading,
            error: view.error.clone(),
        }
    }
}

/// Line-oriented driver: renders published views and turns stdin lines into events.
pub(crate) struct Terminal {
    handle: QuizHandle,
    catalog: Catalog,
    api: Arc<QuizApiClient>,
    last_frame: Option<Frame>,
}

impl Terminal {
    pub(crate) fn new(handle: QuizHandle, catalog: Catalog, api: Arc<QuizApiClient>) -> Self {
        Self {
            handle,
            catalog,
            api,
            last_frame: None,
        }
    }

    /// Run until the user quits, stdin closes or the runtime stops.
    ///
    /// # Errors
    ///
    /// Returns stdin read failures and `RuntimeError::Closed`.
    pub(crate) async fn drive(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut views = self.handle.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let view = views.borrow_and_update().clone();
        self.render(&view);

        loop {
            tokio::select! {
                changed = views.changed() => {
                    if changed.is_err() {
                        log::debug!("quiz runtime stopped publishing");
                        break;
                    }
                    let view = views.borrow_and_update().clone();
                    self.render(&view);
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    let view = views.borrow().clone();
                    if self.apply(parse_input(&line), &view).await? == Flow::Quit {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    async fn apply(&mut self, input: Input, view: &QuizView) -> Result<Flow, RuntimeError> {
        match input {
            Input::Quit => return Ok(Flow::Quit),
            Input::Reset => self.handle.reset()?,
            input => match screen_for(view) {
                Screen::PickSubject => self.pick_subject(&input)?,
                Screen::PickDifficulty => self.pick_difficulty(&input)?,
                Screen::Ready => match input {
                    Input::Empty | Input::Start if !view.loading => self.handle.start()?,
                    _ => println!("Press Enter to start, r to start over."),
                },
                Screen::Question => self.answer(&input, view)?,
                Screen::Summary => match input {
                    Input::Explain(n) => self.explain(n, view).await,
                    _ => println!(
                        "Type e <number> for an explanation, r for a new quiz, q to quit."
                    ),
                },
            },
        }
        Ok(Flow::Continue)
    }

    fn pick_subject(&self, input: &Input) -> Result<(), RuntimeError> {
        let subjects = self.catalog.subjects();
        let chosen = match input {
            Input::Number(n) => n.checked_sub(1).and_then(|idx| subjects.get(idx)),
            Input::Word(word) => subjects.iter().find(|s| s.id().as_str() == word),
            _ => None,
        };
        match chosen {
            Some(subject) => self.handle.select_subject(subject.id().clone()),
            None => {
                println!("Choose a subject by number (1-{}) or id.", subjects.len());
                Ok(())
            }
        }
    }

    fn pick_difficulty(&self, input: &Input) -> Result<(), RuntimeError> {
        let options = map_difficulty_options(None);
        let chosen = match input {
            Input::Number(n) => n
                .checked_sub(1)
                .and_then(|idx| options.get(idx))
                .map(|o| o.difficulty),
            Input::Word(word) => word.parse().ok(),
            _ => None,
        };
        match chosen {
            Some(difficulty) => self.handle.select_difficulty(difficulty),
            None => {
                println!("Choose a difficulty by number (1-{}) or name.", options.len());
                Ok(())
            }
        }
    }

    fn answer(&self, input: &Input, view: &QuizView) -> Result<(), RuntimeError> {
        let Some(card) = map_quiz_card(&view.session) else {
            return Ok(());
        };
        match input {
            Input::Number(n) => match n.checked_sub(1).and_then(|idx| card.options.get(idx)) {
                Some(option) => self
                    .handle
                    .select_answer(card.question_id.clone(), option.label.clone()),
                None => {
                    println!("Choose an option between 1 and {}.", card.options.len());
                    Ok(())
                }
            },
            Input::Next => self.handle.next(),
            Input::Skip => self.handle.skip(),
            _ => {
                println!("1-{} answer, n next, s skip, r reset, q quit.", card.options.len());
                Ok(())
            }
        }
    }

    async fn explain(&self, number: usize, view: &QuizView) {
        let Some(results) = view.results.as_ref() else {
            return;
        };
        let summary = map_summary(results);
        let Some(row) = number.checked_sub(1).and_then(|idx| summary.rows.get(idx)) else {
            println!("There is no question {number}.");
            return;
        };
        println!("Asking for an explanation of question {number}...");
        match self.api.explain(&row.question, &row.correct_answer).await {
            Ok(text) => println!("\n{text}\n"),
            Err(err) => {
                log::warn!("explanation lookup failed: {err}");
                println!("Could not fetch an explanation right now.");
            }
        }
    }

    // ─── RENDERING ─────────────────────────────────────────────────────────────

    fn render(&mut self, view: &QuizView) {
        let frame = Frame::of(view);
        if self.last_frame.as_ref() == Some(&frame) {
            if frame.screen == Screen::Question {
                render_countdown(view);
            }
            return;
        }

        match frame.screen {
            Screen::PickSubject => self.render_subjects(view),
            Screen::PickDifficulty => render_difficulties(view),
            Screen::Ready => render_ready(view),
            Screen::Question => render_question(view),
            Screen::Summary => render_summary(view),
        }
        self.last_frame = Some(frame);
    }

    fn render_subjects(&self, view: &QuizView) {
        println!("\nChoose a subject:");
        let selected = view.subject.as_ref().map(|s| s.id());
        for (idx, card) in map_subject_cards(&self.catalog, selected)
            .iter()
            .enumerate()
        {
            println!("  {}. {} - {}", idx + 1, card.name, card.description);
        }
        println!("(number or id, q to quit)");
    }
}

fn render_difficulties(view: &QuizView) {
    if let Some(subject) = &view.subject {
        println!("\nSubject: {}", subject.name());
    }
    println!("Choose a difficulty:");
    for (idx, option) in map_difficulty_options(view.difficulty).iter().enumerate() {
        println!("  {}. {} - {}", idx + 1, option.name, option.description);
    }
    println!("(number or name, r to start over)");
}

fn render_ready(view: &QuizView) {
    let ready = map_ready(view);
    println!("\n{}", ready.headline);
    if let Some(error) = &ready.error {
        println!("{error}");
    }
    if ready.start_enabled {
        println!("Press Enter to {}.", ready.start_label.to_lowercase());
    } else {
        println!("{}", ready.start_label);
    }
}

fn render_question(view: &QuizView) {
    let Some(card) = map_quiz_card(&view.session) else {
        return;
    };
    let progress = map_progress(&view.session);
    println!("\n{}  [{}]  {}", progress.label, progress.percent_label, card.timer_label);
    println!("{}", card.text);
    if let Some(code) = &card.code {
        println!("\n{code}\n");
    }
    for option in &card.options {
        let mark = if option.selected { "x" } else { " " };
        println!("  [{mark}] {}. {}", option.shortcut, option.label);
    }
    println!(
        "({} {}, r reset, q quit)",
        card.action.key(),
        card.action.label().to_lowercase()
    );
}

fn render_countdown(view: &QuizView) {
    let remaining = view.session.time_remaining;
    if remaining <= 5 || remaining % 10 == 0 {
        println!("  {remaining}s left");
    }
}

fn render_summary(view: &QuizView) {
    let Some(results) = view.results.as_ref() else {
        return;
    };
    let summary = map_summary(results);
    println!("\n{}", summary.headline);
    println!("Score: {} {}", summary.score_label, summary.percent_label);
    println!("{}\n", summary.feedback);
    for row in &summary.rows {
        println!("{}. [{}] {}", row.number, row.status_label, row.question);
        println!("   Your answer: {}", row.your_answer);
        println!("   Correct answer: {}", row.correct_answer);
        if !row.explanation.is_empty() {
            println!("   {}", row.explanation);
        }
    }
    println!("\n(e <number> explain, r new quiz, q quit)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(parse_input("  n "), Input::Next);
        assert_eq!(parse_input("S"), Input::Skip);
        assert_eq!(parse_input("r"), Input::Reset);
        assert_eq!(parse_input("quit"), Input::Quit);
        assert_eq!(parse_input(""), Input::Empty);
    }

    #[test]
    fn parses_numbers_words_and_explain() {
        assert_eq!(parse_input("3"), Input::Number(3));
        assert_eq!(parse_input("e 2"), Input::Explain(2));
        assert_eq!(parse_input("Cloud-Computing"), Input::Word("cloud-computing".into()));
        assert_eq!(parse_input("e x"), Input::Word("e x".into()));
    }
}
