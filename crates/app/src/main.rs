mod terminal;

use std::fmt;

use quiz_core::model::{Catalog, Difficulty, SubjectId};
use services::{AppServices, QuizApiConfig, QuizSettings, config::parse_time_limit};

use crate::terminal::Terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownSubject { raw: String },
    InvalidDifficulty { raw: String },
    InvalidTimer { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownSubject { raw } => write!(f, "unknown --subject value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::InvalidTimer { raw } => write!(f, "invalid --timer value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  quiz [--api-url <url>] [--subject <id>] [--difficulty <id>] [--timer <secs>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:8000");
    eprintln!("  --timer 30");
    eprintln!();
    eprintln!("Subjects:");
    for subject in Catalog::default().subjects() {
        eprintln!("  {:<20} {}", subject.id().as_str(), subject.name());
    }
    eprintln!();
    eprintln!("Difficulties: beginner, intermediate, advanced");
    eprintln!();
    eprintln!("Environment (a .env file is read too):");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_TIMER_SECS, RUST_LOG");
}

/// Command-line overrides; anything left `None` falls back to the environment.
#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    subject: Option<SubjectId>,
    difficulty: Option<Difficulty>,
    timer: Option<u32>,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        catalog: &Catalog,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    parsed.api_url = Some(require_value(args, "--api-url")?);
                }
                "--subject" => {
                    let value = require_value(args, "--subject")?;
                    let id = SubjectId::new(value.trim());
                    if catalog.subject(&id).is_none() {
                        return Err(ArgsError::UnknownSubject { raw: value });
                    }
                    parsed.subject = Some(id);
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    let difficulty = value
                        .parse::<Difficulty>()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                    parsed.difficulty = Some(difficulty);
                }
                "--timer" => {
                    let value = require_value(args, "--timer")?;
                    let secs = parse_time_limit(&value)
                        .map_err(|_| ArgsError::InvalidTimer { raw: value.clone() })?;
                    parsed.timer = Some(secs);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal; only the process environment applies then.
    dotenvy::dotenv().ok();
    env_logger::init();

    let catalog = Catalog::default();
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, &catalog).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let api_config = match args.api_url {
        Some(url) => QuizApiConfig::new(url)?,
        None => QuizApiConfig::from_env()?,
    };
    let mut settings = QuizSettings::from_env()?;
    if let Some(secs) = args.timer {
        settings = settings.with_time_limit(secs);
    }

    log::info!(
        "using quiz backend at {} ({}s per question)",
        api_config.base_url(),
        settings.time_limit_secs()
    );
    let services = AppServices::new(api_config, settings);
    let runtime = services.spawn_runtime();
    let handle = runtime.handle();

    if let Some(subject) = args.subject {
        handle.select_subject(subject)?;
    }
    if let Some(difficulty) = args.difficulty {
        handle.select_difficulty(difficulty)?;
    }

    let mut terminal = Terminal::new(handle, services.catalog().clone(), services.api());
    let outcome = terminal.drive().await;
    runtime.shutdown().await;
    outcome
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
