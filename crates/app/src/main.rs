use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::{FeedbackMode, SessionEvent};
use services::{Clock, LoadState, QuizLoopService, QuizView, SamplerSeed};
use storage::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod input;
mod render;

use input::Input;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

#[derive(Debug, Clone, PartialEq, Eq)]
enum BankSource {
    Json(PathBuf),
    Sqlite(String),
}

#[derive(Debug, Clone)]
struct Args {
    bank: BankSource,
    seed: SamplerSeed,
    feedback: FeedbackMode,
    verbose: u8,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <json> | --db <sqlite_url>] [--seed <n>] [--reveal] [-v]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank data/theory_questions.json");
    eprintln!();
    eprintln!("While playing: type an option number, `n` for next, `q` to quit.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK, QUIZ_DB_URL, QUIZ_SEED, QUIZ_REVEAL, RUST_LOG");
}

fn parse_seed(raw: String) -> Result<SamplerSeed, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map(SamplerSeed::Fixed)
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        Self::parse_with_env(args, |key| std::env::var(key).ok())
    }

    /// Flags win over environment variables; a malformed `QUIZ_SEED` is only
    /// an error when `--seed` does not replace it.
    fn parse_with_env(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut bank = match env("QUIZ_DB_URL") {
            Some(url) if !url.trim().is_empty() => BankSource::Sqlite(url),
            _ => BankSource::Json(
                env("QUIZ_BANK")
                    .map_or_else(|| PathBuf::from("data/theory_questions.json"), PathBuf::from),
            ),
        };
        let mut seed = None;
        let mut feedback = match env("QUIZ_REVEAL").as_deref() {
            Some("1" | "true") => FeedbackMode::RevealAnswer,
            _ => FeedbackMode::SelectionOnly,
        };
        let mut verbose = 0_u8;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => {
                    bank = BankSource::Json(PathBuf::from(require_value(args, "--bank")?));
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    bank = BankSource::Sqlite(value);
                }
                "--seed" => {
                    seed = Some(parse_seed(require_value(args, "--seed")?)?);
                }
                "--reveal" => feedback = FeedbackMode::RevealAnswer,
                "-v" => verbose = verbose.saturating_add(1),
                "-vv" => verbose = verbose.saturating_add(2),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let seed = match seed {
            Some(seed) => seed,
            None => env("QUIZ_SEED").map_or(Ok(SamplerSeed::Entropy), parse_seed)?,
        };

        Ok(Self {
            bank,
            seed,
            feedback,
            verbose,
        })
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_storage(source: &BankSource) -> Result<Storage, Box<dyn std::error::Error>> {
    match source {
        BankSource::Json(path) => Ok(Storage::json(path.clone())),
        BankSource::Sqlite(url) => Ok(Storage::sqlite(url).await?),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_logging(args.verbose);
    tracing::info!(bank = ?args.bank, seed = ?args.seed, "starting quiz");

    let storage = open_storage(&args.bank).await?;
    let quiz_loop = QuizLoopService::new(Clock::default_clock(), Arc::clone(&storage.questions))
        .with_seed(args.seed);

    println!("{}", render::load_state(&LoadState::Loading));

    // Ctrl-C while the bank is loading abandons the load.
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        })
    };
    let state = LoadState::from_result(quiz_loop.start_quiz_cancellable(&token).await);
    watcher.abort();

    let mut session = match state {
        LoadState::Ready(session) => session,
        other => {
            println!("{}", render::load_state(&other));
            if let LoadState::Unavailable(err) = other {
                return Err(err.into());
            }
            return Ok(());
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let view = QuizView::from_session(&session, args.feedback);
        println!();
        println!("{}", render::question(&view));

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Input::parse(&line) {
            Input::Pick(n) => {
                let Some(option) = view.options.get(n - 1) else {
                    println!("No option {n}.");
                    continue;
                };
                if let SessionEvent::Ignored(_) = quiz_loop.select(&mut session, &option.text) {
                    println!("Answer already locked.");
                }
            }
            Input::Next => match quiz_loop.advance(&mut session) {
                SessionEvent::Completed => {
                    println!();
                    println!("{}", render::outcome(&session.outcome()));
                    break;
                }
                SessionEvent::Ignored(_) => println!("Pick an option first."),
                _ => {}
            },
            Input::Quit => break,
            Input::Unknown => println!("Type an option number, `n` for next or `q` to quit."),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        parse_env(args, &[])
    }

    fn parse_env(args: &[&str], vars: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse_with_env(&mut iter, |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        })
    }

    #[test]
    fn flags_override_bank_and_seed() {
        let args = parse(&["--db", "sqlite::memory:", "--seed", "9", "--reveal", "-v"]).unwrap();
        assert_eq!(args.bank, BankSource::Sqlite("sqlite::memory:".into()));
        assert_eq!(args.seed, SamplerSeed::Fixed(9));
        assert_eq!(args.feedback, FeedbackMode::RevealAnswer);
        assert_eq!(args.verbose, 1);

        let args = parse(&["--bank", "bank.json"]).unwrap();
        assert_eq!(args.bank, BankSource::Json(PathBuf::from("bank.json")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            parse(&["--seed", "abc"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--seed"]),
            Err(ArgsError::MissingValue { flag: "--seed" })
        ));
        assert!(matches!(parse(&["--wat"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn environment_configures_defaults() {
        let args = parse_env(
            &[],
            &[
                ("QUIZ_DB_URL", "sqlite://quiz.sqlite3"),
                ("QUIZ_SEED", " 42 "),
                ("QUIZ_REVEAL", "true"),
            ],
        )
        .unwrap();
        assert_eq!(args.bank, BankSource::Sqlite("sqlite://quiz.sqlite3".into()));
        assert_eq!(args.seed, SamplerSeed::Fixed(42));
        assert_eq!(args.feedback, FeedbackMode::RevealAnswer);

        let args = parse_env(&[], &[("QUIZ_BANK", "other.json")]).unwrap();
        assert_eq!(args.bank, BankSource::Json(PathBuf::from("other.json")));
        assert_eq!(args.seed, SamplerSeed::Entropy);
    }

    #[test]
    fn malformed_seed_variable_is_rejected_unless_overridden() {
        assert!(matches!(
            parse_env(&[], &[("QUIZ_SEED", "abc")]),
            Err(ArgsError::InvalidSeed { raw }) if raw == "abc"
        ));

        let args = parse_env(&["--seed", "5"], &[("QUIZ_SEED", "abc")]).unwrap();
        assert_eq!(args.seed, SamplerSeed::Fixed(5));
    }
}
