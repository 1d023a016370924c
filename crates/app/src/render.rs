use std::fmt::Write;

use quiz_core::model::{NextLabel, OptionStyle, QuizOutcome};
use services::{LoadState, QuizView};

fn marker(style: OptionStyle) -> &'static str {
    match style {
        OptionStyle::Idle | OptionStyle::Locked | OptionStyle::Dimmed => "( )",
        OptionStyle::Selected => "(*)",
        OptionStyle::Correct => "(+)",
        OptionStyle::Incorrect => "(x)",
    }
}

fn label(label: NextLabel) -> &'static str {
    match label {
        NextLabel::Next => "Next",
        NextLabel::ShowResult => "Show Your Result",
    }
}

/// Text for the states that come before a quiz is on screen.
pub fn load_state(state: &LoadState) -> String {
    match state {
        LoadState::Loading => "Loading questions...".to_owned(),
        LoadState::Ready(_) => String::new(),
        LoadState::Unavailable(_) => "No questions available.".to_owned(),
        LoadState::Cancelled => "Cancelled.".to_owned(),
    }
}

pub fn question(view: &QuizView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>40}",
        format!("{} / {}", view.progress.position, view.progress.total)
    );
    let _ = writeln!(out, "{}", view.prompt);
    let _ = writeln!(out);
    for option in &view.options {
        let _ = writeln!(
            out,
            "  {} {}. {}",
            marker(option.style),
            option.index + 1,
            option.text
        );
    }
    let _ = writeln!(out);
    if view.next.enabled {
        let _ = write!(out, "[{}] press n", label(view.next.label));
    } else {
        let _ = write!(out, "[{}] pick an option first", label(view.next.label));
    }
    out
}

pub fn outcome(outcome: &QuizOutcome) -> String {
    format!(
        "Your result: {}/{} ({:.0}%)",
        outcome.correct,
        outcome.total,
        outcome.percent()
    )
}
