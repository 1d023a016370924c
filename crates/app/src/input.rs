/// A line typed by the user while a quiz is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// One-based option number.
    Pick(usize),
    Next,
    Quit,
    Unknown,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "n" | "next" | "" => Input::Next,
            "q" | "quit" | "exit" => Input::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Input::Pick(n),
                _ => Input::Unknown,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Input::parse("2"), Input::Pick(2));
        assert_eq!(Input::parse(" N "), Input::Next);
        assert_eq!(Input::parse(""), Input::Next);
        assert_eq!(Input::parse("quit"), Input::Quit);
        assert_eq!(Input::parse("0"), Input::Unknown);
        assert_eq!(Input::parse("maybe"), Input::Unknown);
    }
}
