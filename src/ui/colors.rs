use std::io::IsTerminal;

#[cfg(feature = "color")]
use ansi_term::Colour;

/// Terminal text colouring for run status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colorizer {
    enabled: bool,
}

/// Role of a status line, each with a fixed colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Up,
    Down,
    Waiting,
    Error,
}

impl Colorizer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Decide from `--no-color`, `NO_COLOR`, `TERM` and whether stdout is a terminal
    pub fn from_environment(disabled_by_flag: bool) -> Self {
        let no_color = std::env::var("NO_COLOR").ok();
        let term = std::env::var("TERM").ok();
        Self::new(Self::should_enable(
            disabled_by_flag,
            no_color.as_deref(),
            term.as_deref(),
            std::io::stdout().is_terminal(),
        ))
    }

    /// Colour is used only when nothing opts out and stdout is a terminal
    pub fn should_enable(
        disabled_by_flag: bool,
        no_color: Option<&str>,
        term: Option<&str>,
        stdout_is_terminal: bool,
    ) -> bool {
        if disabled_by_flag {
            return false;
        }
        if no_color.is_some_and(|value| !value.is_empty()) {
            return false;
        }
        if term.is_some_and(|value| value.eq_ignore_ascii_case("dumb")) {
            return false;
        }
        stdout_is_terminal
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn up(&self, text: &str) -> String {
        self.paint(Tone::Up, text)
    }

    pub fn down(&self, text: &str) -> String {
        self.paint(Tone::Down, text)
    }

    pub fn waiting(&self, text: &str) -> String {
        self.paint(Tone::Waiting, text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(Tone::Error, text)
    }

    #[cfg(feature = "color")]
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let colour = match tone {
            Tone::Up => Colour::Green,
            Tone::Down => Colour::Yellow,
            Tone::Waiting => Colour::Cyan,
            Tone::Error => Colour::Red,
        };
        colour.paint(text).to_string()
    }

    #[cfg(not(feature = "color"))]
    pub fn paint(&self, _tone: Tone, text: &str) -> String {
        text.to_string()
    }
}
