use owo_colors::{OwoColorize, Style as OwoStyle};

use crate::terminal::TerminalClient;

/// Semantic role of a piece of terminal output.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Tone {
    Heading,
    Success,
    Warning,
    Muted,
    Value,
}

impl Tone {
    fn style(self) -> OwoStyle {
        match self {
            Self::Heading => OwoStyle::new().bold().cyan(),
            Self::Success => OwoStyle::new().bold().green(),
            Self::Warning => OwoStyle::new().bold().yellow(),
            Self::Muted => OwoStyle::new().dimmed(),
            Self::Value => OwoStyle::new().bold(),
        }
    }
}

/// Applies colour and style to terminal text.
#[derive(Debug)]
pub(crate) struct Painter {
    use_colour: bool,
}

impl Painter {
    /// Creates a painter with explicit colour control.
    pub(crate) fn new(use_colour: bool) -> Self {
        Self { use_colour }
    }

    /// Colours stdout output only when it is a terminal and `NO_COLOR` is unset.
    pub(crate) fn for_stdout(terminal_client: &dyn TerminalClient) -> Self {
        let no_colour = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self::new(terminal_client.stdout_is_terminal() && !no_colour)
    }

    pub(crate) fn heading<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(Tone::Heading, text)
    }

    pub(crate) fn success<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(Tone::Success, text)
    }

    pub(crate) fn warning<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(Tone::Warning, text)
    }

    pub(crate) fn muted<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(Tone::Muted, text)
    }

    pub(crate) fn value<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(Tone::Value, text)
    }

    pub(crate) fn paint<T: AsRef<str>>(&self, tone: Tone, text: T) -> String {
        let text = text.as_ref();
        if self.use_colour {
            format!("{}", text.style(tone.style()))
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    struct FakeTerminal;

    impl TerminalClient for FakeTerminal {
        fn stdout_is_terminal(&self) -> bool {
            false
        }

        fn stderr_is_terminal(&self) -> bool {
            false
        }
    }

    #[rstest]
    #[case::heading(Tone::Heading)]
    #[case::success(Tone::Success)]
    #[case::warning(Tone::Warning)]
    #[case::muted(Tone::Muted)]
    #[case::value(Tone::Value)]
    fn plain_painter_leaves_text_untouched(#[case] tone: Tone) {
        let painter = Painter::new(false);
        assert_eq!("frame 0", painter.paint(tone, "frame 0"));
    }

    #[rstest]
    #[case::heading(Tone::Heading)]
    #[case::success(Tone::Success)]
    #[case::warning(Tone::Warning)]
    #[case::muted(Tone::Muted)]
    #[case::value(Tone::Value)]
    fn colour_painter_wraps_text_in_escapes(#[case] tone: Tone) {
        let painter = Painter::new(true);
        let styled = painter.paint(tone, "frame 0");
        assert_ne!("frame 0", styled);
        assert!(styled.contains("frame 0"));
        assert!(styled.starts_with('\u{1b}'));
    }

    #[test]
    fn piped_stdout_is_never_coloured() {
        let painter = Painter::for_stdout(&FakeTerminal);
        assert_eq!("✓", painter.success("✓"));
    }
}
