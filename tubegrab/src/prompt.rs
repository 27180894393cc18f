//! Interactive menus.
//!
//! Every menu prints numbered options and re-asks until a valid number is entered.
//! On a terminal the answers are read through `dialoguer`; piped or scripted input is
//! read line by line. Reading from a closed input is an error rather than an endless loop.

use crate::cli::Mode;
use crate::error::InputError;
use crate::source::Platform;
use dialoguer::Input;
use dialoguer::console::Term;
use dialoguer::theme::ColorfulTheme;
use std::io::{self, BufRead, IsTerminal, Write};
use tubegrab_dl::presets::{AudioCodec, BITRATES, parse_height};

type Result<T> = std::result::Result<T, InputError>;

const INVALID_CHOICE: &str = "Invalid choice. Try again.";

/// Answer to the invalid-URL question.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Retry {
    Retry,
    Exit,
}

/// Sort resolution labels so the highest comes first.
///
/// Labels without digits sort last; ties keep their input order.
pub fn sort_resolutions(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut labels: Vec<String> = labels.into_iter().collect();
    labels.sort_by_key(|label| std::cmp::Reverse(parse_height(label).unwrap_or(0)));
    labels
}

/// 1-based menu answer to a zero-based index.
fn parse_choice(answer: &str, count: usize) -> Option<usize> {
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// Where menus are printed and answers read from.
pub trait Console {
    /// Print a status line.
    fn notice(&mut self, message: &str) -> Result<()>;

    /// Ask `prompt` and return the trimmed answer.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Ask until the answer is a number in `1..=count`; returns it zero-based.
    fn pick(&mut self, prompt: &str, count: usize) -> Result<usize> {
        loop {
            let answer = self.input(prompt)?;
            match parse_choice(&answer, count) {
                Some(index) => return Ok(index),
                None => self.notice(INVALID_CHOICE)?,
            }
        }
    }
}

impl<C: Console + ?Sized> Console for Box<C> {
    fn notice(&mut self, message: &str) -> Result<()> {
        (**self).notice(message)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        (**self).input(prompt)
    }

    fn pick(&mut self, prompt: &str, count: usize) -> Result<usize> {
        (**self).pick(prompt, count)
    }
}

/// Interactive terminal with line editing.
pub struct Terminal {
    term: Term,
    theme: ColorfulTheme,
}

impl Default for Terminal {
    fn default() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Console for Terminal {
    fn notice(&mut self, message: &str) -> Result<()> {
        self.term.write_line(message)?;
        Ok(())
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)?;

        Ok(answer.trim().to_string())
    }
}

/// Plain line reader and writer, used for piped input and in tests.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }

        Ok(line.trim().to_string())
    }
}

/// Menu driver over a [`Console`].
pub struct Prompter<C> {
    console: C,
}

impl Prompter<Box<dyn Console>> {
    /// `dialoguer` when attached to a terminal, plain lines otherwise.
    pub fn stdio() -> Self {
        let console: Box<dyn Console> = if io::stdin().is_terminal() && io::stdout().is_terminal() {
            Box::new(Terminal::default())
        } else {
            Box::new(LineConsole::new(io::stdin().lock(), io::stdout()))
        };
        Self::new(console)
    }
}

impl<C: Console> Prompter<C> {
    pub fn new(console: C) -> Self {
        Self { console }
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Print a status line.
    pub fn notice(&mut self, message: &str) -> Result<()> {
        self.console.notice(message)
    }

    /// Show `options` numbered from 1 and return the chosen index.
    pub fn choose<T: AsRef<str>>(
        &mut self,
        title: &str,
        label: &str,
        options: &[T],
    ) -> Result<usize> {
        self.console.notice(&format!("\n{title}"))?;
        for (i, option) in options.iter().enumerate() {
            self.console
                .notice(&format!("  [{}] {}", i + 1, option.as_ref()))?;
        }

        let prompt = format!("Select {label} (1-{})", options.len());
        self.console.pick(&prompt, options.len())
    }

    pub fn platform(&mut self) -> Result<Platform> {
        let names = Platform::ALL.map(|p| p.to_string());
        let index = self.choose("Select platform:", "platform", &names)?;
        Ok(Platform::ALL[index])
    }

    /// Raw link or ID as typed; expansion is up to the caller.
    pub fn url_entry(&mut self, platform: Platform) -> Result<String> {
        self.console.input(platform.entry_prompt())
    }

    /// `r` retries; any other answer exits.
    pub fn retry_or_exit(&mut self) -> Result<Retry> {
        let answer = self
            .console
            .input("Invalid URL. Enter R to retry or anything else to exit")?;
        if answer.eq_ignore_ascii_case("r") {
            Ok(Retry::Retry)
        } else {
            Ok(Retry::Exit)
        }
    }

    pub fn mode(&mut self) -> Result<Mode> {
        let names = Mode::ALL.map(|m| m.to_string());
        let index = self.choose("Choose download mode:", "mode", &names)?;
        Ok(Mode::ALL[index])
    }

    pub fn audio_codec(&mut self) -> Result<AudioCodec> {
        let names = AudioCodec::ALL.map(AudioCodec::as_str);
        let index = self.choose("Choose audio format:", "format", &names)?;
        Ok(AudioCodec::ALL[index])
    }

    pub fn bitrate(&mut self) -> Result<String> {
        let names = BITRATES.map(|kbps| format!("{kbps} kbps"));
        let index = self.choose("Choose an audio bitrate:", "bitrate", &names)?;
        Ok(BITRATES[index].to_string())
    }

    /// Pick among `available`, shown highest resolution first.
    pub fn resolution(&mut self, available: impl IntoIterator<Item = String>) -> Result<String> {
        let sorted = sort_resolutions(available);
        let index = self.choose("Choose video resolution:", "resolution", &sorted)?;
        Ok(sorted[index].clone())
    }
}
