//! Line-oriented terminal I/O.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Prompts and replies over any reader/writer pair, so sessions can be scripted.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Print `prompt` and read one line without its line ending.
    ///
    /// End of input is reported as [`io::ErrorKind::UnexpectedEof`].
    pub fn ask(&mut self, prompt: impl Display) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// First non-blank character of the reply, lowercased. Blank replies give `None`.
    pub fn choice(&mut self, prompt: impl Display) -> io::Result<Option<char>> {
        let reply = self.ask(prompt)?;
        Ok(reply
            .trim()
            .chars()
            .next()
            .map(|c| c.to_ascii_lowercase()))
    }

    /// Ask until the reply starts with `y` or `n`.
    pub fn yes_no(&mut self, question: impl Display) -> io::Result<bool> {
        let prompt = format!("{question} (y/n) ");
        loop {
            match self.choice(&prompt)? {
                Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                _ => self.say("Please answer y or n.")?,
            }
        }
    }

    /// Ask for a number. Anything unparsable gives `None`.
    pub fn number(&mut self, prompt: impl Display) -> io::Result<Option<usize>> {
        Ok(self.ask(prompt)?.trim().parse().ok())
    }

    /// Optional text: a blank reply means none.
    pub fn optional_text(&mut self, prompt: impl Display) -> io::Result<Option<String>> {
        let reply = self.ask(prompt)?;
        Ok(Some(reply).filter(|text| !text.trim().is_empty()))
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
