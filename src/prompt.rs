//! Line-oriented operator prompts.
//!
//! Interactive flows ask questions through the [`Prompt`] trait so they can be
//! driven from a terminal or from canned answers. `Ok(None)` means the input
//! ended (Ctrl-D or a closed pipe) and is treated as the operator leaving.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::gerber::{GerberError, GerberResult, Vendor};

/// Asks questions and returns one line of answer each.
pub trait Prompt {
    /// Shows `question` and reads one answer line without its line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    /// Shows an informational line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn say(&mut self, line: &str) -> io::Result<()>;
}

/// Prompt on the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdioPrompt;

impl Prompt for StdioPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(question.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{line}")
    }
}

/// Replays canned answers, recording everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    /// Questions and lines shown so far.
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    /// Creates a prompt that answers with `answers` in order, then reports end of input.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.transcript.push(question.to_string());
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}

/// Outcome of a question that must be answered.
#[derive(Debug)]
pub enum Answer {
    /// The operator answered.
    Given(String),
    /// Input ended before an answer.
    Closed,
}

/// Asks `question`, trimming the answer.
///
/// # Errors
///
/// Returns an error if the prompt fails.
pub fn ask_trimmed(prompt: &mut dyn Prompt, question: &str) -> io::Result<Answer> {
    Ok(prompt
        .ask(question)?
        .map_or(Answer::Closed, |a| Answer::Given(a.trim().to_string())))
}

/// Shows the manufacturer menu and resolves the answer.
///
/// Returns `Ok(None)` when input ended.
///
/// # Errors
///
/// Returns [`GerberError::InvalidVendorSelection`] for an unknown answer, or
/// [`GerberError::Prompt`] if the prompt fails.
pub fn choose_vendor(prompt: &mut dyn Prompt) -> GerberResult<Option<Vendor>> {
    prompt.say("Supported manufacturers").map_err(GerberError::prompt)?;
    for vendor in Vendor::ALL {
        prompt
            .say(&format!("{:<19}{}", format!("{}:", vendor.label()), vendor.menu_number()))
            .map_err(GerberError::prompt)?;
    }

    match ask_trimmed(prompt, "Manufacturer: ").map_err(GerberError::prompt)? {
        Answer::Given(selection) => Vendor::from_menu_selection(&selection).map(Some),
        Answer::Closed => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_then_end_of_input() {
        let mut prompt = ScriptedPrompt::new(["one", "two"]);
        assert_eq!(prompt.ask("?").unwrap().as_deref(), Some("one"));
        assert_eq!(prompt.ask("?").unwrap().as_deref(), Some("two"));
        assert_eq!(prompt.ask("?").unwrap(), None);
        assert_eq!(prompt.transcript.len(), 3);
    }

    #[test]
    fn vendor_menu() {
        let mut prompt = ScriptedPrompt::new([" 4 "]);
        assert_eq!(choose_vendor(&mut prompt).unwrap(), Some(Vendor::JlcPcbV6));
        assert!(prompt.transcript.iter().any(|l| l.starts_with("PCBWay:")));

        let mut prompt = ScriptedPrompt::new(["9"]);
        assert!(matches!(
            choose_vendor(&mut prompt),
            Err(GerberError::InvalidVendorSelection { .. })
        ));

        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        assert_eq!(choose_vendor(&mut prompt).unwrap(), None);
    }

    /// Shows lines but fails on every read.
    struct BrokenInput;

    impl Prompt for BrokenInput {
        fn ask(&mut self, _question: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"))
        }

        fn say(&mut self, _line: &str) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn vendor_menu_read_failure_keeps_cause() {
        use std::error::Error as _;

        let err = choose_vendor(&mut BrokenInput).unwrap_err();

        assert!(matches!(err, GerberError::Prompt { .. }));
        let cause = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(cause.kind(), io::ErrorKind::InvalidData);
    }
}
