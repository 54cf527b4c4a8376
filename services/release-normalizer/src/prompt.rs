//!
//! src/prompt.rs  Andrew Belles  Oct 16th, 2026
//!
//! Operator questions the aggregator asks when it cannot decide on
//! its own. The terminal version blocks on stdin; the scripted one
//! answers from a fixed list and fails fast once it runs dry.
//!

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::errors::NormalizerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    ReleaseType,
    RomanizedTitle,
    RomanizedArtist
}

impl Question {
    pub fn as_str(self) -> &'static str {
        match self {
            Question::ReleaseType     => "release type",
            Question::RomanizedTitle  => "romanized title",
            Question::RomanizedArtist => "romanized artist"
        }
    }
}

pub trait OperatorPrompt {
    /// Asks `question`, showing `message`, and returns the raw answer line
    fn ask(&mut self, question: Question, message: &str) -> Result<String, NormalizerError>;
}

pub struct TerminalPrompt<R, W> {
    input: R,
    output: W
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> OperatorPrompt for TerminalPrompt<R, W> {
    fn ask(&mut self, question: Question, message: &str) -> Result<String, NormalizerError> {
        writeln!(self.output, "\n{}\n{message}", "_".repeat(100))?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(NormalizerError::PromptExhausted(question.as_str().to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Canned answers per question, consumed in order
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Vec<(Question, VecDeque<String>)>
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, question: Question, answer: impl Into<String>) -> Self {
        match self.answers.iter_mut().find(|(q, _)| *q == question) {
            Some((_, queue)) => queue.push_back(answer.into()),
            None => self.answers.push((question, VecDeque::from([answer.into()]))),
        }
        self
    }
}

impl OperatorPrompt for ScriptedPrompt {
    fn ask(&mut self, question: Question, message: &str) -> Result<String, NormalizerError> {
        let answer = self.answers.iter_mut()
            .find(|(q, _)| *q == question)
            .and_then(|(_, queue)| queue.pop_front());

        match answer {
            Some(a) => {
                tracing::info!(question = question.as_str(), answer = %a, "prompt.scripted");
                Ok(a)
            }
            None => {
                tracing::error!(question = question.as_str(), message, "prompt.exhausted");
                Err(NormalizerError::PromptExhausted(question.as_str().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_prompt_reads_one_line() -> Result<(), NormalizerError> {
        let input = "Single\r\nAlbum\n".as_bytes();
        let mut output = Vec::new();
        let mut prompt = TerminalPrompt::new(input, &mut output);

        assert_eq!(prompt.ask(Question::ReleaseType, "Album/Single?")?, "Single");
        assert_eq!(prompt.ask(Question::ReleaseType, "Album/Single?")?, "Album");
        assert!(matches!(
            prompt.ask(Question::ReleaseType, "Album/Single?"),
            Err(NormalizerError::PromptExhausted(_))
        ));

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Album/Single?"));
        Ok(())
    }

    #[test]
    fn scripted_prompt_answers_in_order_then_fails() -> Result<(), NormalizerError> {
        let mut prompt = ScriptedPrompt::new()
            .answer(Question::ReleaseType, "EP")
            .answer(Question::RomanizedTitle, "LILAC")
            .answer(Question::ReleaseType, "Album");

        assert_eq!(prompt.ask(Question::ReleaseType, "")?, "EP");
        assert_eq!(prompt.ask(Question::ReleaseType, "")?, "Album");
        assert_eq!(prompt.ask(Question::RomanizedTitle, "")?, "LILAC");
        assert!(prompt.ask(Question::RomanizedArtist, "").is_err());
        Ok(())
    }
}
