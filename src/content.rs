//! Content generation collaborator for the dare/truth round.
//!
//! Generation is an external capability; the engine only hands a prompt to
//! whatever implementation the client wires in and degrades to a fixed
//! fallback when that fails. A generator failure is never a hard error —
//! the round must keep moving.

use std::fmt;

use crate::core::DareChoice;

/// Fallback when a dare cannot be generated.
pub const FALLBACK_DARE: &str =
    "Do your best impression of the other player until they laugh.";

/// Fallback when a truth cannot be generated.
pub const FALLBACK_TRUTH: &str =
    "What is one thing you've never told the other player?";

/// Prompt handed to the generator for each choice.
#[must_use]
pub fn prompt_for(choice: DareChoice) -> &'static str {
    match choice {
        DareChoice::Dare => {
            "Give one short, playful dare for a two-player party game. Reply with the dare only."
        }
        DareChoice::Truth => {
            "Give one short, revealing truth question for a two-player party game. Reply with the question only."
        }
    }
}

/// External text generator.
pub trait ContentGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, ContentError>;
}

/// The generator was unreachable or returned garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentError(pub String);

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content generation failed: {}", self.0)
    }
}

impl std::error::Error for ContentError {}

/// Generate text for a choice, falling back to the canned prompt on any
/// failure (including blank output).
pub fn generate_or_fallback(generator: &mut dyn ContentGenerator, choice: DareChoice) -> String {
    match generator.generate(prompt_for(choice)) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => fallback(choice).to_string(),
        Err(err) => {
            log::warn!("falling back to canned {choice:?}: {err}");
            fallback(choice).to_string()
        }
    }
}

fn fallback(choice: DareChoice) -> &'static str {
    match choice {
        DareChoice::Dare => FALLBACK_DARE,
        DareChoice::Truth => FALLBACK_TRUTH,
    }
}

/// Offline generator cycling through a fixed list; handy for tests and
/// hot-seat play without a network.
pub struct CannedContent {
    dares: Vec<String>,
    truths: Vec<String>,
    next_dare: usize,
    next_truth: usize,
}

impl CannedContent {
    #[must_use]
    pub fn new(dares: Vec<String>, truths: Vec<String>) -> Self {
        Self {
            dares,
            truths,
            next_dare: 0,
            next_truth: 0,
        }
    }
}

impl ContentGenerator for CannedContent {
    fn generate(&mut self, prompt: &str) -> Result<String, ContentError> {
        // The engine only ever sends the two canned prompts.
        let (list, cursor) = if prompt == prompt_for(DareChoice::Dare) {
            (&self.dares, &mut self.next_dare)
        } else {
            (&self.truths, &mut self.next_truth)
        };
        if list.is_empty() {
            return Err(ContentError("no canned content".into()));
        }
        let text = list[*cursor % list.len()].clone();
        *cursor += 1;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingGenerator;

    impl ContentGenerator for FailingGenerator {
        fn generate(&mut self, _prompt: &str) -> Result<String, ContentError> {
            Err(ContentError("offline".into()))
        }
    }

    #[test]
    fn test_failure_degrades_to_fallback() {
        let mut generator = FailingGenerator;
        assert_eq!(
            generate_or_fallback(&mut generator, DareChoice::Dare),
            FALLBACK_DARE
        );
        assert_eq!(
            generate_or_fallback(&mut generator, DareChoice::Truth),
            FALLBACK_TRUTH
        );
    }

    #[test]
    fn test_blank_output_degrades_to_fallback() {
        struct Blank;
        impl ContentGenerator for Blank {
            fn generate(&mut self, _prompt: &str) -> Result<String, ContentError> {
                Ok("   ".into())
            }
        }
        assert_eq!(
            generate_or_fallback(&mut Blank, DareChoice::Truth),
            FALLBACK_TRUTH
        );
    }

    #[test]
    fn test_canned_content_cycles() {
        let mut generator = CannedContent::new(
            vec!["dare one".into(), "dare two".into()],
            vec!["truth one".into()],
        );
        assert_eq!(
            generate_or_fallback(&mut generator, DareChoice::Dare),
            "dare one"
        );
        assert_eq!(
            generate_or_fallback(&mut generator, DareChoice::Dare),
            "dare two"
        );
        assert_eq!(
            generate_or_fallback(&mut generator, DareChoice::Dare),
            "dare one"
        );
        assert_eq!(
            generate_or_fallback(&mut generator, DareChoice::Truth),
            "truth one"
        );
    }
}
