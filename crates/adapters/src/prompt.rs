// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{BufRead, Write};

/// Adapter for yes/no questions to the user
pub trait ConfirmAdapter {
    /// Ask `question`; anything but an explicit yes is a no
    fn confirm(&self, question: &str) -> std::io::Result<bool>;
}

/// Asks on stderr and reads the answer from stdin.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalConfirm;

impl ConfirmAdapter for TerminalConfirm {
    fn confirm(&self, question: &str) -> std::io::Result<bool> {
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{question} [y/N] ")?;
        stderr.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        let accepted = is_yes(&answer);
        tracing::debug!(question, accepted, "confirmation answered");
        Ok(accepted)
    }
}

/// `y` or `yes`, any case, surrounding whitespace ignored.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::ConfirmAdapter;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct FakeConfirmState {
        answers: VecDeque<bool>,
        default: bool,
        questions: Vec<String>,
    }

    /// Fake confirmation adapter answering from a queue
    #[derive(Clone)]
    pub struct FakeConfirm {
        inner: Arc<Mutex<FakeConfirmState>>,
    }

    impl FakeConfirm {
        /// Answers `default` once the queue is empty
        pub fn new(default: bool) -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeConfirmState {
                    answers: VecDeque::new(),
                    default,
                    questions: Vec::new(),
                })),
            }
        }

        pub fn yes() -> Self {
            Self::new(true)
        }

        pub fn no() -> Self {
            Self::new(false)
        }

        /// Queue the next answer
        pub fn answer(&self, accept: bool) -> &Self {
            self.inner.lock().answers.push_back(accept);
            self
        }

        /// Get all questions asked so far
        pub fn questions(&self) -> Vec<String> {
            self.inner.lock().questions.clone()
        }
    }

    impl ConfirmAdapter for FakeConfirm {
        fn confirm(&self, question: &str) -> std::io::Result<bool> {
            let mut state = self.inner.lock();
            state.questions.push(question.to_string());
            let answer = state.answers.pop_front().unwrap_or(state.default);
            Ok(answer)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeConfirm;

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
