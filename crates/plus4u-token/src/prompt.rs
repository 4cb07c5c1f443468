//! Credential prompt capability.
//!
//! The host environment supplies the actual prompt UI; this crate only
//! constrains the call sites and their ordering.

use async_trait::async_trait;

/// What to ask the user for.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// Label shown to the user.
    pub label: String,
    /// Whether the input should be masked.
    pub secret: bool,
}

impl PromptRequest {
    /// A masked prompt.
    pub fn secret(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            secret: true,
        }
    }
}

/// Interactive prompt supplied by the host environment.
///
/// `None` means the prompt was dismissed without input.
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    async fn prompt(&self, request: PromptRequest) -> Option<String>;
}

/// Prompt implementation for headless use: every prompt is cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInteraction;

#[async_trait]
impl CredentialPrompt for NoInteraction {
    async fn prompt(&self, _request: PromptRequest) -> Option<String> {
        None
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Prompt that replays a fixed sequence of answers and counts calls.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        answers: Mutex<VecDeque<Option<String>>>,
        calls: AtomicU32,
    }

    impl ScriptedPrompt {
        pub fn new(answers: Vec<Option<&str>>) -> Self {
            Self {
                answers: Mutex::new(
                    answers
                        .into_iter()
                        .map(|a| a.map(str::to_string))
                        .collect(),
                ),
                calls: AtomicU32::new(0),
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialPrompt for ScriptedPrompt {
        async fn prompt(&self, _request: PromptRequest) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers
                .lock()
                .expect("prompt script lock")
                .pop_front()
                .flatten()
        }
    }
}
