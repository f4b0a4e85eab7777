use std::sync::Arc;
use tracing::{info, warn};

use crate::error::FormError;
use crate::model::DraftState;
use crate::signal::ErrorSignal;

pub const EMPTY_QUESTION_MESSAGE: &str = "question field must not be empty";

/// Downstream consumer of submitted questions. Fire-and-forget.
pub trait Acknowledge: Send + Sync {
    fn acknowledge(&self, question: &str);
}

/// Draft tracking and validation for the question input.
pub struct QuestionForm {
    draft: String,
    signal: Arc<ErrorSignal>,
    sink: Arc<dyn Acknowledge>,
}

impl QuestionForm {
    pub fn new(signal: Arc<ErrorSignal>, sink: Arc<dyn Acknowledge>) -> Self {
        Self {
            draft: String::new(),
            signal,
            sink,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn state(&self) -> DraftState {
        DraftState::of(&self.draft)
    }

    pub fn on_change(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        if self.state() == DraftState::NonEmpty {
            self.signal.clear();
        }
    }

    /// Hands the draft, as typed, to the sink and resets it. Drafts that
    /// trim to empty raise the banner and stay untouched.
    pub fn on_submit(&mut self) -> Result<String, FormError> {
        if self.state() == DraftState::Empty {
            warn!("rejected empty question");
            self.signal.set(EMPTY_QUESTION_MESSAGE);
            return Err(FormError::Validation(EMPTY_QUESTION_MESSAGE));
        }
        info!(len = self.draft.len(), "question submitted");
        self.sink.acknowledge(&self.draft);
        Ok(std::mem::take(&mut self.draft))
    }
}

impl std::fmt::Debug for QuestionForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionForm")
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}
