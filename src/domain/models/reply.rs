use crate::domain::CompletionError;

pub const NO_RESPONSE_PLACEHOLDER: &str = "(no response)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Answered,
    /// The provider returned zero choices.
    Empty,
    Failed(CompletionError),
}

/// Result of one dispatch: always displayable, even on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    answer: String,
    used_model: String,
    outcome: ReplyOutcome,
}

impl Reply {
    pub fn answered(answer: impl Into<String>, used_model: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            used_model: used_model.into(),
            outcome: ReplyOutcome::Answered,
        }
    }

    pub fn empty(used_model: impl Into<String>) -> Self {
        Self {
            answer: NO_RESPONSE_PLACEHOLDER.to_string(),
            used_model: used_model.into(),
            outcome: ReplyOutcome::Empty,
        }
    }

    pub fn failed(error: CompletionError, requested_model: impl Into<String>) -> Self {
        Self {
            answer: format!("An error occurred: {error}"),
            used_model: requested_model.into(),
            outcome: ReplyOutcome::Failed(error),
        }
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn used_model(&self) -> &str {
        &self.used_model
    }

    pub fn outcome(&self) -> &ReplyOutcome {
        &self.outcome
    }

    pub fn error(&self) -> Option<&CompletionError> {
        match &self.outcome {
            ReplyOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ReplyOutcome::Failed(_))
    }

    pub fn into_parts(self) -> (String, String) {
        (self.answer, self.used_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_reply_carries_error_text_and_requested_model() {
        let reply = Reply::failed(CompletionError::network("connection refused"), "fast");
        assert!(reply.is_failed());
        assert_eq!(reply.used_model(), "fast");
        assert!(reply.answer().starts_with("An error occurred: "));
        assert!(reply.answer().contains("connection refused"));
    }

    #[test]
    fn empty_reply_uses_placeholder() {
        let reply = Reply::empty("fast-v2");
        assert_eq!(reply.answer(), NO_RESPONSE_PLACEHOLDER);
        assert!(!reply.is_failed());
        assert!(reply.error().is_none());
    }
}
