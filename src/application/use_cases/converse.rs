use std::sync::Arc;

use tracing::debug;

use crate::application::{AskQuestionUseCase, CompletionClient};
use crate::domain::{DomainError, ModelProfile, Reply, Role, Session};

/// One user interaction: dispatch the question against the current history,
/// then record both the question and whatever came back.
pub struct ConverseUseCase {
    ask: AskQuestionUseCase,
}

impl ConverseUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            ask: AskQuestionUseCase::new(client),
        }
    }

    pub async fn submit(
        &self,
        session: &mut Session,
        question: &str,
        profile: &ModelProfile,
    ) -> Result<Reply, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::invalid_input("message must not be empty"));
        }

        let reply = self.ask.execute(question, profile, session).await;

        session.append(Role::User, question)?;
        session.append(Role::Assistant, reply.answer())?;

        debug!(
            "Session {} now holds {} turns",
            session.id(),
            session.len()
        );

        Ok(reply)
    }
}
