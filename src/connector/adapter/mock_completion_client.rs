use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{CompletionError, CompletionRequest, CompletionResponse, Role};

#[derive(Debug, Clone)]
enum MockBehavior {
    /// Repeat the last user turn back, served by the requested model.
    Echo,
    Answer { text: String, model: String },
    Empty { model: String },
    Fail(CompletionError),
}

/// Offline [`CompletionClient`] for `--mock` runs and tests.
///
/// Records every request it receives so callers can inspect the prompt.
pub struct MockCompletionClient {
    behavior: MockBehavior,
    delay: Option<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Wait this long before answering, like a slow upstream.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn echo() -> Self {
        Self::with_behavior(MockBehavior::Echo)
    }

    pub fn answering(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Answer {
            text: text.into(),
            model: model.into(),
        })
    }

    pub fn empty(model: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Empty {
            model: model.into(),
        })
    }

    pub fn failing(error: CompletionError) -> Self {
        Self::with_behavior(MockBehavior::Fail(error))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        debug!(
            "MockCompletionClient received {} turns for {}",
            request.messages().len(),
            request.model()
        );

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockBehavior::Echo => {
                let question = request
                    .messages()
                    .iter()
                    .rev()
                    .find(|t| t.role() == Role::User)
                    .map(|t| t.content())
                    .unwrap_or_default();
                Ok(CompletionResponse::new(
                    vec![format!("You said: {question}")],
                    request.model(),
                ))
            }
            MockBehavior::Answer { text, model } => {
                Ok(CompletionResponse::new(vec![text.clone()], model))
            }
            MockBehavior::Empty { model } => Ok(CompletionResponse::new(Vec::new(), model)),
            MockBehavior::Fail(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelProfile, Turn};

    #[tokio::test]
    async fn echo_repeats_last_user_turn() {
        let client = MockCompletionClient::echo();
        let request = CompletionRequest::new(
            &ModelProfile::new("gpt-4o-mini", 10),
            vec![Turn::user("first"), Turn::assistant("x"), Turn::user("second")],
        );

        let response = client.complete(&request).await.unwrap();

        assert_eq!(response.first_choice(), Some("You said: second"));
        assert_eq!(response.model(), "gpt-4o-mini");
        assert_eq!(client.requests().len(), 1);
    }
}
