use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::CompletionClient;
use crate::domain::{CompletionRequest, ModelProfile, Reply, Session, Turn};

/// Number of history turns sent along with each question.
pub const HISTORY_WINDOW: usize = 8;

/// Builds a bounded prompt and issues exactly one completion request.
///
/// Stateless between calls. Failures are never retried and never escape:
/// they come back as a [`Reply`] whose answer is displayable error text.
pub struct AskQuestionUseCase {
    client: Arc<dyn CompletionClient>,
}

impl AskQuestionUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// The last [`HISTORY_WINDOW`] turns of `history`, oldest first, followed
    /// by the question as a user turn.
    pub fn build_prompt(question: &str, history: &Session) -> Vec<Turn> {
        let mut prompt: Vec<Turn> = history.recent(HISTORY_WINDOW).to_vec();
        prompt.push(Turn::user(question));
        prompt
    }

    pub async fn execute(&self, question: &str, profile: &ModelProfile, history: &Session) -> Reply {
        let prompt = Self::build_prompt(question, history);
        let request = CompletionRequest::new(profile, prompt);

        info!(
            "Dispatching question to {} ({} turns, {}={})",
            profile.model_id(),
            request.messages().len(),
            profile.token_limit_param().field_name(),
            profile.max_output_tokens()
        );

        let start_time = Instant::now();

        let reply = match self.client.complete(&request).await {
            Ok(response) => match response.first_choice() {
                Some(text) => Reply::answered(text.trim(), response.model()),
                None => {
                    warn!("Completion for {} returned no choices", response.model());
                    Reply::empty(response.model())
                }
            },
            Err(e) => {
                warn!("Completion request to {} failed: {}", profile.model_id(), e);
                Reply::failed(e, profile.model_id())
            }
        };

        debug!(
            "Dispatch finished in {:?} (served by {})",
            start_time.elapsed(),
            reply.used_model()
        );

        reply
    }
}
