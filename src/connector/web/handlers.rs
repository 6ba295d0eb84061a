use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::application::SessionHandle;
use crate::connector::api::Container;
use crate::domain::{DomainError, ProfileChoice, Reply, Role, Session};

use super::page::INDEX_HTML;

pub type AppState = Arc<Container>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub id: String,
    pub profile: ProfileChoice,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageView {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptView {
    pub id: String,
    pub messages: Vec<MessageView>,
}

impl From<&Session> for TranscriptView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            messages: session
                .render_view()
                .map(|t| MessageView {
                    role: t.role(),
                    content: t.content().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub content: String,
    /// Current toggle position; falls back to the server default.
    #[serde(default)]
    pub profile: Option<ProfileChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyView {
    pub answer: String,
    pub used_model: String,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            answer: reply.answer().to_string(),
            used_model: reply.used_model().to_string(),
            failed: reply.is_failed(),
            error_kind: reply.error().map(|e| e.kind().to_string()),
        }
    }
}

/// Maps [`DomainError`] onto HTTP status codes with a JSON body.
#[derive(Debug)]
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

async fn load(state: &AppState, id: &str) -> Result<SessionHandle, ApiError> {
    state
        .session_repository()
        .find(id)
        .await?
        .ok_or_else(|| DomainError::not_found(id).into())
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let session = state.new_session();
    let id = session.id().to_string();
    state.session_repository().insert(session).await?;
    info!("Opened session {}", id);

    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            id,
            profile: state.default_profile(),
        }),
    ))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptView>, ApiError> {
    let handle = load(&state, &id).await?;
    let session = handle.lock().await;
    Ok(Json(TranscriptView::from(&*session)))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessage>,
) -> Result<Json<ReplyView>, ApiError> {
    let handle = load(&state, &id).await?;
    let choice = body.profile.unwrap_or_else(|| state.default_profile());
    let profile = state.profile(choice);

    // Held until the answer is appended, so a second submit waits its turn.
    let mut session = handle.lock().await;
    let reply = state
        .converse_use_case()
        .submit(&mut session, &body.content, &profile)
        .await?;

    Ok(Json(ReplyView::from(&reply)))
}

pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptView>, ApiError> {
    let handle = load(&state, &id).await?;
    let mut session = handle.lock().await;
    session.reset();
    Ok(Json(TranscriptView::from(&*session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.session_repository().delete(&id).await? {
        info!("Closed session {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DomainError::not_found(id).into())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::connector::api::ContainerConfig;
    use crate::connector::MockCompletionClient;
    use crate::domain::CompletionError;

    fn state_with(client: MockCompletionClient) -> AppState {
        Arc::new(Container::with_client(
            ContainerConfig::default(),
            Arc::new(client),
        ))
    }

    async fn open(state: &AppState) -> String {
        let (status, Json(created)) = create_session(State(state.clone())).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        created.id
    }

    fn message(content: &str, profile: Option<ProfileChoice>) -> Json<SendMessage> {
        Json(SendMessage {
            content: content.to_string(),
            profile,
        })
    }

    #[tokio::test]
    async fn send_then_list_shows_both_turns() {
        let state = state_with(MockCompletionClient::echo());
        let id = open(&state).await;

        let Json(reply) = send_message(State(state.clone()), Path(id.clone()), message("hi", None))
            .await
            .unwrap();
        assert_eq!(reply.answer, "You said: hi");
        assert!(!reply.failed);

        let Json(view) = list_messages(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].role, Role::User);
        assert_eq!(view.messages[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn profile_toggle_selects_model_per_request() {
        let state = state_with(MockCompletionClient::echo());
        let id = open(&state).await;

        let Json(reply) = send_message(
            State(state.clone()),
            Path(id),
            message("think", Some(ProfileChoice::Reasoning)),
        )
        .await
        .unwrap();

        assert_eq!(reply.used_model, "gpt-5-mini");
    }

    #[tokio::test]
    async fn failed_completion_is_reported_in_body() {
        let state = state_with(MockCompletionClient::failing(CompletionError::RateLimited(
            "too many requests".into(),
        )));
        let id = open(&state).await;

        let Json(reply) = send_message(State(state.clone()), Path(id.clone()), message("hi", None))
            .await
            .unwrap();

        assert!(reply.failed);
        assert_eq!(reply.error_kind.as_deref(), Some("rate_limited"));
        assert_eq!(reply.used_model, "gpt-4o-mini");

        let Json(view) = list_messages(State(state), Path(id)).await.unwrap();
        assert!(view.messages[1].content.contains("too many requests"));
    }

    #[tokio::test]
    async fn concurrent_sends_on_one_session_keep_both_exchanges() {
        let state = state_with(
            MockCompletionClient::echo().with_delay(Duration::from_millis(50)),
        );
        let id = open(&state).await;

        let (first, second) = tokio::join!(
            send_message(State(state.clone()), Path(id.clone()), message("first", None)),
            send_message(State(state.clone()), Path(id.clone()), message("second", None)),
        );
        first.unwrap();
        second.unwrap();

        let Json(view) = list_messages(State(state), Path(id)).await.unwrap();
        assert_eq!(view.messages.len(), 4);
        for pair in view.messages.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].content, format!("You said: {}", pair[0].content));
        }
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let state = state_with(MockCompletionClient::echo());
        let err = list_messages(State(state), Path("nope".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_message_is_400() {
        let state = state_with(MockCompletionClient::echo());
        let id = open(&state).await;

        let err = send_message(State(state), Path(id), message("   ", None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reset_and_delete() {
        let state = state_with(MockCompletionClient::echo());
        let id = open(&state).await;
        send_message(State(state.clone()), Path(id.clone()), message("hi", None))
            .await
            .unwrap();

        let Json(view) = reset_session(State(state.clone()), Path(id.clone()))
            .await
            .unwrap();
        assert!(view.messages.is_empty());

        let status = delete_session(State(state.clone()), Path(id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = delete_session(State(state), Path(id)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
