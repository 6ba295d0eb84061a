use uuid::Uuid;

use super::{Role, Turn};
use crate::domain::DomainError;

pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a helpful, concise AI assistant. If the user's message is in Korean, reply in Korean.";

/// The ordered turn history of one conversation.
///
/// The first turn is always the system turn. It is never removed, never
/// duplicated and never part of [`Session::render_view`]. Everything after it
/// is append-only until [`Session::reset`].
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    system_instruction: String,
    turns: Vec<Turn>,
}

impl Session {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), system_instruction)
    }

    pub fn with_id(id: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        let system_instruction = system_instruction.into();
        Self {
            id: id.into(),
            turns: vec![Turn::system(system_instruction.clone())],
            system_instruction,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Drop every turn except a fresh system turn.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.turns.push(Turn::system(self.system_instruction.clone()));
    }

    /// Append a user or assistant turn. System turns are rejected.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> Result<(), DomainError> {
        if role == Role::System {
            return Err(DomainError::invalid_input(
                "a session holds exactly one system turn",
            ));
        }
        self.turns.push(Turn::new(role, content));
        Ok(())
    }

    /// Turns meant for display: everything but the leading system turn.
    pub fn render_view(&self) -> impl Iterator<Item = &Turn> + '_ {
        self.turns.iter().skip(1)
    }

    /// The last `n` turns of the full sequence, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when only the system turn is present.
    pub fn is_empty(&self) -> bool {
        self.turns.len() <= 1
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_INSTRUCTION)
    }
}
