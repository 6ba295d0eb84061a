//! API key sources, consulted in order by
//! [`ResolveApiKeyUseCase`](crate::application::ResolveApiKeyUseCase):
//! secrets file, then environment, then a one-time terminal prompt.

use std::collections::HashMap;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::{debug, warn};

use crate::application::CredentialSource;
use crate::domain::{ApiKey, DomainError};

pub const API_KEY_NAME: &str = "OPENAI_API_KEY";
pub const DEFAULT_SECRETS_FILE: &str = "~/.chatline/secrets.json";

pub fn default_secrets_path() -> PathBuf {
    PathBuf::from(expand_tilde(DEFAULT_SECRETS_FILE))
}

pub fn expand_tilde(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            if path == "~" {
                return home.to_string_lossy().to_string();
            }
            return path.replacen("~", &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

/// A JSON object of named secrets, e.g. `{"OPENAI_API_KEY": "sk-..."}`.
///
/// A missing file simply yields nothing; a file that exists but cannot be
/// parsed is a configuration error.
pub struct SecretsFileSource {
    path: PathBuf,
    key_name: String,
}

impl SecretsFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key_name: API_KEY_NAME.to_string(),
        }
    }
}

impl CredentialSource for SecretsFileSource {
    fn name(&self) -> &str {
        "secrets file"
    }

    fn resolve(&self) -> Result<Option<ApiKey>, DomainError> {
        if !self.path.exists() {
            debug!("Secrets file {} does not exist", self.path.display());
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let secrets: HashMap<String, serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| {
                DomainError::config(format!(
                    "secrets file {} is not a JSON object: {e}",
                    self.path.display()
                ))
            })?;

        match secrets.get(&self.key_name) {
            Some(serde_json::Value::String(value)) => Ok(ApiKey::new(value.as_str())),
            Some(_) => Err(DomainError::config(format!(
                "{} in {} must be a string",
                self.key_name,
                self.path.display()
            ))),
            None => Ok(None),
        }
    }
}

pub struct EnvironmentSource {
    var: String,
}

impl EnvironmentSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvironmentSource {
    fn default() -> Self {
        Self::new(API_KEY_NAME)
    }
}

impl CredentialSource for EnvironmentSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn resolve(&self) -> Result<Option<ApiKey>, DomainError> {
        Ok(std::env::var(&self.var).ok().and_then(ApiKey::new))
    }
}

enum PromptInput {
    /// Stdin is not a terminal; nobody is there to ask.
    Unavailable,
    /// Raw-mode terminal; typed characters are not echoed.
    Terminal,
    Reader(Mutex<Box<dyn BufRead + Send>>),
}

/// Asks once on the terminal. The key lives only in process memory.
pub struct PromptSource {
    input: PromptInput,
}

impl PromptSource {
    /// Prompts on stdin, but only when stdin is a terminal.
    pub fn stdin() -> Self {
        let input = if std::io::stdin().is_terminal() {
            PromptInput::Terminal
        } else {
            PromptInput::Unavailable
        };
        Self { input }
    }

    pub fn with_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            input: PromptInput::Reader(Mutex::new(Box::new(reader))),
        }
    }

    fn read_hidden() -> Result<String, DomainError> {
        terminal::enable_raw_mode()?;
        let keys = std::iter::from_fn(|| loop {
            match event::read() {
                Ok(Event::Key(key)) => return Some(Ok(key)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        });
        let typed = collect_hidden(keys);
        terminal::disable_raw_mode()?;
        eprintln!();
        Ok(typed?)
    }
}

/// Builds the typed line from key presses until Enter. Ctrl-C aborts.
fn collect_hidden(keys: impl Iterator<Item = std::io::Result<KeyEvent>>) -> std::io::Result<String> {
    let mut typed = String::new();
    for key in keys {
        let key = key?;
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "API key entry cancelled",
                ));
            }
            KeyCode::Backspace => {
                typed.pop();
            }
            KeyCode::Char(c) => typed.push(c),
            _ => {}
        }
    }
    Ok(typed)
}

impl CredentialSource for PromptSource {
    fn name(&self) -> &str {
        "terminal prompt"
    }

    fn resolve(&self) -> Result<Option<ApiKey>, DomainError> {
        if matches!(self.input, PromptInput::Unavailable) {
            return Ok(None);
        }

        eprint!("OpenAI API key (input hidden, kept in memory for this run only): ");
        std::io::stderr().flush()?;

        let line = match &self.input {
            PromptInput::Terminal => Self::read_hidden()?,
            PromptInput::Reader(reader) => {
                let mut line = String::new();
                let mut reader = reader
                    .lock()
                    .map_err(|_| DomainError::internal("prompt reader lock poisoned"))?;
                reader.read_line(&mut line)?;
                line
            }
            PromptInput::Unavailable => String::new(),
        };

        let key = ApiKey::new(line);
        if key.is_none() {
            warn!("No API key entered");
        }
        Ok(key)
    }
}
