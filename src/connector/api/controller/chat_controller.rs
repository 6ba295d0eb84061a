use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::domain::{DomainError, ProfileChoice, Session};

use super::super::Container;

const USAGE: &str = "\
How to use:
  1) Type a question and press Enter.
  2) Do not enter personal information (real names, phone numbers, student IDs).
  3) Double-check important decisions against official sources.
The conversation is kept only for this run.

Commands: /reset  /profile <standard|reasoning>  /help  /quit";

enum ChatCommand {
    Reset,
    Profile(Option<String>),
    Help,
    Quit,
    Message(String),
    Blank,
}

impl ChatCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ChatCommand::Blank;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        match parts.next() {
            Some("/reset") => ChatCommand::Reset,
            Some("/profile") => ChatCommand::Profile(parts.next().map(|s| s.trim().to_string())),
            Some("/help") => ChatCommand::Help,
            Some("/quit") | Some("/exit") => ChatCommand::Quit,
            _ => ChatCommand::Message(line.to_string()),
        }
    }
}

/// Terminal chat loop. The session lives on this controller's stack for the
/// whole run; the profile toggle is re-read before every question.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat(&self) -> Result<String> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(stdin, stdout).await
    }

    pub async fn run<R, W>(&self, mut input: R, mut output: W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut session = self.container.new_session();
        let mut choice = self.container.default_profile();
        let converse = self.container.converse_use_case();
        let mut exchanges = 0usize;

        output.write_all(format!("{USAGE}\n\n").as_bytes()).await?;
        if self.container.is_mock() {
            output
                .write_all(b"(offline mode: answers are echoed back)\n\n")
                .await?;
        }

        loop {
            output
                .write_all(format!("you [{choice}]> ").as_bytes())
                .await?;
            output.flush().await?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                break;
            }

            match ChatCommand::parse(&line) {
                ChatCommand::Blank => continue,
                ChatCommand::Quit => break,
                ChatCommand::Help => {
                    output.write_all(format!("{USAGE}\n").as_bytes()).await?;
                }
                ChatCommand::Reset => {
                    session.reset();
                    output.write_all(b"Conversation cleared.\n").await?;
                }
                ChatCommand::Profile(arg) => {
                    let next = match arg {
                        Some(name) => name.parse::<ProfileChoice>(),
                        None => Ok(choice.toggled()),
                    };
                    match next {
                        Ok(next) => {
                            choice = next;
                            let profile = self.container.profile(choice);
                            output
                                .write_all(
                                    format!("Profile: {choice} ({})\n", profile.model_id())
                                        .as_bytes(),
                                )
                                .await?;
                        }
                        Err(e) => output.write_all(format!("{e}\n").as_bytes()).await?,
                    }
                }
                ChatCommand::Message(question) => {
                    let profile = self.container.profile(choice);
                    match converse.submit(&mut session, &question, &profile).await {
                        Ok(reply) => {
                            exchanges += 1;
                            output
                                .write_all(
                                    format!(
                                        "assistant [{}]> {}\n\n",
                                        reply.used_model(),
                                        reply.answer()
                                    )
                                    .as_bytes(),
                                )
                                .await?;
                        }
                        Err(DomainError::InvalidInput(msg)) => {
                            output.write_all(format!("{msg}\n").as_bytes()).await?;
                        }
                        Err(e) => {
                            warn!("Chat turn failed: {}", e);
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        Ok(self.farewell(&session, exchanges))
    }

    fn farewell(&self, session: &Session, exchanges: usize) -> String {
        format!(
            "Bye. {} exchange(s), {} turn(s) in the final conversation.",
            exchanges,
            session.render_view().count()
        )
    }
}
