use anyhow::{bail, Result};

use crate::domain::ProfileChoice;
use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    profile: ProfileChoice,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            profile: container.default_profile(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { question } => self.ask_controller.ask(question, self.profile).await,
            Commands::Chat => self.chat_controller.chat().await,
            Commands::Serve { .. } => bail!("serve is handled by the web server, not the router"),
        }
    }
}
