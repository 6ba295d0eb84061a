use anyhow::Result;

use crate::domain::{ProfileChoice, Reply};

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, question: String, choice: ProfileChoice) -> Result<String> {
        let mut session = self.container.new_session();
        let profile = self.container.profile(choice);

        let reply = self
            .container
            .converse_use_case()
            .submit(&mut session, &question, &profile)
            .await?;

        Ok(self.format_reply(&reply))
    }

    fn format_reply(&self, reply: &Reply) -> String {
        format!("{}\n\n(model: {})", reply.answer(), reply.used_model())
    }
}
