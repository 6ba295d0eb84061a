use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Chat interactively in the terminal
    Chat,

    /// Ask a single question in a fresh conversation
    Ask {
        question: String,
    },

    /// Serve the browser chat UI
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,

        /// Drop sessions whose page has been silent for this many seconds
        #[arg(long, default_value = "1800")]
        idle_timeout: u64,
    },
}
