//! Chat commands the bot answers in one-on-one chats.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Sent to every new follower.
pub const WELCOME_MESSAGE: &str =
    "Thanks for adding me as a friend! 🎉\nI let the site owner know when someone visits the website. Type \"help\" to see what I understand.";

/// A recognised command. Matching ignores ASCII case and surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    /// Greeting.
    #[strum(to_string = "hello", serialize = "hi")]
    Hello,
    /// What the bot is.
    #[strum(to_string = "who are you")]
    WhoAreYou,
    /// How visitor notifications work.
    #[strum(to_string = "notify")]
    Notify,
    /// List of commands.
    #[strum(to_string = "help")]
    Help,
}

impl Command {
    /// Look up a command from message text.
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_str(text.trim()).ok()
    }

    /// Response text for this command.
    pub fn response(self) -> String {
        match self {
            Self::Hello => "Hello! 👋 Nice to hear from you.".to_string(),
            Self::WhoAreYou => {
                "I'm a LINE bot that relays website visitor notifications to the site owner.".to_string()
            }
            Self::Notify => "Whenever someone opens the website, its owner gets a LINE message with the visitor's IP address, device and visit time.".to_string(),
            Self::Help => {
                let names: Vec<String> = Self::iter().map(|c| format!("\"{}\"", c)).collect();
                format!("Commands I understand: {}", names.join(", "))
            }
        }
    }
}

/// Reply for an incoming text message: the command response, or an echo.
pub fn respond_to(text: &str) -> String {
    match Command::parse(text) {
        Some(command) => command.response(),
        None => format!("You said: {}", text),
    }
}
