//! Bot behaviour: command responses and webhook event dispatch.

pub mod commands;
pub mod dispatcher;

pub use commands::{respond_to, Command, WELCOME_MESSAGE};
pub use dispatcher::{dispatch, plan, Action, DispatchSummary};
