pub mod action;
pub mod client;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod gate;
pub mod params;
pub mod tool;
pub mod web;

pub use action::ActionKind;
pub use client::{MessagePage, ReadOptions, SendOptions, SendResult, SlackActions};
pub use dispatch::dispatch;
pub use envelope::Envelope;
pub use error::{ActionError, SlackError};
pub use gate::ActionCategory;
pub use tool::SlackTool;
pub use web::SlackWebClient;
