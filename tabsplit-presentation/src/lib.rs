#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod message_presenter;

pub use error_presenter::format_split_error;
pub use message_presenter::{MessageContext, MessageMode, MessagePresenter};
