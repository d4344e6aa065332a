pub mod action;
pub mod messages;
mod tictactoe;

pub use action::{Action, ActionKind, Header, Payload};
pub use messages::{decode, encode, DecodeError, IncomingMessage, OutgoingMessage};
pub use tictactoe::*;
