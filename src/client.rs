use common::{Action, OutgoingMessage};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Already connected")]
    AlreadyConnected,
    #[error("Not connected. Type 'connect' first")]
    NotConnected,
    #[error("Connection was closed")]
    Closed,
    #[error("Could not connect to {url}: {source}")]
    Dial {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("Could not encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Error sending message")]
    Send,
}

// Feeds the task that owns the socket's write half
#[derive(Debug, Clone)]
pub struct Sender(pub mpsc::UnboundedSender<Message>);

pub trait SendMsg {
    fn send(&self, msg: &str) -> Result<(), ConnectionError>;

    fn send_action(&self, action: &Action) -> Result<(), ConnectionError> {
        let msg = OutgoingMessage::new(action).to_json()?;
        self.send(&msg)
    }
}

impl SendMsg for Sender {
    fn send(&self, msg: &str) -> Result<(), ConnectionError> {
        self.0
            .send(Message::text(msg))
            .map_err(|_| ConnectionError::Send)
    }
}
