use crate::client::{ConnectionError, Sender};
use crate::game::{DispatchError, Dispatcher};
use common::{decode, DecodeError};
use futures::stream::SplitStream;
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct Connection {
    sender: Sender,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

enum ConnectionState {
    Disconnected,
    Connected(Connection),
    // Terminal, there is no reconnect
    Closed,
}

impl Connection {
    // The reader stops when the server hangs up or the socket fails
    fn is_alive(&self) -> bool {
        !self.reader.is_finished()
    }
}

pub struct WebSocketClient {
    state: ConnectionState,
    close_timeout: Duration,
}

pub fn endpoint(addr: &str, player_id: i64) -> String {
    format!("ws://{}/ws?id={}", addr, player_id)
}

impl WebSocketClient {
    pub fn new(close_timeout: Duration) -> Self {
        WebSocketClient {
            state: ConnectionState::Disconnected,
            close_timeout,
        }
    }

    /// False once the server has hung up, even before `close` is called.
    pub fn is_connected(&self) -> bool {
        match &self.state {
            ConnectionState::Connected(connection) => connection.is_alive(),
            _ => false,
        }
    }

    pub fn sender(&self) -> Result<&Sender, ConnectionError> {
        match &self.state {
            ConnectionState::Connected(connection) if connection.is_alive() => {
                Ok(&connection.sender)
            }
            ConnectionState::Connected(_) | ConnectionState::Closed => {
                Err(ConnectionError::Closed)
            }
            ConnectionState::Disconnected => Err(ConnectionError::NotConnected),
        }
    }

    /// Dials the server and starts the reader and writer tasks. Every
    /// decoded inbound message is handed to `dispatcher`.
    pub async fn connect(
        &mut self,
        addr: &str,
        player_id: i64,
        dispatcher: Dispatcher,
    ) -> Result<(), ConnectionError> {
        match &self.state {
            ConnectionState::Connected(connection) if connection.is_alive() => {
                return Err(ConnectionError::AlreadyConnected)
            }
            ConnectionState::Connected(_) | ConnectionState::Closed => {
                return Err(ConnectionError::Closed)
            }
            ConnectionState::Disconnected => {}
        }

        let url = endpoint(addr, player_id);
        info!("connecting to {}", url);
        let (ws, _) = connect_async(url.as_str())
            .await
            .map_err(|source| ConnectionError::Dial {
                url: url.clone(),
                source,
            })?;
        let (ws_sender, ws_rcv) = ws.split();
        let (client_sender, client_rcv) = mpsc::unbounded_channel();

        let client_rcv = UnboundedReceiverStream::new(client_rcv);
        let writer = tokio::task::spawn(
            client_rcv
                .map(Ok::<Message, tungstenite::Error>)
                .forward(ws_sender)
                .map(|result| {
                    if let Err(e) = result {
                        error!("error sending websocket msg: {}", e);
                    }
                }),
        );
        let reader = tokio::task::spawn(receive_loop(ws_rcv, dispatcher));

        self.state = ConnectionState::Connected(Connection {
            sender: Sender(client_sender),
            reader,
            writer,
        });
        info!("connected to {}", url);
        Ok(())
    }

    /// Stops reading and lets the writer send a close frame, waiting at most
    /// `close_timeout` for it. Also releases a connection the server has
    /// already hung up.
    pub async fn close(&mut self) -> Result<(), ConnectionError> {
        let connection = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
            ConnectionState::Connected(connection) => connection,
            other => {
                self.state = other;
                return Err(ConnectionError::NotConnected);
            }
        };
        let Connection {
            sender,
            reader,
            mut writer,
        } = connection;
        reader.abort();
        // The writer ends once its channel has no senders left
        drop(sender);
        if tokio::time::timeout(self.close_timeout, &mut writer)
            .await
            .is_err()
        {
            warn!("timed out waiting for the close frame to be sent");
            writer.abort();
        }
        info!("connection closed");
        Ok(())
    }
}

async fn receive_loop(mut ws_rcv: SplitStream<WsStream>, dispatcher: Dispatcher) {
    while let Some(result) = ws_rcv.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                error!("read: {}", e);
                break;
            }
        };
        let frame = match msg {
            Message::Text(text) => text,
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    warn!("binary frame is not utf-8: {}", e);
                    continue;
                }
            },
            Message::Close(frame) => {
                info!("server closed the connection: {:?}", frame);
                break;
            }
            _ => continue,
        };
        if handle_frame(&frame, &dispatcher).await.is_err() {
            break;
        }
    }
    info!("receive loop ended");
    println!("Disconnected from server.");
}

// Frames that fail to decode are reported and never dispatched
#[tracing::instrument(skip(frame, dispatcher))]
async fn handle_frame(frame: &str, dispatcher: &Dispatcher) -> Result<(), DispatchError> {
    info!("recv: {}", frame);
    match decode(frame) {
        Ok(action) => {
            debug!(?action, "message decoded");
            dispatcher.dispatch(action).await
        }
        Err(DecodeError::UnknownType(kind)) => {
            warn!("not decoding message of type {:?}", kind);
            println!("not decoding");
            Ok(())
        }
        Err(e) => {
            warn!("dropping message: {}", e);
            println!("{}", e);
            Ok(())
        }
    }
}
