use crate::client::{ConnectionError, SendMsg};
use crate::config::Config;
use crate::game::Dispatcher;
use crate::input::{self, Command, HELP, UNKNOWN};
use crate::ws::WebSocketClient;
use common::{Action, GameState, Header};
use futures::StreamExt;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tokio_stream::wrappers::LinesStream;
use tracing::{error, info, warn};

const PROMPT: &str = ">: ";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Builds the message a command sends, if it sends one.
pub fn outgoing_action(command: &Command, header: Header, snapshot: &GameState) -> Option<Action> {
    match *command {
        Command::Join => Some(Action::join(header)),
        Command::Start => Some(Action::start_request(header)),
        Command::Play { row, col } => Some(Action::player_move(header, row, col)),
        Command::GameOver => Some(Action::game_over(
            header,
            snapshot.winner().to_string(),
            *snapshot.board(),
        )),
        Command::Error => Some(Action::error("Failure")),
        _ => None,
    }
}

pub struct Shell {
    config: Config,
    client: WebSocketClient,
    dispatcher: Dispatcher,
    snapshots: watch::Receiver<GameState>,
}

impl Shell {
    pub fn new(config: Config, dispatcher: Dispatcher, snapshots: watch::Receiver<GameState>) -> Self {
        let client = WebSocketClient::new(config.close_timeout);
        Shell {
            config,
            client,
            dispatcher,
            snapshots,
        }
    }

    /// Reads commands until `exit` or end of input, then closes the
    /// connection if one is open.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        let mut lines = LinesStream::new(input.lines());
        prompt()?;
        while let Some(line) = lines.next().await {
            let line = line?;
            println!();
            if self.handle_line(&line).await == Flow::Exit {
                break;
            }
            prompt()?;
        }
        match self.client.close().await {
            Ok(()) | Err(ConnectionError::NotConnected) => {}
            Err(e) => error!("error closing connection: {}", e),
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match input::parse(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("bad input: {}", e);
                println!("{}", e);
                return Flow::Continue;
            }
        };
        match command {
            Command::Exit => {
                println!("Exiting program. Goodbye!");
                return Flow::Exit;
            }
            Command::Empty => {}
            Command::Help => println!("{}", HELP),
            Command::Unknown(_) => println!("{}", UNKNOWN),
            Command::Time => println!("{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")),
            Command::Connect => self.connect().await,
            Command::Update => {
                if self.client.is_connected() {
                    print!("{}", *self.snapshots.borrow());
                } else {
                    println!("{}", ConnectionError::NotConnected);
                }
            }
            command => {
                let header = Header::new(self.config.game_id, self.config.player_id);
                let action = outgoing_action(&command, header, &self.snapshots.borrow());
                if let Some(action) = action {
                    if let Err(e) = self.send(&action) {
                        warn!("could not send {}: {}", action.kind(), e);
                        println!("{}", e);
                    }
                }
            }
        }
        Flow::Continue
    }

    async fn connect(&mut self) {
        let result = self
            .client
            .connect(
                &self.config.addr,
                self.config.player_id,
                self.dispatcher.clone(),
            )
            .await;
        match result {
            Ok(()) => println!(
                "Connected to {} as player {}",
                self.config.addr, self.config.player_id
            ),
            Err(e) => {
                error!("connect: {}", e);
                println!("{}", e);
            }
        }
    }

    fn send(&self, action: &Action) -> Result<(), ConnectionError> {
        self.client.sender()?.send_action(action)?;
        info!("sent {}", action.kind());
        Ok(())
    }
}

fn prompt() -> io::Result<()> {
    print!("{}", PROMPT);
    io::stdout().flush()
}
