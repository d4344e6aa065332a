use common::{Action, Change, GameState, Payload};
use std::io::{self, Write};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
#[error("Game loop is no longer running")]
pub struct DispatchError;

/// Producer side of the action queue. The queue is bounded and `dispatch`
/// waits while it is full, so a slow game loop holds back the socket reader.
#[derive(Debug, Clone)]
pub struct Dispatcher(mpsc::Sender<Action>);

impl Dispatcher {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Dispatcher(tx), rx)
    }

    pub async fn dispatch(&self, action: Action) -> Result<(), DispatchError> {
        self.0.send(action).await.map_err(|_| DispatchError)
    }
}

/// Owns the game state and applies queued actions to it in arrival order.
pub struct Game {
    state: GameState,
    actions: mpsc::Receiver<Action>,
    snapshots: watch::Sender<GameState>,
    out: Box<dyn Write + Send>,
}

impl Game {
    pub fn new(capacity: usize) -> (Self, Dispatcher, watch::Receiver<GameState>) {
        Self::with_output(capacity, Box::new(io::stdout()))
    }

    pub fn with_output(
        capacity: usize,
        out: Box<dyn Write + Send>,
    ) -> (Self, Dispatcher, watch::Receiver<GameState>) {
        let (dispatcher, actions) = Dispatcher::channel(capacity);
        let (snapshots, snapshot_rcv) = watch::channel(GameState::new());
        let game = Game {
            state: GameState::new(),
            actions,
            snapshots,
            out,
        };
        (game, dispatcher, snapshot_rcv)
    }

    // Runs until every Dispatcher has been dropped
    pub async fn run(mut self) {
        while let Some(action) = self.actions.recv().await {
            if let Err(e) = self.handle_action(&action) {
                warn!("could not write game output: {}", e);
            }
        }
        info!("game loop stopped");
    }

    #[tracing::instrument(skip(self))]
    fn handle_action(&mut self, action: &Action) -> io::Result<()> {
        match self.state.apply(action) {
            Ok(Change::Seated(num)) => {
                let player = self.state.player(num);
                info!("player {} seated in slot {}", player.name, num.index());
                writeln!(
                    self.out,
                    "Player {} ({}) has connected.",
                    num.index() + 1,
                    player.name
                )?;
            }
            Ok(change) => debug!(?change, "applied {}", action.kind()),
            Err(e) => {
                warn!("rejected {}: {}", action.kind(), e);
                writeln!(self.out, "{}", e)?;
            }
        }
        if let Payload::Error(payload) = action.payload() {
            writeln!(self.out, "Server error: {}", payload.reason)?;
        }
        self.snapshots.send_replace(self.state.clone());

        write!(self.out, "{}>: ", self.state)?;
        self.out.flush()
    }
}
