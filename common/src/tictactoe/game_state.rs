use crate::action::{Action, GameOverPayload, GameStateUpdatePayload, Header, Payload, StartPayload};
use crate::tictactoe::board::{Board, Mark};
use crate::tictactoe::player::{Player, PlayerNum, Players};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReduceError {
    #[error("Player {0} cannot join, both slots are filled")]
    SlotsFull(i64),
    #[error("Join message did not carry a player id")]
    MissingPlayerId,
}

/// What an applied action did to the state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Seated(PlayerNum),
    Started,
    BoardUpdated,
    Finished,
    Unchanged,
}

/// Local mirror of the server's game. Only `apply` mutates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameState {
    board: Board,
    players: Players,
    active_player: PlayerNum,
    // Empty means no winner
    winner: String,
    draw: bool,
}

impl GameState {
    pub fn new() -> Self {
        GameState::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, player_num: PlayerNum) -> &Player {
        &self.players[player_num]
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn active_player(&self) -> PlayerNum {
        self.active_player
    }

    pub fn winner(&self) -> &str {
        &self.winner
    }

    pub fn is_draw(&self) -> bool {
        self.draw
    }

    // No legality checks: the server's state is authoritative
    pub fn apply(&mut self, action: &Action) -> Result<Change, ReduceError> {
        match action.payload() {
            Payload::Join => self.join(action.header()).map(Change::Seated),
            Payload::Start(Some(payload)) => {
                self.start(action.header(), payload);
                Ok(Change::Started)
            }
            Payload::GameStateUpdate(payload) => {
                self.update(payload);
                Ok(Change::BoardUpdated)
            }
            Payload::GameOver(payload) => {
                self.game_over(payload);
                Ok(Change::Finished)
            }
            Payload::Start(None) | Payload::PlayerMove(_) | Payload::Error(_) => {
                Ok(Change::Unchanged)
            }
        }
    }

    fn join(&mut self, header: &Header) -> Result<PlayerNum, ReduceError> {
        let id = header.player_id.ok_or(ReduceError::MissingPlayerId)?;
        let slot = self
            .players
            .first_free_slot()
            .ok_or(ReduceError::SlotsFull(id))?;
        self.players[slot] = Player::with_id(id);
        Ok(slot)
    }

    fn start(&mut self, header: &Header, payload: &StartPayload) {
        let me = &mut self.players[PlayerNum::P1];
        me.token = Some(payload.your_token);
        if let Some(id) = header.player_id {
            me.id = Some(id);
            me.name = id.to_string();
        }

        let opponent = &mut self.players[PlayerNum::P2];
        opponent.token = Some(payload.your_token.opponent());
        opponent.id = payload.opponent_id.trim().parse().ok();
        opponent.name = payload.opponent_id.clone();

        self.active_player = self.turn_of(&payload.first_turn);
    }

    fn update(&mut self, payload: &GameStateUpdatePayload) {
        self.board = payload.board;
        self.active_player = self.turn_of(&payload.next_turn);
        self.winner = payload.winner.clone();
    }

    fn game_over(&mut self, payload: &GameOverPayload) {
        self.board = payload.board;
        self.winner = payload.winner.clone();
        self.draw = payload.winner.is_empty();
    }

    // Anyone other than slot 0 is taken to mean slot 1
    fn turn_of(&self, name: &str) -> PlayerNum {
        if name == self.players[PlayerNum::P1].name {
            PlayerNum::P1
        } else {
            PlayerNum::P2
        }
    }
}

const NO_TOKEN: &str = "-";

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (num, player) in self.players.iter() {
            let turn = if num == self.active_player { ">:" } else { "" };
            let token = player.token.map(|m| m.as_str()).unwrap_or(NO_TOKEN);
            writeln!(f, "{} Player {} ({})", turn, player.name, token)?;
        }
        for row in self.board.rows() {
            let tiles: Vec<&str> = row
                .iter()
                .map(|cell| cell.map(|m: Mark| m.as_str()).unwrap_or(NO_TOKEN))
                .collect();
            writeln!(f, "Board [{}]", tiles.join(","))?;
        }
        if !self.winner.is_empty() {
            writeln!(f, "Winner: {}", self.winner)?;
        } else if self.draw {
            writeln!(f, "Draw")?;
        }
        Ok(())
    }
}
