use crate::tictactoe::{Board, Mark};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Join,
    Start,
    PlayerMove,
    GameStateUpdate,
    GameOver,
    Error,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Join,
        ActionKind::Start,
        ActionKind::PlayerMove,
        ActionKind::GameStateUpdate,
        ActionKind::GameOver,
        ActionKind::Error,
    ];

    // The "type" field of the wire envelope
    pub fn tag(&self) -> &'static str {
        match self {
            ActionKind::Join => "join",
            ActionKind::Start => "start",
            ActionKind::PlayerMove => "move",
            ActionKind::GameStateUpdate => "gamestateupdate",
            ActionKind::GameOver => "gameover",
            ActionKind::Error => "error",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        ActionKind::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StartPayload {
    #[serde(rename = "yourToken", alias = "YourToken")]
    pub your_token: Mark,
    #[serde(rename = "opponentId", alias = "OpponentId", alias = "OpponentID")]
    pub opponent_id: String,
    #[serde(rename = "firstTurn", alias = "FirstTurn")]
    pub first_turn: String,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct PlayerMovePayload {
    #[serde(alias = "Row")]
    pub row: i64,
    #[serde(alias = "Col")]
    pub col: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameStateUpdatePayload {
    #[serde(alias = "Board")]
    pub board: Board,
    #[serde(rename = "nextturn", alias = "nextTurn", alias = "NextTurn")]
    pub next_turn: String,
    // An absent winner clears the previous one
    #[serde(default, alias = "Winner")]
    pub winner: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameOverPayload {
    #[serde(default, alias = "Winner")]
    pub winner: String,
    #[serde(alias = "Board")]
    pub board: Board,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorPayload {
    #[serde(alias = "Reason")]
    pub reason: String,
}

// Join and Start requests carry no payload and serialize as null
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Join,
    Start(Option<StartPayload>),
    PlayerMove(PlayerMovePayload),
    GameStateUpdate(GameStateUpdatePayload),
    GameOver(GameOverPayload),
    Error(ErrorPayload),
}

impl Payload {
    pub fn kind(&self) -> ActionKind {
        match self {
            Payload::Join => ActionKind::Join,
            Payload::Start(_) => ActionKind::Start,
            Payload::PlayerMove(_) => ActionKind::PlayerMove,
            Payload::GameStateUpdate(_) => ActionKind::GameStateUpdate,
            Payload::GameOver(_) => ActionKind::GameOver,
            Payload::Error(_) => ActionKind::Error,
        }
    }
}

/// Ids are `None` when the envelope did not carry them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub game_id: Option<i64>,
    pub player_id: Option<i64>,
}

impl Header {
    pub fn new(game_id: i64, player_id: i64) -> Self {
        Header {
            game_id: Some(game_id),
            player_id: Some(player_id),
        }
    }
}

/// A protocol event. The type tag is derived from the payload, so the two
/// can never disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    header: Header,
    payload: Payload,
}

impl Action {
    pub fn new(header: Header, payload: Payload) -> Self {
        Action { header, payload }
    }

    pub fn join(header: Header) -> Self {
        Action::new(header, Payload::Join)
    }

    pub fn start_request(header: Header) -> Self {
        Action::new(header, Payload::Start(None))
    }

    pub fn player_move(header: Header, row: i64, col: i64) -> Self {
        Action::new(header, Payload::PlayerMove(PlayerMovePayload { row, col }))
    }

    pub fn game_over(header: Header, winner: String, board: Board) -> Self {
        Action::new(header, Payload::GameOver(GameOverPayload { winner, board }))
    }

    // Errors are addressed to nobody in particular
    pub fn error(reason: &str) -> Self {
        Action::new(
            Header::default(),
            Payload::Error(ErrorPayload {
                reason: reason.to_string(),
            }),
        )
    }

    pub fn kind(&self) -> ActionKind {
        self.payload.kind()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ActionKind::from_tag("Join"), None);
        assert_eq!(ActionKind::from_tag("chat"), None);
    }

    #[test]
    fn test_kind_follows_payload() {
        let header = Header::new(111, 42);
        assert_eq!(Action::join(header).kind(), ActionKind::Join);
        assert_eq!(Action::start_request(header).kind(), ActionKind::Start);
        assert_eq!(
            Action::player_move(header, 0, 1).kind(),
            ActionKind::PlayerMove
        );
        assert_eq!(Action::error("Failure").kind(), ActionKind::Error);
        assert_eq!(Action::error("Failure").header(), &Header::default());
    }

    #[test]
    fn test_request_payloads_serialize_as_null() {
        assert_eq!(serde_json::to_string(&Payload::Join).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Payload::Start(None)).unwrap(), "null");
    }

    #[test]
    fn test_start_payload_accepts_go_field_names() {
        let payload: StartPayload = serde_json::from_str(
            r#"{"YourToken":"o","OpponentID":"42","FirstTurn":"42"}"#,
        )
        .unwrap();
        assert_eq!(payload.your_token, Mark::O);
        assert_eq!(payload.opponent_id, "42");
        assert_eq!(payload.first_turn, "42");
    }
}
