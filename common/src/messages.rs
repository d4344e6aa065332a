use crate::action::{Action, ActionKind, Header, Payload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed message envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("Unrecognized message type {0:?}, not decoding")]
    UnknownType(String),
    #[error("Payload does not match message type {kind}: {reason}")]
    PayloadTypeMismatch { kind: ActionKind, reason: String },
    #[error("Invalid {field} {value:?}")]
    InvalidId { field: &'static str, value: String },
}

// The server sends ids as strings, clients send them as integers
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(untagged)]
pub enum WireId {
    #[default]
    Missing,
    Int(i64),
    Text(String),
}

impl WireId {
    fn parse(self, field: &'static str) -> Result<Option<i64>, DecodeError> {
        match self {
            WireId::Missing => Ok(None),
            WireId::Int(id) => Ok(Some(id)),
            WireId::Text(text) if text.trim().is_empty() => Ok(None),
            WireId::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| DecodeError::InvalidId { field, value: text }),
        }
    }
}

/// Inbound envelope. The payload is kept as raw JSON until the type tag
/// says which shape to parse it into.
#[derive(Deserialize, Debug)]
pub struct IncomingMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "gameId", default)]
    pub game_id: WireId,
    #[serde(rename = "playerId", default)]
    pub player_id: WireId,
    #[serde(default)]
    pub payload: Option<Box<RawValue>>,
}

impl IncomingMessage {
    pub fn into_action(self) -> Result<Action, DecodeError> {
        let kind = match ActionKind::from_tag(&self.kind) {
            Some(kind) => kind,
            None => return Err(DecodeError::UnknownType(self.kind)),
        };
        let payload = match kind {
            ActionKind::Join => Payload::Join,
            ActionKind::Start => Payload::Start(Some(self.parse_payload(kind)?)),
            ActionKind::PlayerMove => Payload::PlayerMove(self.parse_payload(kind)?),
            ActionKind::GameStateUpdate => Payload::GameStateUpdate(self.parse_payload(kind)?),
            ActionKind::GameOver => Payload::GameOver(self.parse_payload(kind)?),
            ActionKind::Error => Payload::Error(self.parse_payload(kind)?),
        };
        let header = Header {
            game_id: self.game_id.parse("gameId")?,
            player_id: self.player_id.parse("playerId")?,
        };
        Ok(Action::new(header, payload))
    }

    fn parse_payload<T: DeserializeOwned>(&self, kind: ActionKind) -> Result<T, DecodeError> {
        let raw = self
            .payload
            .as_ref()
            .ok_or_else(|| DecodeError::PayloadTypeMismatch {
                kind,
                reason: "missing payload".to_string(),
            })?;
        serde_json::from_str(raw.get()).map_err(|err| DecodeError::PayloadTypeMismatch {
            kind,
            reason: err.to_string(),
        })
    }
}

/// Decodes one text frame into an action.
pub fn decode(frame: &str) -> Result<Action, DecodeError> {
    let message: IncomingMessage = serde_json::from_str(frame).map_err(DecodeError::Envelope)?;
    message.into_action()
}

/// Outbound envelope. Ids the action does not carry are sent as 0.
#[derive(Serialize, Debug)]
pub struct OutgoingMessage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "gameId")]
    pub game_id: i64,
    #[serde(rename = "playerId")]
    pub player_id: i64,
    pub payload: &'a Payload,
}

impl<'a> OutgoingMessage<'a> {
    pub fn new(action: &'a Action) -> Self {
        let header = action.header();
        OutgoingMessage {
            kind: action.kind().tag(),
            game_id: header.game_id.unwrap_or(0),
            player_id: header.player_id.unwrap_or(0),
            payload: action.payload(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

pub fn encode(action: &Action) -> Result<String, serde_json::Error> {
    OutgoingMessage::new(action).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{GameStateUpdatePayload, PlayerMovePayload, StartPayload};
    use crate::tictactoe::{Board, Mark};

    #[test]
    fn test_decode_move() {
        let action =
            decode(r#"{"type":"move","gameId":"111","playerId":"42","payload":{"row":1,"col":2}}"#)
                .unwrap();
        assert_eq!(action.header(), &Header::new(111, 42));
        assert_eq!(
            action.payload(),
            &Payload::PlayerMove(PlayerMovePayload { row: 1, col: 2 })
        );
    }

    #[test]
    fn test_decode_move_out_of_range() {
        let action =
            decode(r#"{"type":"move","gameId":"111","playerId":"42","payload":{"row":-1,"col":5}}"#)
                .unwrap();
        assert_eq!(
            action.payload(),
            &Payload::PlayerMove(PlayerMovePayload { row: -1, col: 5 })
        );
    }

    #[test]
    fn test_decode_join_without_payload() {
        let action = decode(r#"{"type":"join","gameId":"111","playerId":"7"}"#).unwrap();
        assert_eq!(action, Action::join(Header::new(111, 7)));

        let action = decode(r#"{"type":"join","gameId":"","playerId":"7","payload":null}"#).unwrap();
        assert_eq!(action.header().game_id, None);
        assert_eq!(action.header().player_id, Some(7));
    }

    #[test]
    fn test_decode_start() {
        let action = decode(
            r#"{"type":"start","gameId":"111","playerId":"42",
                "payload":{"yourToken":"x","opponentId":"7","firstTurn":"42"}}"#,
        )
        .unwrap();
        assert_eq!(
            action.payload(),
            &Payload::Start(Some(StartPayload {
                your_token: Mark::X,
                opponent_id: "7".to_string(),
                first_turn: "42".to_string(),
            }))
        );
    }

    #[test]
    fn test_decode_state_update() {
        let action = decode(
            r#"{"type":"gamestateupdate","gameId":"111","playerId":"42",
                "payload":{"board":[["x","",""],["","o",""],["","",""]],"nextturn":"7"}}"#,
        )
        .unwrap();
        match action.payload() {
            Payload::GameStateUpdate(GameStateUpdatePayload {
                board,
                next_turn,
                winner,
            }) => {
                assert_eq!(board.get(0, 0), Some(Some(Mark::X)));
                assert_eq!(board.get(1, 1), Some(Some(Mark::O)));
                assert_eq!(next_turn, "7");
                assert!(winner.is_empty());
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_not_decoded() {
        let result = decode(r#"{"type":"chat","gameId":"1","playerId":"2","payload":{}}"#);
        assert!(matches!(result, Err(DecodeError::UnknownType(tag)) if tag == "chat"));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let result = decode(r#"{"type":"move","gameId":"1","playerId":"2","payload":{"row":"a"}}"#);
        assert!(matches!(
            result,
            Err(DecodeError::PayloadTypeMismatch {
                kind: ActionKind::PlayerMove,
                ..
            })
        ));

        let result = decode(r#"{"type":"gameover","gameId":"1","playerId":"2"}"#);
        assert!(matches!(
            result,
            Err(DecodeError::PayloadTypeMismatch {
                kind: ActionKind::GameOver,
                ..
            })
        ));
    }

    #[test]
    fn test_malformed_envelope_is_an_error() {
        assert!(matches!(decode("ping"), Err(DecodeError::Envelope(_))));
        assert!(matches!(
            decode(r#"{"gameId":"1"}"#),
            Err(DecodeError::Envelope(_))
        ));
    }

    #[test]
    fn test_invalid_id() {
        let result = decode(r#"{"type":"join","gameId":"abc","playerId":"2"}"#);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidId { field: "gameId", .. })
        ));
    }

    #[test]
    fn test_move_round_trip() {
        let action = Action::player_move(Header::new(111, 42), 1, 2);
        let json = encode(&action).unwrap();
        assert_eq!(
            json,
            r#"{"type":"move","gameId":111,"playerId":42,"payload":{"row":1,"col":2}}"#
        );
        assert_eq!(decode(&json).unwrap(), action);
    }

    #[test]
    fn test_encode_requests() {
        let join = Action::join(Header::new(111, 42));
        assert_eq!(
            encode(&join).unwrap(),
            r#"{"type":"join","gameId":111,"playerId":42,"payload":null}"#
        );

        let error = Action::error("Failure");
        assert_eq!(
            encode(&error).unwrap(),
            r#"{"type":"error","gameId":0,"playerId":0,"payload":{"reason":"Failure"}}"#
        );

        let game_over = Action::game_over(Header::new(111, 42), "42".to_string(), Board::default());
        assert_eq!(
            encode(&game_over).unwrap(),
            r#"{"type":"gameover","gameId":111,"playerId":42,"payload":{"winner":"42","board":[["","",""],["","",""],["","",""]]}}"#
        );
    }
}
