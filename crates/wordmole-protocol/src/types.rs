//! Core protocol types for Wordmole's wire format.
//!
//! Every message is one JSON object per transport frame, discriminated by a
//! camelCase `"type"` field. The shapes here are the contract with the
//! browser client — the serde attributes are load-bearing, and the tests at
//! the bottom pin the exact JSON they produce.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Player ids are opaque to clients: the room hands one out on join and the
/// client echoes it back in `submitWord` and `vote`. Ids are unique within a
/// room for its entire lifetime and are never reused.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as plain `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server message.
///
/// Room operations return `(Recipient, ServerMessage)` pairs; the room actor
/// resolves each recipient against its member list when dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Send to every player in the room.
    All,

    /// Send to one specific player.
    Player(PlayerId),

    /// Send to everyone EXCEPT the specified player.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Shared wire fragments
// ---------------------------------------------------------------------------

/// An `{id, name}` pair sent in `gameStart` so clients can map the display
/// names they see everywhere else back to votable player ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
}

/// One submitted word, attributed by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEntry {
    pub name: String,
    pub word: String,
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Messages a client may send.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{ "type": "join", "name": "Alice", "room": "ABCD" }`, and the two
/// `rename_all` attributes keep both the tags and the field names camelCase
/// on the wire. Unknown tags and missing fields fail to deserialize — the
/// connection handler treats that as a malformed frame and drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join the room with the given code, creating it if it doesn't exist.
    /// Valid only while the room is in its lobby.
    Join { name: String, room: String },

    /// Start the round in the sender's room (lobby only).
    Start,

    /// Submit a word for the turn of `player_id`. Accepted only from the
    /// player whose turn it currently is.
    SubmitWord { player_id: PlayerId, word: String },

    /// Vote for `target_id` as the suspected imposter. The voter is the
    /// player bound to the sending connection.
    Vote { target_id: PlayerId },

    /// Restart turn-taking with the same word and imposter instead of
    /// finishing the vote.
    NextRound,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Messages the server sends.
///
/// `turnUpdate` omits `currentTurn` and `allowVoting` entirely when unset
/// rather than sending `null` — clients key off field presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// The ordered list of display names in the lobby, re-broadcast after
    /// every join or lobby departure. Order is join order; duplicate names
    /// appear as many times as they joined.
    LobbyUpdate { players: Vec<String> },

    /// Individualized round-start message. `word` is the secret word, or the
    /// masked placeholder if the addressee is the imposter. `order` lists the
    /// turn order as display names; `roster` carries the id behind each name.
    GameStart {
        word: String,
        your_id: PlayerId,
        order: Vec<String>,
        roster: Vec<PlayerRef>,
        current_turn: String,
    },

    /// The turns submitted so far. While the round is running `current_turn`
    /// names the next player to act; once every player has spoken,
    /// `allow_voting` is `true` instead.
    TurnUpdate {
        turns: Vec<TurnEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_turn: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allow_voting: Option<bool>,
    },

    /// The vote has resolved. `imposter` says whether the room caught the
    /// right player; `real_imposter` names who it actually was.
    GameOver { imposter: bool, real_imposter: String },

    /// Sent to a single client whose action was refused (wrong phase, out of
    /// turn, unknown target, …). Never broadcast.
    Rejected { reason: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The client SDK parses these messages by exact field name, so these
    //! tests assert concrete JSON shapes rather than just round-tripping.

    use super::*;

    fn to_value<T: Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    // =====================================================================
    // PlayerId
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&PlayerId(42)).unwrap(), "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let pid: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(pid, PlayerId(42));
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    // =====================================================================
    // ClientMessage — wire shapes
    // =====================================================================

    #[test]
    fn test_join_parses_from_wire_json() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"join","name":"Alice","room":"ABCD"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                name: "Alice".into(),
                room: "ABCD".into(),
            }
        );
    }

    #[test]
    fn test_start_parses_from_bare_type_object() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Start);
    }

    #[test]
    fn test_submit_word_uses_camel_case_player_id() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"submitWord","playerId":3,"word":"Frucht"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SubmitWord {
                player_id: PlayerId(3),
                word: "Frucht".into(),
            }
        );
    }

    #[test]
    fn test_vote_uses_camel_case_target_id() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"vote","targetId":2}"#).unwrap();
        assert_eq!(msg, ClientMessage::Vote { target_id: PlayerId(2) });
    }

    #[test]
    fn test_next_round_round_trip() {
        let bytes = serde_json::to_vec(&ClientMessage::NextRound).unwrap();
        let decoded: ClientMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, ClientMessage::NextRound);
        assert_eq!(to_value(&decoded)["type"], "nextRound");
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"flyToMoon","speed":9000}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        // join without a room code
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"join","name":"Alice"}"#);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerMessage — wire shapes
    // =====================================================================

    #[test]
    fn test_lobby_update_json_format() {
        let json = to_value(&ServerMessage::LobbyUpdate {
            players: vec!["Alice".into(), "Bob".into()],
        });
        assert_eq!(json["type"], "lobbyUpdate");
        assert_eq!(json["players"], serde_json::json!(["Alice", "Bob"]));
    }

    #[test]
    fn test_game_start_json_format() {
        let json = to_value(&ServerMessage::GameStart {
            word: "Kaktus".into(),
            your_id: PlayerId(1),
            order: vec!["Bob".into(), "Alice".into()],
            roster: vec![
                PlayerRef { id: PlayerId(1), name: "Alice".into() },
                PlayerRef { id: PlayerId(2), name: "Bob".into() },
            ],
            current_turn: "Bob".into(),
        });

        assert_eq!(json["type"], "gameStart");
        assert_eq!(json["word"], "Kaktus");
        assert_eq!(json["yourId"], 1);
        assert_eq!(json["order"], serde_json::json!(["Bob", "Alice"]));
        assert_eq!(json["roster"][1]["id"], 2);
        assert_eq!(json["roster"][1]["name"], "Bob");
        assert_eq!(json["currentTurn"], "Bob");
    }

    #[test]
    fn test_turn_update_omits_absent_optional_fields() {
        let json = to_value(&ServerMessage::TurnUpdate {
            turns: vec![TurnEntry { name: "Alice".into(), word: "Frucht".into() }],
            current_turn: Some("Bob".into()),
            allow_voting: None,
        });

        assert_eq!(json["type"], "turnUpdate");
        assert_eq!(json["turns"][0]["name"], "Alice");
        assert_eq!(json["turns"][0]["word"], "Frucht");
        assert_eq!(json["currentTurn"], "Bob");
        assert!(
            json.get("allowVoting").is_none(),
            "unset allowVoting must be omitted, not null"
        );
    }

    #[test]
    fn test_turn_update_voting_open_shape() {
        let json = to_value(&ServerMessage::TurnUpdate {
            turns: vec![],
            current_turn: None,
            allow_voting: Some(true),
        });

        assert_eq!(json["allowVoting"], true);
        assert!(json.get("currentTurn").is_none());
    }

    #[test]
    fn test_turn_update_parses_without_optional_fields() {
        let msg: ServerMessage = serde_json::from_str(
            r#"{"type":"turnUpdate","turns":[]}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ServerMessage::TurnUpdate {
                turns: vec![],
                current_turn: None,
                allow_voting: None,
            }
        );
    }

    #[test]
    fn test_game_over_json_format() {
        let json = to_value(&ServerMessage::GameOver {
            imposter: true,
            real_imposter: "Bob".into(),
        });
        assert_eq!(json["type"], "gameOver");
        assert_eq!(json["imposter"], true);
        assert_eq!(json["realImposter"], "Bob");
    }

    #[test]
    fn test_rejected_round_trip() {
        let msg = ServerMessage::Rejected { reason: "not your turn".into() };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientMessage, _> = serde_json::from_slice(garbage);
        assert!(result.is_err());
    }
}
