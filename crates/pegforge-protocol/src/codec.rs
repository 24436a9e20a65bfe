//! Codec trait and the text codec the browser client speaks.
//!
//! A "codec" converts between the in-memory message types and what goes
//! over the wire. It holds no game state and makes no game decisions:
//! `"peg99"` decodes to a selection even on a board with 33 holes, and
//! it's the session's job to say that cell doesn't exist.

use pegforge_board::{CellId, Move};
use serde::{Deserialize, Serialize};

use crate::types::{REJECTED, SUGGESTION_REQUEST};
use crate::{ClientMessage, ProtocolError, ServerMessage, SuggestionIds, TableSnapshot};

/// Longest inbound text accepted as a cell identifier.
pub const MAX_SELECTION_LEN: usize = 64;

/// Converts between wire text and Pegforge messages.
///
/// `Send + Sync + 'static` because one codec instance is shared by
/// every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Parses one inbound frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedMessage`] if the frame is not a
    /// cell identifier or the suggestion request.
    fn decode(&self, data: &[u8]) -> Result<ClientMessage, ProtocolError>;

    /// Renders one outbound message as a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if a structured payload fails to
    /// serialize.
    fn encode(&self, msg: &ServerMessage) -> Result<String, ProtocolError>;
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// A cell reference inside a suggestion entry: either the full id or the
/// bare grid index, depending on [`SuggestionIds`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum CellRef {
    Id(CellId),
    Index(usize),
}

impl CellRef {
    fn new(id: &CellId, style: SuggestionIds) -> Self {
        match (style, id.index()) {
            (SuggestionIds::Numeric, Some(index)) => Self::Index(index),
            _ => Self::Id(id.clone()),
        }
    }

    fn into_cell_id(self) -> CellId {
        match self {
            Self::Id(id) => id,
            Self::Index(index) => CellId::from_index(index),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SuggestionEntry {
    start: CellRef,
    end: CellRef,
}

/// Outbound JSON frames. Serialized untagged, so each variant's fields
/// are the whole object.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Frame<'a> {
    Snapshot { table: &'a TableSnapshot },
    Jumped(&'a Move),
    JumpFailed { error: &'a CellId },
    Suggestions { suggestions: Vec<SuggestionEntry> },
}

/// Inbound JSON frames, for the client side. Every variant has a
/// required field the others lack, so untagged matching is unambiguous.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply {
    Snapshot { table: TableSnapshot },
    Jumped(Move),
    JumpFailed { error: CellId },
    Suggestions { suggestions: Vec<SuggestionEntry> },
}

// ---------------------------------------------------------------------------
// TextCodec
// ---------------------------------------------------------------------------

/// The [`Codec`] for the browser client: bare text in, bare text or JSON
/// out.
///
/// ```rust
/// use pegforge_protocol::{ClientMessage, Codec, ServerMessage, TextCodec};
/// use pegforge_board::CellId;
///
/// let codec = TextCodec::default();
///
/// let msg = codec.decode(b"peg17").unwrap();
/// assert_eq!(msg, ClientMessage::Select(CellId::new("peg17")));
///
/// let text = codec.encode(&ServerMessage::JumpFailed(CellId::new("peg3"))).unwrap();
/// assert_eq!(text, r#"{"error":"peg3"}"#);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec {
    suggestion_ids: SuggestionIds,
}

#[cfg(feature = "json")]
impl TextCodec {
    /// Creates a codec that writes suggestions in the given style.
    pub fn new(suggestion_ids: SuggestionIds) -> Self {
        Self { suggestion_ids }
    }

    /// The suggestion style this codec writes.
    pub fn suggestion_ids(&self) -> SuggestionIds {
        self.suggestion_ids
    }

    /// Parses a server frame. This is the client's half of the contract,
    /// used by test clients and Rust front-ends.
    ///
    /// Bare text is an acknowledgment: `error` is a rejection, anything
    /// else is the echoed cell id. Suggestions are read in either style.
    ///
    /// # Errors
    /// Returns [`ProtocolError::MalformedMessage`] for empty text, JSON
    /// that matches no server message, or a suggestion whose ends are
    /// not canonical cell ids.
    pub fn decode_server(&self, text: &str) -> Result<ServerMessage, ProtocolError> {
        if text.is_empty() {
            return Err(ProtocolError::MalformedMessage("empty frame".into()));
        }
        if !text.starts_with('{') {
            return Ok(if text == REJECTED {
                ServerMessage::Rejected
            } else {
                ServerMessage::Selected(CellId::new(text))
            });
        }

        let reply: Reply = serde_json::from_str(text)
            .map_err(|e| ProtocolError::MalformedMessage(e.to_string()))?;
        Ok(match reply {
            Reply::Snapshot { table } => ServerMessage::Snapshot(table),
            Reply::Jumped(mv) => ServerMessage::Jumped(mv),
            Reply::JumpFailed { error } => ServerMessage::JumpFailed(error),
            Reply::Suggestions { suggestions } => ServerMessage::Suggestions(
                suggestions
                    .into_iter()
                    .map(|entry| suggestion_move(entry.start.into_cell_id(), entry.end.into_cell_id()))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

/// Rebuilds a move from a suggestion entry. The wire only carries the
/// two ends; the jumped cell sits halfway between them on the grid.
#[cfg(feature = "json")]
fn suggestion_move(source: CellId, destination: CellId) -> Result<Move, ProtocolError> {
    let (Some(a), Some(b)) = (source.index(), destination.index()) else {
        return Err(ProtocolError::MalformedMessage(format!(
            "suggestion {source} -> {destination} does not name grid cells"
        )));
    };
    Ok(Move {
        source,
        jumped: CellId::from_index((a + b) / 2),
        destination,
    })
}

#[cfg(feature = "json")]
impl Codec for TextCodec {
    fn decode(&self, data: &[u8]) -> Result<ClientMessage, ProtocolError> {
        let text = std::str::from_utf8(data)
            .map_err(|_| ProtocolError::MalformedMessage("frame is not UTF-8".into()))?;

        if text == SUGGESTION_REQUEST {
            return Ok(ClientMessage::Suggestion);
        }
        if text.is_empty() {
            return Err(ProtocolError::MalformedMessage("empty frame".into()));
        }
        if text.len() > MAX_SELECTION_LEN {
            return Err(ProtocolError::MalformedMessage(format!(
                "{} bytes is too long for a cell id",
                text.len()
            )));
        }
        if text.starts_with(['{', '[']) {
            return Err(ProtocolError::MalformedMessage(
                "structured payloads are not accepted".into(),
            ));
        }
        if text.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ProtocolError::MalformedMessage(
                "cell id contains whitespace or control characters".into(),
            ));
        }

        Ok(ClientMessage::Select(CellId::new(text)))
    }

    fn encode(&self, msg: &ServerMessage) -> Result<String, ProtocolError> {
        let frame = match msg {
            ServerMessage::Selected(id) => return Ok(id.to_string()),
            ServerMessage::Rejected => return Ok(REJECTED.to_string()),
            ServerMessage::Snapshot(table) => Frame::Snapshot { table },
            ServerMessage::Jumped(mv) => Frame::Jumped(mv),
            ServerMessage::JumpFailed(error) => Frame::JumpFailed { error },
            ServerMessage::Suggestions(moves) => Frame::Suggestions {
                suggestions: moves
                    .iter()
                    .map(|mv| SuggestionEntry {
                        start: CellRef::new(&mv.source, self.suggestion_ids),
                        end: CellRef::new(&mv.destination, self.suggestion_ids),
                    })
                    .collect(),
            },
        };
        serde_json::to_string(&frame).map_err(ProtocolError::Encode)
    }
}
