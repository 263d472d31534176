// Text wire format: a one-character tag, a '|' delimiter, a JSON payload.
//
// The transport delivers opaque UTF-8 strings to every peer; this module is
// the only place that knows what is inside them. The format is fixed at v1
// with no version field:
//
//   n|[[0,1,2,3],"vertical"]     new game: [dot_list, orientation]
//   p|[7,2]                      dot click: [dot_index, color]
//
// Payloads are positional JSON arrays. JSON string encoding guarantees the
// delimiter never appears inside a payload, so `decode` splits on the FIRST
// '|' only. Decoding is an exhaustive match over the tag, so an unknown tag
// is an explicit `WireError::UnknownTag`, never a silent lookup miss — the
// coordinator logs and drops it (a bad message from one peer must never
// take down the session).
//
// The `encode_*` / `decode_*` helpers operate on bare payloads; `encode` /
// `decode` handle the full tagged line. Whitespace inside payloads is
// accepted on decode (JSON insensitivity) but never produced on encode.

use crate::message::SyncMessage;
use crate::types::{ColorState, DotIndex, Orientation};

/// Wire tag for a `NewGame` message.
pub const TAG_NEW_GAME: &str = "n";
/// Wire tag for a `DotClick` message.
pub const TAG_DOT_CLICK: &str = "p";

/// Decode failure for a single inbound message. Every variant is local to
/// the one message: the caller drops it and the session continues.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Empty input. Ignored without logging — the transport occasionally
    /// delivers empty keep-alive strings.
    #[error("empty message")]
    Empty,
    /// No '|' delimiter anywhere in the input.
    #[error("no delimiter in message {0:?}")]
    MissingDelimiter(String),
    /// Delimiter present but the tag is not part of the protocol.
    #[error("unknown message tag {0:?}")]
    UnknownTag(String),
    /// Payload is not valid JSON or has the wrong shape for its tag.
    #[error("bad payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encode a message as a tagged wire line.
pub fn encode(msg: &SyncMessage) -> String {
    match msg {
        SyncMessage::NewGame { dots, orientation } => encode_new_game(dots, *orientation),
        SyncMessage::DotClick { dot, color } => encode_dot_click(*dot, *color),
    }
}

/// Decode one wire line into a message. Splits on the first '|' and matches
/// the tag exhaustively.
pub fn decode(raw: &str) -> Result<SyncMessage, WireError> {
    if raw.is_empty() {
        return Err(WireError::Empty);
    }
    let Some((tag, payload)) = raw.split_once('|') else {
        return Err(WireError::MissingDelimiter(raw.to_string()));
    };
    match tag {
        TAG_NEW_GAME => {
            let (dots, orientation) = decode_new_game(payload)?;
            Ok(SyncMessage::NewGame { dots, orientation })
        }
        TAG_DOT_CLICK => {
            let (dot, color) = decode_dot_click(payload)?;
            Ok(SyncMessage::DotClick { dot, color })
        }
        other => Err(WireError::UnknownTag(other.to_string())),
    }
}

/// `"n|" + [dot_list, orientation]` as JSON.
pub fn encode_new_game(dots: &[ColorState], orientation: Orientation) -> String {
    // Serializing a (slice, enum-as-string) tuple cannot fail.
    let payload = serde_json::to_string(&(dots, orientation)).unwrap_or_default();
    format!("{TAG_NEW_GAME}|{payload}")
}

/// Inverse of `encode_new_game`, payload only.
pub fn decode_new_game(payload: &str) -> Result<(Vec<ColorState>, Orientation), WireError> {
    let parsed: (Vec<ColorState>, Orientation) = serde_json::from_str(payload)?;
    Ok(parsed)
}

/// `"p|" + [dot_index, color]` as JSON.
pub fn encode_dot_click(dot: DotIndex, color: ColorState) -> String {
    let payload = serde_json::to_string(&(dot, color)).unwrap_or_default();
    format!("{TAG_DOT_CLICK}|{payload}")
}

/// Inverse of `encode_dot_click`, payload only.
pub fn decode_dot_click(payload: &str) -> Result<(DotIndex, ColorState), WireError> {
    let parsed: (DotIndex, ColorState) = serde_json::from_str(payload)?;
    Ok(parsed)
}
