// ~/src/data_loaders/session.rs

use serde::Deserialize;
use serde_json::Value;

/// Magic header Firefox-lineage browsers stamp on lz4-compressed JSON.
pub const MOZLZ4_MAGIC: &[u8; 8] = b"mozLz40\0";

/// 8-byte magic plus the u32-le decompressed size.
const HEADER_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("container is {len} bytes, too short for a mozLz4 header")]
    Truncated { len: usize },
    #[error("container does not start with the mozLz4 magic header")]
    BadMagic,
    #[error("lz4 block decompression failed: {reason}")]
    Decompression { reason: String },
    #[error("decompressed payload is {actual} bytes, header declared {declared}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("session payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A workspace as recorded in the session container. `uuid` keeps Zen's
/// brace delimiters; strip them with `sanitize_workspace_id` before any
/// filesystem use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRecord {
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct SessionDocument {
    #[serde(default)]
    spaces: Vec<SpaceEntry>,
}

#[derive(Debug, Deserialize)]
struct SpaceEntry {
    uuid: String,
    #[serde(default)]
    name: String,
}

/// Decode a `*.jsonlz4` session container into its JSON document.
///
/// Layout: 8-byte magic, u32-le decompressed size, one lz4 block.
/// Trailing bytes beyond the declared size are a corruption signal, not
/// data.
pub fn decode(raw: &[u8]) -> Result<Value, SessionError> {
    if raw.len() < HEADER_LEN {
        return Err(SessionError::Truncated { len: raw.len() });
    }
    if &raw[..MOZLZ4_MAGIC.len()] != MOZLZ4_MAGIC {
        return Err(SessionError::BadMagic);
    }

    let declared = u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]) as usize;
    let payload = lz4_flex::block::decompress(&raw[HEADER_LEN..], declared)
        .map_err(|e| SessionError::Decompression {
            reason: e.to_string(),
        })?;
    if payload.len() != declared {
        return Err(SessionError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }

    Ok(serde_json::from_slice(&payload)?)
}

/// Pull the workspace list out of a decoded session document, preserving
/// the order Zen recorded them in.
pub fn extract_workspaces(session: &Value) -> Result<Vec<WorkspaceRecord>, SessionError> {
    let doc: SessionDocument = serde_json::from_value(session.clone())?;
    Ok(doc
        .spaces
        .into_iter()
        .map(|s| WorkspaceRecord {
            uuid: s.uuid,
            name: s.name,
        })
        .collect())
}
