//! Drag-and-drop payload encoding.
//!
//! The UI attaches a serialized [`Bead`] record to a drag operation. Parsing
//! failures are reported to the caller, which is expected to drop the
//! operation rather than surface the error.

use crate::error::IpcError;
use crate::types::Bead;

/// Parse a drop payload into a catalog bead record.
pub fn parse_drop_payload(payload: &str) -> Result<Bead, IpcError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(IpcError::EmptyPayload);
    }

    let bead: Bead = serde_json::from_str(trimmed)?;
    if bead.id.is_empty() {
        return Err(IpcError::InvalidFormat("bead id is empty".to_string()));
    }

    Ok(bead)
}

/// Serialize a bead record as a drop payload.
pub fn encode_drop_payload(bead: &Bead) -> Result<String, IpcError> {
    Ok(serde_json::to_string(bead)?)
}
