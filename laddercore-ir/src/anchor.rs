//! # Anchoring Clauses
//!
//! Bindings between ladder-program timing/identity guarantees and the
//! validator script's transaction-validity constraints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Anchoring clause kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorKind {
    /// Validity window bound to a symbolic slot
    SlotBound,
    /// Validity window effective immediately at the bound slot
    Immediate,
    /// Anchor resolution deferred until finality; emitted as a comment marker
    FinalityDeferred,
    /// Hash-committed anchor; requires both a slot and a digest
    VerifiableHash,
}

impl AnchorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorKind::SlotBound => "slot-bound",
            AnchorKind::Immediate => "immediate",
            AnchorKind::FinalityDeferred => "finality-deferred",
            AnchorKind::VerifiableHash => "verifiable-hash",
        }
    }

    pub fn from_str_name(name: &str) -> Option<AnchorKind> {
        match name {
            "slot-bound" => Some(AnchorKind::SlotBound),
            "immediate" => Some(AnchorKind::Immediate),
            "finality-deferred" => Some(AnchorKind::FinalityDeferred),
            "verifiable-hash" => Some(AnchorKind::VerifiableHash),
            _ => None,
        }
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An anchoring clause in the IR document's ordered `anchoring` section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchoringClause {
    pub kind: AnchorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<[u8; 32]>,
}

impl AnchoringClause {
    /// Slot-bound validity window
    pub fn slot_bound(slot: impl Into<String>) -> Self {
        Self {
            kind: AnchorKind::SlotBound,
            slot: Some(slot.into()),
            digest: None,
        }
    }

    /// Immediate validity window
    pub fn immediate(slot: impl Into<String>) -> Self {
        Self {
            kind: AnchorKind::Immediate,
            slot: Some(slot.into()),
            digest: None,
        }
    }

    /// Deferred anchor marker
    pub fn finality_deferred() -> Self {
        Self {
            kind: AnchorKind::FinalityDeferred,
            slot: None,
            digest: None,
        }
    }

    /// Hash-committed anchor over an arbitrary payload. The digest is the
    /// SHA-256 of the payload bytes, so identical payloads always produce
    /// identical clauses.
    pub fn verifiable_hash(slot: impl Into<String>, payload: &[u8]) -> Self {
        let digest: [u8; 32] = Sha256::digest(payload).into();
        Self {
            kind: AnchorKind::VerifiableHash,
            slot: Some(slot.into()),
            digest: Some(digest),
        }
    }

    /// Hash-committed anchor from a precomputed digest
    pub fn with_digest(slot: impl Into<String>, digest: [u8; 32]) -> Self {
        Self {
            kind: AnchorKind::VerifiableHash,
            slot: Some(slot.into()),
            digest: Some(digest),
        }
    }

    /// Digest as lowercase hex, if present
    pub fn digest_hex(&self) -> Option<String> {
        self.digest.map(|d| {
            let mut out = String::with_capacity(64);
            for byte in d {
                out.push_str(&format!("{:02x}", byte));
            }
            out
        })
    }

    /// Parse a 64-character lowercase/uppercase hex digest
    pub fn parse_digest_hex(hex: &str) -> Option<[u8; 32]> {
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut digest = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
            let hi = (chunk[0] as char).to_digit(16)?;
            let lo = (chunk[1] as char).to_digit(16)?;
            digest[i] = ((hi << 4) | lo) as u8;
        }
        Some(digest)
    }
}
