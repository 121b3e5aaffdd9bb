//! Shareable build codes.
//!
//! A build code is [`BUILD_CODE_PREFIX`] followed by the standard base64
//! encoding of a dense bitmask over the catalog: bit `i` (byte `i / 8`, bit
//! `i % 8`, least significant first) is set iff the node at [`NodeIdx`] `i`
//! is active. Node keys never appear on the wire; the catalog order is the
//! shared dictionary.
//!
//! Decoding never trusts the encoder. The root is always added, and the
//! decoded set is rejected unless every member is connected to the root
//! through other members. Whether the build was affordable is not checked.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::active::ActiveSet;
use crate::adjacency::AdjacencyIndex;
use crate::catalog::Catalog;
use crate::id::NodeIdx;

/// Textual prefix of every build code. Matched case-insensitively.
pub const BUILD_CODE_PREFIX: &str = "WCB1:";

/// Why a build code was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildCodeError {
    #[error("build code does not start with {BUILD_CODE_PREFIX}")]
    MissingPrefix,

    #[error("build code payload is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("node {node} is not connected to the start node")]
    Disconnected { node: NodeIdx },
}

/// Encode an active set. Deterministic for a given catalog; indices outside
/// the catalog are not representable and are left out.
pub fn encode(catalog: &Catalog, active: &ActiveSet) -> String {
    let mut bytes = vec![0u8; catalog.len().div_ceil(8)];
    for idx in active.iter().filter(|idx| catalog.contains(*idx)) {
        let i = idx.index();
        bytes[i / 8] |= 1 << (i % 8);
    }

    let mut code = String::from(BUILD_CODE_PREFIX);
    STANDARD.encode_string(&bytes, &mut code);
    code
}

/// Decode a build code, reporting why it was rejected.
///
/// Surrounding whitespace is ignored. Bits past the end of the catalog (a
/// code from a larger catalog) are treated as unknown nodes and dropped;
/// missing trailing bytes mean "not active".
pub fn decode_checked(
    catalog: &Catalog,
    adjacency: &AdjacencyIndex,
    code: &str,
) -> Result<ActiveSet, BuildCodeError> {
    let code = code.trim();
    let payload = strip_prefix_ignore_case(code, BUILD_CODE_PREFIX)
        .ok_or(BuildCodeError::MissingPrefix)?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| BuildCodeError::InvalidEncoding(e.to_string()))?;

    let mut decoded = ActiveSet::with_root(catalog);
    for (byte_index, byte) in bytes.iter().enumerate() {
        for bit in 0..8 {
            if byte & (1 << bit) == 0 {
                continue;
            }
            let i = byte_index * 8 + bit;
            if i < catalog.len() {
                decoded.insert(NodeIdx(i as u16));
            }
        }
    }

    let reached = adjacency.connected_within(catalog.root(), &decoded);
    if let Some(node) = decoded.iter().find(|idx| !reached.contains(*idx)) {
        return Err(BuildCodeError::Disconnected { node });
    }

    Ok(decoded)
}

/// Decode a build code. Any failure yields `None`; the reason is logged at
/// debug level and never propagated.
pub fn decode(catalog: &Catalog, adjacency: &AdjacencyIndex, code: &str) -> Option<ActiveSet> {
    match decode_checked(catalog, adjacency, code) {
        Ok(set) => Some(set),
        Err(err) => {
            debug!(error = %err, "rejected build code");
            None
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

// ===========================================================================
// Tests
// ===========================================================================
