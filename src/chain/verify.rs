//! Append-time integrity checks against the current tip.

use super::Tip;
use crate::{block::Block, error::Rejection};
use std::collections::HashSet;
use tracing::error;

/// Check `block` against every chain integrity invariant.
///
/// Serialization failures are rejections, never panics.
pub(crate) fn verify_block(tip: &Tip, block: &Block) -> Result<(), Rejection> {
    let mut origins = HashSet::new();
    for tx in &block.tx {
        if !origins.insert(tx.origin.as_str()) {
            return Err(Rejection::DuplicateTransactionOrigin(tx.origin.clone()));
        }
        if !tx.verify_origin().map_err(malformed)? {
            return Err(Rejection::InvalidTransactionSignature {
                origin: tx.origin.clone(),
                ident: tx.ident.clone(),
            });
        }
    }

    let expected = tip.height.checked_add(1).ok_or_else(|| {
        Rejection::Malformed(format!("height overflow above {}", tip.height))
    })?;
    if block.height != expected {
        return Err(Rejection::HeightMismatch {
            expected,
            actual: block.height,
        });
    }

    let previous = match tip.hashes.get(&tip.height) {
        Some(hash) => hash.as_str(),
        None => {
            error!(
                "Hash window has no entry for current height {}, window is inconsistent",
                tip.height
            );
            ""
        }
    };
    if block.previous_hash != previous {
        return Err(Rejection::PreviousHashMismatch {
            expected: previous.to_string(),
            actual: block.previous_hash.clone(),
        });
    }

    let hash = block.compute_hash().map_err(malformed)?;
    if block.hash != hash {
        return Err(Rejection::HashMismatch { expected: hash });
    }

    if tip.hashes.values().any(|h| *h == block.hash) {
        return Err(Rejection::DuplicateHash);
    }
    Ok(())
}

fn malformed(e: serde_json::Error) -> Rejection {
    Rejection::Malformed(e.to_string())
}
