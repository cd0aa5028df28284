//! Digest computation for workspace snapshots
//!
//! Deterministic SHA256 digests used to detect change before synchronizing
//! a regenerated workspace with an earlier one.
//!
//! ## Digest Types
//!
//! - **Snapshot Digest**: Hash of the full snapshot (includes `created_at`)
//! - **Semantic Digest**: Hash excluding the capture and modification timestamps
//! - **Model Digest**: Hash of elements and relationships only; layout,
//!   views and timestamps do not affect it
//!
//! ## Determinism Guarantees
//!
//! - Same input → same digest (canonical JSON serialization)
//! - Creation order is part of the input

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::WorkspaceSnapshot;
use crate::errors::Result;
use crate::model::{Element, Relationship};

/// Compute the full snapshot digest (includes `created_at`).
///
/// ## Errors
///
/// Returns `ArchModelError::Serialization` if JSON serialization fails.
pub fn compute_snapshot_digest(snapshot: &WorkspaceSnapshot) -> Result<String> {
    let canonical = serde_json::to_string(snapshot)?;
    Ok(hash_string(&canonical))
}

/// Compute the semantic snapshot digest (excludes timestamps).
///
/// Two captures of an unchanged workspace produce the same semantic digest.
///
/// ## Errors
///
/// Returns `ArchModelError::Serialization` if JSON serialization fails.
pub fn compute_semantic_digest(snapshot: &WorkspaceSnapshot) -> Result<String> {
    let mut snapshot_copy = snapshot.clone();
    snapshot_copy.created_at = String::new();
    snapshot_copy.last_modified = chrono::DateTime::<chrono::Utc>::default();

    let canonical = serde_json::to_string(&snapshot_copy)?;
    Ok(hash_string(&canonical))
}

#[derive(Serialize)]
struct ModelContent<'a> {
    elements: &'a [Element],
    relationships: &'a [Relationship],
}

/// Compute the model digest (elements and relationships only).
///
/// Moving elements around on a view leaves it unchanged.
///
/// ## Errors
///
/// Returns `ArchModelError::Serialization` if JSON serialization fails.
pub fn compute_model_digest(snapshot: &WorkspaceSnapshot) -> Result<String> {
    let content = ModelContent {
        elements: &snapshot.elements,
        relationships: &snapshot.relationships,
    };
    let canonical = serde_json::to_string(&content)?;
    Ok(hash_string(&canonical))
}

/// Hash a string using SHA256, hex encoded.
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
