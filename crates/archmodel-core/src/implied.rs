//! Implied relationship strategies
//!
//! When a relationship is created between two elements, a strategy may derive
//! further relationships between every pair drawn from the two ancestor
//! chains (each chain starts with the element itself). Pairs of the same
//! element, and pairs where one element is an ancestor of the other, are never
//! related. Derived relationships pass through the normal dedup check but do
//! not trigger derivation themselves.
//!
//! ```text
//! AAA -> BBB    with A > AA > AAA and B > BB > BBB
//! implies AAA->BB AAA->B AA->BBB AA->BB AA->B A->BBB A->BB A->B
//! ```

use std::fmt;

use crate::errors::Result;
use crate::ops::relationship_ops::{add_implied_relationship, has_efferent_relationship};
use crate::ops::Model;
use crate::traversal::{ancestor_chain, is_ancestor_of};

/// Hook called after every explicitly created relationship
pub trait ImpliedRelationshipsStrategy: Send + Sync + fmt::Debug {
    /// Derive relationships from the newly created `relationship_id`
    ///
    /// # Errors
    /// Returns lookup errors if the relationship or its endpoints vanished.
    fn create_implied_relationships(&self, model: &mut Model, relationship_id: &str) -> Result<()>;
}

/// Creates nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImpliedRelationshipsStrategy;

impl ImpliedRelationshipsStrategy for DefaultImpliedRelationshipsStrategy {
    fn create_implied_relationships(&self, _model: &mut Model, _relationship_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Creates an implied relationship unless the pair is already related at all
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateImpliedRelationshipsUnlessAnyRelationshipExists;

impl ImpliedRelationshipsStrategy for CreateImpliedRelationshipsUnlessAnyRelationshipExists {
    fn create_implied_relationships(&self, model: &mut Model, relationship_id: &str) -> Result<()> {
        fan_out(model, relationship_id, |model, source, destination, _| {
            !has_efferent_relationship(model, source, destination, None)
        })
    }
}

/// Creates an implied relationship unless the pair is already related with
/// the same description
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateImpliedRelationshipsUnlessSameRelationshipExists;

impl ImpliedRelationshipsStrategy for CreateImpliedRelationshipsUnlessSameRelationshipExists {
    fn create_implied_relationships(&self, model: &mut Model, relationship_id: &str) -> Result<()> {
        fan_out(model, relationship_id, |model, source, destination, description| {
            !has_efferent_relationship(model, source, destination, Some(description))
        })
    }
}

/// Whether an implied relationship may connect `source` and `destination`
pub fn implied_relationship_is_allowed(model: &Model, source: &str, destination: &str) -> bool {
    if source == destination {
        return false;
    }
    !(is_ancestor_of(model, source, destination) || is_ancestor_of(model, destination, source))
}

/// Walk source ancestors x destination ancestors, creating a copy of the
/// relationship wherever `should_create` agrees
fn fan_out<F>(model: &mut Model, relationship_id: &str, should_create: F) -> Result<()>
where
    F: Fn(&Model, &str, &str, &str) -> bool,
{
    let relationship = model.get_relationship(relationship_id)?.clone();
    let sources = ancestor_chain(model, &relationship.source_id)?;
    let destinations = ancestor_chain(model, &relationship.destination_id)?;

    for source in &sources {
        for destination in &destinations {
            if !implied_relationship_is_allowed(model, source, destination) {
                continue;
            }
            if should_create(model, source, destination, &relationship.description) {
                let created =
                    add_implied_relationship(model, source, destination, &relationship)?;
                if let Some(id) = created {
                    tracing::debug!(
                        relationship_id = %id,
                        implied_from = %relationship.id,
                        "created implied relationship"
                    );
                }
            }
        }
    }

    Ok(())
}
