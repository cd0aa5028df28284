use super::store::Model;
use crate::errors::Result;
use crate::model::{ElementKind, InteractionStyle, Relationship};

/// Create a relationship between two elements
///
/// Creation is an idempotent insert: if a relationship with the same dedup
/// key already leaves `source_id`, nothing is created and `Ok(None)` is
/// returned. The key is `(source, destination)` for two components of the
/// same container and `(source, destination, description)` otherwise.
///
/// On success the relationship gets an id from the model's generator, is
/// attached to its source, and the active implied relationships strategy runs
/// against it.
///
/// # Arguments
/// * `model` - Mutable reference to the Model
/// * `source_id` - Element the relationship leaves
/// * `destination_id` - Element the relationship points at
/// * `description` - May be empty
/// * `technology` - Optional technology label
/// * `interaction_style` - Optional synchronous/asynchronous marker
/// * `tags` - User tags
///
/// # Returns
/// The new relationship id, or `None` when the dedup key collided
///
/// # Errors
/// * `ElementNotFound` - If either endpoint is unknown
pub fn add_relationship(
    model: &mut Model,
    source_id: &str,
    destination_id: &str,
    description: &str,
    technology: Option<&str>,
    interaction_style: Option<InteractionStyle>,
    tags: &[&str],
) -> Result<Option<String>> {
    model.get_element(source_id)?;
    model.get_element(destination_id)?;

    if is_duplicate(model, source_id, destination_id, description)? {
        tracing::debug!(
            source_id,
            destination_id,
            description,
            "relationship already exists, nothing created"
        );
        return Ok(None);
    }

    let mut relationship = Relationship::new(
        model.next_id(),
        source_id.to_string(),
        destination_id.to_string(),
        description.to_string(),
    );
    relationship.technology = technology
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string);
    relationship.interaction_style = interaction_style;
    relationship.add_tags(tags);

    let relationship_id = relationship.id.clone();
    model.insert_relationship(relationship)?;

    let strategy = model.implied_relationships_strategy();
    strategy.create_implied_relationships(model, &relationship_id)?;

    Ok(Some(relationship_id))
}

/// Shorthand for a relationship with only a description
///
/// # Errors
/// * `ElementNotFound` - If either endpoint is unknown
pub fn uses(
    model: &mut Model,
    source_id: &str,
    destination_id: &str,
    description: &str,
) -> Result<Option<String>> {
    add_relationship(model, source_id, destination_id, description, None, None, &[])
}

/// Insert a relationship derived from `from`, bypassing strategy invocation
///
/// Derived relationships are checked against the same dedup key as explicit
/// ones but never trigger further derivation.
pub(crate) fn add_implied_relationship(
    model: &mut Model,
    source_id: &str,
    destination_id: &str,
    from: &Relationship,
) -> Result<Option<String>> {
    if is_duplicate(model, source_id, destination_id, &from.description)? {
        return Ok(None);
    }

    let mut relationship = Relationship::new(
        model.next_id(),
        source_id.to_string(),
        destination_id.to_string(),
        from.description.clone(),
    );
    relationship.technology = from.technology.clone();
    relationship.interaction_style = from.interaction_style;
    relationship.tags = from.tags.clone();
    relationship.implied_from = Some(from.id.clone());

    let id = relationship.id.clone();
    model.insert_relationship(relationship)?;
    Ok(Some(id))
}

/// Dedup check shared by explicit and implied creation
fn is_duplicate(
    model: &Model,
    source_id: &str,
    destination_id: &str,
    description: &str,
) -> Result<bool> {
    let source = model.get_element(source_id)?;
    let destination = model.get_element(destination_id)?;

    let sibling_components = source.kind() == ElementKind::Component
        && destination.kind() == ElementKind::Component
        && source.parent_id == destination.parent_id;

    if sibling_components {
        Ok(has_efferent_relationship(model, source_id, destination_id, None))
    } else {
        Ok(has_efferent_relationship(
            model,
            source_id,
            destination_id,
            Some(description),
        ))
    }
}

/// True if `source_id` has a relationship to `destination_id`
///
/// With `Some(description)` only relationships with exactly that description
/// count.
pub fn has_efferent_relationship(
    model: &Model,
    source_id: &str,
    destination_id: &str,
    description: Option<&str>,
) -> bool {
    efferent_relationships(model, source_id)
        .into_iter()
        .any(|r| {
            r.destination_id == destination_id
                && description.map_or(true, |d| r.description == d)
        })
}

/// First relationship from `source_id` to `destination_id`, in creation order
pub fn get_efferent_relationship_with<'a>(
    model: &'a Model,
    source_id: &str,
    destination_id: &str,
) -> Option<&'a Relationship> {
    efferent_relationships(model, source_id)
        .into_iter()
        .find(|r| r.destination_id == destination_id)
}

/// Relationships leaving an element, in creation order
pub fn efferent_relationships<'a>(model: &'a Model, element_id: &str) -> Vec<&'a Relationship> {
    match model.get_element(element_id) {
        Ok(element) => element
            .relationship_ids
            .iter()
            .filter_map(|id| model.get_relationship(id).ok())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Relationships arriving at an element, in creation order
pub fn afferent_relationships<'a>(model: &'a Model, element_id: &str) -> Vec<&'a Relationship> {
    model
        .relationships()
        .filter(|r| r.destination_id == element_id)
        .collect()
}

/// True if the element takes part in at least one relationship
pub fn has_relationships(model: &Model, element_id: &str) -> bool {
    model
        .relationships()
        .any(|r| r.source_id == element_id || r.destination_id == element_id)
}

/// Add user tags to an existing relationship
///
/// # Errors
/// * `RelationshipNotFound` - If the id is unknown
pub fn add_relationship_tags(model: &mut Model, relationship_id: &str, tags: &[&str]) -> Result<()> {
    model.get_relationship_mut(relationship_id)?.add_tags(tags);
    Ok(())
}
