//! Workspace snapshots
//!
//! A snapshot is the complete, JSON-serializable state of a workspace:
//! elements with their variant data and parent links, relationships, and
//! every view with its layout, order tokens and animation steps.
//!
//! ## Responsibilities
//!
//! - Capture a workspace as a [`WorkspaceSnapshot`]
//! - Restore a workspace from JSON with a caller-supplied id generator
//! - Compute digests for change detection ([`digest`])
//!
//! ## Non-Responsibilities
//!
//! - Persistence (callers own where the JSON goes)
//! - The implied relationships strategy, which is not part of the snapshot;
//!   restored models use the default strategy

pub mod digest;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ArchModelError, Result};
use crate::ids::IdGenerator;
use crate::model::{Element, ElementKind, Relationship};
use crate::ops::Model;
use crate::traversal::ancestors;
use crate::views::{View, ViewKind, ViewSet};
use crate::workspace::Workspace;
use crate::{log_op_end, log_op_error, log_op_start};

pub use digest::{compute_model_digest, compute_semantic_digest, compute_snapshot_digest};

/// Current snapshot schema version
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub schema_version: u32,

    /// RFC3339 timestamp of capture
    pub created_at: String,

    pub name: String,
    #[serde(default)]
    pub description: String,
    pub last_modified: DateTime<Utc>,

    /// Elements in creation order
    pub elements: Vec<Element>,

    /// Relationships in creation order
    pub relationships: Vec<Relationship>,

    pub views: ViewSet,
}

impl WorkspaceSnapshot {
    /// Capture the current state of a workspace
    pub fn capture(workspace: &Workspace) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            created_at: Utc::now().to_rfc3339(),
            name: workspace.name.clone(),
            description: workspace.description.clone(),
            last_modified: workspace.last_modified,
            elements: workspace.model.elements().cloned().collect(),
            relationships: workspace.model.relationships().cloned().collect(),
            views: workspace.views.clone(),
        }
    }

    /// # Errors
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    /// Returns `Serialization` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a workspace
    ///
    /// Every restored element and relationship id is reported to
    /// `id_generator` through `found`, so ids generated afterwards never
    /// collide with restored ones.
    ///
    /// # Errors
    /// * `ElementNotFound` - If a parent, relationship endpoint, view element
    ///   or view scope refers to an element that is not in the snapshot
    /// * `RelationshipNotFound` - If a view refers to an unknown relationship
    /// * `DuplicateViewKey` - If two views share a key
    pub fn into_workspace(self, id_generator: Arc<dyn IdGenerator>) -> Result<Workspace> {
        let mut model = Model::with_id_generator(Arc::clone(&id_generator));

        for element in self.elements {
            id_generator.found(&element.id);
            model.insert_element(element);
        }

        for element in model.elements() {
            validate_parent(&model, element)?;
        }

        for relationship in self.relationships {
            id_generator.found(&relationship.id);
            model.get_element(&relationship.destination_id)?;
            model.insert_relationship(relationship)?;
        }

        let mut views = ViewSet::new();
        for view in self.views.views() {
            validate_view(&model, view)?;
            views.insert(view.clone())?;
        }

        Ok(Workspace {
            name: self.name,
            description: self.description,
            model,
            views,
            last_modified: self.last_modified,
        })
    }
}

/// Parent links must form the same tree the element operations build
fn validate_parent(model: &Model, element: &Element) -> Result<()> {
    use ElementKind::*;

    let parent_kind = match element.parent_id.as_deref() {
        Some(parent_id) => Some(model.get_element(parent_id)?.kind()),
        None => None,
    };
    let valid = matches!(
        (element.kind(), parent_kind),
        (Person | SoftwareSystem, None)
            | (Container, Some(SoftwareSystem))
            | (Component, Some(Container))
            | (DeploymentNode, None | Some(DeploymentNode))
            | (
                InfrastructureNode | SoftwareSystemInstance | ContainerInstance,
                Some(DeploymentNode)
            )
    );
    if !valid {
        let reason = match parent_kind {
            Some(kind) => format!("a {} cannot live inside a {}", element.kind(), kind),
            None => format!("a {} needs a parent", element.kind()),
        };
        return Err(ArchModelError::InvalidParent {
            name: element.name.clone(),
            reason,
        });
    }

    if let Some(instance) = element.instance() {
        model.get_element(&instance.element_id)?;
    }

    match ancestors::ancestor_chain(model, &element.id) {
        Err(ArchModelError::Internal { .. }) => Err(ArchModelError::InvalidParent {
            name: element.name.clone(),
            reason: "parent links form a cycle".to_string(),
        }),
        other => other.map(|_| ()),
    }
}

fn validate_view(model: &Model, view: &View) -> Result<()> {
    if let Some(system_id) = &view.software_system_id {
        model.get_element(system_id)?;
    }
    match &view.kind {
        ViewKind::Component { container_id } => {
            model.get_element(container_id)?;
        }
        ViewKind::Dynamic {
            element_id: Some(element_id),
            ..
        } => {
            model.get_element(element_id)?;
        }
        _ => {}
    }
    for element_id in view.element_ids() {
        model.get_element(element_id)?;
    }
    for rv in view.relationship_views() {
        model.get_relationship(&rv.relationship_id)?;
    }
    for step in view.animations() {
        for element_id in &step.elements {
            model.get_element(element_id)?;
        }
        for relationship_id in &step.relationships {
            model.get_relationship(relationship_id)?;
        }
    }
    Ok(())
}

/// Serialize a workspace to JSON
///
/// # Errors
/// Returns `Serialization` if encoding fails.
pub fn to_json(workspace: &Workspace) -> Result<String> {
    WorkspaceSnapshot::capture(workspace).to_json()
}

/// Restore a workspace from JSON
///
/// # Errors
/// Returns `Serialization` for malformed JSON, or the reference errors of
/// [`WorkspaceSnapshot::into_workspace`].
pub fn restore(json: &str, id_generator: Arc<dyn IdGenerator>) -> Result<Workspace> {
    let start = Instant::now();
    log_op_start!("restore_snapshot");

    let result = WorkspaceSnapshot::from_json(json).and_then(|snapshot| {
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(ArchModelError::Serialization {
                message: format!(
                    "unsupported snapshot schema version {}",
                    snapshot.schema_version
                ),
            });
        }
        snapshot.into_workspace(id_generator)
    });

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(workspace) => log_op_end!(
            "restore_snapshot",
            duration_ms = duration_ms,
            element_count = workspace.model.element_count(),
            relationship_count = workspace.model.relationship_count(),
            view_count = workspace.views.len()
        ),
        Err(err) => log_op_error!("restore_snapshot", err.clone(), duration_ms = duration_ms),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIdGenerator;
    use crate::ops::element_ops::{add_container, add_person, add_software_system};
    use crate::ops::relationship_ops::uses;
    use crate::views::projection::add_all_elements;

    fn banking() -> Workspace {
        let mut workspace = Workspace::new("Banking", "");
        let model = &mut workspace.model;
        let user = add_person(model, "Customer", "").unwrap();
        let system = add_software_system(model, "Internet Banking", "").unwrap();
        add_container(model, &system, "Web", "", "Java").unwrap();
        uses(model, &user, &system, "Uses").unwrap();

        let view = workspace
            .views
            .create_system_landscape_view("landscape", "")
            .unwrap();
        add_all_elements(&workspace.model, view).unwrap();
        workspace
    }

    #[test]
    fn test_restore_reports_ids_to_generator() {
        let json = to_json(&banking()).unwrap();
        let generator = Arc::new(SequentialIdGenerator::new());
        let restored = restore(&json, generator.clone()).unwrap();

        assert_eq!(restored.model.element_count(), 3);
        assert_eq!(restored.model.relationship_count(), 1);
        assert_eq!(generator.current(), 4);
        assert_eq!(restored.views.get("landscape").unwrap().element_views().len(), 2);
    }

    #[test]
    fn test_restore_rejects_dangling_view_reference() {
        let mut snapshot = WorkspaceSnapshot::capture(&banking());
        snapshot.elements.retain(|e| e.name != "Customer");
        snapshot.relationships.clear();

        let err = snapshot
            .into_workspace(Arc::new(SequentialIdGenerator::new()))
            .unwrap_err();
        assert!(matches!(err, ArchModelError::ElementNotFound { .. }));
    }

    #[test]
    fn test_restore_rejects_unknown_schema_version() {
        let mut snapshot = WorkspaceSnapshot::capture(&banking());
        snapshot.schema_version = 99;
        let json = snapshot.to_json().unwrap();
        assert!(matches!(
            restore(&json, Arc::new(SequentialIdGenerator::new())),
            Err(ArchModelError::Serialization { .. })
        ));
    }
}
