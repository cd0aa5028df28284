use serde::{Deserialize, Serialize};

use super::presentation::{AutomaticLayout, Dimensions, PaperSize, RankDirection, Routing, Vertex};
use super::sequence::SequenceNumber;
use crate::errors::{ArchModelError, Result};
use crate::model::DEFAULT_DEPLOYMENT_ENVIRONMENT;

/// View variant plus the data only that variant carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViewKind {
    SystemLandscape,
    SystemContext,
    Container,
    Component {
        container_id: String,
    },
    Dynamic {
        /// Software system or container in scope, if any
        element_id: Option<String>,
        #[serde(default)]
        sequence: SequenceNumber,
    },
    Deployment {
        environment: String,
    },
}

impl ViewKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ViewKind::SystemLandscape => "SystemLandscape",
            ViewKind::SystemContext => "SystemContext",
            ViewKind::Container => "Container",
            ViewKind::Component { .. } => "Component",
            ViewKind::Dynamic { .. } => "Dynamic",
            ViewKind::Deployment { .. } => "Deployment",
        }
    }

    /// Landscape, context, container and component views
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            ViewKind::SystemLandscape
                | ViewKind::SystemContext
                | ViewKind::Container
                | ViewKind::Component { .. }
        )
    }
}

/// An element placed on a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementView {
    pub element_id: String,
    pub x: i64,
    pub y: i64,
}

impl ElementView {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            x: 0,
            y: 0,
        }
    }
}

/// A relationship drawn on a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipView {
    pub relationship_id: String,
    /// Overrides the relationship description (dynamic views)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Order token (dynamic views)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Drawn destination to source, as a reply
    #[serde(default)]
    pub response: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<Vertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Routing>,
    /// Label position along the line, 0 to 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl RelationshipView {
    pub fn new(relationship_id: impl Into<String>) -> Self {
        Self {
            relationship_id: relationship_id.into(),
            description: None,
            order: None,
            response: false,
            vertices: Vec::new(),
            routing: None,
            position: None,
        }
    }

    /// Take vertices, routing and position from another view of the same line
    pub fn copy_layout_from(&mut self, other: &RelationshipView) {
        self.vertices = other.vertices.clone();
        self.routing = other.routing;
        self.position = other.position;
    }
}

/// One animation step; `order` is 1-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub order: u32,
    pub elements: Vec<String>,
    pub relationships: Vec<String>,
}

/// A named projection of the model
///
/// Views hold ids only. The model a view is populated from is passed to every
/// operation in [`crate::views::projection`]; a view must only ever be used
/// with that one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    key: String,
    pub kind: ViewKind,
    /// Software system in scope; for component views, the container's system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_system_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<PaperSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    automatic_layout: Option<AutomaticLayout>,
    #[serde(default)]
    pub(crate) elements: Vec<ElementView>,
    #[serde(default)]
    pub(crate) relationships: Vec<RelationshipView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) animations: Vec<AnimationStep>,
}

impl View {
    /// Create an empty view
    ///
    /// # Errors
    /// Returns `InvalidViewKey` if the key is blank.
    pub fn new(
        key: &str,
        kind: ViewKind,
        software_system_id: Option<String>,
        description: &str,
    ) -> Result<Self> {
        if key.trim().is_empty() {
            return Err(ArchModelError::InvalidViewKey);
        }
        Ok(Self {
            key: key.to_string(),
            kind,
            software_system_id,
            description: description.to_string(),
            title: None,
            paper_size: None,
            dimensions: None,
            automatic_layout: None,
            elements: Vec::new(),
            relationships: Vec::new(),
            animations: Vec::new(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Deployment environment, for deployment views
    pub fn environment(&self) -> Option<&str> {
        match &self.kind {
            ViewKind::Deployment { environment } => Some(environment),
            _ => None,
        }
    }

    /// Change the environment of a deployment view; blank means the default
    ///
    /// # Errors
    /// Returns `UnsupportedViewOperation` for other kinds of view.
    pub fn set_environment(&mut self, environment: &str) -> Result<()> {
        match &mut self.kind {
            ViewKind::Deployment { environment: current } => {
                *current = if environment.trim().is_empty() {
                    DEFAULT_DEPLOYMENT_ENVIRONMENT.to_string()
                } else {
                    environment.to_string()
                };
                Ok(())
            }
            _ => Err(ArchModelError::UnsupportedViewOperation {
                key: self.key.clone(),
                operation: "set_environment".to_string(),
            }),
        }
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn set_dimensions(&mut self, dimensions: Option<Dimensions>) {
        self.dimensions = dimensions;
    }

    pub fn automatic_layout(&self) -> Option<&AutomaticLayout> {
        self.automatic_layout.as_ref()
    }

    /// Enable automatic layout with the default settings
    pub fn enable_automatic_layout(&mut self) {
        self.automatic_layout = Some(AutomaticLayout::default());
    }

    pub fn enable_automatic_layout_with(
        &mut self,
        rank_direction: RankDirection,
        rank_separation: u32,
        node_separation: u32,
        edge_separation: u32,
        vertices: bool,
    ) {
        self.automatic_layout = Some(AutomaticLayout {
            rank_direction,
            rank_separation,
            node_separation,
            edge_separation,
            vertices,
        });
    }

    pub fn disable_automatic_layout(&mut self) {
        self.automatic_layout = None;
    }

    /// Element views in the order they were added
    pub fn element_views(&self) -> &[ElementView] {
        &self.elements
    }

    /// Relationship views in the order they were added
    ///
    /// See [`crate::views::dynamic::ordered_relationships`] for the dynamic
    /// view ordering.
    pub fn relationship_views(&self) -> &[RelationshipView] {
        &self.relationships
    }

    /// Element views for layout edits; membership changes go through
    /// [`crate::views::projection`]
    pub fn element_views_mut(&mut self) -> &mut [ElementView] {
        &mut self.elements
    }

    pub fn relationship_views_mut(&mut self) -> &mut [RelationshipView] {
        &mut self.relationships
    }

    pub fn animations(&self) -> &[AnimationStep] {
        &self.animations
    }

    pub fn contains_element(&self, element_id: &str) -> bool {
        self.elements.iter().any(|ev| ev.element_id == element_id)
    }

    pub fn contains_relationship(&self, relationship_id: &str) -> bool {
        self.relationships
            .iter()
            .any(|rv| rv.relationship_id == relationship_id)
    }

    pub fn element_view(&self, element_id: &str) -> Option<&ElementView> {
        self.elements.iter().find(|ev| ev.element_id == element_id)
    }

    pub fn element_view_mut(&mut self, element_id: &str) -> Option<&mut ElementView> {
        self.elements
            .iter_mut()
            .find(|ev| ev.element_id == element_id)
    }

    /// First view of a relationship; dynamic views may hold several
    pub fn relationship_view(&self, relationship_id: &str) -> Option<&RelationshipView> {
        self.relationships
            .iter()
            .find(|rv| rv.relationship_id == relationship_id)
    }

    pub fn relationship_view_mut(&mut self, relationship_id: &str) -> Option<&mut RelationshipView> {
        self.relationships
            .iter_mut()
            .find(|rv| rv.relationship_id == relationship_id)
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|ev| ev.element_id.as_str())
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, ViewKind::Dynamic { .. })
    }

    pub fn is_deployment(&self) -> bool {
        matches!(self.kind, ViewKind::Deployment { .. })
    }

    pub(crate) fn unsupported(&self, operation: &str) -> ArchModelError {
        ArchModelError::UnsupportedViewOperation {
            key: self.key.clone(),
            operation: operation.to_string(),
        }
    }
}
