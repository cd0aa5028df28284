use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{ArchModelError, Result};
use crate::ids::{IdGenerator, SequentialIdGenerator};
use crate::implied::{DefaultImpliedRelationshipsStrategy, ImpliedRelationshipsStrategy};
use crate::model::{Element, ElementKind, Relationship};

/// In-memory architecture model
///
/// An arena of elements and relationships keyed by id. Insertion order is
/// kept separately so iteration (and everything built on it, such as view
/// population) is deterministic. Not thread-safe; callers serialize access.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) elements: HashMap<String, Element>,
    pub(crate) element_order: Vec<String>,
    pub(crate) relationships: HashMap<String, Relationship>,
    pub(crate) relationship_order: Vec<String>,
    id_generator: Arc<dyn IdGenerator>,
    implied_relationships_strategy: Arc<dyn ImpliedRelationshipsStrategy>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Create an empty model with sequential ids and no implied relationships
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(SequentialIdGenerator::new()))
    }

    pub fn with_id_generator(id_generator: Arc<dyn IdGenerator>) -> Self {
        Self {
            elements: HashMap::new(),
            element_order: Vec::new(),
            relationships: HashMap::new(),
            relationship_order: Vec::new(),
            id_generator,
            implied_relationships_strategy: Arc::new(DefaultImpliedRelationshipsStrategy),
        }
    }

    pub fn id_generator(&self) -> Arc<dyn IdGenerator> {
        Arc::clone(&self.id_generator)
    }

    /// Replace the id generator, reporting every existing id to it
    pub fn set_id_generator(&mut self, id_generator: Arc<dyn IdGenerator>) {
        for id in self.element_order.iter().chain(&self.relationship_order) {
            id_generator.found(id);
        }
        self.id_generator = id_generator;
    }

    pub(crate) fn next_id(&self) -> String {
        self.id_generator.generate_id()
    }

    pub fn implied_relationships_strategy(&self) -> Arc<dyn ImpliedRelationshipsStrategy> {
        Arc::clone(&self.implied_relationships_strategy)
    }

    /// Select the strategy applied to relationships created from now on
    pub fn set_implied_relationships_strategy(
        &mut self,
        strategy: impl ImpliedRelationshipsStrategy + 'static,
    ) {
        self.implied_relationships_strategy = Arc::new(strategy);
    }

    /// Get an element by id
    ///
    /// # Errors
    /// Returns `ElementNotFound` if the id is unknown.
    pub fn get_element(&self, id: &str) -> Result<&Element> {
        self.elements
            .get(id)
            .ok_or_else(|| ArchModelError::ElementNotFound {
                element_id: id.to_string(),
            })
    }

    /// Get a mutable reference to an element by id
    ///
    /// # Errors
    /// Returns `ElementNotFound` if the id is unknown.
    pub fn get_element_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.elements
            .get_mut(id)
            .ok_or_else(|| ArchModelError::ElementNotFound {
                element_id: id.to_string(),
            })
    }

    /// Get a relationship by id
    ///
    /// # Errors
    /// Returns `RelationshipNotFound` if the id is unknown.
    pub fn get_relationship(&self, id: &str) -> Result<&Relationship> {
        self.relationships
            .get(id)
            .ok_or_else(|| ArchModelError::RelationshipNotFound {
                relationship_id: id.to_string(),
            })
    }

    /// Get a mutable reference to a relationship by id
    ///
    /// # Errors
    /// Returns `RelationshipNotFound` if the id is unknown.
    pub fn get_relationship_mut(&mut self, id: &str) -> Result<&mut Relationship> {
        self.relationships
            .get_mut(id)
            .ok_or_else(|| ArchModelError::RelationshipNotFound {
                relationship_id: id.to_string(),
            })
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn contains_relationship(&self, id: &str) -> bool {
        self.relationships.contains_key(id)
    }

    /// All elements in creation order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.element_order
            .iter()
            .filter_map(|id| self.elements.get(id))
    }

    /// All relationships in creation order
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationship_order
            .iter()
            .filter_map(|id| self.relationships.get(id))
    }

    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements().filter(move |e| e.kind() == kind)
    }

    pub fn people(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(ElementKind::Person)
    }

    pub fn software_systems(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(ElementKind::SoftwareSystem)
    }

    pub fn deployment_nodes(&self) -> impl Iterator<Item = &Element> {
        self.elements_of_kind(ElementKind::DeploymentNode)
    }

    /// Direct children of an element, in creation order
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements()
            .filter(move |e| e.parent_id.as_deref() == Some(parent_id))
    }

    /// Direct children of one kind, in creation order
    pub fn children_of_kind<'a>(
        &'a self,
        parent_id: &'a str,
        kind: ElementKind,
    ) -> impl Iterator<Item = &'a Element> {
        self.children_of(parent_id).filter(move |e| e.kind() == kind)
    }

    pub fn element_count(&self) -> usize {
        self.element_order.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationship_order.len()
    }

    /// Name shown for an element; instances report the instantiated element's name
    ///
    /// # Errors
    /// Returns `ElementNotFound` if the element or the instantiated element is unknown.
    pub fn display_name(&self, id: &str) -> Result<&str> {
        let element = self.get_element(id)?;
        match element.instance() {
            Some(instance) => Ok(self.get_element(&instance.element_id)?.name.as_str()),
            None => Ok(element.name.as_str()),
        }
    }

    /// Insert an element, keeping creation order
    ///
    /// Bypasses factory validation; used by factories, snapshot restore and
    /// test setup.
    pub fn insert_element(&mut self, element: Element) {
        if !self.elements.contains_key(&element.id) {
            self.element_order.push(element.id.clone());
        }
        self.elements.insert(element.id.clone(), element);
    }

    /// Insert a relationship and attach it to its source element
    ///
    /// # Errors
    /// Returns `ElementNotFound` if the source element is unknown.
    pub fn insert_relationship(&mut self, relationship: Relationship) -> Result<()> {
        let source = self.get_element_mut(&relationship.source_id)?;
        if !source.relationship_ids.contains(&relationship.id) {
            source.relationship_ids.push(relationship.id.clone());
        }
        if !self.relationships.contains_key(&relationship.id) {
            self.relationship_order.push(relationship.id.clone());
        }
        self.relationships
            .insert(relationship.id.clone(), relationship);
        Ok(())
    }
}
