use serde::{Deserialize, Serialize};

use super::projection::add_element;
use super::view::{View, ViewKind};
use crate::errors::{ArchModelError, Result};
use crate::model::{ElementKind, DEFAULT_DEPLOYMENT_ENVIRONMENT};
use crate::ops::Model;

/// The views of a workspace, in creation order
///
/// Keys are unique and never blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewSet {
    views: Vec<View>,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_system_landscape_view(&mut self, key: &str, description: &str) -> Result<&mut View> {
        self.push(View::new(key, ViewKind::SystemLandscape, None, description)?)
    }

    /// Create a system context view; the scoped system is added immediately
    ///
    /// # Errors
    /// * `WrongElementKind` - If `software_system_id` is not a software system
    /// * `DuplicateViewKey` / `InvalidViewKey` - For reused or blank keys
    pub fn create_system_context_view(
        &mut self,
        model: &Model,
        key: &str,
        software_system_id: &str,
        description: &str,
    ) -> Result<&mut View> {
        require_kind(model, software_system_id, ElementKind::SoftwareSystem)?;
        let mut view = View::new(
            key,
            ViewKind::SystemContext,
            Some(software_system_id.to_string()),
            description,
        )?;
        add_element(model, &mut view, software_system_id, true)?;
        self.push(view)
    }

    /// # Errors
    /// * `WrongElementKind` - If `software_system_id` is not a software system
    /// * `DuplicateViewKey` / `InvalidViewKey` - For reused or blank keys
    pub fn create_container_view(
        &mut self,
        model: &Model,
        key: &str,
        software_system_id: &str,
        description: &str,
    ) -> Result<&mut View> {
        require_kind(model, software_system_id, ElementKind::SoftwareSystem)?;
        self.push(View::new(
            key,
            ViewKind::Container,
            Some(software_system_id.to_string()),
            description,
        )?)
    }

    /// The view's software system is the container's parent
    ///
    /// # Errors
    /// * `WrongElementKind` - If `container_id` is not a container
    /// * `DuplicateViewKey` / `InvalidViewKey` - For reused or blank keys
    pub fn create_component_view(
        &mut self,
        model: &Model,
        key: &str,
        container_id: &str,
        description: &str,
    ) -> Result<&mut View> {
        let container = require_kind(model, container_id, ElementKind::Container)?;
        let system_id = container.parent_id.clone();
        self.push(View::new(
            key,
            ViewKind::Component {
                container_id: container_id.to_string(),
            },
            system_id,
            description,
        )?)
    }

    /// Unscoped dynamic view
    pub fn create_dynamic_view(&mut self, key: &str, description: &str) -> Result<&mut View> {
        self.push(View::new(
            key,
            ViewKind::Dynamic {
                element_id: None,
                sequence: Default::default(),
            },
            None,
            description,
        )?)
    }

    /// Dynamic view scoped to a software system or a container
    ///
    /// # Errors
    /// * `WrongElementKind` - If the scope is neither a software system nor a
    ///   container
    /// * `DuplicateViewKey` / `InvalidViewKey` - For reused or blank keys
    pub fn create_dynamic_view_for(
        &mut self,
        model: &Model,
        key: &str,
        element_id: &str,
        description: &str,
    ) -> Result<&mut View> {
        let element = model.get_element(element_id)?;
        let software_system_id = match element.kind() {
            ElementKind::SoftwareSystem => element.id.clone(),
            ElementKind::Container => element.parent_id.clone().ok_or_else(|| {
                ArchModelError::Internal {
                    message: format!("container {element_id} has no parent"),
                }
            })?,
            other => {
                return Err(ArchModelError::WrongElementKind {
                    element_id: element_id.to_string(),
                    expected: "SoftwareSystem or Container".to_string(),
                    actual: other.type_name().to_string(),
                })
            }
        };
        self.push(View::new(
            key,
            ViewKind::Dynamic {
                element_id: Some(element_id.to_string()),
                sequence: Default::default(),
            },
            Some(software_system_id),
            description,
        )?)
    }

    /// Unscoped deployment view; a blank environment means the default one
    pub fn create_deployment_view(
        &mut self,
        key: &str,
        description: &str,
        environment: &str,
    ) -> Result<&mut View> {
        self.push(View::new(
            key,
            deployment_kind(environment),
            None,
            description,
        )?)
    }

    /// Deployment view scoped to a software system
    ///
    /// # Errors
    /// * `WrongElementKind` - If `software_system_id` is not a software system
    /// * `DuplicateViewKey` / `InvalidViewKey` - For reused or blank keys
    pub fn create_deployment_view_for(
        &mut self,
        model: &Model,
        key: &str,
        software_system_id: &str,
        description: &str,
        environment: &str,
    ) -> Result<&mut View> {
        require_kind(model, software_system_id, ElementKind::SoftwareSystem)?;
        self.push(View::new(
            key,
            deployment_kind(environment),
            Some(software_system_id.to_string()),
            description,
        )?)
    }

    /// Add an already-built view, e.g. one restored from a snapshot
    ///
    /// # Errors
    /// Returns `DuplicateViewKey` if the key is taken.
    pub fn insert(&mut self, view: View) -> Result<&mut View> {
        self.push(view)
    }

    fn push(&mut self, view: View) -> Result<&mut View> {
        if self.contains_key(view.key()) {
            return Err(ArchModelError::DuplicateViewKey {
                key: view.key().to_string(),
            });
        }
        tracing::debug!(view_key = view.key(), view_type = view.kind.type_name(), "view created");
        let index = self.views.len();
        self.views.push(view);
        Ok(&mut self.views[index])
    }

    /// # Errors
    /// Returns `ViewNotFound` if no view has this key.
    pub fn get(&self, key: &str) -> Result<&View> {
        self.views
            .iter()
            .find(|v| v.key() == key)
            .ok_or_else(|| ArchModelError::ViewNotFound {
                key: key.to_string(),
            })
    }

    /// # Errors
    /// Returns `ViewNotFound` if no view has this key.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut View> {
        self.views
            .iter_mut()
            .find(|v| v.key() == key)
            .ok_or_else(|| ArchModelError::ViewNotFound {
                key: key.to_string(),
            })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.views.iter().any(|v| v.key() == key)
    }

    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    pub fn views_mut(&mut self) -> impl Iterator<Item = &mut View> {
        self.views.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

fn require_kind<'a>(
    model: &'a Model,
    element_id: &str,
    expected: ElementKind,
) -> Result<&'a crate::model::Element> {
    let element = model.get_element(element_id)?;
    if element.kind() != expected {
        return Err(ArchModelError::WrongElementKind {
            element_id: element_id.to_string(),
            expected: expected.type_name().to_string(),
            actual: element.kind().type_name().to_string(),
        });
    }
    Ok(element)
}

fn deployment_kind(environment: &str) -> ViewKind {
    let environment = if environment.trim().is_empty() {
        DEFAULT_DEPLOYMENT_ENVIRONMENT
    } else {
        environment
    };
    ViewKind::Deployment {
        environment: environment.to_string(),
    }
}

/// Human-readable name of a view
///
/// # Errors
/// Returns `ElementNotFound` if the view's scope is missing from `model`.
pub fn view_name(model: &Model, view: &View) -> Result<String> {
    let system_name = |model: &Model| -> Result<Option<String>> {
        match view.software_system_id.as_deref() {
            Some(id) => Ok(Some(model.get_element(id)?.name.clone())),
            None => Ok(None),
        }
    };

    let name = match &view.kind {
        ViewKind::SystemLandscape => "System Landscape".to_string(),
        ViewKind::SystemContext => {
            format!("{} - System Context", system_name(model)?.unwrap_or_default())
        }
        ViewKind::Container => {
            format!("{} - Containers", system_name(model)?.unwrap_or_default())
        }
        ViewKind::Component { container_id } => {
            let container = model.get_element(container_id)?;
            format!(
                "{} - {} - Components",
                system_name(model)?.unwrap_or_default(),
                container.name
            )
        }
        ViewKind::Dynamic { element_id, .. } => match element_id {
            Some(id) => format!("{} - Dynamic", model.get_element(id)?.name),
            None => "Dynamic".to_string(),
        },
        ViewKind::Deployment { environment } => match system_name(model)? {
            Some(system) => format!("{system} - Deployment - {environment}"),
            None => format!("Deployment - {environment}"),
        },
    };
    Ok(name)
}
