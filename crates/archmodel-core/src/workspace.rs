use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::ops::Model;
use crate::views::{View, ViewSet};

/// A model plus the views drawn from it
#[derive(Debug, Clone)]
pub struct Workspace {
    pub name: String,
    pub description: String,
    pub model: Model,
    pub views: ViewSet,
    pub last_modified: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: &str, description: &str) -> Self {
        Self::with_model(name, description, Model::new())
    }

    pub fn with_model(name: &str, description: &str, model: Model) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            model,
            views: ViewSet::new(),
            last_modified: Utc::now(),
        }
    }

    /// Record a modification
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Borrow the model alongside one of its views for mutation
    ///
    /// Touches the workspace, since the caller is about to change the view.
    ///
    /// # Errors
    /// Returns `ViewNotFound` if no view has this key.
    pub fn model_and_view_mut(&mut self, key: &str) -> Result<(&Model, &mut View)> {
        self.touch();
        let view = self.views.get_mut(key)?;
        Ok((&self.model, view))
    }

    /// Run a model mutation and touch the workspace
    pub fn update_model<T>(&mut self, f: impl FnOnce(&mut Model) -> Result<T>) -> Result<T> {
        let result = f(&mut self.model)?;
        self.touch();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::element_ops::add_software_system;
    use crate::views::projection::add_default_elements;

    #[test]
    fn test_update_model_touches() {
        let mut workspace = Workspace::new("Banking", "");
        let before = workspace.last_modified;
        let id = workspace
            .update_model(|model| add_software_system(model, "Internet Banking", ""))
            .unwrap();
        assert!(workspace.model.contains_element(&id));
        assert!(workspace.last_modified >= before);
    }

    #[test]
    fn test_model_and_view_mut() {
        let mut workspace = Workspace::new("Banking", "");
        workspace.views.create_system_landscape_view("landscape", "").unwrap();
        workspace
            .update_model(|model| add_software_system(model, "Internet Banking", ""))
            .unwrap();

        let (model, view) = workspace.model_and_view_mut("landscape").unwrap();
        add_default_elements(model, view).unwrap();
        assert_eq!(view.element_views().len(), 1);

        assert!(workspace.model_and_view_mut("missing").is_err());
    }
}
