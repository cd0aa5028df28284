//! Carry layout from an earlier version of a view to a regenerated one
//!
//! Elements are matched in strict tiers, stopping at the first hit:
//!
//! 1. canonical name
//! 2. same kind and display name (instances use the instantiated element's)
//! 3. same kind and non-empty description
//! 4. same kind and id
//!
//! Relationship views are matched through the resulting element map. Elements
//! that match nothing keep their position at the origin and are reported as a
//! diagnostic, never as an error.

use std::collections::HashMap;
use std::time::Instant;

use crate::errors::Result;
use crate::model::Element;
use crate::naming::same_element;
use crate::ops::Model;
use crate::views::View;
use crate::workspace::Workspace;
use crate::{log_op_end, log_op_error, log_op_start};

/// Outcome of one `copy_layout` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutMergeReport {
    pub view_key: String,
    pub matched_elements: usize,
    pub matched_relationships: usize,
    /// One line per new element that found no counterpart
    pub diagnostics: Vec<String>,
}

/// Copy positions, vertices, routing and paper size from `old_view`
///
/// # Errors
/// Returns `ElementNotFound` / `RelationshipNotFound` if `new_view` refers to
/// something missing from `new_model`.
pub fn copy_layout(
    old_model: &Model,
    old_view: &View,
    new_model: &Model,
    new_view: &mut View,
) -> Result<LayoutMergeReport> {
    let start = Instant::now();
    log_op_start!("copy_layout", view_key = new_view.key());

    let result = copy_layout_inner(old_model, old_view, new_model, new_view);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => log_op_end!(
            "copy_layout",
            duration_ms = duration_ms,
            view_key = new_view.key(),
            matched_elements = report.matched_elements,
            matched_relationships = report.matched_relationships,
            unmatched_elements = report.diagnostics.len()
        ),
        Err(err) => log_op_error!(
            "copy_layout",
            err.clone(),
            duration_ms = duration_ms,
            view_key = new_view.key()
        ),
    }
    result
}

fn copy_layout_inner(
    old_model: &Model,
    old_view: &View,
    new_model: &Model,
    new_view: &mut View,
) -> Result<LayoutMergeReport> {
    let mut report = LayoutMergeReport {
        view_key: new_view.key().to_string(),
        ..Default::default()
    };

    if new_view.paper_size.is_none() {
        new_view.paper_size = old_view.paper_size;
    }

    // new element id -> old element id
    let mut element_map: HashMap<String, String> = HashMap::new();

    for index in 0..new_view.elements.len() {
        let new_id = new_view.elements[index].element_id.clone();
        let new_element = new_model.get_element(&new_id)?;

        match find_old_element(old_model, old_view, new_model, new_element) {
            Some(old_id) => {
                if let Some(old_ev) = old_view.element_view(&old_id) {
                    new_view.elements[index].x = old_ev.x;
                    new_view.elements[index].y = old_ev.y;
                }
                element_map.insert(new_id, old_id);
                report.matched_elements += 1;
            }
            None => {
                let message = format!(
                    "There is no layout information for the element named {} on view {}",
                    new_model.display_name(&new_id)?,
                    old_view.key()
                );
                tracing::info!(element_id = %new_id, view_key = old_view.key(), "{message}");
                report.diagnostics.push(message);
            }
        }
    }

    let dynamic = new_view.is_dynamic();
    for index in 0..new_view.relationships.len() {
        let new_rv = &new_view.relationships[index];
        let new_relationship = new_model.get_relationship(&new_rv.relationship_id)?;

        let (Some(old_source), Some(old_destination)) = (
            element_map.get(&new_relationship.source_id),
            element_map.get(&new_relationship.destination_id),
        ) else {
            continue;
        };

        let matched = old_view.relationship_views().iter().find(|old_rv| {
            let Ok(old_relationship) = old_model.get_relationship(&old_rv.relationship_id) else {
                return false;
            };
            if &old_relationship.source_id != old_source
                || &old_relationship.destination_id != old_destination
            {
                return false;
            }
            if dynamic {
                old_rv.description == new_rv.description && old_rv.order == new_rv.order
            } else {
                old_relationship.description == new_relationship.description
            }
        });

        if let Some(old_rv) = matched {
            new_view.relationships[index].copy_layout_from(old_rv);
            report.matched_relationships += 1;
        }
    }

    Ok(report)
}

fn find_old_element(
    old_model: &Model,
    old_view: &View,
    new_model: &Model,
    new_element: &Element,
) -> Option<String> {
    let candidates: Vec<&Element> = old_view
        .element_ids()
        .filter_map(|id| old_model.get_element(id).ok())
        .collect();

    let by_canonical = candidates
        .iter()
        .find(|old| {
            same_element(old_model, &old.id, new_model, &new_element.id).unwrap_or(false)
        });
    if let Some(old) = by_canonical {
        return Some(old.id.clone());
    }

    let same_kind: Vec<&&Element> = candidates
        .iter()
        .filter(|old| old.kind() == new_element.kind())
        .collect();

    // instances are named after the element they instantiate
    if let Ok(new_name) = new_model.display_name(&new_element.id) {
        let by_name = same_kind
            .iter()
            .find(|old| old_model.display_name(&old.id).is_ok_and(|n| n == new_name));
        if let Some(old) = by_name {
            return Some(old.id.clone());
        }
    }

    if !new_element.description.trim().is_empty() {
        if let Some(old) = same_kind
            .iter()
            .find(|old| old.description == new_element.description)
        {
            return Some(old.id.clone());
        }
    }

    same_kind
        .iter()
        .find(|old| old.id == new_element.id)
        .map(|old| old.id.clone())
}

/// Copy layout into every view of `new` that has a same-keyed view in `old`
///
/// # Errors
/// Propagates the first `copy_layout` failure.
pub fn merge_workspaces(old: &Workspace, new: &mut Workspace) -> Result<Vec<LayoutMergeReport>> {
    let start = Instant::now();
    log_op_start!("merge_workspaces", workspace = new.name.as_str());

    let mut reports = Vec::new();
    let mut outcome = Ok(());
    let new_model = &new.model;
    for new_view in new.views.views_mut() {
        let Ok(old_view) = old.views.get(new_view.key()) else {
            tracing::debug!(view_key = new_view.key(), "no previous version of view");
            continue;
        };
        match copy_layout(&old.model, old_view, new_model, new_view) {
            Ok(report) => reports.push(report),
            Err(err) => {
                outcome = Err(err);
                break;
            }
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(()) => {
            log_op_end!(
                "merge_workspaces",
                duration_ms = duration_ms,
                merged_views = reports.len()
            );
            new.touch();
            Ok(reports)
        }
        Err(err) => {
            log_op_error!("merge_workspaces", err.clone(), duration_ms = duration_ms);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::element_ops::{add_person, add_software_system};
    use crate::views::projection::add_element;
    use crate::views::{PaperSize, ViewKind};

    fn landscape() -> View {
        View::new("landscape", ViewKind::SystemLandscape, None, "").unwrap()
    }

    #[test]
    fn test_paper_size_copied_only_when_unset() {
        let model = Model::new();
        let mut old_view = landscape();
        old_view.paper_size = Some(PaperSize::A4Landscape);

        let mut new_view = landscape();
        copy_layout(&model, &old_view, &model, &mut new_view).unwrap();
        assert_eq!(new_view.paper_size, Some(PaperSize::A4Landscape));

        new_view.paper_size = Some(PaperSize::A3Portrait);
        copy_layout(&model, &old_view, &model, &mut new_view).unwrap();
        assert_eq!(new_view.paper_size, Some(PaperSize::A3Portrait));
    }

    #[test]
    fn test_unmatched_element_reports_diagnostic() {
        let mut old_model = Model::new();
        let old_user = add_person(&mut old_model, "User", "").unwrap();
        let mut old_view = landscape();
        add_element(&old_model, &mut old_view, &old_user, true).unwrap();

        let mut new_model = Model::new();
        add_person(&mut new_model, "Someone", "").unwrap();
        let system = add_software_system(&mut new_model, "System", "").unwrap();
        let mut new_view = landscape();
        add_element(&new_model, &mut new_view, &system, true).unwrap();

        let report = copy_layout(&old_model, &old_view, &new_model, &mut new_view).unwrap();
        assert_eq!(report.matched_elements, 0);
        assert_eq!(
            report.diagnostics,
            vec!["There is no layout information for the element named System on view landscape"]
        );
        let ev = new_view.element_view(&system).unwrap();
        assert_eq!((ev.x, ev.y), (0, 0));
    }
}
