//! Editable workflow configuration aggregate (PRD-27).
//!
//! A configuration bundles the statuses and transitions the visual editor
//! manipulates. The engine validates against one configuration at a time;
//! persisting and publishing revisions is the caller's concern.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::{materialize, ACTION_CREATE_RAPPEL_7J};
use crate::error::CoreError;
use crate::status::{
    validate_status_color, validate_status_key, validate_status_label, GridPosition, Status,
    STATUS_DEMANDE, STATUS_DEVIS_ENVOYE, STATUS_REGISTRY,
};
use crate::transition::{WorkflowTransition, AUTHORIZED_TRANSITIONS};
use crate::types::Timestamp;

/// Display name of the built-in configuration.
pub const DEFAULT_CONFIG_NAME: &str = "Workflow interventions (défaut)";

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// A complete, editable workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    pub id: Uuid,
    pub name: String,
    /// Revision number, bumped by the persistence layer on save.
    pub version: i32,
    pub statuses: Vec<Status>,
    pub transitions: Vec<WorkflowTransition>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Built-in configuration seeded from the status registry and the
/// transition whitelist.
pub fn default_config() -> WorkflowConfig {
    let now = chrono::Utc::now();
    let statuses: Vec<Status> = STATUS_REGISTRY.iter().map(Status::from_spec).collect();

    let mut transitions = Vec::with_capacity(AUTHORIZED_TRANSITIONS.len());
    for auth in AUTHORIZED_TRANSITIONS {
        let from = statuses.iter().find(|s| s.key == auth.from);
        let to = statuses.iter().find(|s| s.key == auth.to);
        let (Some(from), Some(to)) = (from, to) else {
            continue;
        };
        let mut transition = WorkflowTransition::new(from.id, to.id, auth.trigger);
        if auth.from == STATUS_DEMANDE && auth.to == STATUS_DEVIS_ENVOYE {
            transition.auto_actions = materialize(&[ACTION_CREATE_RAPPEL_7J]);
        }
        transitions.push(transition);
    }

    WorkflowConfig {
        id: Uuid::new_v4(),
        name: DEFAULT_CONFIG_NAME.to_string(),
        version: 1,
        statuses,
        transitions,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

impl WorkflowConfig {
    // -- Lookups ------------------------------------------------------------

    /// Find a status by its symbolic key.
    pub fn status_by_key(&self, key: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.key == key)
    }

    /// Find a status by id.
    pub fn status_by_id(&self, id: Uuid) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == id)
    }

    /// First edge between two status ids, active or not.
    pub fn transition_between(&self, from: Uuid, to: Uuid) -> Option<&WorkflowTransition> {
        self.transitions
            .iter()
            .find(|t| t.from_status_id == from && t.to_status_id == to)
    }

    // -- Editor operations ----------------------------------------------------

    /// Add a status to the configuration.
    pub fn add_status(&mut self, status: Status) -> Result<(), CoreError> {
        validate_status_key(&status.key).map_err(CoreError::Validation)?;
        validate_status_label(&status.label).map_err(CoreError::Validation)?;
        validate_status_color(&status.color).map_err(CoreError::Validation)?;
        if self.status_by_key(&status.key).is_some() {
            return Err(CoreError::Conflict(format!(
                "Status key '{}' already exists",
                status.key
            )));
        }
        let status_key = status.key.clone();
        self.statuses.push(status);
        self.touch();
        tracing::info!(config_id = %self.id, %status_key, "Workflow status added");
        Ok(())
    }

    /// Remove a status and every transition touching it.
    ///
    /// The initial status cannot be removed.
    pub fn remove_status(&mut self, key: &str) -> Result<Status, CoreError> {
        let index = self
            .statuses
            .iter()
            .position(|s| s.key == key)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Status",
                key: key.to_string(),
            })?;
        if self.statuses[index].is_initial {
            return Err(CoreError::Validation(format!(
                "Cannot remove the initial status '{key}'"
            )));
        }
        let status = self.statuses.remove(index);
        let before = self.transitions.len();
        self.transitions
            .retain(|t| t.from_status_id != status.id && t.to_status_id != status.id);
        let removed_edges = before - self.transitions.len();
        self.touch();
        tracing::info!(
            config_id = %self.id,
            status_key = %key,
            removed_edges,
            "Workflow status removed",
        );
        Ok(status)
    }

    /// Move a status on the editor grid.
    pub fn reposition_status(&mut self, key: &str, position: GridPosition) -> Result<(), CoreError> {
        let status = self
            .statuses
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Status",
                key: key.to_string(),
            })?;
        status.position = position;
        self.touch();
        tracing::debug!(status_key = %key, x = position.x, y = position.y, "Workflow status repositioned");
        Ok(())
    }

    /// Draw a new edge between two statuses.
    ///
    /// The whitelist is not consulted here: editors may draw edges outside
    /// it, and the engine reports those at validation time.
    pub fn add_transition(
        &mut self,
        from_key: &str,
        to_key: &str,
        label: &str,
    ) -> Result<Uuid, CoreError> {
        if label.trim().is_empty() {
            return Err(CoreError::Validation(
                "Transition label must not be empty".to_string(),
            ));
        }
        let from_id = self
            .status_by_key(from_key)
            .map(|s| s.id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Status",
                key: from_key.to_string(),
            })?;
        let to_id = self
            .status_by_key(to_key)
            .map(|s| s.id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Status",
                key: to_key.to_string(),
            })?;
        if self.transition_between(from_id, to_id).is_some() {
            return Err(CoreError::Conflict(format!(
                "Transition from '{from_key}' to '{to_key}' already exists"
            )));
        }
        let transition = WorkflowTransition::new(from_id, to_id, label);
        let id = transition.id;
        self.transitions.push(transition);
        self.touch();
        tracing::info!(config_id = %self.id, %from_key, %to_key, "Workflow transition added");
        Ok(id)
    }

    /// Remove an edge by id.
    pub fn remove_transition(&mut self, id: Uuid) -> Result<WorkflowTransition, CoreError> {
        let index = self
            .transitions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "WorkflowTransition",
                key: id.to_string(),
            })?;
        let transition = self.transitions.remove(index);
        self.touch();
        tracing::info!(config_id = %self.id, transition_id = %id, "Workflow transition removed");
        Ok(transition)
    }

    /// Enable or disable an edge without deleting it.
    pub fn set_transition_active(&mut self, id: Uuid, active: bool) -> Result<(), CoreError> {
        let transition = self
            .transitions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "WorkflowTransition",
                key: id.to_string(),
            })?;
        transition.is_active = active;
        self.touch();
        tracing::info!(config_id = %self.id, transition_id = %id, active, "Workflow transition toggled");
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }

    // -- Integrity ----------------------------------------------------------------

    /// Structural problems an editor should surface before publishing.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (i, status) in self.statuses.iter().enumerate() {
            if status.key.trim().is_empty() {
                issues.push(format!("Status '{}' has a blank key", status.label));
            }
            if self.statuses[..i].iter().any(|s| s.key == status.key) {
                issues.push(format!("Duplicate status key '{}'", status.key));
            }
        }

        let initials = self.statuses.iter().filter(|s| s.is_initial).count();
        if initials == 0 {
            issues.push("No initial status".to_string());
        }
        if initials > 1 {
            issues.push(format!("Multiple initial statuses ({initials})"));
        }

        for transition in &self.transitions {
            if self.status_by_id(transition.from_status_id).is_none() {
                issues.push(format!(
                    "Transition '{}' references a missing source status",
                    transition.label
                ));
            }
            if self.status_by_id(transition.to_status_id).is_none() {
                issues.push(format!(
                    "Transition '{}' references a missing target status",
                    transition.label
                ));
            }
        }

        for (i, transition) in self.transitions.iter().enumerate() {
            if self.transitions[..i].iter().any(|t| {
                t.from_status_id == transition.from_status_id
                    && t.to_status_id == transition.to_status_id
            }) {
                issues.push(format!("Duplicate transition '{}'", transition.label));
            }
        }

        if !issues.is_empty() {
            tracing::warn!(config_id = %self.id, issues = issues.len(), "Workflow config has integrity issues");
        }
        issues
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
