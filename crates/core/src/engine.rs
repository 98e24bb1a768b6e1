//! Transition validation engine (PRD-12).
//!
//! Pure functions over a [`WorkflowConfig`] and an [`InterventionContext`].
//! `validate_transition` never returns an error: an impossible move is an
//! ordinary result with `can_transition` false, so callers render the
//! diagnostics directly.

use serde::Serialize;

use crate::actions::AutoAction;
use crate::config::WorkflowConfig;
use crate::context::InterventionContext;
use crate::rules::applicable_rules;
use crate::transition::{is_authorized_transition, TransitionCondition, WorkflowTransition};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Diagnostics reported through `failed_conditions`.
pub const DIAG_STATUS_NOT_FOUND: &str = "Statut source ou cible introuvable";
pub const DIAG_TRANSITION_NOT_AUTHORIZED: &str = "Transition non autorisée";
pub const DIAG_TRANSITION_NOT_WHITELISTED: &str =
    "Transition non autorisée par les règles métier";

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Outcome of a transition check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowValidationResult {
    pub can_transition: bool,
    /// Wire names of context fields the target status still requires.
    pub missing_requirements: Vec<String>,
    /// User-facing messages of failed guards, in evaluation order.
    pub failed_conditions: Vec<String>,
    /// Non-blocking rule messages.
    pub warnings: Vec<String>,
}

impl WorkflowValidationResult {
    fn denied(diagnostic: &str) -> Self {
        Self {
            can_transition: false,
            missing_requirements: Vec::new(),
            failed_conditions: vec![diagnostic.to_string()],
            warnings: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check whether an intervention may move from `from_key` to `to_key`.
///
/// Layers are evaluated in order and never short-circuit once the edge is
/// resolved: target requirements, edge conditions, whitelist membership,
/// then business rules. The result aggregates every failure.
pub fn validate_transition(
    workflow: &WorkflowConfig,
    from_key: &str,
    to_key: &str,
    context: &InterventionContext,
) -> WorkflowValidationResult {
    let (from_status, to_status) = match (
        workflow.status_by_key(from_key),
        workflow.status_by_key(to_key),
    ) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            tracing::debug!(from_key, to_key, "Workflow statuses not resolved");
            return WorkflowValidationResult::denied(DIAG_STATUS_NOT_FOUND);
        }
    };

    let transition = workflow
        .transition_between(from_status.id, to_status.id)
        .filter(|t| t.is_active);
    let Some(transition) = transition else {
        tracing::debug!(from_key, to_key, "Workflow edge missing or inactive");
        return WorkflowValidationResult::denied(DIAG_TRANSITION_NOT_AUTHORIZED);
    };

    let mut missing_requirements = Vec::new();
    let mut failed_conditions = Vec::new();
    let mut warnings = Vec::new();

    // Target status requirements.
    for field in to_status.metadata.required_fields() {
        if !context.has_field(field.as_str()) {
            missing_requirements.push(field.as_str().to_string());
        }
    }

    // Edge conditions.
    for condition in &transition.conditions {
        if let Some(message) = failed_condition_message(condition, context) {
            failed_conditions.push(message.to_string());
        }
    }

    // Whitelist membership.
    if !is_authorized_transition(&from_status.key, &to_status.key) {
        failed_conditions.push(DIAG_TRANSITION_NOT_WHITELISTED.to_string());
    }

    // Business rules.
    for rule in applicable_rules(&from_status.key, &to_status.key) {
        if !(rule.check)(context) {
            if rule.block_transition {
                failed_conditions.push(rule.message.to_string());
            } else {
                warnings.push(rule.message.to_string());
            }
        }
    }

    let can_transition = missing_requirements.is_empty() && failed_conditions.is_empty();
    tracing::debug!(
        from_key,
        to_key,
        can_transition,
        missing = missing_requirements.len(),
        failed = failed_conditions.len(),
        "Transition validated",
    );

    WorkflowValidationResult {
        can_transition,
        missing_requirements,
        failed_conditions,
        warnings,
    }
}

/// Message of a failed condition, or `None` when it holds.
fn failed_condition_message<'a>(
    condition: &'a TransitionCondition,
    context: &InterventionContext,
) -> Option<&'a str> {
    match condition {
        TransitionCondition::FieldRequired { field, message } => {
            (!context.has_field(field)).then_some(message.as_str())
        }
        TransitionCondition::FieldEquals {
            field,
            value,
            message,
        } => (context.field_value(field).as_ref() != Some(value)).then_some(message.as_str()),
        TransitionCondition::CustomValidation { message, .. } => Some(message.as_str()),
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Active edges leaving `status_key`, in configuration order.
///
/// Unknown keys yield an empty list; the UI simply renders no buttons.
pub fn find_available_transitions<'a>(
    workflow: &'a WorkflowConfig,
    status_key: &str,
) -> Vec<&'a WorkflowTransition> {
    let Some(status) = workflow.status_by_key(status_key) else {
        return Vec::new();
    };
    workflow
        .transitions
        .iter()
        .filter(|t| t.from_status_id == status.id && t.is_active)
        .collect()
}

/// Auto-actions fired when an intervention enters `to_key` through the
/// `from_key` edge: target status actions first, then edge actions.
///
/// Returned descriptors are independent copies; executors may annotate
/// them freely.
pub fn collect_auto_actions(
    workflow: &WorkflowConfig,
    from_key: &str,
    to_key: &str,
) -> Vec<AutoAction> {
    let (Some(from_status), Some(to_status)) = (
        workflow.status_by_key(from_key),
        workflow.status_by_key(to_key),
    ) else {
        return Vec::new();
    };

    let mut actions = to_status.metadata.auto_actions.clone();
    if let Some(transition) = workflow
        .transition_between(from_status.id, to_status.id)
        .filter(|t| t.is_active)
    {
        actions.extend(transition.auto_actions.iter().cloned());
    }
    actions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
