//! Authorized transitions between pipeline statuses (PRD-12).
//!
//! `AUTHORIZED_TRANSITIONS` is the immutable business whitelist: the engine
//! flags any move outside it, whatever the workflow configuration says.
//! [`WorkflowTransition`] is the editable edge stored inside a
//! configuration; both layers are checked independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::AutoAction;
use crate::status::{
    STATUS_ACCEPTE, STATUS_ANNULE, STATUS_DEMANDE, STATUS_DEVIS_ENVOYE, STATUS_EN_COURS,
    STATUS_REFUSE, STATUS_TERMINE,
};

// ---------------------------------------------------------------------------
// Whitelist
// ---------------------------------------------------------------------------

/// One edge of the built-in transition whitelist.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedTransition {
    pub from: &'static str,
    pub to: &'static str,
    /// Action label shown on the transition button ("Envoi devis").
    pub trigger: &'static str,
}

/// Every move the business allows between built-in statuses.
pub const AUTHORIZED_TRANSITIONS: &[AuthorizedTransition] = &[
    AuthorizedTransition {
        from: STATUS_DEMANDE,
        to: STATUS_DEVIS_ENVOYE,
        trigger: "Envoi devis",
    },
    AuthorizedTransition {
        from: STATUS_DEMANDE,
        to: STATUS_ANNULE,
        trigger: "Annulation demande",
    },
    AuthorizedTransition {
        from: STATUS_DEVIS_ENVOYE,
        to: STATUS_ACCEPTE,
        trigger: "Acceptation devis",
    },
    AuthorizedTransition {
        from: STATUS_DEVIS_ENVOYE,
        to: STATUS_REFUSE,
        trigger: "Refus devis",
    },
    AuthorizedTransition {
        from: STATUS_DEVIS_ENVOYE,
        to: STATUS_ANNULE,
        trigger: "Annulation",
    },
    AuthorizedTransition {
        from: STATUS_ACCEPTE,
        to: STATUS_EN_COURS,
        trigger: "Démarrage intervention",
    },
    AuthorizedTransition {
        from: STATUS_ACCEPTE,
        to: STATUS_ANNULE,
        trigger: "Annulation",
    },
    AuthorizedTransition {
        from: STATUS_EN_COURS,
        to: STATUS_TERMINE,
        trigger: "Clôture intervention",
    },
    AuthorizedTransition {
        from: STATUS_EN_COURS,
        to: STATUS_ANNULE,
        trigger: "Annulation",
    },
    AuthorizedTransition {
        from: STATUS_REFUSE,
        to: STATUS_DEVIS_ENVOYE,
        trigger: "Nouveau devis",
    },
];

/// Whether the whitelist allows moving from `from` to `to`.
pub fn is_authorized_transition(from: &str, to: &str) -> bool {
    AUTHORIZED_TRANSITIONS
        .iter()
        .any(|t| t.from == from && t.to == to)
}

/// Whitelist edges leaving `from`.
pub fn authorized_targets(from: &str) -> Vec<&'static AuthorizedTransition> {
    AUTHORIZED_TRANSITIONS
        .iter()
        .filter(|t| t.from == from)
        .collect()
}

/// Trigger label of a whitelisted edge, if any.
pub fn authorized_trigger(from: &str, to: &str) -> Option<&'static str> {
    AUTHORIZED_TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.to == to)
        .map(|t| t.trigger)
}

// ---------------------------------------------------------------------------
// Editable transitions
// ---------------------------------------------------------------------------

/// Declarative guard evaluated against the intervention context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionCondition {
    /// Fails when `field` is absent from the context.
    FieldRequired { field: String, message: String },
    /// Fails unless the context holds exactly `value` for `field`.
    FieldEquals {
        field: String,
        value: serde_json::Value,
        message: String,
    },
    /// Named check with no in-process evaluator; always recorded as failed.
    CustomValidation { name: String, message: String },
}

impl TransitionCondition {
    /// User-facing message reported when the condition fails.
    pub fn message(&self) -> &str {
        match self {
            Self::FieldRequired { message, .. }
            | Self::FieldEquals { message, .. }
            | Self::CustomValidation { message, .. } => message,
        }
    }
}

/// Editable edge between two statuses of a workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTransition {
    pub id: Uuid,
    pub from_status_id: Uuid,
    pub to_status_id: Uuid,
    /// Button label shown in the UI.
    pub label: String,
    #[serde(default)]
    pub conditions: Vec<TransitionCondition>,
    #[serde(default)]
    pub auto_actions: Vec<AutoAction>,
    pub is_active: bool,
}

impl WorkflowTransition {
    /// New active edge with no conditions or actions.
    pub fn new(from_status_id: Uuid, to_status_id: Uuid, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_status_id,
            to_status_id,
            label: label.into(),
            conditions: Vec::new(),
            auto_actions: Vec::new(),
            is_active: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
