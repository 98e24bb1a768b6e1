//! Status vocabulary for the intervention pipeline (PRD-12).
//!
//! Declares the built-in status registry: keys, display labels, editor grid
//! positions, entry requirements, and the auto-actions fired on entry.
//! Statuses inside a [`crate::config::WorkflowConfig`] are editable copies
//! seeded from this registry.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::{
    self, AutoAction, ACTION_GENERATE_INVOICE_IF_MISSING, ACTION_NOTIFY_ARTISAN,
    ACTION_SEND_EMAIL_CONFIRMATION, ACTION_SEND_EMAIL_DEVIS,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Built-in status keys.
pub const STATUS_DEMANDE: &str = "DEMANDE";
pub const STATUS_DEVIS_ENVOYE: &str = "DEVIS_ENVOYE";
pub const STATUS_ACCEPTE: &str = "ACCEPTE";
pub const STATUS_REFUSE: &str = "REFUSE";
pub const STATUS_EN_COURS: &str = "EN_COURS";
pub const STATUS_TERMINE: &str = "TERMINE";
pub const STATUS_ANNULE: &str = "ANNULE";

/// Canonical pipeline display order.
pub const PIPELINE_ORDER: &[&str] = &[
    STATUS_DEMANDE,
    STATUS_DEVIS_ENVOYE,
    STATUS_ACCEPTE,
    STATUS_REFUSE,
    STATUS_EN_COURS,
    STATUS_TERMINE,
    STATUS_ANNULE,
];

/// Maximum length for a status key.
pub const MAX_STATUS_KEY_LENGTH: usize = 50;

/// Maximum length for a status label.
pub const MAX_STATUS_LABEL_LENGTH: usize = 100;

static STATUS_KEY_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid regex"));

static HEX_COLOR_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Context fields a status can require before entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Artisan,
    Facture,
    Proprietaire,
    Commentaire,
    Devis,
}

impl RequiredField {
    /// Context field name as the UI sends it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artisan => "artisanId",
            Self::Facture => "factureId",
            Self::Proprietaire => "proprietaireId",
            Self::Commentaire => "commentaire",
            Self::Devis => "devisId",
        }
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// Cell coordinates on the workflow editor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

/// Built-in definition of a pipeline status.
#[derive(Debug, Clone, Copy)]
pub struct StatusSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Hex color used by the pipeline board and the editor.
    pub color: &'static str,
    pub is_initial: bool,
    pub is_terminal: bool,
    pub position: GridPosition,
    /// Context fields that must be present to enter this status.
    pub requires: &'static [RequiredField],
    /// Catalog keys of the actions fired on entry.
    pub auto_action_keys: &'static [&'static str],
}

/// Requirement flags and entry actions of a workflow status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMetadata {
    pub requires_artisan: bool,
    pub requires_facture: bool,
    pub requires_proprietaire: bool,
    pub requires_commentaire: bool,
    pub requires_devis_id: bool,
    #[serde(default)]
    pub auto_actions: Vec<AutoAction>,
}

impl StatusMetadata {
    /// Fields required to enter the status, in stable report order.
    pub fn required_fields(&self) -> Vec<RequiredField> {
        let mut fields = Vec::new();
        if self.requires_artisan {
            fields.push(RequiredField::Artisan);
        }
        if self.requires_facture {
            fields.push(RequiredField::Facture);
        }
        if self.requires_proprietaire {
            fields.push(RequiredField::Proprietaire);
        }
        if self.requires_commentaire {
            fields.push(RequiredField::Commentaire);
        }
        if self.requires_devis_id {
            fields.push(RequiredField::Devis);
        }
        fields
    }
}

/// Editable status inside a workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: Uuid,
    /// Unique symbolic key within the configuration ("DEVIS_ENVOYE").
    pub key: String,
    pub label: String,
    pub description: String,
    pub color: String,
    pub is_initial: bool,
    pub is_terminal: bool,
    pub position: GridPosition,
    pub metadata: StatusMetadata,
}

impl Status {
    /// Materialize an editable status from a registry entry.
    pub fn from_spec(spec: &StatusSpec) -> Self {
        let mut metadata = StatusMetadata {
            auto_actions: actions::materialize(spec.auto_action_keys),
            ..StatusMetadata::default()
        };
        for field in spec.requires {
            match field {
                RequiredField::Artisan => metadata.requires_artisan = true,
                RequiredField::Facture => metadata.requires_facture = true,
                RequiredField::Proprietaire => metadata.requires_proprietaire = true,
                RequiredField::Commentaire => metadata.requires_commentaire = true,
                RequiredField::Devis => metadata.requires_devis_id = true,
            }
        }
        Self {
            id: Uuid::new_v4(),
            key: spec.key.to_string(),
            label: spec.label.to_string(),
            description: spec.description.to_string(),
            color: spec.color.to_string(),
            is_initial: spec.is_initial,
            is_terminal: spec.is_terminal,
            position: spec.position,
            metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Built-in statuses of the intervention pipeline.
pub const STATUS_REGISTRY: &[StatusSpec] = &[
    StatusSpec {
        key: STATUS_DEMANDE,
        label: "Demande",
        description: "Demande d'intervention reçue, en attente de qualification.",
        color: "#3B82F6",
        is_initial: true,
        is_terminal: false,
        position: GridPosition { x: 0, y: 0 },
        requires: &[],
        auto_action_keys: &[],
    },
    StatusSpec {
        key: STATUS_DEVIS_ENVOYE,
        label: "Devis envoyé",
        description: "Devis transmis au client, en attente de réponse.",
        color: "#8B5CF6",
        is_initial: false,
        is_terminal: false,
        position: GridPosition { x: 1, y: 0 },
        requires: &[RequiredField::Devis],
        auto_action_keys: &[ACTION_SEND_EMAIL_DEVIS],
    },
    StatusSpec {
        key: STATUS_ACCEPTE,
        label: "Accepté",
        description: "Devis accepté par le client, intervention à planifier.",
        color: "#06B6D4",
        is_initial: false,
        is_terminal: false,
        position: GridPosition { x: 2, y: 0 },
        requires: &[],
        auto_action_keys: &[],
    },
    StatusSpec {
        key: STATUS_REFUSE,
        label: "Refusé",
        description: "Devis refusé par le client, un nouveau devis peut être proposé.",
        color: "#F97316",
        is_initial: false,
        is_terminal: false,
        position: GridPosition { x: 2, y: 1 },
        requires: &[],
        auto_action_keys: &[],
    },
    StatusSpec {
        key: STATUS_EN_COURS,
        label: "En cours",
        description: "Intervention en cours de réalisation par l'artisan.",
        color: "#F59E0B",
        is_initial: false,
        is_terminal: false,
        position: GridPosition { x: 3, y: 0 },
        requires: &[RequiredField::Artisan],
        auto_action_keys: &[ACTION_NOTIFY_ARTISAN],
    },
    StatusSpec {
        key: STATUS_TERMINE,
        label: "Terminé",
        description: "Intervention réalisée, facturée et clôturée.",
        color: "#22C55E",
        is_initial: false,
        is_terminal: true,
        position: GridPosition { x: 4, y: 0 },
        requires: &[RequiredField::Facture, RequiredField::Proprietaire],
        auto_action_keys: &[ACTION_GENERATE_INVOICE_IF_MISSING, ACTION_SEND_EMAIL_CONFIRMATION],
    },
    StatusSpec {
        key: STATUS_ANNULE,
        label: "Annulé",
        description: "Demande annulée, motif renseigné en commentaire.",
        color: "#EF4444",
        is_initial: false,
        is_terminal: true,
        position: GridPosition { x: 3, y: 1 },
        requires: &[RequiredField::Commentaire],
        auto_action_keys: &[],
    },
];

/// Look up a registry entry by status key.
pub fn registry_spec(key: &str) -> Option<&'static StatusSpec> {
    STATUS_REGISTRY.iter().find(|spec| spec.key == key)
}

/// Index of a status key in the canonical pipeline order.
pub fn pipeline_position(key: &str) -> Option<usize> {
    PIPELINE_ORDER.iter().position(|k| *k == key)
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a status key for editor-created statuses.
pub fn validate_status_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("Status key must not be empty".to_string());
    }
    if key.len() > MAX_STATUS_KEY_LENGTH {
        return Err(format!(
            "Status key exceeds maximum length of {MAX_STATUS_KEY_LENGTH}"
        ));
    }
    if !STATUS_KEY_RE.is_match(key) {
        return Err(format!(
            "Invalid status key '{key}'. Must be uppercase letters, digits and underscores, starting with a letter"
        ));
    }
    Ok(())
}

/// Validate a status display label.
pub fn validate_status_label(label: &str) -> Result<(), String> {
    if label.trim().is_empty() {
        return Err("Status label must not be empty".to_string());
    }
    if label.len() > MAX_STATUS_LABEL_LENGTH {
        return Err(format!(
            "Status label exceeds maximum length of {MAX_STATUS_LABEL_LENGTH}"
        ));
    }
    Ok(())
}

/// Validate a status color.
pub fn validate_status_color(color: &str) -> Result<(), String> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(format!("Invalid color '{color}'. Must be a hex color like #3B82F6"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
