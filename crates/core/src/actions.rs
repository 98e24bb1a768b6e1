//! Auto-action catalog for the intervention workflow (PRD-12).
//!
//! Actions are declarative descriptors. The engine and the configuration
//! aggregate only report which actions a transition fires; callers (API
//! layer, job queue) execute them. Nothing in this module performs I/O.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Catalog action keys.
pub const ACTION_SEND_EMAIL_DEVIS: &str = "send_email_devis";
pub const ACTION_SEND_EMAIL_CONFIRMATION: &str = "send_email_confirmation";
pub const ACTION_NOTIFY_ARTISAN: &str = "notify_artisan";
pub const ACTION_GENERATE_INVOICE_IF_MISSING: &str = "generate_invoice_if_missing";
pub const ACTION_CREATE_RAPPEL_7J: &str = "create_rappel_7j";

/// All catalog action keys.
pub const CATALOG_KEYS: &[&str] = &[
    ACTION_SEND_EMAIL_DEVIS,
    ACTION_SEND_EMAIL_CONFIRMATION,
    ACTION_NOTIFY_ARTISAN,
    ACTION_GENERATE_INVOICE_IF_MISSING,
    ACTION_CREATE_RAPPEL_7J,
];

/// Valid action type strings.
pub const TYPE_EMAIL: &str = "email";
pub const TYPE_NOTIFICATION: &str = "notification";
pub const TYPE_DOCUMENT: &str = "document";
pub const TYPE_REMINDER: &str = "reminder";

/// All valid action types.
pub const VALID_ACTION_TYPES: &[&str] =
    &[TYPE_EMAIL, TYPE_NOTIFICATION, TYPE_DOCUMENT, TYPE_REMINDER];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of side effect an auto-action describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Email,
    Notification,
    Document,
    Reminder,
}

impl ActionType {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            TYPE_EMAIL => Ok(Self::Email),
            TYPE_NOTIFICATION => Ok(Self::Notification),
            TYPE_DOCUMENT => Ok(Self::Document),
            TYPE_REMINDER => Ok(Self::Reminder),
            _ => Err(format!(
                "Invalid action type '{s}'. Must be one of: {}",
                VALID_ACTION_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => TYPE_EMAIL,
            Self::Notification => TYPE_NOTIFICATION,
            Self::Document => TYPE_DOCUMENT,
            Self::Reminder => TYPE_REMINDER,
        }
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// A materialized auto-action attached to a status or transition.
///
/// `config` carries executor-specific parameters (template names,
/// recipients, delays) that the core never interprets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoAction {
    /// Catalog key this action was materialized from.
    pub key: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub config: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

static CATALOG: LazyLock<HashMap<&'static str, AutoAction>> = LazyLock::new(|| {
    HashMap::from([
        (
            ACTION_SEND_EMAIL_DEVIS,
            AutoAction {
                key: ACTION_SEND_EMAIL_DEVIS.to_string(),
                action_type: ActionType::Email,
                config: json!({"template": "devis_envoye", "recipient": "client"}),
            },
        ),
        (
            ACTION_SEND_EMAIL_CONFIRMATION,
            AutoAction {
                key: ACTION_SEND_EMAIL_CONFIRMATION.to_string(),
                action_type: ActionType::Email,
                config: json!({"template": "intervention_terminee", "recipient": "proprietaire"}),
            },
        ),
        (
            ACTION_NOTIFY_ARTISAN,
            AutoAction {
                key: ACTION_NOTIFY_ARTISAN.to_string(),
                action_type: ActionType::Notification,
                config: json!({"channel": "sms", "recipient": "artisan"}),
            },
        ),
        (
            ACTION_GENERATE_INVOICE_IF_MISSING,
            AutoAction {
                key: ACTION_GENERATE_INVOICE_IF_MISSING.to_string(),
                action_type: ActionType::Document,
                config: json!({"document": "facture", "skipIfPresent": true}),
            },
        ),
        (
            ACTION_CREATE_RAPPEL_7J,
            AutoAction {
                key: ACTION_CREATE_RAPPEL_7J.to_string(),
                action_type: ActionType::Reminder,
                config: json!({"delaiJours": 7, "motif": "relance_devis"}),
            },
        ),
    ])
});

/// Look up a catalog descriptor by key.
pub fn catalog_action(key: &str) -> Option<&'static AutoAction> {
    CATALOG.get(key)
}

/// Materialize an independent copy of a catalog descriptor.
///
/// Configuration editors get an error on unknown keys instead of a
/// silently dropped action.
pub fn instantiate(key: &str) -> Result<AutoAction, CoreError> {
    catalog_action(key).cloned().ok_or_else(|| CoreError::NotFound {
        entity: "AutoAction",
        key: key.to_string(),
    })
}

/// Materialize every known key, preserving order. Unknown keys are skipped.
pub fn materialize(keys: &[&str]) -> Vec<AutoAction> {
    keys.iter().filter_map(|k| catalog_action(k).cloned()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // -- ActionType -------------------------------------------------------

    #[test]
    fn action_type_round_trip() {
        for s in VALID_ACTION_TYPES {
            assert_eq!(ActionType::from_str_value(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn action_type_invalid_rejected() {
        let result = ActionType::from_str_value("webhook");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid action type"));
    }

    // -- Catalog ------------------------------------------------------------

    #[test]
    fn catalog_resolves_every_key() {
        for key in CATALOG_KEYS {
            let action = catalog_action(key).unwrap();
            assert_eq!(action.key, *key);
        }
    }

    #[test]
    fn catalog_unknown_key_returns_none() {
        assert!(catalog_action("send_fax").is_none());
    }

    #[test]
    fn send_email_devis_targets_client() {
        let action = catalog_action(ACTION_SEND_EMAIL_DEVIS).unwrap();
        assert_eq!(action.action_type, ActionType::Email);
        assert_eq!(action.config["template"], "devis_envoye");
        assert_eq!(action.config["recipient"], "client");
    }

    #[test]
    fn rappel_action_delays_seven_days() {
        let action = catalog_action(ACTION_CREATE_RAPPEL_7J).unwrap();
        assert_eq!(action.action_type, ActionType::Reminder);
        assert_eq!(action.config["delaiJours"], 7);
    }

    // -- instantiate ----------------------------------------------------------

    #[test]
    fn instantiate_returns_independent_copy() {
        let mut copy = instantiate(ACTION_NOTIFY_ARTISAN).unwrap();
        copy.config["channel"] = serde_json::json!("email");
        let original = catalog_action(ACTION_NOTIFY_ARTISAN).unwrap();
        assert_eq!(original.config["channel"], "sms");
    }

    #[test]
    fn instantiate_unknown_key_is_not_found() {
        let result = instantiate("send_fax");
        assert_matches!(
            result,
            Err(CoreError::NotFound { entity: "AutoAction", .. })
        );
    }

    // -- materialize ----------------------------------------------------------

    #[test]
    fn materialize_preserves_order() {
        let actions = materialize(&[ACTION_CREATE_RAPPEL_7J, ACTION_SEND_EMAIL_DEVIS]);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].key, ACTION_CREATE_RAPPEL_7J);
        assert_eq!(actions[1].key, ACTION_SEND_EMAIL_DEVIS);
    }

    #[test]
    fn materialize_skips_unknown_keys() {
        let actions = materialize(&["send_fax", ACTION_NOTIFY_ARTISAN]);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].key, ACTION_NOTIFY_ARTISAN);
    }

    // -- Serde shape ------------------------------------------------------------

    #[test]
    fn action_serializes_with_type_tag() {
        let action = catalog_action(ACTION_SEND_EMAIL_DEVIS).unwrap();
        let value = serde_json::to_value(action).unwrap();
        assert_eq!(value["key"], "send_email_devis");
        assert_eq!(value["type"], "email");
        assert_eq!(value["config"]["recipient"], "client");
    }

    #[test]
    fn action_deserializes_from_wire_shape() {
        let action: AutoAction = serde_json::from_value(serde_json::json!({
            "key": "notify_artisan",
            "type": "notification",
            "config": {"channel": "sms", "recipient": "artisan"}
        }))
        .unwrap();
        assert_eq!(action.action_type, ActionType::Notification);
    }

    // -- Constant completeness ------------------------------------------------

    #[test]
    fn catalog_keys_complete() {
        assert_eq!(CATALOG_KEYS.len(), 5);
        assert_eq!(CATALOG.len(), CATALOG_KEYS.len());
    }
}
