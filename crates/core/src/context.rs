//! Intervention snapshot handed to the workflow engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Point-in-time view of an intervention record.
///
/// The engine never mutates interventions; callers build a context from the
/// stored record plus any pending form input, then ask the engine whether a
/// move is possible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterventionContext {
    /// Business identifier, definitive once it loses its `AUTO-` prefix.
    pub id_intervention: Option<String>,
    pub artisan_id: Option<String>,
    pub facture_id: Option<String>,
    pub proprietaire_id: Option<String>,
    pub devis_id: Option<String>,
    pub commentaire: Option<String>,
    /// Fields the core does not model; transition conditions may still
    /// reference them by name.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl InterventionContext {
    /// Look up a field by wire name; typed fields first, then extras.
    pub fn field_value(&self, field: &str) -> Option<Value> {
        let known = match field {
            "idIntervention" => &self.id_intervention,
            "artisanId" => &self.artisan_id,
            "factureId" => &self.facture_id,
            "proprietaireId" => &self.proprietaire_id,
            "devisId" => &self.devis_id,
            "commentaire" => &self.commentaire,
            _ => return self.extra.get(field).cloned(),
        };
        known.as_ref().map(|s| Value::String(s.clone()))
    }

    /// Presence check used by requirement flags and `field_required` guards.
    ///
    /// A field is present when set, non-null, and non-empty if a string.
    /// Whitespace-only strings count as present; the blank-value business
    /// rules reject those separately.
    pub fn has_field(&self, field: &str) -> bool {
        match self.field_value(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context_with_extra(key: &str, value: Value) -> InterventionContext {
        let mut ctx = InterventionContext::default();
        ctx.extra.insert(key.to_string(), value);
        ctx
    }

    // -- field_value ------------------------------------------------------------

    #[test]
    fn typed_fields_resolve_by_wire_name() {
        let ctx = InterventionContext {
            artisan_id: Some("ART-42".to_string()),
            ..Default::default()
        };
        assert_eq!(ctx.field_value("artisanId"), Some(json!("ART-42")));
        assert_eq!(ctx.field_value("factureId"), None);
    }

    #[test]
    fn extra_fields_resolve_by_name() {
        let ctx = context_with_extra("zoneIntervention", json!("75011"));
        assert_eq!(ctx.field_value("zoneIntervention"), Some(json!("75011")));
    }

    // -- has_field ----------------------------------------------------------------

    #[test]
    fn absent_field_is_not_present() {
        let ctx = InterventionContext::default();
        assert!(!ctx.has_field("devisId"));
        assert!(!ctx.has_field("zoneIntervention"));
    }

    #[test]
    fn null_extra_is_not_present() {
        let ctx = context_with_extra("zoneIntervention", Value::Null);
        assert!(!ctx.has_field("zoneIntervention"));
    }

    #[test]
    fn empty_string_is_not_present() {
        let ctx = InterventionContext {
            devis_id: Some(String::new()),
            ..Default::default()
        };
        assert!(!ctx.has_field("devisId"));
    }

    #[test]
    fn whitespace_string_counts_as_present() {
        let ctx = InterventionContext {
            devis_id: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(ctx.has_field("devisId"));
    }

    #[test]
    fn false_and_zero_count_as_present() {
        let ctx = context_with_extra("urgence", json!(false));
        assert!(ctx.has_field("urgence"));
        let ctx = context_with_extra("nbPassages", json!(0));
        assert!(ctx.has_field("nbPassages"));
    }

    // -- Serde shape ------------------------------------------------------------

    #[test]
    fn deserializes_partial_camel_case_payload() {
        let ctx: InterventionContext = serde_json::from_value(json!({
            "idIntervention": "INT-2024-001",
            "devisId": "Q-123",
            "zoneIntervention": "75011"
        }))
        .unwrap();
        assert_eq!(ctx.id_intervention.as_deref(), Some("INT-2024-001"));
        assert_eq!(ctx.devis_id.as_deref(), Some("Q-123"));
        assert!(ctx.artisan_id.is_none());
        assert_eq!(ctx.extra["zoneIntervention"], json!("75011"));
    }
}
