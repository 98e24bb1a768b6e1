//! Business validation rules for status transitions (PRD-12).
//!
//! Rules are declared in evaluation order and never short-circuit: the
//! engine runs every applicable rule and aggregates the failures, so the
//! UI can show all problems at once. Each rule is a pure predicate over
//! the intervention context.

use std::sync::LazyLock;

use crate::context::InterventionContext;
use crate::status::{
    STATUS_ACCEPTE, STATUS_ANNULE, STATUS_DEVIS_ENVOYE, STATUS_EN_COURS, STATUS_TERMINE,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Rule names, unique across the set.
pub const RULE_INTERVENTION_ID_REQUIRED: &str = "INTERVENTION_ID_REQUIRED";
pub const RULE_DEVIS_ENVOYE_TO_ACCEPTE: &str = "DEVIS_ENVOYE_TO_ACCEPTE";
pub const RULE_MOTIF_ANNULATION_REQUIRED: &str = "MOTIF_ANNULATION_REQUIRED";

/// Statuses that may only be entered with a definitive intervention id.
const DEFINITIVE_ID_TARGETS: &[&str] = &[
    STATUS_DEVIS_ENVOYE,
    STATUS_ACCEPTE,
    STATUS_EN_COURS,
    STATUS_TERMINE,
];

static PLACEHOLDER_ID_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^AUTO-").expect("valid regex"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which transitions a rule applies to.
#[derive(Debug, Clone, Copy)]
pub enum RuleScope {
    /// A single (from, to) pair.
    FromTo {
        from: &'static str,
        to: &'static str,
    },
    /// Any transition entering the named status.
    Target(&'static str),
    /// Any transition entering one of the listed statuses.
    TargetIn(&'static [&'static str]),
}

impl RuleScope {
    /// Whether the rule applies to a move from `from` to `to`.
    pub fn applies(&self, from: &str, to: &str) -> bool {
        match self {
            Self::FromTo { from: f, to: t } => *f == from && *t == to,
            Self::Target(t) => *t == to,
            Self::TargetIn(targets) => targets.contains(&to),
        }
    }
}

/// A named business rule with a pure predicate.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    pub name: &'static str,
    pub scope: RuleScope,
    /// User-facing message reported when the predicate fails.
    pub message: &'static str,
    /// Blocking failures go to `failed_conditions`; others to `warnings`.
    pub block_transition: bool,
    /// Returns true when the context satisfies the rule.
    pub check: fn(&InterventionContext) -> bool,
}

// ---------------------------------------------------------------------------
// Rule set
// ---------------------------------------------------------------------------

/// Built-in rules, in evaluation order.
pub const VALIDATION_RULES: &[ValidationRule] = &[
    ValidationRule {
        name: RULE_INTERVENTION_ID_REQUIRED,
        scope: RuleScope::TargetIn(DEFINITIVE_ID_TARGETS),
        message: "Un identifiant d'intervention définitif est requis \
                  (les numéros provisoires AUTO- ne sont pas acceptés)",
        block_transition: true,
        check: has_definitive_intervention_id,
    },
    ValidationRule {
        name: RULE_DEVIS_ENVOYE_TO_ACCEPTE,
        scope: RuleScope::FromTo {
            from: STATUS_DEVIS_ENVOYE,
            to: STATUS_ACCEPTE,
        },
        message: "Un numéro de devis valide est requis pour accepter le devis",
        block_transition: true,
        check: has_devis_reference,
    },
    ValidationRule {
        name: RULE_MOTIF_ANNULATION_REQUIRED,
        scope: RuleScope::Target(STATUS_ANNULE),
        message: "Un motif d'annulation doit être renseigné dans le commentaire",
        block_transition: true,
        check: has_motif_annulation,
    },
];

/// Rules applying to a move from `from` to `to`, in evaluation order.
pub fn applicable_rules<'a>(
    from: &'a str,
    to: &'a str,
) -> impl Iterator<Item = &'static ValidationRule> + 'a {
    VALIDATION_RULES
        .iter()
        .filter(move |rule| rule.scope.applies(from, to))
}

/// Whether `value` carries a provisional intake id (`AUTO-` prefix).
pub fn is_placeholder_intervention_id(value: &str) -> bool {
    PLACEHOLDER_ID_RE.is_match(value.trim())
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Definitive id: non-blank and not an `AUTO-` placeholder.
fn has_definitive_intervention_id(ctx: &InterventionContext) -> bool {
    match ctx.id_intervention.as_deref() {
        Some(id) if !id.trim().is_empty() => !is_placeholder_intervention_id(id),
        _ => false,
    }
}

fn has_devis_reference(ctx: &InterventionContext) -> bool {
    !blank(&ctx.devis_id)
}

fn has_motif_annulation(ctx: &InterventionContext) -> bool {
    !blank(&ctx.commentaire)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
