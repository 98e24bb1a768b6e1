//! Pure domain logic for the intervention workflow engine.
//!
//! Status vocabulary, the authorized transition whitelist, business
//! validation rules, the auto-action catalog, and the editable workflow
//! configuration the visual editor manipulates. No database or HTTP
//! dependencies; callers persist configurations and execute the declared
//! auto-actions.

pub mod actions;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod rules;
pub mod status;
pub mod transition;
pub mod types;
