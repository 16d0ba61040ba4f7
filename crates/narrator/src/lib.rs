//! Narrator: template-based argument and narrative text.
//!
//! The simulation engine treats prose as pure flavor. This crate supplies the
//! default [`ArgumentGenerator`](debate_events::ArgumentGenerator): it fills
//! TOML-configurable templates from the structured context the engine hands it.
//!
//! # Modules
//!
//! - [`templates`]: Template catalogue, TOML loading and the built-in defaults
//! - [`narrator`]: Template selection and placeholder filling

pub mod narrator;
pub mod templates;

pub use narrator::TemplateNarrator;
pub use templates::{default_templates, default_templates_toml, ArgumentTemplates, TemplateError};
