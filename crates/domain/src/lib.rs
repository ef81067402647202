//! `domain` crate: passive value objects for projects and generations.
//!
//! Provides the company-profile `Project`, the `Generation` record with its
//! per-platform ad copy, and the validated input schemas used to create and
//! update them.  No persistence and no lifecycle logic lives here.

pub mod ads;
pub mod error;
pub mod input;
pub mod models;

pub use ads::{AdVariations, GoogleAdVariation, LinkedInAdVariation, MetaAdVariation, Platform};
pub use error::DomainError;
pub use input::{CreateGenerationInput, CreateProjectInput, UpdateProjectInput};
pub use models::{Generation, GenerationStatus, Project, TokenUsage};
