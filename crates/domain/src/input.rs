//! Validated create/update schemas.
//!
//! Every request that creates or changes a record is deserialised into one
//! of these structs and checked with [`validator::Validate`] before it is
//! turned into a model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::ads::Platform;
use crate::models::{Generation, Project};
use crate::DomainError;

fn default_variations_per_platform() -> u32 {
    3
}

/// Request body for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 200))]
    pub industry: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 2000))]
    pub target_audience: Option<String>,
    #[validate(length(max = 2000))]
    pub value_proposition: Option<String>,
    #[validate(length(max = 500))]
    pub brand_voice: Option<String>,
}

impl CreateProjectInput {
    /// Validate and build the project.
    pub fn into_project(self) -> Result<Project, DomainError> {
        self.validate()?;
        Ok(Project::from_input(self))
    }
}

/// Request body for a partial project update.  Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 200))]
    pub industry: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 2000))]
    pub target_audience: Option<String>,
    #[validate(length(max = 2000))]
    pub value_proposition: Option<String>,
    #[validate(length(max = 500))]
    pub brand_voice: Option<String>,
}

impl UpdateProjectInput {
    /// Validate and apply to `project`.
    pub fn apply_to(self, project: &mut Project) -> Result<(), DomainError> {
        self.validate()?;
        project.apply(self);
        Ok(())
    }
}

/// Request body for starting a generation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGenerationInput {
    pub project_id: Uuid,
    #[validate(length(min = 1))]
    pub platforms: Vec<Platform>,
    #[serde(default = "default_variations_per_platform")]
    #[validate(range(min = 1, max = 10))]
    pub variations_per_platform: u32,
}

impl CreateGenerationInput {
    /// Validate and build a pending generation.
    pub fn into_generation(self) -> Result<Generation, DomainError> {
        self.validate()?;
        Ok(Generation::pending(self.project_id, self.platforms))
    }
}
