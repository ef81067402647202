//! Project and generation records.
//!
//! These are *value* objects: they carry field data and a few
//! constructors, nothing more.  Create/update requests go through the
//! validated schemas in [`crate::input`].

use std::ops::{Add, AddAssign};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ads::{AdVariations, Platform};
use crate::input::{CreateProjectInput, UpdateProjectInput};
use crate::DomainError;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A company profile that ad copy is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub company_name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub target_audience: Option<String>,
    pub value_proposition: Option<String>,
    pub brand_voice: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a new project from an already-validated create request.
    pub fn from_input(input: CreateProjectInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            company_name: input.company_name,
            website: input.website,
            industry: input.industry,
            description: input.description,
            target_audience: input.target_audience,
            value_proposition: input.value_proposition,
            brand_voice: input.brand_voice,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields present in `update` and bump `updated_at`.
    pub fn apply(&mut self, update: UpdateProjectInput) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        if update.website.is_some() {
            self.website = update.website;
        }
        if update.industry.is_some() {
            self.industry = update.industry;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.target_audience.is_some() {
            self.target_audience = update.target_audience;
        }
        if update.value_proposition.is_some() {
            self.value_proposition = update.value_proposition;
        }
        if update.brand_voice.is_some() {
            self.brand_voice = update.brand_voice;
        }
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Possible statuses for a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending    => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed  => write!(f, "completed"),
            Self::Failed     => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for GenerationStatus {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending"    => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed"  => Ok(Self::Completed),
            "failed"     => Ok(Self::Failed),
            other        => Err(DomainError::UnknownStatus(other.to_owned())),
        }
    }
}

/// LLM token counters for one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl Add for TokenUsage {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// One ad-copy generation run for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: GenerationStatus,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub variations: AdVariations,
    #[serde(default)]
    pub token_usage: TokenUsage,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Generation {
    /// A fresh generation with no copy written yet.
    pub fn pending(project_id: Uuid, platforms: Vec<Platform>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            status: GenerationStatus::Pending,
            platforms,
            variations: AdVariations::default(),
            token_usage: TokenUsage::default(),
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateProjectInput {
        CreateProjectInput {
            name: "Spring launch".into(),
            company_name: "Acme".into(),
            website: Some("https://acme.example".into()),
            industry: Some("Logistics".into()),
            description: None,
            target_audience: None,
            value_proposition: None,
            brand_voice: None,
        }
    }

    #[test]
    fn generation_status_round_trips_through_strings() {
        for status in [
            GenerationStatus::Pending,
            GenerationStatus::Processing,
            GenerationStatus::Completed,
            GenerationStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<GenerationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_generation_status_is_rejected() {
        assert!(matches!(
            "archived".parse::<GenerationStatus>(),
            Err(DomainError::UnknownStatus(s)) if s == "archived"
        ));
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!GenerationStatus::Pending.is_terminal());
        assert!(!GenerationStatus::Processing.is_terminal());
        assert!(GenerationStatus::Completed.is_terminal());
        assert!(GenerationStatus::Failed.is_terminal());
    }

    #[test]
    fn token_usage_sums() {
        let mut usage = TokenUsage { input_tokens: 100, output_tokens: 40 };
        usage += TokenUsage { input_tokens: 10, output_tokens: 5 };
        assert_eq!(usage, TokenUsage { input_tokens: 110, output_tokens: 45 });
        assert_eq!(usage.total(), 155);
    }

    #[test]
    fn project_update_only_touches_supplied_fields() {
        let mut project = Project::from_input(create_input());
        let created_at = project.created_at;

        project.apply(UpdateProjectInput {
            company_name: Some("Acme Corp".into()),
            ..Default::default()
        });

        assert_eq!(project.company_name, "Acme Corp");
        assert_eq!(project.name, "Spring launch");
        assert_eq!(project.website.as_deref(), Some("https://acme.example"));
        assert!(project.updated_at >= created_at);
    }

    #[test]
    fn pending_generation_is_empty() {
        let project_id = Uuid::new_v4();
        let generation = Generation::pending(project_id, vec![Platform::Google]);
        assert_eq!(generation.project_id, project_id);
        assert_eq!(generation.status, GenerationStatus::Pending);
        assert_eq!(generation.variations.total(), 0);
        assert_eq!(generation.token_usage.total(), 0);
        assert!(generation.completed_at.is_none());
    }

    #[test]
    fn generation_deserialises_without_copy_or_usage() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "project_id": Uuid::new_v4(),
            "status": "processing",
            "platforms": ["linkedin", "meta"],
            "error": null,
            "created_at": "2024-05-01T12:00:00Z",
            "completed_at": null
        });
        let generation: Generation = serde_json::from_value(json).unwrap();
        assert_eq!(generation.status, GenerationStatus::Processing);
        assert_eq!(generation.platforms, vec![Platform::Linkedin, Platform::Meta]);
        assert_eq!(generation.token_usage, TokenUsage::default());
    }
}
