//! Per-platform ad copy shapes.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Google responsive search ads reject headlines longer than this.
pub const GOOGLE_HEADLINE_MAX: usize = 30;
/// Google responsive search ads reject descriptions longer than this.
pub const GOOGLE_DESCRIPTION_MAX: usize = 90;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// Advertising platform an ad variation is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Linkedin,
    Google,
    Meta,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linkedin => write!(f, "linkedin"),
            Self::Google => write!(f, "google"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linkedin" => Ok(Self::Linkedin),
            "google" => Ok(Self::Google),
            "meta" => Ok(Self::Meta),
            other => Err(DomainError::UnknownPlatform(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Variations
// ---------------------------------------------------------------------------

/// A sponsored-content ad for LinkedIn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInAdVariation {
    pub introductory_text: String,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub call_to_action: String,
}

/// A responsive search ad for Google.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleAdVariation {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path2: Option<String>,
}

impl GoogleAdVariation {
    /// Check every headline and description against the platform's length limits.
    ///
    /// Lengths are counted in characters, not bytes.
    pub fn validate_limits(&self) -> Result<(), DomainError> {
        check_lengths("headline", &self.headlines, GOOGLE_HEADLINE_MAX)?;
        check_lengths("description", &self.descriptions, GOOGLE_DESCRIPTION_MAX)
    }
}

fn check_lengths(field: &'static str, items: &[String], limit: usize) -> Result<(), DomainError> {
    for (index, item) in items.iter().enumerate() {
        let len = item.chars().count();
        if len > limit {
            return Err(DomainError::AdLimit { field, index, len, limit });
        }
    }
    Ok(())
}

/// A feed ad for Meta (Facebook / Instagram).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAdVariation {
    pub primary_text: String,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub call_to_action: String,
}

/// All ad copy produced by one generation, grouped by platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdVariations {
    #[serde(default)]
    pub linkedin: Vec<LinkedInAdVariation>,
    #[serde(default)]
    pub google: Vec<GoogleAdVariation>,
    #[serde(default)]
    pub meta: Vec<MetaAdVariation>,
}

impl AdVariations {
    /// Number of variations written for `platform`.
    pub fn count(&self, platform: Platform) -> usize {
        match platform {
            Platform::Linkedin => self.linkedin.len(),
            Platform::Google => self.google.len(),
            Platform::Meta => self.meta.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.linkedin.len() + self.google.len() + self.meta.len()
    }
}
