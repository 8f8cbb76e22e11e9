//! Input records and the typed render snapshot
//!
//! `ProfileRecord` and `ResumeRecord` mirror the rows the caller fetched from
//! the external store. `ResumeDocumentInput` is the typed snapshot the layout
//! engine consumes; it is built once per render and then dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{
    normalize_education, normalize_experience, normalize_languages, normalize_strings, FieldSource,
};

/// Profile row as stored by the external profile store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Avatar reference: object-storage URL, `data:` URI or local path
    pub profile_picture: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub bio: Option<String>,
}

/// Resume row as stored by the external resume store
///
/// List columns are kept as raw JSON because they arrive as arrays, as
/// JSON-encoded text, or as free-form comma separated text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub skills: Value,
    pub languages: Value,
    pub certifications: Value,
    pub education: Value,
    pub experience: Value,
}

/// Identity and contact block of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub bio: Option<String>,
}

impl Identity {
    /// `"{first} {last}"`, trimmed so a missing half leaves no stray space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub fluency: Option<String>,
}

impl LanguageEntry {
    /// Sidebar bullet text: `name - fluency`, or just `name`
    pub fn display_text(&self) -> String {
        match &self.fluency {
            Some(fluency) => format!("{} - {}", self.name, fluency),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub position: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

/// Everything the renderer draws, already normalized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeDocumentInput {
    pub identity: Identity,
    pub skills: Vec<String>,
    pub languages: Vec<LanguageEntry>,
    pub certifications: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
}

impl ResumeDocumentInput {
    /// Assemble a render snapshot from the two fetched records
    pub fn from_records(profile: &ProfileRecord, resume: &ResumeRecord) -> Self {
        let text = |field: &Option<String>| {
            field
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            identity: Identity {
                first_name: text(&profile.first_name).unwrap_or_default(),
                last_name: text(&profile.last_name).unwrap_or_default(),
                avatar_url: text(&profile.profile_picture),
                email: text(&profile.email),
                phone: text(&profile.phone),
                website: text(&profile.website),
                linkedin_url: text(&profile.linkedin),
                github_url: text(&profile.github),
                bio: text(&profile.bio),
            },
            skills: normalize_strings(FieldSource::from_value(&resume.skills)),
            languages: normalize_languages(FieldSource::from_value(&resume.languages)),
            certifications: normalize_strings(FieldSource::from_value(&resume.certifications)),
            education: normalize_education(FieldSource::from_value(&resume.education)),
            experience: normalize_experience(FieldSource::from_value(&resume.experience)),
        }
    }

    /// Base name for the downloaded file: `{first}_{last}`
    pub fn file_base_name(&self) -> String {
        format!("{}_{}", self.identity.first_name, self.identity.last_name)
    }
}
