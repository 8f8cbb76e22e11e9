//! Two-column PDF resume renderer for QuirkHire
//!
//! Takes a user's profile and resume records, normalizes their loosely typed
//! list fields, lays the document out on A4 (sidebar with avatar, contact and
//! short lists; main column with summary, education and experience) and
//! serializes it with pdf-writer. The result is returned as bytes for preview
//! or written as `{first}_{last}_Resume.pdf` for download.

mod canvas;
mod geometry;
mod json_helpers;
mod unicode_utils;

pub mod avatar;
pub mod config;
pub mod contact;
pub mod error;
pub mod font_metrics;
pub mod image_utils;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod renderer;
pub mod text_layout;
pub mod types;

pub use avatar::{AvatarLoader, DefaultAvatarLoader};
pub use config::RendererConfig;
pub use error::{RendererError, RendererResult};
pub use image_utils::AvatarImage;
pub use layout::{DocumentLayout, DrawOp, Section, TextRole, TextRun};
pub use model::{
    EducationEntry, ExperienceEntry, Identity, LanguageEntry, ProfileRecord, ResumeDocumentInput,
    ResumeRecord,
};
pub use renderer::{download_file_name, DocumentArtifact, RenderMode, ResumeRenderer};
