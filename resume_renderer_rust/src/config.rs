//! Renderer configuration
//!
//! Every layout constant lives here so a deployment can restyle the resume
//! without code changes. Units are millimetres for geometry and points for
//! font sizes. Missing keys in a JSON config fall back to the defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RendererError, RendererResult};
use crate::types::{Color, PageSize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub page: PageSize,
    pub sidebar_width: f64,
    pub header_height: f64,
    /// Gap between the sidebar / header and the main column
    pub content_gap: f64,
    /// Right margin of the main column
    pub content_right_margin: f64,
    /// Main column stops here and continues on a new page
    pub bottom_margin: f64,
    /// Main column start on continuation pages
    pub continuation_top: f64,
    /// Left padding of sidebar text (also used on the right for wrapping)
    pub sidebar_padding: f64,

    pub avatar_size: f64,
    /// Edge length of the cropped avatar bitmap
    pub avatar_pixels: u32,
    pub avatar_timeout_ms: u64,

    pub name_font_size: f64,
    pub sidebar_title_font_size: f64,
    pub sidebar_body_font_size: f64,
    pub heading_font_size: f64,
    pub body_font_size: f64,
    pub footer_font_size: f64,

    pub sidebar_line_height: f64,
    pub contact_line_height: f64,
    pub body_line_height: f64,
    pub section_band_height: f64,
    pub sidebar_section_gap: f64,
    pub heading_gap: f64,
    pub section_gap: f64,
    pub description_indent: f64,

    pub page_background: Color,
    pub sidebar_background: Color,
    pub band_color: Color,
    pub accent_color: Color,
    pub text_color: Color,
    pub band_text_color: Color,
    pub footer_color: Color,

    pub footer_text: String,
    pub footer_x: f64,
    /// Distance of the footer baseline from the bottom edge
    pub footer_offset: f64,

    pub document_creator: String,
    pub document_subject: String,
    pub document_keywords: String,
    /// Flate-compress page content streams
    pub compress: bool,

    /// Where Download mode writes; see `resolve_download_dir`
    pub download_dir: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            page: PageSize::a4(),
            sidebar_width: 60.0,
            header_height: 30.0,
            content_gap: 8.0,
            content_right_margin: 14.0,
            bottom_margin: 20.0,
            continuation_top: 15.0,
            sidebar_padding: 5.0,

            avatar_size: 25.0,
            avatar_pixels: 200,
            avatar_timeout_ms: 3000,

            name_font_size: 16.0,
            sidebar_title_font_size: 12.0,
            sidebar_body_font_size: 10.0,
            heading_font_size: 16.0,
            body_font_size: 11.0,
            footer_font_size: 10.0,

            sidebar_line_height: 5.0,
            contact_line_height: 6.0,
            body_line_height: 6.0,
            section_band_height: 8.0,
            sidebar_section_gap: 12.0,
            heading_gap: 8.0,
            section_gap: 6.0,
            description_indent: 4.0,

            page_background: Color::white(),
            sidebar_background: Color::rgb8(245, 245, 245),
            band_color: Color::rgb8(43, 45, 66),
            accent_color: Color::rgb8(125, 86, 227),
            text_color: Color::black(),
            band_text_color: Color::white(),
            footer_color: Color::rgb8(100, 100, 100),

            footer_text: "Generated by QuirkHire".to_string(),
            footer_x: 14.0,
            footer_offset: 10.0,

            document_creator: "QuirkHire".to_string(),
            document_subject: "Resume".to_string(),
            document_keywords: "resume, cv, job application".to_string(),
            compress: true,

            download_dir: None,
        }
    }
}

impl RendererConfig {
    pub fn from_json_str(json: &str) -> RendererResult<Self> {
        let config: RendererConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RendererResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reject geometry the layout engine cannot place text in
    pub fn validate(&self) -> RendererResult<()> {
        if self.page.width <= 0.0 || self.page.height <= 0.0 {
            return Err(RendererError::Config("page size must be positive".to_string()));
        }
        if self.sidebar_width + self.content_gap + self.content_right_margin >= self.page.width {
            return Err(RendererError::Config(
                "sidebar and margins leave no room for the main column".to_string(),
            ));
        }
        if self.sidebar_width <= 2.0 * self.sidebar_padding {
            return Err(RendererError::Config(
                "sidebar padding leaves no room for sidebar text".to_string(),
            ));
        }
        if self.avatar_pixels == 0 {
            return Err(RendererError::Config("avatar_pixels must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn avatar_timeout(&self) -> Duration {
        Duration::from_millis(self.avatar_timeout_ms)
    }

    /// X of the main column
    pub fn content_x(&self) -> f64 {
        self.sidebar_width + self.content_gap
    }

    /// Width of the main column
    pub fn content_width(&self) -> f64 {
        self.page.width - self.content_x() - self.content_right_margin
    }

    /// Width available to sidebar text
    pub fn sidebar_text_width(&self) -> f64 {
        self.sidebar_width - 2.0 * self.sidebar_padding
    }

    /// Configured directory, else `$HOME/Downloads` if present, else the working directory
    pub fn resolve_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join("Downloads"))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = RendererConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.content_x(), 68.0);
        assert_eq!(config.content_width(), 128.0);
        assert_eq!(config.sidebar_text_width(), 50.0);
        assert_eq!(config.avatar_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RendererConfig::from_json_str(
            r##"{"footer_text": "Made with care", "band_color": "#000000", "unknown": 1}"##,
        )
        .unwrap();
        assert_eq!(config.footer_text, "Made with care");
        assert_eq!(config.band_color, Color::black());
        assert_eq!(config.sidebar_width, 60.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = RendererConfig::from_json_str(r#"{"sidebar_width": 200.0}"#).unwrap_err();
        assert!(matches!(err, RendererError::Config(_)));

        let err = RendererConfig::from_json_str(r#"{"band_color": "blue"}"#).unwrap_err();
        assert!(matches!(err, RendererError::JsonError(_)));

        let config = RendererConfig {
            page: PageSize::new(0.0, 297.0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RendererError::Config(_))));
    }

    #[test]
    fn test_custom_page_size_geometry() {
        let config = RendererConfig {
            page: PageSize::new(216.0, 279.0),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.content_width(), 216.0 - 68.0 - 14.0);
    }

    #[test]
    fn test_explicit_download_dir_wins() {
        let config = RendererConfig {
            download_dir: Some(PathBuf::from("/tmp/resumes")),
            ..Default::default()
        };
        assert_eq!(config.resolve_download_dir(), PathBuf::from("/tmp/resumes"));
    }
}
