//! Resume document renderer
//!
//! ## Data Flow
//!
//! ```text
//! ResumeDocumentInput → (avatar load) → layout_document → DocumentLayout → PDF bytes
//! ```
//!
//! The avatar fetch is the only async step and is time-boxed. Layout is pure
//! and produces positioned drawing operations; this module replays them onto
//! one `PdfCanvas` per page and assembles the PDF object graph. Object ids
//! are allocated in a fixed order so identical input yields identical bytes.

use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use pdf_writer::{Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, TextStr};

use crate::avatar::{load_avatar, AvatarLoader, DefaultAvatarLoader};
use crate::canvas::PdfCanvas;
use crate::config::RendererConfig;
use crate::error::{RendererError, RendererResult};
use crate::font_metrics::StandardFont;
use crate::geometry::{mm_to_pt, PageSpace};
use crate::image_utils::{add_avatar_to_pdf, flate_compress, AvatarImage, AVATAR_RESOURCE};
use crate::layout::{layout_document, DocumentLayout, DrawOp, PageLayout};
use crate::model::ResumeDocumentInput;

const FONTS: [StandardFont; 2] = [StandardFont::Helvetica, StandardFont::HelveticaBold];

/// How the rendered document is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// In-memory bytes for display
    Preview,
    /// Written to the download directory
    Download,
}

/// Result of one render
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentArtifact {
    Preview { bytes: Vec<u8> },
    Download { path: PathBuf, bytes: Vec<u8> },
}

impl DocumentArtifact {
    pub fn bytes(&self) -> &[u8] {
        match self {
            DocumentArtifact::Preview { bytes } => bytes,
            DocumentArtifact::Download { bytes, .. } => bytes,
        }
    }

    /// `data:application/pdf;base64,...` for embedding in a viewer
    pub fn data_uri(&self) -> String {
        format!("data:application/pdf;base64,{}", STANDARD.encode(self.bytes()))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            DocumentArtifact::Preview { .. } => None,
            DocumentArtifact::Download { path, .. } => Some(path),
        }
    }
}

/// `{base}_Resume.pdf` with path separators replaced
pub fn download_file_name(file_base_name: &str) -> String {
    let base: String = file_base_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    if base.trim_matches('_').is_empty() {
        return "Resume.pdf".to_string();
    }
    format!("{}_Resume.pdf", base)
}

/// Renders resume inputs into PDF documents
///
/// Holds only immutable configuration and the avatar loader, so one instance
/// can serve concurrent renders.
#[derive(Clone)]
pub struct ResumeRenderer {
    config: RendererConfig,
    loader: Arc<dyn AvatarLoader>,
}

impl ResumeRenderer {
    pub fn new(config: RendererConfig) -> RendererResult<Self> {
        Self::with_loader(config, Arc::new(DefaultAvatarLoader::new()))
    }

    pub fn with_loader(
        config: RendererConfig,
        loader: Arc<dyn AvatarLoader>,
    ) -> RendererResult<Self> {
        config.validate()?;
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Load the avatar, lay out and serialize the document, then deliver it
    pub async fn render(
        &self,
        input: &ResumeDocumentInput,
        mode: RenderMode,
        file_base_name: &str,
    ) -> RendererResult<DocumentArtifact> {
        let avatar = match input.identity.avatar_url.as_deref() {
            Some(reference) => {
                load_avatar(
                    self.loader.as_ref(),
                    reference,
                    self.config.avatar_timeout(),
                    self.config.avatar_pixels,
                )
                .await
            }
            None => None,
        };

        let bytes = self.render_pdf(input, avatar.as_ref())?;

        match mode {
            RenderMode::Preview => Ok(DocumentArtifact::Preview { bytes }),
            RenderMode::Download => {
                let dir = self.config.resolve_download_dir();
                tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                    RendererError::IoError(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create download directory {}: {}", dir.display(), e),
                    ))
                })?;
                let path = dir.join(download_file_name(file_base_name));
                tokio::fs::write(&path, &bytes).await.map_err(|e| {
                    RendererError::IoError(std::io::Error::new(
                        e.kind(),
                        format!("Failed to write PDF to {}: {}", path.display(), e),
                    ))
                })?;
                info!("PDF saved to: {}", path.display());
                Ok(DocumentArtifact::Download { path, bytes })
            }
        }
    }

    /// Pure layout step
    pub fn layout(
        &self,
        input: &ResumeDocumentInput,
        avatar: Option<&AvatarImage>,
    ) -> DocumentLayout {
        layout_document(input, &self.config, avatar.is_some())
    }

    /// Layout and serialization without the avatar fetch
    pub fn render_pdf(
        &self,
        input: &ResumeDocumentInput,
        avatar: Option<&AvatarImage>,
    ) -> RendererResult<Vec<u8>> {
        let layout = self.layout(input, avatar);
        let bytes = PdfAssembler::new(&self.config).assemble(input, &layout, avatar)?;
        info!(
            "PDF generated: {} bytes ({:.2} MB), {} page(s)",
            bytes.len(),
            bytes.len() as f64 / 1_048_576.0,
            layout.page_count()
        );
        Ok(bytes)
    }
}

/// Builds the PDF object graph for one laid-out document
struct PdfAssembler<'a> {
    config: &'a RendererConfig,
    pdf: Pdf,
    next_ref_id: i32,
}

impl<'a> PdfAssembler<'a> {
    fn new(config: &'a RendererConfig) -> Self {
        Self {
            config,
            pdf: Pdf::new(),
            next_ref_id: 1,
        }
    }

    fn next_ref(&mut self) -> Ref {
        let r = Ref::new(self.next_ref_id);
        self.next_ref_id += 1;
        r
    }

    fn assemble(
        mut self,
        input: &ResumeDocumentInput,
        layout: &DocumentLayout,
        avatar: Option<&AvatarImage>,
    ) -> RendererResult<Vec<u8>> {
        if layout.pages.is_empty() {
            return Err(RendererError::InvalidLayout("layout produced no pages".to_string()));
        }

        let catalog_id = self.next_ref();
        let page_tree_id = self.next_ref();
        let font_ids: Vec<(StandardFont, Ref)> =
            FONTS.iter().map(|&f| (f, self.next_ref())).collect();
        let info_id = self.next_ref();

        self.pdf.catalog(catalog_id).pages(page_tree_id);
        for (font, id) in &font_ids {
            self.pdf
                .type1_font(*id)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
        self.write_info(info_id, input);

        let avatar_id = match avatar {
            Some(avatar) if layout.has_avatar() => {
                let image_id = self.next_ref();
                let smask_id = self.next_ref();
                add_avatar_to_pdf(&mut self.pdf, avatar, image_id, smask_id)?;
                Some(image_id)
            }
            _ => None,
        };

        let space = PageSpace::new(layout.page_size.height);
        let media_box = PdfRect::new(
            0.0,
            0.0,
            mm_to_pt(layout.page_size.width) as f32,
            mm_to_pt(layout.page_size.height) as f32,
        );

        let mut page_ids = Vec::with_capacity(layout.pages.len());
        for (index, page_layout) in layout.pages.iter().enumerate() {
            let page_id = self.next_ref();
            let content_id = self.next_ref();
            page_ids.push(page_id);

            let uses_avatar = page_layout.ops.iter().any(|op| matches!(op, DrawOp::Avatar { .. }));
            let content = draw_page(page_layout, &space);
            debug!(
                "Page {}: {} ops, {} content bytes",
                index + 1,
                page_layout.ops.len(),
                content.len()
            );
            self.write_content(content_id, &content)?;

            let mut page = self.pdf.page(page_id);
            page.media_box(media_box);
            page.parent(page_tree_id);
            page.contents(content_id);
            {
                let mut resources = page.resources();
                {
                    let mut fonts = resources.fonts();
                    for (font, id) in &font_ids {
                        fonts.pair(Name(font.resource_name()), *id);
                    }
                }
                if let (true, Some(image_id)) = (uses_avatar, avatar_id) {
                    resources.x_objects().pair(AVATAR_RESOURCE, image_id);
                }
            }
            page.finish();
        }

        self.pdf
            .pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        Ok(self.pdf.finish())
    }

    fn write_info(&mut self, info_id: Ref, input: &ResumeDocumentInput) {
        let full_name = input.identity.full_name();
        let title = if full_name.is_empty() {
            self.config.document_subject.clone()
        } else {
            format!("{} - {}", full_name, self.config.document_subject)
        };

        let mut info = self.pdf.document_info(info_id);
        info.title(TextStr(&title));
        if !full_name.is_empty() {
            info.author(TextStr(&full_name));
        }
        info.subject(TextStr(&self.config.document_subject));
        info.keywords(TextStr(&self.config.document_keywords));
        info.creator(TextStr(&self.config.document_creator));
    }

    fn write_content(&mut self, content_id: Ref, content: &[u8]) -> RendererResult<()> {
        if self.config.compress {
            let compressed = flate_compress(content)
                .map_err(|e| {
                    RendererError::PdfError(format!("content compression failed: {}", e))
                })?;
            self.pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);
        } else {
            self.pdf.stream(content_id, content);
        }
        Ok(())
    }
}

/// Replay one page's drawing operations onto a fresh canvas
fn draw_page(page: &PageLayout, space: &PageSpace) -> Vec<u8> {
    let mut canvas = PdfCanvas::new();
    for op in &page.ops {
        match op {
            DrawOp::FillRect { rect, color } => {
                let (x, y, w, h) = space.rect(rect);
                canvas.set_fill_color(*color);
                canvas.fill_rect(x, y, w, h);
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                width,
                color,
            } => {
                let (start_x, start_y) = space.point(*x1, *y);
                let (end_x, end_y) = space.point(*x2, *y);
                canvas.save_state();
                canvas.set_stroke_color(*color);
                canvas.set_line_width(mm_to_pt(*width));
                canvas.line(start_x, start_y, end_x, end_y);
                canvas.restore_state();
            }
            DrawOp::Text(run) => {
                if run.text.is_empty() {
                    continue;
                }
                let (x, y) = space.point(run.x, run.y);
                canvas.set_fill_color(run.color);
                canvas.set_font(Name(run.font.resource_name()), run.size);
                canvas.draw_string(x, y, &run.text);
            }
            DrawOp::Avatar { rect } => {
                let (x, y, w, h) = space.rect(rect);
                canvas.draw_image(AVATAR_RESOURCE, x, y, w, h);
            }
        }
    }
    canvas.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExperienceEntry, Identity};

    fn uncompressed() -> ResumeRenderer {
        let config = RendererConfig {
            compress: false,
            ..Default::default()
        };
        ResumeRenderer::new(config).unwrap()
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("Jane_Doe"), "Jane_Doe_Resume.pdf");
        assert_eq!(download_file_name("../x/y"), ".._x_y_Resume.pdf");
        assert_eq!(download_file_name(""), "Resume.pdf");
        assert_eq!(download_file_name("_"), "Resume.pdf");
    }

    #[test]
    fn test_blank_document_is_valid_pdf() {
        let bytes = uncompressed().render_pdf(&ResumeDocumentInput::default(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/MediaBox"));
        assert!(text.contains("/Helvetica"));
        assert!(text.contains("/WinAnsiEncoding"));
        assert!(!text.contains("/XObject"));
    }

    #[test]
    fn test_document_info() {
        let input = ResumeDocumentInput {
            identity: Identity {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let bytes = uncompressed().render_pdf(&input, None).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Jane Doe - Resume)"));
        assert!(text.contains("/Creator (QuirkHire)"));
        assert!(text.contains("(resume, cv, job application)"));
    }

    #[test]
    fn test_text_reaches_content_stream() {
        let input = ResumeDocumentInput {
            experience: vec![ExperienceEntry {
                position: Some("Engineer".to_string()),
                company: Some("Acme".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let bytes = uncompressed().render_pdf(&input, None).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        // bullet lines carry a non-ASCII glyph and are hex-encoded
        assert!(text.contains("(Contact) Tj"));
        assert!(text.contains("(Experience) Tj"));
        assert!(!text.contains("(Education) Tj"));
    }

    #[test]
    fn test_avatar_registered_as_xobject() {
        let avatar = AvatarImage {
            size: 2,
            rgba: vec![255; 16],
        };
        let bytes = uncompressed()
            .render_pdf(&ResumeDocumentInput::default(), Some(&avatar))
            .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Im1"));
        assert!(text.contains("/SMask"));
    }

    #[test]
    fn test_compressed_output_is_deterministic() {
        let renderer = ResumeRenderer::new(RendererConfig::default()).unwrap();
        let input = ResumeDocumentInput {
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let a = renderer.render_pdf(&input, None).unwrap();
        let b = renderer.render_pdf(&input, None).unwrap();
        assert_eq!(a, b);
        assert!(String::from_utf8_lossy(&a).contains("/FlateDecode"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RendererConfig {
            sidebar_width: 500.0,
            ..Default::default()
        };
        assert!(ResumeRenderer::new(config).is_err());
    }

    #[test]
    fn test_data_uri_prefix() {
        let artifact = DocumentArtifact::Preview {
            bytes: b"%PDF-1.7".to_vec(),
        };
        assert_eq!(artifact.data_uri(), "data:application/pdf;base64,JVBERi0xLjc=");
        assert!(artifact.path().is_none());
    }
}
