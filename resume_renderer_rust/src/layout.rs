//! Resume layout engine
//!
//! Turns a `ResumeDocumentInput` into a `DocumentLayout`: per page, an
//! ordered list of drawing operations with final positions. Nothing here
//! touches PDF objects, so the whole layout is inspectable in tests and the
//! writer in `renderer` only has to replay it.
//!
//! Coordinates are millimetres from the top-left corner; text `y` is the
//! baseline. All cursors live in a `RenderContext` owned by one call.

use log::debug;

use crate::config::RendererConfig;
use crate::contact::contact_lines;
use crate::font_metrics::StandardFont;
use crate::model::ResumeDocumentInput;
use crate::text_layout::LineBreaker;
use crate::types::{Color, PageSize, Rect};

const BULLET: &str = "\u{2022} ";

/// Logical section a drawing operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Header,
    Contact,
    Skills,
    Languages,
    Certifications,
    Summary,
    Education,
    Experience,
    Footer,
}

/// What a piece of text is, independent of where it sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Name,
    /// Title inside a sidebar band
    BandTitle,
    /// Main column heading
    Heading,
    ContactLine,
    /// First line of a bulleted item
    Bullet,
    /// Wrapped follow-up line of a bulleted item
    Continuation,
    Body,
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
    pub role: TextRole,
    pub section: Section,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    /// Horizontal rule at `y`
    Rule {
        x1: f64,
        x2: f64,
        y: f64,
        width: f64,
        color: Color,
    },
    Text(TextRun),
    /// Placement of the circular avatar image
    Avatar { rect: Rect },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

/// Laid-out document, one entry per page
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub page_size: PageSize,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.ops.iter()).filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Whether a heading or band title was emitted for `section`
    pub fn has_heading(&self, section: Section) -> bool {
        self.texts().any(|t| {
            t.section == section && matches!(t.role, TextRole::Heading | TextRole::BandTitle)
        })
    }

    /// First lines of bulleted items in `section`
    pub fn bullets(&self, section: Section) -> Vec<&TextRun> {
        self.texts()
            .filter(|t| t.section == section && t.role == TextRole::Bullet)
            .collect()
    }

    pub fn has_avatar(&self) -> bool {
        self.pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .any(|op| matches!(op, DrawOp::Avatar { .. }))
    }
}

/// Per-call layout state
struct RenderContext<'a> {
    config: &'a RendererConfig,
    pages: Vec<PageLayout>,
    /// Sidebar cursor (page 1 only)
    side_y: f64,
    /// Main column cursor on the last page
    main_y: f64,
    /// Set once sidebar content stops fitting on page 1
    side_clipped: bool,
}

impl<'a> RenderContext<'a> {
    fn new(config: &'a RendererConfig) -> Self {
        let mut ctx = Self {
            config,
            pages: Vec::new(),
            side_y: 0.0,
            main_y: config.header_height + config.content_gap,
            side_clipped: false,
        };
        ctx.start_page();
        ctx
    }

    /// Open a page with the page and sidebar backgrounds painted
    fn start_page(&mut self) {
        let c = self.config;
        let mut page = PageLayout::default();
        page.ops.push(DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, c.page.width, c.page.height),
            color: c.page_background,
        });
        page.ops.push(DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, c.sidebar_width, c.page.height),
            color: c.sidebar_background,
        });
        self.pages.push(page);
    }

    fn first_page(&mut self) -> &mut PageLayout {
        &mut self.pages[0]
    }

    fn last_page(&mut self) -> &mut PageLayout {
        let idx = self.pages.len() - 1;
        &mut self.pages[idx]
    }

    fn main_limit(&self) -> f64 {
        self.config.page.height - self.config.bottom_margin
    }

    /// Continue the main column on a new page if `needed` mm do not fit
    fn reserve_main(&mut self, needed: f64) {
        if self.main_y + needed > self.main_limit() {
            debug!(
                "Main column overflow at y={:.1}mm, starting page {}",
                self.main_y,
                self.pages.len() + 1
            );
            self.start_page();
            self.main_y = self.config.continuation_top;
        }
    }

    /// Whether a sidebar baseline at `y` stays above the bottom margin
    ///
    /// The sidebar never continues onto later pages; anything below the
    /// limit is dropped.
    fn side_fits(&mut self, y: f64) -> bool {
        if y <= self.main_limit() {
            return true;
        }
        if !self.side_clipped {
            debug!("Sidebar overflow at y={:.1}mm, clipping remaining content", y);
            self.side_clipped = true;
        }
        false
    }

    fn push_side(&mut self, op: DrawOp) {
        self.first_page().ops.push(op);
    }

    fn push_main(&mut self, op: DrawOp) {
        self.last_page().ops.push(op);
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &self,
        x: f64,
        y: f64,
        text: String,
        font: StandardFont,
        size: f64,
        color: Color,
        role: TextRole,
        section: Section,
    ) -> DrawOp {
        DrawOp::Text(TextRun {
            x,
            y,
            text,
            font,
            size,
            color,
            role,
            section,
        })
    }

    // ===== Sidebar =====

    fn layout_header(&mut self, input: &ResumeDocumentInput, has_avatar: bool) {
        let c = self.config;
        let avatar_x = c.sidebar_width / 2.0 - c.avatar_size / 2.0;
        let avatar_y = (c.header_height - c.avatar_size) / 2.0;

        if has_avatar {
            self.push_side(DrawOp::Avatar {
                rect: Rect::new(avatar_x, avatar_y, c.avatar_size, c.avatar_size),
            });
        }

        let name_line_height = c.contact_line_height + 1.0;
        let breaker = LineBreaker::new(
            c.sidebar_text_width(),
            StandardFont::HelveticaBold,
            c.name_font_size,
        );
        let mut y = avatar_y + c.avatar_size + 4.0;
        let mut extra = 0.0;
        for (i, line) in breaker.break_text(&input.identity.full_name()).into_iter().enumerate() {
            let x = c.sidebar_width / 2.0 - breaker.measure(&line) / 2.0;
            let op = self.text(
                x,
                y,
                line,
                StandardFont::HelveticaBold,
                c.name_font_size,
                c.text_color,
                TextRole::Name,
                Section::Header,
            );
            self.push_side(op);
            if i > 0 {
                extra += name_line_height;
            }
            y += name_line_height;
        }

        self.side_y = avatar_y + c.avatar_size + 8.0 + extra;
    }

    /// Contact band; always drawn, even with no rows
    fn layout_contact(&mut self, input: &ResumeDocumentInput) {
        let c = self.config;
        let breaker = LineBreaker::new(
            c.sidebar_text_width(),
            StandardFont::Helvetica,
            c.sidebar_body_font_size,
        );
        let mut rows: Vec<String> = contact_lines(&input.identity)
            .iter()
            .flat_map(|line| breaker.break_text(line))
            .collect();

        let first_row_y = self.side_y + c.section_band_height;
        let fitting = (0..rows.len())
            .take_while(|&i| first_row_y + i as f64 * c.contact_line_height <= self.main_limit())
            .count();
        if fitting < rows.len() {
            self.side_fits(first_row_y + fitting as f64 * c.contact_line_height);
            rows.truncate(fitting);
        }

        let band_height = c.section_band_height + rows.len() as f64 * c.contact_line_height + 4.0;
        self.push_side(DrawOp::FillRect {
            rect: Rect::new(0.0, self.side_y - 2.0, c.sidebar_width, band_height),
            color: c.band_color,
        });
        let title = self.text(
            c.sidebar_padding,
            self.side_y + 4.0,
            "Contact".to_string(),
            StandardFont::HelveticaBold,
            c.sidebar_title_font_size,
            c.band_text_color,
            TextRole::BandTitle,
            Section::Contact,
        );
        self.push_side(title);
        self.side_y += c.section_band_height;

        for row in rows {
            let op = self.text(
                c.sidebar_padding,
                self.side_y,
                row,
                StandardFont::Helvetica,
                c.sidebar_body_font_size,
                c.band_text_color,
                TextRole::ContactLine,
                Section::Contact,
            );
            self.push_side(op);
            self.side_y += c.contact_line_height;
        }
        self.side_y += c.section_band_height;
    }

    /// Banded sidebar list; skipped entirely when `items` is empty
    fn layout_sidebar_section(&mut self, title: &str, section: Section, items: &[String]) {
        if items.is_empty() {
            return;
        }
        debug!("Sidebar section {:?}: {} items", section, items.len());
        let c = self.config;
        // the band is only drawn if its first bullet fits below it
        if !self.side_fits(self.side_y + c.section_band_height + 4.0) {
            return;
        }

        self.push_side(DrawOp::FillRect {
            rect: Rect::new(0.0, self.side_y - 2.0, c.sidebar_width, c.section_band_height),
            color: c.band_color,
        });
        let op = self.text(
            c.sidebar_padding,
            self.side_y + 4.0,
            title.to_string(),
            StandardFont::HelveticaBold,
            c.sidebar_title_font_size,
            c.band_text_color,
            TextRole::BandTitle,
            section,
        );
        self.push_side(op);
        self.side_y += c.section_band_height + 4.0;

        for item in items {
            let lines = bullet_lines(
                item,
                c.sidebar_text_width(),
                StandardFont::Helvetica,
                c.sidebar_body_font_size,
            );
            for (offset, line, role) in lines {
                if !self.side_fits(self.side_y) {
                    return;
                }
                let op = self.text(
                    c.sidebar_padding + offset,
                    self.side_y,
                    line,
                    StandardFont::Helvetica,
                    c.sidebar_body_font_size,
                    c.text_color,
                    role,
                    section,
                );
                self.push_side(op);
                self.side_y += c.sidebar_line_height;
            }
        }
        self.side_y += c.sidebar_section_gap;
    }

    // ===== Main column =====

    fn layout_heading(&mut self, title: &str, section: Section) {
        let c = self.config;
        // keep the heading together with its first line
        self.reserve_main(c.heading_gap + c.body_line_height);
        let op = self.text(
            c.content_x(),
            self.main_y,
            title.to_string(),
            StandardFont::HelveticaBold,
            c.heading_font_size,
            c.text_color,
            TextRole::Heading,
            section,
        );
        self.push_main(op);
        self.push_main(DrawOp::Rule {
            x1: c.content_x(),
            x2: c.content_x() + c.content_width(),
            y: self.main_y + 2.0,
            width: 0.4,
            color: c.accent_color,
        });
        self.main_y += c.heading_gap;
    }

    fn layout_main_line(&mut self, x: f64, line: String, role: TextRole, section: Section) {
        let c = self.config;
        self.reserve_main(0.0);
        let op = self.text(
            x,
            self.main_y,
            line,
            StandardFont::Helvetica,
            c.body_font_size,
            c.text_color,
            role,
            section,
        );
        self.push_main(op);
        self.main_y += c.body_line_height;
    }

    fn layout_main_bullet(&mut self, text: &str, section: Section) {
        let c = self.config;
        let lines =
            bullet_lines(text, c.content_width(), StandardFont::Helvetica, c.body_font_size);
        for (offset, line, role) in lines {
            self.layout_main_line(c.content_x() + offset, line, role, section);
        }
    }

    fn layout_summary(&mut self, input: &ResumeDocumentInput) {
        let bio = input.identity.bio.as_deref().unwrap_or("");
        if bio.trim().is_empty() {
            return;
        }
        let c = self.config;
        self.layout_heading("Professional Summary", Section::Summary);
        let breaker =
            LineBreaker::new(c.content_width(), StandardFont::Helvetica, c.body_font_size);
        for line in breaker.break_text(bio) {
            self.layout_main_line(c.content_x(), line, TextRole::Body, Section::Summary);
        }
        self.main_y += c.section_gap;
    }

    fn layout_education(&mut self, input: &ResumeDocumentInput) {
        if input.education.is_empty() {
            return;
        }
        debug!("Education: {} entries", input.education.len());
        self.layout_heading("Education", Section::Education);
        for edu in &input.education {
            let text = format!(
                "{} @ {}",
                edu.degree.as_deref().unwrap_or(""),
                edu.institution.as_deref().unwrap_or("")
            );
            self.layout_main_bullet(&text, Section::Education);
        }
        self.main_y += self.config.section_gap;
    }

    fn layout_experience(&mut self, input: &ResumeDocumentInput) {
        if input.experience.is_empty() {
            return;
        }
        debug!("Experience: {} entries", input.experience.len());
        let c = self.config;
        self.layout_heading("Experience", Section::Experience);
        let indent = c.description_indent;
        let breaker = LineBreaker::new(
            c.content_width() - indent,
            StandardFont::Helvetica,
            c.body_font_size,
        );

        for exp in &input.experience {
            let text = format!(
                "{} at {}",
                exp.position.as_deref().unwrap_or(""),
                exp.company.as_deref().unwrap_or("")
            );
            self.layout_main_bullet(&text, Section::Experience);
            for line in breaker.break_text(exp.description.as_deref().unwrap_or("")) {
                let x = c.content_x() + indent;
                self.layout_main_line(x, line, TextRole::Body, Section::Experience);
            }
        }
    }

    fn layout_footer(&mut self) {
        let c = self.config;
        if c.footer_text.is_empty() {
            return;
        }
        let op = self.text(
            c.footer_x,
            c.page.height - c.footer_offset,
            c.footer_text.clone(),
            StandardFont::Helvetica,
            c.footer_font_size,
            c.footer_color,
            TextRole::Footer,
            Section::Footer,
        );
        self.push_main(op);
    }

    fn finish(self) -> DocumentLayout {
        DocumentLayout {
            page_size: self.config.page,
            pages: self.pages,
        }
    }
}

/// Wrap `text` as a bullet with a hanging indent
///
/// Returns `(x offset, line, role)`; the first line carries the bullet glyph
/// and continuation lines align with the text after it.
fn bullet_lines(
    text: &str,
    width: f64,
    font: StandardFont,
    size: f64,
) -> Vec<(f64, String, TextRole)> {
    let probe = LineBreaker::new(width, font, size);
    let indent = probe.measure(BULLET);
    let breaker = LineBreaker::new(width - indent, font, size);

    let mut lines = breaker.break_text(text);
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                (0.0, format!("{}{}", BULLET, line), TextRole::Bullet)
            } else {
                (indent, line, TextRole::Continuation)
            }
        })
        .collect()
}

/// Lay out the full document
///
/// `has_avatar` only adds the avatar placement; every other operation is
/// identical with or without it.
pub fn layout_document(
    input: &ResumeDocumentInput,
    config: &RendererConfig,
    has_avatar: bool,
) -> DocumentLayout {
    let mut ctx = RenderContext::new(config);

    ctx.layout_header(input, has_avatar);
    ctx.layout_contact(input);
    ctx.layout_sidebar_section("Skills", Section::Skills, &input.skills);
    let languages: Vec<String> = input.languages.iter().map(|l| l.display_text()).collect();
    ctx.layout_sidebar_section("Languages", Section::Languages, &languages);
    ctx.layout_sidebar_section("Certifications", Section::Certifications, &input.certifications);

    ctx.layout_summary(input);
    ctx.layout_education(input);
    ctx.layout_experience(input);
    ctx.layout_footer();

    ctx.finish()
}
