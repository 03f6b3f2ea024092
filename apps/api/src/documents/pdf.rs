//! Plain-text documents rendered to A4 PDFs with the built-in Helvetica fonts.
//!
//! Layout is computed first (`layout_pages`) so pagination is testable without
//! decoding PDF bytes; `render_pdf` then draws the laid-out lines.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const TOP_MM: f32 = 277.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;

const BODY_SIZE: f32 = 11.0;
const HEADING_SIZE: f32 = 12.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const HEADING_GAP_MM: f32 = 3.0;
const BLANK_LINE_MM: f32 = 3.0;

/// Characters per line at 11pt across the 170mm text column.
pub const WRAP_WIDTH: usize = 85;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y_mm: f32,
    pub bold: bool,
    pub size: f32,
}

/// Headings are all-caps lines or short `Label:` lines.
fn is_heading(line: &str) -> bool {
    let has_letters = line.chars().any(char::is_alphabetic);
    let all_caps = has_letters && !line.chars().any(char::is_lowercase);
    let label = line.chars().take(20).any(|c| c == ':') && line.chars().count() <= 40;
    all_caps || label
}

/// Greedy word wrap at `width` characters; words longer than a line stay whole.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Assigns every line a page and a baseline, starting a new page whenever the
/// cursor would cross the bottom margin.
pub fn layout_pages(text: &str) -> Vec<Vec<PlacedLine>> {
    let mut pages = vec![Vec::new()];
    let mut y = TOP_MM;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            y -= BLANK_LINE_MM;
            continue;
        }

        let bold = is_heading(line);
        let size = if bold { HEADING_SIZE } else { BODY_SIZE };
        if bold && !pages.last().is_some_and(Vec::is_empty) {
            y -= HEADING_GAP_MM;
        }

        for piece in wrap_line(&pdf_safe(line), WRAP_WIDTH) {
            if y < BOTTOM_MARGIN_MM {
                pages.push(Vec::new());
                y = TOP_MM;
            }
            if let Some(page) = pages.last_mut() {
                page.push(PlacedLine {
                    text: piece,
                    y_mm: y,
                    bold,
                    size,
                });
            }
            y -= LINE_HEIGHT_MM;
        }
    }
    pages
}

/// Maps typographic characters to ones the built-in fonts can draw.
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '•' | '▪' | '–' | '—' => out.push('-'),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '₹' => out.push_str("Rs."),
            '…' => out.push_str("..."),
            c if (c as u32) < 0x100 => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

pub fn render_pdf(title: &str, text: &str) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        pdf_safe(title),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("failed to load bold font: {e}"))?;
    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("failed to load regular font: {e}"))?;

    for (index, lines) in layout_pages(text).into_iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };
        for line in lines {
            let font = if line.bold { &font_bold } else { &font_regular };
            layer.use_text(line.text, line.size, Mm(LEFT_MARGIN_MM), Mm(line.y_mm), font);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("failed to serialize PDF: {e}"))
}

/// Keeps alphanumerics, space, `-` and `_`; falls back to `document`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}
