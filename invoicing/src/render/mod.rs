//! Invoice documents: page layout and PDF output.
//!
//! Layout coordinates are millimetres with the origin at the top-left corner
//! of the page and `y` growing downward. Text positions are baselines.

mod layout;
mod pdf;
pub mod text;

pub use layout::render;
pub use text::FontStyle;

use crate::error::InvoicingError;

pub const PAGE_WIDTH: f32 = 297.0;
pub const PAGE_HEIGHT: f32 = 210.0;
pub const MARGIN: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const NAVY: Rgb = Rgb(0, 0, 128);
    pub const ACCENT: Rgb = Rgb(0, 122, 204);
    pub const GREY: Rgb = Rgb(100, 100, 100);
    pub const RULE: Rgb = Rgb(200, 200, 200);
    pub const STRIPE: Rgb = Rgb(245, 245, 245);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A run of text anchored at `x` according to `align`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
    pub color: Rgb,
    pub align: Align,
}

impl TextSpan {
    /// Left edge of the rendered text.
    pub fn left(&self) -> f32 {
        let width = text::text_width(&self.text, self.size, self.style);
        match self.align {
            Align::Left => self.x,
            Align::Center => self.x - width / 2.0,
            Align::Right => self.x - width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextSpan),
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextSpan> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(span) => Some(span),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|span| span.text == needle)
    }
}

/// A laid-out invoice plus the metadata needed to save or share it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub title: String,
    pub file_name: String,
    pub share_text: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

/// Payload handed to a platform share facility. Callers without one save
/// `bytes` under `file_name` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub file_name: String,
    pub mime_type: &'static str,
    pub title: String,
    pub text: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    /// Index of the first page holding a text span equal to `needle`.
    pub fn page_of(&self, needle: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.contains_text(needle))
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>, InvoicingError> {
        pdf::write_pdf(self)
    }

    pub fn share_request(&self) -> Result<ShareRequest, InvoicingError> {
        Ok(ShareRequest {
            file_name: self.file_name.clone(),
            mime_type: "application/pdf",
            title: self.title.clone(),
            text: self.share_text.clone(),
            bytes: self.to_pdf()?,
        })
    }
}
