//! PDF encoding with printpdf's built-in Helvetica faces.

use super::{Element, FontStyle, RenderedDocument, Rgb};
use crate::error::InvoicingError;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
};
use std::io::BufWriter;
use tracing::debug;

fn render_error(e: impl std::fmt::Display) -> InvoicingError {
    InvoicingError::Render(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

/// Layout y runs down from the top edge; PDF y runs up from the bottom.
fn draw(layer: &PdfLayerReference, element: &Element, fonts: &Fonts, height: f32) {
    match element {
        Element::Text(span) => {
            layer.set_fill_color(color(span.color));
            layer.use_text(
                span.text.as_str(),
                span.size,
                Mm(span.left()),
                Mm(height - span.y),
                fonts.get(span.style),
            );
        }
        Element::Rect {
            x,
            y,
            width,
            height: h,
            fill,
        } => {
            layer.set_fill_color(color(*fill));
            layer.add_rect(Rect::new(
                Mm(*x),
                Mm(height - (y + h)),
                Mm(x + width),
                Mm(height - y),
            ));
        }
        Element::Line { from, to, color: c } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(0.5);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(from.0), Mm(height - from.1)), false),
                    (Point::new(Mm(to.0), Mm(height - to.1)), false),
                ],
                is_closed: false,
            });
        }
    }
}

pub(super) fn write_pdf(document: &RenderedDocument) -> Result<Vec<u8>, InvoicingError> {
    let (width, height) = (document.width, document.height);
    let (doc, first_page, first_layer) =
        PdfDocument::new(document.title.as_str(), Mm(width), Mm(height), "Layer 1");

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?,
    };

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(width), Mm(height), format!("Page {}", index + 1));
            doc.get_page(page_index).get_layer(layer_index)
        };
        for element in &page.elements {
            draw(&layer, element, &fonts, height);
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(render_error)?;
    let bytes = writer.into_inner().map_err(render_error)?;
    debug!(
        pages = document.pages.len(),
        bytes = bytes.len(),
        "Encoded PDF"
    );
    Ok(bytes)
}
