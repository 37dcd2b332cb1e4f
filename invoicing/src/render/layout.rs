//! Invoice page layout: A4 landscape, single column of item rows.

use super::text::{format_date, format_money, format_rate, wrap_text, FontStyle};
use super::{Align, Element, Page, RenderedDocument, Rgb, TextSpan, MARGIN, PAGE_HEIGHT, PAGE_WIDTH};
use crate::models::{non_empty, BusinessProfile, Invoice};

const PARTY_Y: f32 = 50.0;
const TABLE_Y: f32 = 85.0;
const TABLE_HEADER_HEIGHT: f32 = 8.0;
const FIRST_ROW_OFFSET: f32 = 15.0;
const LINE_HEIGHT: f32 = 4.0;
const MIN_ROW_HEIGHT: f32 = 10.0;
const ROW_GAP: f32 = 5.0;
/// Lowest point a row may reach; also the highest the totals block may start.
const SAFE_BOTTOM: f32 = PAGE_HEIGHT - 40.0;
const FOOTER_Y: f32 = PAGE_HEIGHT - 15.0;

const QTY_X: f32 = PAGE_WIDTH - MARGIN - 100.0;
const PRICE_X: f32 = PAGE_WIDTH - MARGIN - 70.0;
const AMOUNT_X: f32 = PAGE_WIDTH - MARGIN - 30.0;
const DESCRIPTION_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN - 80.0;
const ROW_TEXT_SIZE: f32 = 8.0;

struct PageBuilder {
    done: Vec<Page>,
    current: Page,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Page::default(),
        }
    }

    fn new_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        color: Rgb,
        align: Align,
    ) {
        self.current.elements.push(Element::Text(TextSpan {
            text: text.into(),
            x,
            y,
            size,
            style,
            color,
            align,
        }));
    }

    /// Regular-weight, left-aligned text.
    fn plain(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Rgb) {
        self.text(text, x, y, size, FontStyle::Regular, color, Align::Left);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgb) {
        self.current.elements.push(Element::Rect {
            x,
            y,
            width,
            height,
            fill,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb) {
        self.current.elements.push(Element::Line { from, to, color });
    }
}

/// Lay out an invoice. Never fails; PDF encoding happens separately.
pub fn render(invoice: &Invoice, profile: &BusinessProfile) -> RenderedDocument {
    let mut pages = PageBuilder::new();

    header(&mut pages, invoice, profile);
    parties(&mut pages, invoice);
    let cursor = items(&mut pages, invoice);
    totals(&mut pages, invoice, cursor);

    pages.text(
        "Thank you for your business!",
        PAGE_WIDTH / 2.0,
        FOOTER_Y,
        7.0,
        FontStyle::Regular,
        Rgb::GREY,
        Align::Center,
    );

    RenderedDocument {
        title: format!("Invoice {}", invoice.number),
        file_name: invoice.file_name(),
        share_text: format!("Invoice for {}", invoice.customer.name),
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        pages: pages.finish(),
    }
}

fn header(pages: &mut PageBuilder, invoice: &Invoice, profile: &BusinessProfile) {
    let y = MARGIN;

    pages.rect(MARGIN, y, 20.0, 20.0, Rgb::ACCENT);
    pages.rect(MARGIN + 5.0, y + 5.0, 10.0, 10.0, Rgb::WHITE);
    pages.rect(MARGIN + 7.0, y + 7.0, 6.0, 6.0, Rgb::ACCENT);

    let center = PAGE_WIDTH / 2.0;
    let centered = [
        (profile.name.clone(), 8.0, 20.0, Rgb::NAVY),
        (profile.slogan.clone(), 15.0, 10.0, Rgb::GREY),
        (profile.address.clone(), 21.0, 8.0, Rgb::BLACK),
        (format!("Phone: {}", profile.phone), 26.0, 8.0, Rgb::BLACK),
        (format!("Email: {}", profile.email), 31.0, 8.0, Rgb::BLACK),
    ];
    for (text, dy, size, color) in centered {
        pages.text(text, center, y + dy, size, FontStyle::Regular, color, Align::Center);
    }

    let right = PAGE_WIDTH - MARGIN;
    pages.text(
        format!("INVOICE: {}", invoice.number),
        right,
        y + 8.0,
        12.0,
        FontStyle::Regular,
        Rgb::BLACK,
        Align::Right,
    );
    pages.text(
        format!("DATE: {}", format_date(invoice.date)),
        right,
        y + 15.0,
        12.0,
        FontStyle::Regular,
        Rgb::BLACK,
        Align::Right,
    );
}

/// Label with an accent rule, then the given lines at fixed offsets.
/// Absent lines leave their slot empty.
fn party_block(pages: &mut PageBuilder, x: f32, label: &str, rule: f32, lines: &[Option<String>]) {
    let y = PARTY_Y;
    pages.plain(label, x, y, 10.0, Rgb::NAVY);
    pages.line((x, y + 2.0), (x + rule, y + 2.0), Rgb::ACCENT);

    for (i, line) in lines.iter().enumerate() {
        if let Some(text) = line {
            pages.plain(text.clone(), x, y + 8.0 + 5.0 * i as f32, 9.0, Rgb::BLACK);
        }
    }
}

fn labelled(label: &str, value: &Option<String>) -> Option<String> {
    non_empty(value).map(|v| format!("{}: {}", label, v))
}

fn parties(pages: &mut PageBuilder, invoice: &Invoice) {
    let customer = &invoice.customer;
    party_block(
        pages,
        MARGIN,
        "BILL TO:",
        40.0,
        &[
            Some(customer.name.clone()),
            non_empty(&customer.address).map(str::to_string),
            labelled("Phone", &customer.phone),
            labelled("Email", &customer.email),
        ],
    );

    let location = &invoice.work_location;
    party_block(
        pages,
        PAGE_WIDTH / 2.0 + 10.0,
        "WORK LOCATION:",
        50.0,
        &[
            Some(location.name.clone()),
            non_empty(&location.address).map(str::to_string),
            labelled("City", &location.city),
            labelled("State", &location.state),
            labelled("Zip", &location.zip),
        ],
    );
}

/// Draw the table header and every row; returns the cursor below the last row.
fn items(pages: &mut PageBuilder, invoice: &Invoice) -> f32 {
    pages.rect(
        MARGIN,
        TABLE_Y,
        PAGE_WIDTH - 2.0 * MARGIN,
        TABLE_HEADER_HEIGHT,
        Rgb::ACCENT,
    );
    let heading_y = TABLE_Y + 5.0;
    for (heading, x) in [
        ("DESCRIPTION", MARGIN + 5.0),
        ("QTY", QTY_X),
        ("PRICE", PRICE_X),
        ("AMOUNT", AMOUNT_X),
    ] {
        pages.plain(heading, x, heading_y, 9.0, Rgb::WHITE);
    }

    let mut y = TABLE_Y + FIRST_ROW_OFFSET;
    for (index, item) in invoice.items.iter().enumerate() {
        let lines = wrap_text(
            &item.description,
            DESCRIPTION_WIDTH,
            ROW_TEXT_SIZE,
            FontStyle::Regular,
        );
        let height = (lines.len() as f32 * LINE_HEIGHT).max(MIN_ROW_HEIGHT);

        // Rows are never split; a row that does not fit moves to a new page
        // unless the page is still empty.
        if y + height > SAFE_BOTTOM && y > MARGIN {
            pages.new_page();
            y = MARGIN;
        }

        if index % 2 == 0 {
            pages.rect(
                MARGIN,
                y - 2.0,
                PAGE_WIDTH - 2.0 * MARGIN,
                height + 2.0,
                Rgb::STRIPE,
            );
        }
        for (i, line) in lines.into_iter().enumerate() {
            pages.plain(line, MARGIN + 5.0, y + LINE_HEIGHT * i as f32, ROW_TEXT_SIZE, Rgb::BLACK);
        }
        pages.plain(item.quantity().to_string(), QTY_X, y, ROW_TEXT_SIZE, Rgb::BLACK);
        pages.plain(format_money(item.unit_price()), PRICE_X, y, ROW_TEXT_SIZE, Rgb::BLACK);
        pages.plain(format_money(item.amount()), AMOUNT_X, y, ROW_TEXT_SIZE, Rgb::BLACK);

        y += height + ROW_GAP;
    }
    y
}

/// Separator line to TOTAL baseline.
const TOTALS_HEIGHT: f32 = 22.0;

/// Draw the totals block at the cursor, but never above the safe bottom.
fn totals(pages: &mut PageBuilder, invoice: &Invoice, cursor: f32) {
    let mut y = cursor.max(SAFE_BOTTOM);
    if y + TOTALS_HEIGHT > PAGE_HEIGHT {
        pages.new_page();
        y = SAFE_BOTTOM;
    }

    pages.line(
        (PAGE_WIDTH - MARGIN - 100.0, y),
        (PAGE_WIDTH - MARGIN, y),
        Rgb::RULE,
    );

    y += 8.0;
    pages.plain("Subtotal:", PRICE_X, y, 9.0, Rgb::BLACK);
    pages.text(
        format_money(invoice.subtotal),
        AMOUNT_X,
        y,
        9.0,
        FontStyle::Regular,
        Rgb::BLACK,
        Align::Right,
    );

    y += 6.0;
    pages.plain(
        format!("Tax ({}%):", format_rate(invoice.tax_rate_percent)),
        PRICE_X,
        y,
        9.0,
        Rgb::BLACK,
    );
    pages.text(
        format_money(invoice.tax_amount),
        AMOUNT_X,
        y,
        9.0,
        FontStyle::Regular,
        Rgb::BLACK,
        Align::Right,
    );

    y += 8.0;
    pages.text("TOTAL:", PRICE_X, y, 11.0, FontStyle::Bold, Rgb::NAVY, Align::Left);
    pages.text(
        format_money(invoice.total),
        AMOUNT_X,
        y,
        11.0,
        FontStyle::Bold,
        Rgb::NAVY,
        Align::Right,
    );
}
