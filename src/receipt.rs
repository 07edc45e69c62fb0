//! # Receipt Templates
//!
//! A coupon-style receipt laid out in fixed columns and rendered to a
//! single-page PDF sized to an 80mm roll. The page height follows the
//! content, so the preview looks like the printed strip.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              PADARIA ESTRELA             │
//! │------------------------------------------│
//! │             CUPOM NAO FISCAL             │
//! │2x Pao de queijo                     9.00 │
//! │1x Cafe coado                        4.50 │
//! │------------------------------------------│
//! │TOTAL                               13.50 │
//! └──────────────────────────────────────────┘
//! ```

use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use serde::{Deserialize, Serialize};

use crate::error::CupomError;
use crate::printer::PageSize;

/// Roll width in PDF points (just under 80mm)
const PAGE_WIDTH_PT: i64 = 226;

/// Courier at 8pt is 4.8pt per character
const FONT_SIZE_PT: i64 = 8;

/// Baseline to baseline distance
const LEADING_PT: i64 = 10;

/// Left text inset (4mm)
const MARGIN_X_PT: i64 = 11;

/// Space above the first and below the last line
const MARGIN_Y_PT: i64 = 14;

/// Characters per line at 8pt Courier inside 72mm
pub const DEFAULT_COLUMNS: usize = 42;

/// Narrowest layout that still fits an amount next to a description
pub const MIN_COLUMNS: usize = 16;

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_quantity() -> u32 {
    1
}

/// One purchased item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Unit price in cents
    pub unit_cents: i64,
}

impl LineItem {
    pub fn new(description: &str, quantity: u32, unit_cents: i64) -> Self {
        Self {
            description: description.to_string(),
            quantity,
            unit_cents,
        }
    }

    pub fn total_cents(&self) -> Result<i64, CupomError> {
        self.unit_cents
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| {
                CupomError::Receipt(format!("amount overflows for {:?}", self.description))
            })
    }
}

/// A printable coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Store name and address lines, centered
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Closing lines, centered
    #[serde(default)]
    pub footer: Vec<String>,
    /// Issue time as printed; current local time when absent
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl Default for Receipt {
    fn default() -> Self {
        Self {
            header: Vec::new(),
            title: None,
            items: Vec::new(),
            footer: Vec::new(),
            issued_at: None,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl Receipt {
    /// Sample coupon used by the preview command.
    pub fn demo() -> Self {
        Self {
            header: vec![
                "PADARIA ESTRELA".to_string(),
                "Rua das Flores, 123 - Centro".to_string(),
                "CNPJ 00.000.000/0001-00".to_string(),
            ],
            title: Some("CUPOM NAO FISCAL".to_string()),
            items: vec![
                LineItem::new("Pão de queijo", 2, 450),
                LineItem::new("Café coado", 1, 450),
                LineItem::new("Bolo de fubá (fatia)", 1, 700),
                LineItem::new("Suco de laranja 300ml", 1, 850),
            ],
            footer: vec![
                "Obrigado pela preferencia!".to_string(),
                "Volte sempre".to_string(),
            ],
            issued_at: None,
            columns: DEFAULT_COLUMNS,
        }
    }

    pub fn total_cents(&self) -> Result<i64, CupomError> {
        self.items.iter().try_fold(0i64, |sum, item| {
            sum.checked_add(item.total_cents()?)
                .ok_or_else(|| CupomError::Receipt("total overflows".to_string()))
        })
    }

    /// Lay the receipt out as fixed-width text lines.
    ///
    /// `columns` must lie in `MIN_COLUMNS..=DEFAULT_COLUMNS`; the page is a
    /// fixed 80mm wide and wider layouts would run off it.
    pub fn lines(&self) -> Result<Vec<String>, CupomError> {
        let cols = self.columns;
        if !(MIN_COLUMNS..=DEFAULT_COLUMNS).contains(&cols) {
            return Err(CupomError::Receipt(format!(
                "columns must be between {} and {}, got {}",
                MIN_COLUMNS, DEFAULT_COLUMNS, cols
            )));
        }
        let divider = "-".repeat(cols);
        let mut lines = Vec::new();

        for line in &self.header {
            lines.push(center(line, cols));
        }
        lines.push(divider.clone());

        if let Some(title) = &self.title {
            lines.push(center(title, cols));
        }
        let issued_at = self
            .issued_at
            .clone()
            .unwrap_or_else(|| Local::now().format("%d/%m/%Y %H:%M:%S").to_string());
        lines.push(center(&issued_at, cols));
        lines.push(divider.clone());

        for item in &self.items {
            let left = format!("{}x {}", item.quantity, item.description);
            lines.push(spread(&left, &format_cents(item.total_cents()?), cols));
        }

        lines.push(divider);
        lines.push(spread("TOTAL", &format_cents(self.total_cents()?), cols));

        if !self.footer.is_empty() {
            lines.push(String::new());
            for line in &self.footer {
                lines.push(center(line, cols));
            }
        }

        Ok(lines)
    }

    /// Physical size of the PDF page produced by [`Receipt::to_pdf`].
    pub fn page_size(&self) -> Result<PageSize, CupomError> {
        let (width, height) = page_points(self.lines()?.len());
        Ok(PageSize::from_points(width as f32, height as f32))
    }

    /// Render as a single-page PDF.
    pub fn to_pdf(&self) -> Result<Vec<u8>, CupomError> {
        let lines = self.lines()?;
        let (width, height) = page_points(lines.len());

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let first_baseline = height - MARGIN_Y_PT - FONT_SIZE_PT;
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(FONT_SIZE_PT)]),
            Operation::new("TL", vec![Object::Integer(LEADING_PT)]),
            Operation::new(
                "Td",
                vec![Object::Integer(MARGIN_X_PT), Object::Integer(first_baseline)],
            ),
        ];
        for line in &lines {
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(line), StringFormat::Literal)],
            ));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn page_points(line_count: usize) -> (i64, i64) {
    let height = 2 * MARGIN_Y_PT + line_count as i64 * LEADING_PT;
    (PAGE_WIDTH_PT, height)
}

/// Format cents as `1234.56`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

fn truncate(text: &str, cols: usize) -> String {
    text.chars().take(cols).collect()
}

fn center(text: &str, cols: usize) -> String {
    let text = truncate(text.trim(), cols);
    let pad = (cols - text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Left text and right-aligned amount on one line; the left side is cut
/// short when both do not fit.
fn spread(left: &str, right: &str, cols: usize) -> String {
    let right = truncate(right, cols);
    let room = cols.saturating_sub(right.chars().count() + 1);
    let left = truncate(left, room);
    let gap = cols - left.chars().count() - right.chars().count();
    format!("{}{}{}", left, " ".repeat(gap), right)
}

/// Encode text for a WinAnsi font. Latin-1 maps 1:1, anything else is `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
