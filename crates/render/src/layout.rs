//! Invoice content as a flat list of blocks, top to bottom.
//!
//! Layout decides *what* is printed and in which order; [`crate::pdf`] decides
//! where on the page it lands.

use rust_decimal::Decimal;

use gstinvoice_core::format_money;
use gstinvoice_core::money::round_money;
use gstinvoice_invoicing::{ComputedInvoice, ComputedLineItem, TaxType};
use gstinvoice_parties::{AddressDetails, AddressKind};

use crate::options::RenderOptions;

/// Vertical gap between sections (0.2 inch).
pub const SECTION_GAP: f32 = 14.4;

/// Size of the embedded signature, in points.
pub const SIGNATURE_SIZE: (f32, f32) = (100.0, 50.0);

/// Item table header, in column order.
pub const TABLE_HEADERS: [&str; 9] = [
    "Sl. No",
    "Description",
    "Unit Price",
    "Qty",
    "Net Amount",
    "Tax Rate",
    "Tax Type",
    "Tax Amount",
    "Total Amount",
];

/// Printed under TOTAL when the rounded row totals do not add up to it.
pub const ROUNDING_NOTE: &str =
    "Line totals are rounded individually; TOTAL is rounded once from the exact sum.";

/// Relative column widths; scaled to the content width at draw time.
pub const TABLE_COLUMN_WEIGHTS: [f32; 9] = [30.0, 150.0, 50.0, 28.0, 55.0, 40.0, 50.0, 62.0, 75.0];

/// One printable element.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Large bold title.
    Title(String),
    /// Regular paragraph; wraps at the content width.
    Text(String),
    /// Bold paragraph.
    Bold(String),
    /// Bold label followed by regular text on the same line.
    Field { label: String, value: String },
    /// Vertical whitespace, in points.
    Spacer(f32),
    /// Gridded table with a header row.
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// The signature image, drawn at the given size.
    Signature { width: f32, height: f32 },
}

impl Block {
    fn text(value: impl Into<String>) -> Self {
        Block::Text(value.into())
    }

    fn bold(value: impl Into<String>) -> Self {
        Block::Bold(value.into())
    }

    fn field(label: &str, value: impl Into<String>) -> Self {
        Block::Field {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Ordered blocks of one invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayout {
    blocks: Vec<Block>,
}

impl InvoiceLayout {
    pub fn build(invoice: &ComputedInvoice, options: &RenderOptions) -> Self {
        let sections = [
            vec![Block::Title(options.brand.clone())],
            seller_section(invoice),
            address_section(invoice.billing(), AddressKind::Billing),
            address_section(invoice.shipping(), AddressKind::Shipping),
            order_section(invoice),
            invoice_section(invoice),
            vec![item_table(invoice)],
            total_section(invoice),
            vec![Block::field("Amount in Words:", invoice.amount_in_words())],
            vec![Block::bold(format!(
                "Whether tax is payable under reverse charge - {}",
                invoice.reverse_charge()
            ))],
            signature_section(invoice),
        ];

        let mut blocks = Vec::new();
        for (index, section) in sections.into_iter().enumerate() {
            if index > 0 {
                blocks.push(Block::Spacer(SECTION_GAP));
            }
            blocks.extend(section);
        }
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Rows of the item table, if present.
    pub fn table_rows(&self) -> Option<&[Vec<String>]> {
        self.blocks.iter().find_map(|block| match block {
            Block::Table { rows, .. } => Some(rows.as_slice()),
            _ => None,
        })
    }
}

fn seller_section(invoice: &ComputedInvoice) -> Vec<Block> {
    let seller = invoice.seller();
    vec![
        Block::bold("Sold By:"),
        Block::text(&seller.name),
        Block::text(&seller.address),
        Block::text(seller.city_line()),
        Block::text(format!("PAN No: {}", seller.pan_no)),
        Block::text(format!("GST Registration No: {}", seller.gst_registration_no)),
    ]
}

fn address_section(address: &AddressDetails, kind: AddressKind) -> Vec<Block> {
    vec![
        Block::bold(kind.heading()),
        Block::text(&address.name),
        Block::text(&address.address),
        Block::text(address.city_line()),
        Block::text(format!("State/UT Code: {}", address.state_ut_code)),
    ]
}

fn order_section(invoice: &ComputedInvoice) -> Vec<Block> {
    let order = invoice.order();
    vec![
        Block::field("Order Number:", &order.order_no),
        Block::field("Order Date:", order.order_date_display()),
    ]
}

fn invoice_section(invoice: &ComputedInvoice) -> Vec<Block> {
    let details = invoice.invoice();
    vec![
        Block::field("Invoice Number:", &details.invoice_no),
        Block::field("Invoice Details:", &details.invoice_details),
        Block::field("Invoice Date:", details.invoice_date_display()),
    ]
}

fn item_table(invoice: &ComputedInvoice) -> Block {
    Block::Table {
        headers: TABLE_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: invoice
            .rows()
            .map(|(position, item)| item_row(position, item))
            .collect(),
    }
}

/// Cells of one item row. Amounts are shown rounded to paise.
pub fn item_row(position: usize, item: &ComputedLineItem) -> Vec<String> {
    let rate = percent(item.tax_rate());
    let (tax_rate, tax_type, tax_amount) = match item.tax_type() {
        TaxType::CgstSgst if item.sgst_in_total() => (
            format!("{rate} + {rate}"),
            "CGST + SGST".to_string(),
            format!(
                "{} + {}",
                format_money(item.tax_amount()),
                format_money(item.tax_amount_sgst())
            ),
        ),
        tax_type => (
            rate,
            tax_type.label().to_string(),
            format_money(item.tax_amount()),
        ),
    };

    vec![
        position.to_string(),
        item.description().to_string(),
        format_money(item.unit_price()),
        item.quantity().to_string(),
        format_money(item.net_amount()),
        tax_rate,
        tax_type,
        tax_amount,
        format_money(item.total_amount()),
    ]
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn total_section(invoice: &ComputedInvoice) -> Vec<Block> {
    let mut blocks = vec![Block::bold(format!("TOTAL: {}", invoice.grand_total_display()))];
    if rows_disagree_with_total(invoice) {
        blocks.push(Block::text(ROUNDING_NOTE));
    }
    blocks
}

/// Whether the printed row totals sum to something other than the printed
/// TOTAL. A row sum that overflows counts as disagreeing.
fn rows_disagree_with_total(invoice: &ComputedInvoice) -> bool {
    let printed_rows = invoice
        .items()
        .iter()
        .map(|item| round_money(item.total_amount()))
        .try_fold(Decimal::ZERO, Decimal::checked_add);
    printed_rows != Some(round_money(invoice.grand_total()))
}

fn signature_section(invoice: &ComputedInvoice) -> Vec<Block> {
    let (width, height) = SIGNATURE_SIZE;
    vec![
        Block::bold(format!("For {}:", invoice.seller().name)),
        Block::Spacer(SECTION_GAP),
        Block::Signature { width, height },
        Block::Spacer(SECTION_GAP),
        Block::bold("Authorized Signatory"),
    ]
}
