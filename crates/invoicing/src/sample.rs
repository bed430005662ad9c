//! Built-in sample order: two shirts and their shipping charges, sold and
//! delivered within Bengaluru.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gstinvoice_parties::{AddressDetails, SellerDetails};

use crate::document::{DEFAULT_SIGNATURE_PATH, InvoiceDocument};
use crate::invoice::{Invoice, InvoiceDetails, OrderDetails, SignatureSource};
use crate::line_item::LineItem;

const BUYER_ADDRESS: &str = "Eurofins IT Solutions India Pvt Ltd,, 1st Floor, Maruti Platinum, \
                             Lakshminarayana Pura, AECS Layou";

fn buyer_address() -> AddressDetails {
    AddressDetails {
        name: "Madhu B".to_string(),
        address: BUYER_ADDRESS.to_string(),
        city: Some("BENGALURU".to_string()),
        state: Some("KARNATAKA".to_string()),
        pincode: "560037".to_string(),
        state_ut_code: "29".to_string(),
    }
}

fn item(description: &str, unit_price: Decimal) -> LineItem {
    LineItem {
        description: description.to_string(),
        unit_price,
        quantity: 1,
        discount: Decimal::ZERO,
    }
}

/// The sample invoice (IN-761 for order 403-3225714-7676307).
pub fn sample_invoice() -> Invoice {
    let date = NaiveDate::from_ymd_opt(2019, 10, 28).unwrap_or_default();

    Invoice {
        seller: SellerDetails {
            name: "Varasiddhi Silk Exports".to_string(),
            address: "*75, 3rd Cross, Lalbagh Road".to_string(),
            city: "BENGALURU".to_string(),
            state: "KARNATAKA".to_string(),
            pincode: "560027".to_string(),
            pan_no: "AACFV3325K".to_string(),
            gst_registration_no: "29AACFV3325K1ZY".to_string(),
        },
        billing: buyer_address(),
        shipping: buyer_address(),
        order: OrderDetails {
            order_no: "403-3225714-7676307".to_string(),
            order_date: date,
        },
        invoice: InvoiceDetails {
            invoice_no: "IN-761".to_string(),
            invoice_details: "KA-310565025-1920".to_string(),
            invoice_date: date,
        },
        items: vec![
            item(
                "Varasiddhi Silks Men's Formal Shirt (SH-05-42, Navy Blue, 42) | B07KGF3KW8 (SH-05--42)",
                dec!(538.10),
            ),
            item("Shipping Charges", dec!(30.96)),
            item(
                "Varasiddhi Silks Men's Formal Shirt (SH-05-40, Navy Blue, 40) | B07KGCS2X7 (SH-05--40)",
                dec!(538.10),
            ),
            item("Shipping Charges", dec!(30.96)),
        ],
        reverse_charge: "No".to_string(),
        signature: SignatureSource::Path(PathBuf::from(DEFAULT_SIGNATURE_PATH)),
    }
}

/// The sample invoice in its JSON input form.
pub fn sample_document() -> InvoiceDocument {
    InvoiceDocument::from_invoice(&sample_invoice())
}
