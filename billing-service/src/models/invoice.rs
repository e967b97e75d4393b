//! Invoice model for billing-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::LineItem;

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Partial,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "partial" => InvoiceStatus::Partial,
            "paid" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Unpaid,
        }
    }

    /// Derive the status from the paid amount and the grand total.
    ///
    /// Invariant: unpaid iff nothing is paid, paid iff the total is covered,
    /// partial in between. A freshly created invoice is always unpaid.
    pub fn derive(paid_amount: Decimal, grand_total: Decimal) -> Self {
        if paid_amount <= Decimal::ZERO {
            InvoiceStatus::Unpaid
        } else if paid_amount >= grand_total {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::Partial
        }
    }
}

/// Tax invoice with owned line items.
///
/// Line items and customer fields are immutable after creation; only
/// `paid_amount` and `status` change, through payment recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_address: Option<String>,
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub total_gst: Decimal,
    pub discount: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
    pub paid_amount: Decimal,
    pub status: InvoiceStatus,
    pub created_by: String,
    pub created_utc: DateTime<Utc>,
}

impl Invoice {
    /// Outstanding balance. Negative when overpaid.
    pub fn balance_due(&self) -> Decimal {
        self.grand_total - self.paid_amount
    }
}

/// Invoice-level totals computed from the line items and discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub total_gst: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
}

/// One ordered position in a create-invoice request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLineItem {
    pub product_id: Uuid,
    pub quantity: u32,
    /// Unit price override; the product's sale rate when absent.
    pub rate: Option<Decimal>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_address: Option<String>,
    pub date: Option<NaiveDate>,
    pub items: Vec<NewLineItem>,
    #[serde(default)]
    pub discount: Decimal,
    pub created_by: String,
}

/// Filter parameters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct ListInvoicesFilter {
    pub search: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
