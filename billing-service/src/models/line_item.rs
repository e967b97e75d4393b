//! Line item model for billing-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line item on an invoice.
///
/// `product_name`, `batch_number`, `rate` and `gst` are snapshots taken at
/// the time of sale; they are never re-derived from the live product, which
/// may change or be deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub batch_number: String,
    pub quantity: u32,
    pub rate: Decimal,
    pub gst: Decimal,
    pub gst_amount: Decimal,
    pub total: Decimal,
}

/// Derived monetary amounts for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItemAmounts {
    pub gst_amount: Decimal,
    pub total: Decimal,
}
