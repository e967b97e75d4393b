//! Product model for billing-service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// GST percentages a product may carry.
pub const ALLOWED_GST_RATES: [u32; 5] = [0, 5, 12, 18, 28];

/// Days before expiry at which a product counts as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 90;

/// Product stock status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    InStock,
    OutOfStock,
    ExpiringSoon,
    Expired,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::InStock => "in-stock",
            ProductStatus::OutOfStock => "out-of-stock",
            ProductStatus::ExpiringSoon => "expiring-soon",
            ProductStatus::Expired => "expired",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "out-of-stock" => ProductStatus::OutOfStock,
            "expiring-soon" => ProductStatus::ExpiringSoon,
            "expired" => ProductStatus::Expired,
            _ => ProductStatus::InStock,
        }
    }

    /// Derive a status from stock level and expiry date.
    ///
    /// Zero stock wins over expiry; an expired batch with stock still shows
    /// as expired so it can be pulled from sale.
    pub fn derive(stock: i64, expiry_date: NaiveDate, today: NaiveDate) -> Self {
        if stock <= 0 {
            return ProductStatus::OutOfStock;
        }
        if expiry_date < today {
            return ProductStatus::Expired;
        }
        if (expiry_date - today).num_days() <= EXPIRY_WARNING_DAYS {
            return ProductStatus::ExpiringSoon;
        }
        ProductStatus::InStock
    }
}

/// Product in the store catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    pub gst: Decimal,
    pub mrp: Decimal,
    pub purchase_rate: Decimal,
    pub sale_rate: Decimal,
    pub stock: i64,
    pub supplier: String,
    pub status: ProductStatus,
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    pub gst: Decimal,
    pub mrp: Decimal,
    pub purchase_rate: Decimal,
    pub sale_rate: Decimal,
    pub stock: i64,
    pub supplier: String,
    /// Explicit status; derived from stock and expiry when absent.
    pub status: Option<ProductStatus>,
}

/// Input for updating a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub gst: Option<Decimal>,
    pub mrp: Option<Decimal>,
    pub purchase_rate: Option<Decimal>,
    pub sale_rate: Option<Decimal>,
    pub stock: Option<i64>,
    pub supplier: Option<String>,
    pub status: Option<ProductStatus>,
}

/// Filter parameters for listing products.
#[derive(Debug, Clone, Default)]
pub struct ListProductsFilter {
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
}
