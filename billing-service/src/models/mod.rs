//! Domain models for billing-service.

mod invoice;
mod line_item;
mod product;

pub use invoice::{
    CreateInvoice, Invoice, InvoiceStatus, InvoiceTotals, ListInvoicesFilter, NewLineItem,
};
pub use line_item::{LineItem, LineItemAmounts};
pub use product::{
    ALLOWED_GST_RATES, CreateProduct, EXPIRY_WARNING_DAYS, ListProductsFilter, Product,
    ProductStatus, UpdateProduct,
};
