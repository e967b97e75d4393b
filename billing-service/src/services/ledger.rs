//! Invoice and product ledger for billing-service.
//!
//! Owns the product catalog and the invoice collection and enforces the
//! rules that tie them together: monetary rounding, payment status
//! derivation, sequential invoice numbering, and stock decrements bound to
//! invoice creation. Callers hold the ledger behind a lock; every operation
//! here is synchronous and either completes or leaves the ledger untouched.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    ALLOWED_GST_RATES, CreateInvoice, CreateProduct, Invoice, InvoiceStatus, InvoiceTotals,
    LineItem, LineItemAmounts, ListInvoicesFilter, ListProductsFilter, Product, ProductStatus,
    UpdateProduct,
};
use crate::services::metrics::LEDGER_OP_DURATION;

/// Round a monetary amount to 2 decimal places, half away from zero.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Derived amounts for one line item: `gst_amount = qty * rate * gst / 100`,
/// `total = qty * rate + gst_amount`, both rounded to currency precision.
///
/// Pure; must be re-run whenever quantity, rate or GST changes.
pub fn compute_line_item(quantity: u32, rate: Decimal, gst: Decimal) -> LineItemAmounts {
    let subtotal = Decimal::from(quantity) * rate;
    let gst_amount = round2(subtotal * gst / Decimal::ONE_HUNDRED);
    let total = round2(subtotal + gst_amount);
    LineItemAmounts { gst_amount, total }
}

/// Invoice-level totals from the line items and a discount percentage.
pub fn compute_invoice_totals(
    items: &[LineItem],
    discount: Decimal,
) -> Result<InvoiceTotals, AppError> {
    if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Discount must be between 0 and 100 percent, got {}",
            discount
        )));
    }
    if let Some(item) = items.iter().find(|i| i.quantity < 1) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Line item quantity must be at least 1 for '{}'",
            item.product_name
        )));
    }

    let subtotal = round2(
        items
            .iter()
            .map(|i| Decimal::from(i.quantity) * i.rate)
            .sum(),
    );
    let total_gst = round2(items.iter().map(|i| i.gst_amount).sum());
    let discount_amount = round2(subtotal * discount / Decimal::ONE_HUNDRED);
    let grand_total = round2(subtotal + total_gst - discount_amount);

    Ok(InvoiceTotals {
        subtotal,
        total_gst,
        discount_amount,
        grand_total,
    })
}

/// Format an invoice number: `INV-<year>-<seq>` with the sequence
/// zero-padded to at least 3 digits.
pub fn format_invoice_number(year: i32, seq: u32) -> String {
    format!("INV-{}-{:03}", year, seq)
}

/// Dashboard aggregates over the whole ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub total_products: usize,
    pub out_of_stock_products: usize,
    pub expiring_products: usize,
    pub total_invoices: usize,
    pub paid_invoices: usize,
    pub unpaid_invoices: usize,
    pub partial_invoices: usize,
    pub total_revenue: Decimal,
    pub total_paid: Decimal,
    pub total_outstanding: Decimal,
}

/// The authoritative in-process collection of products and invoices.
#[derive(Debug, Default)]
pub struct Ledger {
    products: Vec<Product>,
    invoices: Vec<Invoice>,
    /// Highest invoice sequence number allocated so far. Survives invoice
    /// deletion, so numbers are never reused.
    invoice_seq: u32,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from restored state.
    ///
    /// Snapshots written before the sequence counter existed carry
    /// `invoice_seq = 0`; for those the counter is seeded from the numeric
    /// suffix of the last-inserted invoice, which is how the numbering
    /// worked historically.
    pub fn from_parts(products: Vec<Product>, invoices: Vec<Invoice>, invoice_seq: u32) -> Self {
        let invoice_seq = if invoice_seq == 0 {
            invoices
                .last()
                .and_then(|inv| inv.invoice_number.rsplit('-').next())
                .and_then(|suffix| suffix.parse().ok())
                .unwrap_or(0)
        } else {
            invoice_seq
        };
        Self {
            products,
            invoices,
            invoice_seq,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoice_seq(&self) -> u32 {
        self.invoice_seq
    }

    pub fn get_product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn get_invoice(&self, id: Uuid) -> Option<&Invoice> {
        self.invoices.iter().find(|inv| inv.id == id)
    }

    /// The number the next created invoice will receive.
    pub fn next_invoice_number(&self) -> String {
        format_invoice_number(Utc::now().year(), self.invoice_seq + 1)
    }

    // -------------------------------------------------------------------------
    // Product operations
    // -------------------------------------------------------------------------

    /// Add a product to the catalog.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn add_product(&mut self, input: CreateProduct) -> Result<Product, AppError> {
        let timer = LEDGER_OP_DURATION
            .with_label_values(&["add_product"])
            .start_timer();

        validate_product_fields(&input.name, input.gst, input.stock)?;
        for rate in [input.mrp, input.purchase_rate, input.sale_rate] {
            if rate < Decimal::ZERO {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Product rates must be non-negative"
                )));
            }
        }

        let today = Utc::now().date_naive();
        let status = input
            .status
            .unwrap_or_else(|| ProductStatus::derive(input.stock, input.expiry_date, today));
        // Zero stock always shows as out of stock, whatever the caller sent.
        let status = if input.stock <= 0 {
            ProductStatus::OutOfStock
        } else {
            status
        };

        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            batch_number: input.batch_number,
            expiry_date: input.expiry_date,
            gst: input.gst,
            mrp: input.mrp,
            purchase_rate: input.purchase_rate,
            sale_rate: input.sale_rate,
            stock: input.stock,
            supplier: input.supplier,
            status,
        };
        self.products.push(product.clone());

        timer.observe_duration();
        info!(product_id = %product.id, name = %product.name, "Product added");

        Ok(product)
    }

    /// Update a product. Absent fields keep their value; the out-of-stock
    /// invariant is re-applied after the merge.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub fn update_product(
        &mut self,
        id: Uuid,
        input: UpdateProduct,
    ) -> Result<Option<Product>, AppError> {
        let timer = LEDGER_OP_DURATION
            .with_label_values(&["update_product"])
            .start_timer();

        if let Some(gst) = input.gst {
            validate_gst_rate(gst)?;
        }

        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(batch_number) = input.batch_number {
            product.batch_number = batch_number;
        }
        if let Some(expiry_date) = input.expiry_date {
            product.expiry_date = expiry_date;
        }
        if let Some(gst) = input.gst {
            product.gst = gst;
        }
        if let Some(mrp) = input.mrp {
            product.mrp = mrp;
        }
        if let Some(purchase_rate) = input.purchase_rate {
            product.purchase_rate = purchase_rate;
        }
        if let Some(sale_rate) = input.sale_rate {
            product.sale_rate = sale_rate;
        }
        if let Some(stock) = input.stock {
            product.stock = stock;
        }
        if let Some(supplier) = input.supplier {
            product.supplier = supplier;
        }
        if let Some(status) = input.status {
            product.status = status;
        }
        if product.stock <= 0 {
            product.status = ProductStatus::OutOfStock;
        }

        let updated = product.clone();
        timer.observe_duration();
        info!(product_id = %updated.id, "Product updated");

        Ok(Some(updated))
    }

    /// Remove a product from the catalog. Existing invoices keep their
    /// denormalized line-item snapshots and are not touched.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn delete_product(&mut self, id: Uuid) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        let deleted = self.products.len() < before;
        if deleted {
            info!(product_id = %id, "Product deleted");
        }
        deleted
    }

    pub fn list_products(&self, filter: &ListProductsFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| {
                filter.status.map_or(true, |s| p.status == s)
                    && filter.search.as_deref().map_or(true, |q| {
                        let q = q.to_lowercase();
                        p.name.to_lowercase().contains(&q)
                            || p.batch_number.to_lowercase().contains(&q)
                            || p.supplier.to_lowercase().contains(&q)
                    })
            })
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Invoice operations
    // -------------------------------------------------------------------------

    /// Create an invoice and decrement stock for every ordered product.
    ///
    /// All-or-nothing: every precondition is checked before anything is
    /// mutated, so a failed creation leaves the ledger exactly as it was.
    #[instrument(skip(self, input), fields(customer = %input.customer_name))]
    pub fn create_invoice(&mut self, input: CreateInvoice) -> Result<Invoice, AppError> {
        let timer = LEDGER_OP_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        if input.customer_name.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Customer name is required"
            )));
        }
        if input.customer_contact.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Customer contact is required"
            )));
        }
        if input.items.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invoice must have at least one item"
            )));
        }
        if let Some(item) = input.items.iter().find(|i| i.quantity < 1) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Quantity must be at least 1 for product {}",
                item.product_id
            )));
        }

        // Snapshot line items from the live products, failing on unknown ids.
        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            let product = self.get_product(item.product_id).ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Product {} not found", item.product_id))
            })?;
            let rate = item.rate.unwrap_or(product.sale_rate);
            if rate < Decimal::ZERO {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Rate must be non-negative for '{}'",
                    product.name
                )));
            }
            let amounts = compute_line_item(item.quantity, rate, product.gst);
            items.push(LineItem {
                id: Uuid::new_v4(),
                product_id: product.id,
                product_name: product.name.clone(),
                batch_number: product.batch_number.clone(),
                quantity: item.quantity,
                rate,
                gst: product.gst,
                gst_amount: amounts.gst_amount,
                total: amounts.total,
            });
        }

        // Stock check is cumulative per product: two items ordering the same
        // batch must fit into its stock together.
        let mut ordered: HashMap<Uuid, i64> = HashMap::new();
        for item in &items {
            *ordered.entry(item.product_id).or_insert(0) += i64::from(item.quantity);
        }
        for (product_id, quantity) in &ordered {
            if let Some(product) = self.get_product(*product_id) {
                if product.stock < *quantity {
                    return Err(AppError::BadRequest(anyhow::anyhow!(
                        "Insufficient stock for '{}': ordered {}, available {}",
                        product.name,
                        quantity,
                        product.stock
                    )));
                }
            }
        }

        let totals = compute_invoice_totals(&items, input.discount)?;

        // Point of no return: allocate the number and apply all effects.
        self.invoice_seq += 1;
        let invoice = Invoice {
            id: Uuid::new_v4(),
            invoice_number: format_invoice_number(Utc::now().year(), self.invoice_seq),
            customer_name: input.customer_name,
            customer_contact: input.customer_contact,
            customer_address: input.customer_address,
            date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
            items,
            subtotal: totals.subtotal,
            total_gst: totals.total_gst,
            discount: input.discount,
            discount_amount: totals.discount_amount,
            grand_total: totals.grand_total,
            paid_amount: Decimal::ZERO,
            status: InvoiceStatus::Unpaid,
            created_by: input.created_by,
            created_utc: Utc::now(),
        };

        for (product_id, quantity) in ordered {
            if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
                product.stock -= quantity;
                if product.stock <= 0 {
                    product.status = ProductStatus::OutOfStock;
                }
            }
        }

        self.invoices.push(invoice.clone());

        timer.observe_duration();
        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            grand_total = %invoice.grand_total,
            "Invoice created"
        );

        Ok(invoice)
    }

    /// Record a payment against an invoice.
    ///
    /// No upper clamp: an amount beyond the remaining balance is accepted
    /// and the invoice simply becomes paid.
    #[instrument(skip(self), fields(invoice_id = %invoice_id, amount = %amount))]
    pub fn record_payment(
        &mut self,
        invoice_id: Uuid,
        amount: Decimal,
    ) -> Result<Invoice, AppError> {
        let timer = LEDGER_OP_DURATION
            .with_label_values(&["record_payment"])
            .start_timer();

        if amount <= Decimal::ZERO {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Payment amount must be positive, got {}",
                amount
            )));
        }

        let invoice = self
            .invoices
            .iter_mut()
            .find(|inv| inv.id == invoice_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

        invoice.paid_amount = round2(invoice.paid_amount + amount);
        invoice.status = InvoiceStatus::derive(invoice.paid_amount, invoice.grand_total);

        let updated = invoice.clone();
        timer.observe_duration();
        info!(
            invoice_id = %updated.id,
            paid_amount = %updated.paid_amount,
            status = %updated.status.as_str(),
            "Payment recorded"
        );

        Ok(updated)
    }

    /// Delete an invoice. Stock decremented at creation is not restored;
    /// the sale itself is treated as historical fact.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub fn delete_invoice(&mut self, id: Uuid) -> bool {
        let before = self.invoices.len();
        self.invoices.retain(|inv| inv.id != id);
        let deleted = self.invoices.len() < before;
        if deleted {
            info!(invoice_id = %id, "Invoice deleted");
        }
        deleted
    }

    pub fn list_invoices(&self, filter: &ListInvoicesFilter) -> Vec<Invoice> {
        self.invoices
            .iter()
            .filter(|inv| {
                filter.status.map_or(true, |s| inv.status == s)
                    && filter.start_date.map_or(true, |d| inv.date >= d)
                    && filter.end_date.map_or(true, |d| inv.date <= d)
                    && filter.search.as_deref().map_or(true, |q| {
                        let q = q.to_lowercase();
                        inv.customer_name.to_lowercase().contains(&q)
                            || inv.invoice_number.to_lowercase().contains(&q)
                    })
            })
            .cloned()
            .collect()
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Aggregate counts and amounts backing the dashboard.
    pub fn summary(&self) -> LedgerSummary {
        let total_paid = round2(self.invoices.iter().map(|i| i.paid_amount).sum());
        let total_revenue = round2(self.invoices.iter().map(|i| i.grand_total).sum());
        LedgerSummary {
            total_products: self.products.len(),
            out_of_stock_products: self
                .products
                .iter()
                .filter(|p| p.status == ProductStatus::OutOfStock)
                .count(),
            expiring_products: self
                .products
                .iter()
                .filter(|p| {
                    matches!(
                        p.status,
                        ProductStatus::ExpiringSoon | ProductStatus::Expired
                    )
                })
                .count(),
            total_invoices: self.invoices.len(),
            paid_invoices: self.count_by_status(InvoiceStatus::Paid),
            unpaid_invoices: self.count_by_status(InvoiceStatus::Unpaid),
            partial_invoices: self.count_by_status(InvoiceStatus::Partial),
            total_revenue,
            total_paid,
            total_outstanding: round2(total_revenue - total_paid),
        }
    }

    fn count_by_status(&self, status: InvoiceStatus) -> usize {
        self.invoices.iter().filter(|i| i.status == status).count()
    }

    /// Recompute expiry-based statuses for the whole catalog. Applied after
    /// a snapshot restore, since expiry statuses drift with the calendar.
    pub fn refresh_expiry_statuses(&mut self, today: NaiveDate) {
        for product in self.products.iter_mut() {
            product.status = ProductStatus::derive(product.stock, product.expiry_date, today);
        }
    }
}

fn validate_product_fields(name: &str, gst: Decimal, stock: i64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Product name is required"
        )));
    }
    if stock < 0 {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Stock must be non-negative, got {}",
            stock
        )));
    }
    validate_gst_rate(gst)
}

fn validate_gst_rate(gst: Decimal) -> Result<(), AppError> {
    if !ALLOWED_GST_RATES.iter().any(|r| Decimal::from(*r) == gst) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "GST rate {} is not one of the allowed rates {:?}",
            gst,
            ALLOWED_GST_RATES
        )));
    }
    Ok(())
}
