//! Invoice and payment handlers for billing-service.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateInvoice, Invoice, InvoiceStatus, LineItem, ListInvoicesFilter, NewLineItem,
};
use crate::services::metrics::{INVOICES_TOTAL, PAYMENT_AMOUNT_TOTAL};
use crate::services::store::LedgerSnapshot;
use crate::services::words::number_to_words;
use crate::AppState;
use service_core::error::AppError;

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// One ordered position in a create-invoice request.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewLineItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    pub rate: Option<Decimal>,
}

/// Request to create an invoice.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Customer contact is required"))]
    pub customer_contact: String,
    pub customer_address: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<NewLineItemRequest>,
    #[serde(default)]
    pub discount: Decimal,
    #[validate(length(min = 1, message = "Created-by attribution is required"))]
    pub created_by: String,
}

impl From<CreateInvoiceRequest> for CreateInvoice {
    fn from(req: CreateInvoiceRequest) -> Self {
        CreateInvoice {
            customer_name: req.customer_name,
            customer_contact: req.customer_contact,
            customer_address: req.customer_address,
            date: req.date,
            items: req
                .items
                .into_iter()
                .map(|i| NewLineItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                    rate: i.rate,
                })
                .collect(),
            discount: req.discount,
            created_by: req.created_by,
        }
    }
}

/// Request to record a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize, Default)]
pub struct ListInvoicesQuery {
    pub search: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Read-only invoice snapshot, sufficient to render a tax-invoice document.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
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
    pub balance_due: Decimal,
    pub status: InvoiceStatus,
    pub created_by: String,
    pub created_utc: DateTime<Utc>,
    /// Words of the grand total's whole rupees, Indian grouping.
    pub amount_in_words: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let balance_due = invoice.balance_due();
        let whole_rupees = invoice.grand_total.trunc().to_u64().unwrap_or(0);
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            customer_name: invoice.customer_name,
            customer_contact: invoice.customer_contact,
            customer_address: invoice.customer_address,
            date: invoice.date,
            items: invoice.items,
            subtotal: invoice.subtotal,
            total_gst: invoice.total_gst,
            discount: invoice.discount,
            discount_amount: invoice.discount_amount,
            grand_total: invoice.grand_total,
            paid_amount: invoice.paid_amount,
            balance_due,
            status: invoice.status,
            created_by: invoice.created_by,
            created_utc: invoice.created_utc,
            amount_in_words: format!("{} Rupees Only", number_to_words(whole_rupees)),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create an invoice. Decrements stock for every ordered product.
///
/// POST /invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(req): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    req.validate()?;

    let mut ledger = state.ledger.write().await;
    let invoice = ledger.create_invoice(req.into())?;
    state.store.save(&LedgerSnapshot::of(&ledger))?;

    INVOICES_TOTAL
        .with_label_values(&[invoice.status.as_str()])
        .inc();

    Ok((StatusCode::CREATED, Json(invoice.into())))
}

/// List invoices, filterable by search text, status and date range.
///
/// GET /invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let ledger = state.ledger.read().await;
    let filter = ListInvoicesFilter {
        search: query.search,
        status: query.status,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let invoices = ledger
        .list_invoices(&filter)
        .into_iter()
        .map(InvoiceResponse::from)
        .collect();
    Ok(Json(invoices))
}

/// Get one invoice snapshot.
///
/// GET /invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let ledger = state.ledger.read().await;
    let invoice = ledger
        .get_invoice(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;
    Ok(Json(invoice.into()))
}

/// Record a payment against an invoice.
///
/// POST /invoices/{id}/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let mut ledger = state.ledger.write().await;
    let invoice = ledger.record_payment(id, req.amount)?;
    state.store.save(&LedgerSnapshot::of(&ledger))?;

    PAYMENT_AMOUNT_TOTAL
        .with_label_values(&[invoice.status.as_str()])
        .inc_by(req.amount.to_f64().unwrap_or(0.0));

    Ok(Json(invoice.into()))
}

/// Delete an invoice. Stock is not restored.
///
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut ledger = state.ledger.write().await;
    if !ledger.delete_invoice(id) {
        return Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")));
    }
    state.store.save(&LedgerSnapshot::of(&ledger))?;
    Ok(StatusCode::NO_CONTENT)
}
