//! Product catalog handlers for billing-service.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateProduct, ListProductsFilter, Product, ProductStatus, UpdateProduct};
use crate::services::store::LedgerSnapshot;
use crate::AppState;
use service_core::error::AppError;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request to add a product.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Batch number is required"))]
    pub batch_number: String,
    pub expiry_date: NaiveDate,
    pub gst: Decimal,
    pub mrp: Decimal,
    pub purchase_rate: Decimal,
    pub sale_rate: Decimal,
    pub stock: i64,
    #[validate(length(min = 1, message = "Supplier is required"))]
    pub supplier: String,
    pub status: Option<ProductStatus>,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        CreateProduct {
            name: req.name,
            batch_number: req.batch_number,
            expiry_date: req.expiry_date,
            gst: req.gst,
            mrp: req.mrp,
            purchase_rate: req.purchase_rate,
            sale_rate: req.sale_rate,
            stock: req.stock,
            supplier: req.supplier,
            status: req.status,
        }
    }
}

/// Query parameters for listing products.
#[derive(Debug, Deserialize, Default)]
pub struct ListProductsQuery {
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Add a product to the catalog.
///
/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    req.validate()?;

    let mut ledger = state.ledger.write().await;
    let product = ledger.add_product(req.into())?;
    state.store.save(&LedgerSnapshot::of(&ledger))?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List products, optionally filtered by search text and status.
///
/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let ledger = state.ledger.read().await;
    let filter = ListProductsFilter {
        search: query.search,
        status: query.status,
    };
    Ok(Json(ledger.list_products(&filter)))
}

/// Get a product by id.
///
/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let ledger = state.ledger.read().await;
    let product = ledger
        .get_product(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;
    Ok(Json(product))
}

/// Update a product.
///
/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProduct>,
) -> Result<Json<Product>, AppError> {
    let mut ledger = state.ledger.write().await;
    let product = ledger
        .update_product(id, req)?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;
    state.store.save(&LedgerSnapshot::of(&ledger))?;
    Ok(Json(product))
}

/// Delete a product. Invoices that sold it keep their snapshots.
///
/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut ledger = state.ledger.write().await;
    if !ledger.delete_product(id) {
        return Err(AppError::NotFound(anyhow::anyhow!("Product not found")));
    }
    state.store.save(&LedgerSnapshot::of(&ledger))?;
    Ok(StatusCode::NO_CONTENT)
}
