//! Demo catalog seeded into an empty store.

use rust_decimal::Decimal;

use crate::models::CreateProduct;

/// The starter catalog for a freshly installed store. Statuses are derived
/// from stock and expiry at insert time.
pub fn demo_products() -> Vec<CreateProduct> {
    let entries = [
        (
            "Paracetamol 500mg",
            "PCM2024001",
            "2025-12-31",
            12,
            50,
            30,
            45,
            500,
            "PharmaCorp Ltd",
        ),
        (
            "Amoxicillin 250mg",
            "AMX2024002",
            "2025-03-15",
            12,
            120,
            80,
            110,
            250,
            "MediSupply Inc",
        ),
        (
            "Vitamin D3 Tablets",
            "VTD2024003",
            "2025-01-20",
            18,
            250,
            180,
            230,
            150,
            "HealthPlus Pharma",
        ),
        (
            "Insulin Injection",
            "INS2023004",
            "2024-11-30",
            5,
            850,
            650,
            800,
            45,
            "DiabetesCare Ltd",
        ),
        (
            "Cough Syrup 100ml",
            "CGH2024005",
            "2026-06-30",
            18,
            95,
            60,
            85,
            320,
            "PharmaCorp Ltd",
        ),
    ];

    entries
        .into_iter()
        .map(
            |(name, batch, expiry, gst, mrp, purchase, sale, stock, supplier)| CreateProduct {
                name: name.to_string(),
                batch_number: batch.to_string(),
                expiry_date: expiry.parse().expect("valid seed date"),
                gst: Decimal::from(gst),
                mrp: Decimal::from(mrp),
                purchase_rate: Decimal::from(purchase),
                sale_rate: Decimal::from(sale),
                stock,
                supplier: supplier.to_string(),
                status: None,
            },
        )
        .collect()
}
