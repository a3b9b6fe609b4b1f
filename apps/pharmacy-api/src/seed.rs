//! Development seed data for the catalog.

use chrono::NaiveDate;
use domain_inventory::{CreateMedication, InMemoryInventory, InventoryRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Seed the development catalog with a handful of common medications.
///
/// Dates are fixed rather than relative to today, so some rows go stale over
/// time. That is deliberate: an expired row keeps the expiry rejection path
/// reachable from a fresh dev environment.
///
/// Returns the number of rows inserted.
pub async fn seed_catalog(inventory: &InMemoryInventory) -> eyre::Result<usize> {
    let rows: [(&str, Decimal, u32, &str); 5] = [
        ("Paracétamol", dec!(5.50), 100, "2025-12-31"),
        ("Ibuprofène", dec!(7.80), 75, "2025-10-15"),
        ("Aspirine", dec!(4.20), 120, "2026-03-20"),
        ("Amoxicilline", dec!(12.50), 50, "2025-08-30"),
        ("Doliprane", dec!(6.00), 90, "2026-01-10"),
    ];

    for (name, unit_price, quantity_on_hand, expires_on) in rows {
        let input = CreateMedication {
            name: name.to_string(),
            unit_price,
            quantity_on_hand,
            expires_on: expires_on.parse::<NaiveDate>()?,
        };
        inventory.create(input).await?;
    }

    Ok(rows.len())
}
