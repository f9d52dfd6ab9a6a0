//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{ProductId, Sku, SkuError};

/// A catalog product with its stock counter.
///
/// `stock` is owned by the stock ledger: it only changes through movement
/// create/update/delete (plus the opening stock set at creation).
/// Administrative edits touch the descriptive fields only.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unique stock-keeping unit.
    pub sku: Sku,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional brand label.
    pub brand: Option<String>,
    /// Units on hand. Never negative.
    pub stock: i64,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Display name.
    pub name: String,
    /// Stock-keeping unit (validated and normalized).
    pub sku: String,
    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Optional brand label.
    #[serde(default)]
    pub brand: Option<String>,
    /// Administrative opening stock. Defaults to 0.
    #[serde(default)]
    pub opening_stock: Option<i64>,
}

impl CreateProductInput {
    /// Validate the payload, returning the parsed SKU and opening stock.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the name is empty, the SKU is
    /// malformed, or the opening stock is negative.
    pub fn validate(&self) -> Result<(Sku, i64), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_owned());
        }
        let sku = Sku::parse(&self.sku).map_err(|e: SkuError| e.to_string())?;
        let opening_stock = self.opening_stock.unwrap_or(0);
        if opening_stock < 0 {
            return Err("opening_stock must not be negative".to_owned());
        }
        Ok((sku, opening_stock))
    }
}

/// Payload for administrative product edits. Absent fields are left unchanged;
/// `stock` is deliberately not part of this payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New stock-keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
    /// New category label.
    #[serde(default)]
    pub category: Option<String>,
    /// New brand label.
    #[serde(default)]
    pub brand: Option<String>,
}

impl UpdateProductInput {
    /// Validate the payload, returning the parsed SKU if one was provided.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a provided name is empty or a
    /// provided SKU is malformed.
    pub fn validate(&self) -> Result<Option<Sku>, String> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err("name must not be empty".to_owned());
        }
        self.sku
            .as_deref()
            .map(|s| Sku::parse(s).map_err(|e| e.to_string()))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, sku: &str) -> CreateProductInput {
        CreateProductInput {
            name: name.to_owned(),
            sku: sku.to_owned(),
            category: None,
            brand: None,
            opening_stock: None,
        }
    }

    #[test]
    fn test_create_validate_parses_sku() {
        let (sku, opening) = input("Bread flour 5kg", "br-1200").validate().expect("valid");
        assert_eq!(sku.as_str(), "BR-1200");
        assert_eq!(opening, 0);
    }

    #[test]
    fn test_create_validate_rejects_empty_name() {
        assert!(input("   ", "BR-1200").validate().is_err());
    }

    #[test]
    fn test_create_validate_rejects_negative_opening_stock() {
        let mut payload = input("Bread flour 5kg", "BR-1200");
        payload.opening_stock = Some(-1);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_validate_allows_absent_fields() {
        assert!(UpdateProductInput::default().validate().expect("valid").is_none());
    }

    #[test]
    fn test_update_validate_rejects_bad_sku() {
        let payload = UpdateProductInput {
            sku: Some("no spaces".to_owned()),
            ..UpdateProductInput::default()
        };
        assert!(payload.validate().is_err());
    }
}
