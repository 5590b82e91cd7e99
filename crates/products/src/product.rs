use serde::{Deserialize, Serialize};

use hamperdesk_core::{DomainError, DomainResult, Entity, Money, ProductId, SupplierId, VatRate};

/// Upper bound for weights, volumes and stock counts on a product.
pub const MAX_MEASURE: i64 = 1_000_000_000;

/// A catalog product: the unit hampers are assembled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Purchase cost per unit, excluding VAT.
    pub cost_price: Money,
    /// Units on hand. Expected to stay >= 0 but not enforced here.
    pub stock: i64,
    pub unit: String,
    pub weight_grams: i64,
    #[serde(default)]
    pub volume_milliliters: Option<i64>,
    pub vat_rate: VatRate,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Caller-supplied fields for creating or editing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub cost_price: Money,
    pub stock: i64,
    pub unit: String,
    pub weight_grams: i64,
    #[serde(default)]
    pub volume_milliliters: Option<i64>,
    pub vat_rate: VatRate,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.unit.trim().is_empty() {
            return Err(DomainError::validation("product unit cannot be empty"));
        }
        if self.cost_price.is_negative() {
            return Err(DomainError::validation("cost price cannot be negative"));
        }
        if self.cost_price > Money::MAX_PRICE {
            return Err(DomainError::validation(format!(
                "cost price cannot exceed {}",
                Money::MAX_PRICE
            )));
        }
        if self.stock.abs() > MAX_MEASURE {
            return Err(DomainError::validation(format!(
                "stock must be within ±{MAX_MEASURE}"
            )));
        }
        if self.weight_grams < 0 {
            return Err(DomainError::validation("weight cannot be negative"));
        }
        if self.volume_milliliters.is_some_and(|v| v < 0) {
            return Err(DomainError::validation("volume cannot be negative"));
        }
        if self.weight_grams > MAX_MEASURE || self.volume_milliliters.unwrap_or(0) > MAX_MEASURE {
            return Err(DomainError::validation(format!(
                "weight and volume cannot exceed {MAX_MEASURE}"
            )));
        }
        Ok(())
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_string(),
            cost_price: self.cost_price,
            stock: self.stock,
            unit: self.unit.trim().to_string(),
            weight_grams: self.weight_grams,
            volume_milliliters: self.volume_milliliters,
            vat_rate: self.vat_rate,
            supplier_id: self.supplier_id,
            family: self.family,
            description: self.description,
        }
    }
}

impl Product {
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock <= threshold
    }
}

impl Entity for Product {
    type Id = ProductId;
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
