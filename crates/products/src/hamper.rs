use serde::{Deserialize, Serialize};

use hamperdesk_core::{DomainError, DomainResult, Entity, HamperId, MAX_QUANTITY, Money, ProductId};

use crate::catalog::ProductCatalog;
use crate::cost::{HamperDetails, compute_details};

/// One line of a hamper's bill of materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HamperComponent {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// A sellable bundle of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hamper {
    pub id: HamperId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Selling price excluding VAT.
    pub selling_price: Money,
    pub components: Vec<HamperComponent>,
    /// Display cache only. Always recomputed from the components on edit;
    /// never read back as source of truth.
    #[serde(default)]
    pub details: Option<HamperDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HamperDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub selling_price: Money,
    pub components: Vec<HamperComponent>,
}

impl HamperDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("hamper name cannot be empty"));
        }
        if !self.selling_price.is_positive() {
            return Err(DomainError::validation("selling price must be positive"));
        }
        if self.selling_price > Money::MAX_PRICE {
            return Err(DomainError::validation(format!(
                "selling price cannot exceed {}",
                Money::MAX_PRICE
            )));
        }
        if self.components.is_empty() {
            return Err(DomainError::validation(
                "hamper must contain at least one product",
            ));
        }
        if let Some(c) = self.components.iter().find(|c| c.quantity <= 0) {
            return Err(DomainError::validation(format!(
                "component quantity must be positive (product {})",
                c.product_id
            )));
        }
        if let Some(c) = self.components.iter().find(|c| c.quantity > MAX_QUANTITY) {
            return Err(DomainError::validation(format!(
                "component quantity cannot exceed {MAX_QUANTITY} (product {})",
                c.product_id
            )));
        }
        Ok(())
    }

    pub fn into_hamper(self, id: HamperId) -> Hamper {
        Hamper {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            selling_price: self.selling_price,
            components: self.components,
            details: None,
        }
    }
}

impl Hamper {
    pub fn contains_product(&self, product_id: &ProductId) -> bool {
        self.components.iter().any(|c| &c.product_id == product_id)
    }

    /// Current derived figures, computed from the catalog as it is now.
    pub fn compute_details<C>(&self, catalog: &C) -> HamperDetails
    where
        C: ProductCatalog + ?Sized,
    {
        compute_details(&self.components, Some(self.selling_price), catalog)
    }

    /// Recompute and store the display cache.
    pub fn refresh_details<C>(&mut self, catalog: &C)
    where
        C: ProductCatalog + ?Sized,
    {
        self.details = Some(self.compute_details(catalog));
    }
}

impl Entity for Hamper {
    type Id = HamperId;
    const COLLECTION: &'static str = "hampers";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
