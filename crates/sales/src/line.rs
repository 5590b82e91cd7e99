use serde::{Deserialize, Serialize};

use hamperdesk_core::{CustomerId, DomainError, DomainResult, HamperId, MAX_QUANTITY, Money};
use hamperdesk_products::HamperCatalog;

/// Order/quote line: a hamper sold at a frozen base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub hamper_id: HamperId,
    /// Hamper name at time of sale (frozen).
    pub hamper_name: String,
    pub quantity: i64,
    /// Base price excluding VAT at time of sale (frozen).
    pub unit_price: Money,
}

impl LineItem {
    /// `unit_price · quantity`. Resolved lines are bounded so this never
    /// clamps for them.
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// Caller-supplied line. A missing price defaults to the hamper's current
/// selling price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub hamper_id: HamperId,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Option<Money>,
}

impl LineItemInput {
    pub fn new(hamper_id: HamperId, quantity: i64) -> Self {
        Self {
            hamper_id,
            quantity,
            unit_price: None,
        }
    }

    pub fn priced(hamper_id: HamperId, quantity: i64, unit_price: Money) -> Self {
        Self {
            hamper_id,
            quantity,
            unit_price: Some(unit_price),
        }
    }

    /// Validate against the hamper catalog and freeze name and price.
    pub fn resolve<C>(&self, hampers: &C) -> DomainResult<LineItem>
    where
        C: HamperCatalog + ?Sized,
    {
        let hamper = hampers.hamper(&self.hamper_id).ok_or_else(|| {
            DomainError::validation(format!("unknown hamper {}", self.hamper_id))
        })?;

        if self.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "quantity for {} must be positive",
                hamper.name
            )));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(DomainError::validation(format!(
                "quantity for {} cannot exceed {MAX_QUANTITY}",
                hamper.name
            )));
        }

        let unit_price = self.unit_price.unwrap_or(hamper.selling_price);
        if !unit_price.is_positive() {
            return Err(DomainError::validation(format!(
                "unit price for {} must be positive",
                hamper.name
            )));
        }
        if unit_price > Money::MAX_PRICE {
            return Err(DomainError::validation(format!(
                "unit price for {} cannot exceed {}",
                hamper.name,
                Money::MAX_PRICE
            )));
        }

        Ok(LineItem {
            hamper_id: hamper.id,
            hamper_name: hamper.name.clone(),
            quantity: self.quantity,
            unit_price,
        })
    }
}

/// Resolve every input line, rejecting an empty list.
pub fn resolve_lines<C>(inputs: &[LineItemInput], hampers: &C) -> DomainResult<Vec<LineItem>>
where
    C: HamperCatalog + ?Sized,
{
    if inputs.is_empty() {
        return Err(DomainError::validation("at least one line item is required"));
    }
    inputs.iter().map(|i| i.resolve(hampers)).collect()
}

/// Anything shaped like an order: a customer and a list of hamper lines.
///
/// Orders and quotes both implement it, so invoicing and stock code can treat
/// them uniformly.
pub trait OrderLike {
    fn customer_id(&self) -> CustomerId;
    fn items(&self) -> &[LineItem];

    /// Σ unit_price · quantity.
    fn subtotal(&self) -> Money {
        self.items().iter().map(LineItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamperdesk_core::ProductId;
    use hamperdesk_products::{Hamper, HamperComponent};

    fn hamper(price: i64) -> Hamper {
        Hamper {
            id: HamperId::new(),
            name: "Cesta Navidad".to_string(),
            description: None,
            selling_price: Money::from_cents(price),
            components: vec![HamperComponent {
                product_id: ProductId::new(),
                quantity: 1,
            }],
            details: None,
        }
    }

    #[test]
    fn resolve_defaults_price_and_snapshots_name() {
        let h = hamper(4_500);
        let catalog = vec![h.clone()];
        let line = LineItemInput::new(h.id, 2).resolve(catalog.as_slice()).unwrap();
        assert_eq!(line.unit_price, Money::from_cents(4_500));
        assert_eq!(line.hamper_name, "Cesta Navidad");
        assert_eq!(line.line_total(), Money::from_cents(9_000));
    }

    #[test]
    fn resolve_rejects_unknown_hamper_and_bad_values() {
        let h = hamper(4_500);
        let catalog = vec![h.clone()];

        let unknown = LineItemInput::new(HamperId::new(), 1);
        assert!(matches!(unknown.resolve(catalog.as_slice()), Err(DomainError::Validation(_))));

        let zero_qty = LineItemInput::new(h.id, 0);
        assert!(matches!(zero_qty.resolve(catalog.as_slice()), Err(DomainError::Validation(_))));

        let free = LineItemInput::priced(h.id, 1, Money::ZERO);
        assert!(matches!(free.resolve(catalog.as_slice()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn resolve_rejects_quantities_and_prices_past_the_bounds() {
        let h = hamper(4_500);
        let catalog = vec![h.clone()];

        let at_limit = LineItemInput::new(h.id, MAX_QUANTITY);
        assert!(at_limit.resolve(catalog.as_slice()).is_ok());

        let huge_qty = LineItemInput::new(h.id, i64::MAX / 1_000);
        assert!(matches!(huge_qty.resolve(catalog.as_slice()), Err(DomainError::Validation(_))));

        let huge_price = LineItemInput::priced(h.id, 1, Money::from_cents(i64::MAX));
        assert!(matches!(huge_price.resolve(catalog.as_slice()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn resolve_lines_requires_at_least_one_line() {
        let catalog: Vec<Hamper> = vec![];
        assert!(resolve_lines(&[], catalog.as_slice()).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        struct Lines(Vec<LineItem>);

        impl OrderLike for Lines {
            fn customer_id(&self) -> CustomerId {
                CustomerId::default()
            }

            fn items(&self) -> &[LineItem] {
                &self.0
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

            #[test]
            fn subtotal_is_sum_of_line_totals(
                lines in proptest::collection::vec((1i64..50, 1i64..100_000), 1..10),
            ) {
                let h = hamper(1_000);
                let catalog = vec![h.clone()];
                let inputs: Vec<LineItemInput> = lines
                    .iter()
                    .map(|(q, p)| LineItemInput::priced(h.id, *q, Money::from_cents(*p)))
                    .collect();
                let resolved = resolve_lines(&inputs, catalog.as_slice()).unwrap();
                let expected: i64 = lines.iter().map(|(q, p)| q * p).sum();
                prop_assert_eq!(Lines(resolved).subtotal(), Money::from_cents(expected));
            }
        }
    }
}
