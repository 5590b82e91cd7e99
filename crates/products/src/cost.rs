//! Hamper cost engine.
//!
//! Derives a hamper's cost, weight, volume, input VAT and margin from its
//! components. This is the single place these figures are computed; every
//! caller (hamper edits, product edits, reports) goes through
//! [`compute_details`].

use serde::{Deserialize, Serialize};

use hamperdesk_core::Money;
use hamperdesk_core::money::round_div;

use crate::catalog::ProductCatalog;
use crate::hamper::HamperComponent;

/// Derived figures for a bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HamperDetails {
    pub total_cost: Money,
    pub total_weight_grams: i64,
    pub total_volume_ml: i64,
    /// VAT paid on the components at purchase (Σ cost · rate · qty).
    pub total_input_vat: Money,
    /// `selling_price - total_cost`, when a selling price was supplied.
    pub profit: Option<Money>,
    /// Margin over cost in percent. `+∞` when the hamper costs nothing but
    /// sells for something; serialised as `null` in that case.
    pub profit_percentage: Option<f64>,
}

/// Compute the derived figures for `components`.
///
/// Components whose product is not in `catalog` contribute nothing.
pub fn compute_details<C>(
    components: &[HamperComponent],
    selling_price: Option<Money>,
    catalog: &C,
) -> HamperDetails
where
    C: ProductCatalog + ?Sized,
{
    let mut total_cost = Money::ZERO;
    let mut total_weight_grams = 0i64;
    let mut total_volume_ml = 0i64;
    // cents · basis points, rounded once at the end
    let mut input_vat_scaled: i128 = 0;

    for component in components {
        let Some(product) = catalog.product(&component.product_id) else {
            continue;
        };
        let qty = component.quantity;
        total_cost = total_cost.saturating_add(product.cost_price.saturating_mul(qty));
        total_weight_grams =
            total_weight_grams.saturating_add(product.weight_grams.saturating_mul(qty));
        total_volume_ml = total_volume_ml
            .saturating_add(product.volume_milliliters.unwrap_or(0).saturating_mul(qty));
        input_vat_scaled = input_vat_scaled.saturating_add(
            (product.cost_price.cents() as i128 * product.vat_rate.bps() as i128)
                .saturating_mul(qty as i128),
        );
    }

    let total_input_vat = Money::from_cents(
        round_div(input_vat_scaled, 10_000).clamp(i64::MIN as i128, i64::MAX as i128) as i64,
    );

    let (profit, profit_percentage) = match selling_price {
        Some(price) => {
            let profit = price - total_cost;
            let pct = if total_cost.is_positive() {
                profit.cents() as f64 / total_cost.cents() as f64 * 100.0
            } else if price.is_positive() {
                f64::INFINITY
            } else {
                0.0
            };
            (Some(profit), Some(pct))
        }
        None => (None, None),
    };

    HamperDetails {
        total_cost,
        total_weight_grams,
        total_volume_ml,
        total_input_vat,
        profit,
        profit_percentage,
    }
}
