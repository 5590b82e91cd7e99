//! Output VAT allocation for sales documents.
//!
//! A hamper is sold at one price but its contents carry different VAT rates.
//! Each line's base price is split across rates in proportion to what the
//! hamper's components cost at each rate, and VAT is charged per slice.
//! Rounding to cents happens per line and per rate, before any summation, so
//! the per-rate bases of a line may drift from its base by up to two cents.

use serde::{Deserialize, Serialize};

use hamperdesk_core::{FALLBACK_VAT_RATE, HamperId, Money, VAT_RATES, VatRate};
use hamperdesk_products::{Hamper, HamperCatalog, ProductCatalog};
use hamperdesk_sales::{LineItem, OrderLike};

/// Base and VAT charged at one rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBreakdown {
    pub rate: VatRate,
    pub base: Money,
    pub vat: Money,
}

/// How a line's base was split across rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationBasis {
    /// Proportional to component cost at each rate.
    CostWeighted,
    /// Zero-cost hamper whose components all share one rate.
    SingleRate,
    /// Nothing usable to weight by; everything at [`FALLBACK_VAT_RATE`].
    Fallback,
}

/// One document line with its VAT breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedInvoiceLineItem {
    pub hamper_id: HamperId,
    pub hamper_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_base: Money,
    /// One entry per rate, highest rate first. Unused rates are zero.
    pub breakdown: Vec<RateBreakdown>,
    pub basis: AllocationBasis,
    pub total_vat: Money,
    pub total_with_vat: Money,
}

impl DetailedInvoiceLineItem {
    pub fn at_rate(&self, rate: VatRate) -> Option<&RateBreakdown> {
        self.breakdown.iter().find(|b| b.rate == rate)
    }
}

/// Per-rate totals for a whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatSummary {
    pub by_rate: Vec<RateBreakdown>,
    pub total_base: Money,
    pub total_vat: Money,
    pub grand_total: Money,
}

impl VatSummary {
    pub fn at_rate(&self, rate: VatRate) -> Option<&RateBreakdown> {
        self.by_rate.iter().find(|b| b.rate == rate)
    }
}

fn slot(rate: VatRate) -> usize {
    VAT_RATES
        .iter()
        .position(|r| *r == rate)
        .unwrap_or_default()
}

fn breakdown(bases: [Money; 4]) -> Vec<RateBreakdown> {
    VAT_RATES
        .iter()
        .zip(bases)
        .map(|(&rate, base)| RateBreakdown {
            rate,
            base,
            vat: base.vat_at(rate),
        })
        .collect()
}

/// Split `line_base` across rates for `hamper`.
fn split_base<P>(line_base: Money, hamper: Option<&Hamper>, products: &P) -> ([Money; 4], AllocationBasis)
where
    P: ProductCatalog + ?Sized,
{
    let mut bases = [Money::ZERO; 4];
    let fallback = |mut bases: [Money; 4]| {
        bases[slot(FALLBACK_VAT_RATE)] = line_base;
        (bases, AllocationBasis::Fallback)
    };

    let Some(hamper) = hamper.filter(|h| !h.components.is_empty()) else {
        return fallback(bases);
    };

    let mut cost_at_rate = [0i64; 4];
    let mut rates_seen: Vec<VatRate> = Vec::new();
    for component in &hamper.components {
        let Some(product) = products.product(&component.product_id) else {
            continue;
        };
        let cost = product.cost_price.saturating_mul(component.quantity).cents();
        let bucket = &mut cost_at_rate[slot(product.vat_rate)];
        *bucket = bucket.saturating_add(cost);
        if !rates_seen.contains(&product.vat_rate) {
            rates_seen.push(product.vat_rate);
        }
    }
    let total_cost = cost_at_rate.iter().fold(0i64, |acc, c| acc.saturating_add(*c));

    if total_cost > 0 {
        for (base, cost) in bases.iter_mut().zip(cost_at_rate) {
            *base = line_base.prorate(cost, total_cost);
        }
        return (bases, AllocationBasis::CostWeighted);
    }

    match rates_seen.as_slice() {
        [only] => {
            bases[slot(*only)] = line_base;
            (bases, AllocationBasis::SingleRate)
        }
        _ => fallback(bases),
    }
}

/// Allocate a single line.
pub fn allocate_line<H, P>(item: &LineItem, hampers: &H, products: &P) -> DetailedInvoiceLineItem
where
    H: HamperCatalog + ?Sized,
    P: ProductCatalog + ?Sized,
{
    let line_base = item.line_total();
    let (bases, basis) = split_base(line_base, hampers.hamper(&item.hamper_id), products);
    let breakdown = breakdown(bases);
    let total_vat = breakdown.iter().map(|b| b.vat).sum();

    DetailedInvoiceLineItem {
        hamper_id: item.hamper_id,
        hamper_name: item.hamper_name.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_base,
        breakdown,
        basis,
        total_vat,
        total_with_vat: line_base.saturating_add(total_vat),
    }
}

/// Allocate every line of an order or quote.
pub fn calculate_detailed_line_items<O, H, P>(
    record: &O,
    hampers: &H,
    products: &P,
) -> Vec<DetailedInvoiceLineItem>
where
    O: OrderLike + ?Sized,
    H: HamperCatalog + ?Sized,
    P: ProductCatalog + ?Sized,
{
    record
        .items()
        .iter()
        .map(|item| allocate_line(item, hampers, products))
        .collect()
}

/// Sum allocated lines into per-rate totals.
pub fn summarize(lines: &[DetailedInvoiceLineItem]) -> VatSummary {
    let mut bases = [Money::ZERO; 4];
    let mut vats = [Money::ZERO; 4];
    for line in lines {
        for b in &line.breakdown {
            bases[slot(b.rate)] += b.base;
            vats[slot(b.rate)] += b.vat;
        }
    }

    let by_rate: Vec<RateBreakdown> = VAT_RATES
        .iter()
        .enumerate()
        .map(|(i, &rate)| RateBreakdown {
            rate,
            base: bases[i],
            vat: vats[i],
        })
        .collect();
    let total_base = lines.iter().map(|l| l.line_base).sum();
    let total_vat = lines.iter().map(|l| l.total_vat).sum();

    VatSummary {
        by_rate,
        total_base,
        total_vat,
        grand_total: total_base + total_vat,
    }
}
