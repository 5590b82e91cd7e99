use std::collections::BTreeMap;

use hamperdesk_core::{DomainError, DomainResult, ProductId};
use hamperdesk_products::{HamperCatalog, Product, ProductCatalog};
use hamperdesk_sales::{LineItem, Order};

/// Net stock movement per product for one order operation.
///
/// Negative deltas consume stock, positive deltas return it. Zero entries are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPlan {
    deltas: BTreeMap<ProductId, i64>,
}

/// Products rewritten by committing a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockCommit {
    pub updated: Vec<Product>,
    /// Planned products that no longer exist in the catalog.
    pub missing: Vec<ProductId>,
}

impl StockPlan {
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn delta(&self, product_id: &ProductId) -> i64 {
        self.deltas.get(product_id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, &i64)> {
        self.deltas.iter()
    }

    fn add(&mut self, product_id: ProductId, delta: i64) {
        let entry = self.deltas.entry(product_id).or_insert(0);
        *entry = entry.saturating_add(delta);
        if *entry == 0 {
            self.deltas.remove(&product_id);
        }
    }

    /// Apply every delta to a copy of the affected products.
    pub fn commit<P>(&self, products: &P) -> StockCommit
    where
        P: ProductCatalog + ?Sized,
    {
        let mut commit = StockCommit::default();
        for (id, delta) in &self.deltas {
            match products.product(id) {
                Some(product) => {
                    let mut product = product.clone();
                    product.stock = product.stock.saturating_add(*delta);
                    commit.updated.push(product);
                }
                None => commit.missing.push(*id),
            }
        }
        commit
    }
}

/// Units of each product consumed by `items`.
///
/// Lines whose hamper is no longer in the catalog contribute nothing.
pub fn requirements<H>(items: &[LineItem], hampers: &H) -> BTreeMap<ProductId, i64>
where
    H: HamperCatalog + ?Sized,
{
    let mut required = BTreeMap::new();
    for item in items {
        let Some(hamper) = hampers.hamper(&item.hamper_id) else {
            continue;
        };
        for component in &hamper.components {
            let units = component.quantity.saturating_mul(item.quantity);
            let entry = required.entry(component.product_id).or_insert(0i64);
            *entry = entry.saturating_add(units);
        }
    }
    required
}

/// Stock movement for a newly created order.
///
/// Orders created straight into a stock-affecting status are checked for
/// availability first.
pub fn plan_create<H, P>(order: &Order, hampers: &H, products: &P) -> DomainResult<StockPlan>
where
    H: HamperCatalog + ?Sized,
    P: ProductCatalog + ?Sized,
{
    let mut plan = StockPlan::default();
    if !order.status.affects_stock() {
        return Ok(plan);
    }

    let required = requirements(&order.items, hampers);
    check_available(&required, &BTreeMap::new(), products)?;
    for (id, qty) in required {
        plan.add(id, -qty);
    }
    Ok(plan)
}

/// Stock movement for editing `original` into `updated`.
///
/// Restores whatever `original` consumed (its full item list, not a diff)
/// and deducts what `updated` needs. Availability is only checked when the
/// order is entering a stock-affecting status; edits that stay within
/// stock-affecting statuses are not checked.
pub fn plan_update<H, P>(
    original: &Order,
    updated: &Order,
    hampers: &H,
    products: &P,
) -> DomainResult<StockPlan>
where
    H: HamperCatalog + ?Sized,
    P: ProductCatalog + ?Sized,
{
    let restore = if original.status.affects_stock() {
        requirements(&original.items, hampers)
    } else {
        BTreeMap::new()
    };
    let deduct = if updated.status.affects_stock() {
        requirements(&updated.items, hampers)
    } else {
        BTreeMap::new()
    };

    if !original.status.affects_stock() {
        check_available(&deduct, &restore, products)?;
    }

    let mut plan = StockPlan::default();
    for (id, qty) in restore {
        plan.add(id, qty);
    }
    for (id, qty) in deduct {
        plan.add(id, -qty);
    }
    Ok(plan)
}

fn check_available<P>(
    required: &BTreeMap<ProductId, i64>,
    restored: &BTreeMap<ProductId, i64>,
    products: &P,
) -> DomainResult<()>
where
    P: ProductCatalog + ?Sized,
{
    for (id, &needed) in required {
        let Some(product) = products.product(id) else {
            continue;
        };
        let projected = product
            .stock
            .saturating_add(restored.get(id).copied().unwrap_or(0));
        if projected < needed {
            return Err(DomainError::InsufficientStock {
                product_id: id.to_string(),
                product_name: product.name.clone(),
                available: projected,
                required: needed,
            });
        }
    }
    Ok(())
}
