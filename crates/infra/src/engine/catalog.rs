//! Reference data: products, hampers, customers and suppliers.

use tracing::{debug, info};

use hamperdesk_activity::ActivityKind;
use hamperdesk_core::{
    CustomerId, DomainError, DomainResult, HamperId, Money, ProductId, SupplierId,
};
use hamperdesk_parties::{Customer, CustomerDraft, Supplier, SupplierDraft};
use hamperdesk_products::{
    Hamper, HamperComponent, HamperDetails, HamperDraft, Product, ProductDraft, compute_details,
};
use hamperdesk_sales::LineItem;

use super::Engine;

impl Engine {
    fn check_supplier(&self, supplier_id: Option<&SupplierId>) -> DomainResult<()> {
        match supplier_id {
            Some(id) if self.suppliers.get(id).is_none() => {
                Err(DomainError::validation(format!("unknown supplier {id}")))
            }
            _ => Ok(()),
        }
    }

    fn check_components(&self, components: &[HamperComponent]) -> DomainResult<()> {
        match components
            .iter()
            .find(|c| self.products.get(&c.product_id).is_none())
        {
            Some(c) => Err(DomainError::validation(format!(
                "unknown product {} in hamper",
                c.product_id
            ))),
            None => Ok(()),
        }
    }

    pub fn add_product(&mut self, draft: ProductDraft) -> DomainResult<Product> {
        draft.validate()?;
        self.check_supplier(draft.supplier_id.as_ref())?;

        let product = draft.into_product(ProductId::new());
        self.products.upsert(product.clone());
        info!(product_id = %product.id, name = %product.name, "product created");
        self.log(
            ActivityKind::ProductCreated,
            format!("Product {} created", product.name),
            Some(product.id.to_string()),
        );
        Ok(product)
    }

    /// Edit a product and refresh the cached figures of every hamper that
    /// contains it.
    pub fn update_product(&mut self, id: ProductId, draft: ProductDraft) -> DomainResult<Product> {
        if self.products.get(&id).is_none() {
            return Err(DomainError::not_found("product", id));
        }
        draft.validate()?;
        self.check_supplier(draft.supplier_id.as_ref())?;

        let product = draft.into_product(id);
        self.products.upsert(product.clone());

        let refreshed: Vec<Hamper> = self
            .hampers
            .all()
            .iter()
            .filter(|h| h.contains_product(&id))
            .map(|h| {
                let mut h = h.clone();
                h.refresh_details(self.products.all());
                h
            })
            .collect();
        debug!(product_id = %id, hampers = refreshed.len(), "hamper details refreshed");
        self.hampers.upsert_many(refreshed);

        info!(product_id = %id, "product updated");
        self.log(
            ActivityKind::ProductUpdated,
            format!("Product {} updated", product.name),
            Some(id.to_string()),
        );
        Ok(product)
    }

    pub fn delete_product(&mut self, id: ProductId) -> DomainResult<Product> {
        if self.products.get(&id).is_none() {
            return Err(DomainError::not_found("product", id));
        }
        if let Some(h) = self.hampers.all().iter().find(|h| h.contains_product(&id)) {
            return Err(DomainError::referenced(
                "product",
                id,
                format!("hamper {}", h.name),
            ));
        }

        let product = self
            .products
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("product", id))?;
        info!(product_id = %id, "product deleted");
        self.log(
            ActivityKind::ProductDeleted,
            format!("Product {} deleted", product.name),
            Some(id.to_string()),
        );
        Ok(product)
    }

    /// Products at or below `threshold` units, lowest stock first.
    pub fn low_stock_products(&self, threshold: i64) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .all()
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect();
        low.sort_by_key(|p| p.stock);
        low
    }

    /// Derived figures for an unsaved bill of materials (hamper editor preview).
    pub fn calculate_hamper_details(
        &self,
        components: &[HamperComponent],
        selling_price: Option<Money>,
    ) -> HamperDetails {
        compute_details(components, selling_price, self.products.all())
    }

    pub fn add_hamper(&mut self, draft: HamperDraft) -> DomainResult<Hamper> {
        draft.validate()?;
        self.check_components(&draft.components)?;

        let mut hamper = draft.into_hamper(HamperId::new());
        hamper.refresh_details(self.products.all());
        self.hampers.upsert(hamper.clone());
        info!(hamper_id = %hamper.id, name = %hamper.name, "hamper created");
        self.log(
            ActivityKind::HamperCreated,
            format!("Hamper {} created", hamper.name),
            Some(hamper.id.to_string()),
        );
        Ok(hamper)
    }

    /// Edit a hamper. Orders and quotes keep the name and price they were
    /// sold at.
    pub fn update_hamper(&mut self, id: HamperId, draft: HamperDraft) -> DomainResult<Hamper> {
        if self.hampers.get(&id).is_none() {
            return Err(DomainError::not_found("hamper", id));
        }
        draft.validate()?;
        self.check_components(&draft.components)?;

        let mut hamper = draft.into_hamper(id);
        hamper.refresh_details(self.products.all());
        self.hampers.upsert(hamper.clone());
        info!(hamper_id = %id, "hamper updated");
        self.log(
            ActivityKind::HamperUpdated,
            format!("Hamper {} updated", hamper.name),
            Some(id.to_string()),
        );
        Ok(hamper)
    }

    pub fn delete_hamper(&mut self, id: HamperId) -> DomainResult<Hamper> {
        if self.hampers.get(&id).is_none() {
            return Err(DomainError::not_found("hamper", id));
        }
        let uses_hamper = |items: &[LineItem]| items.iter().any(|i| i.hamper_id == id);
        if let Some(o) = self.orders.all().iter().find(|o| uses_hamper(&o.items)) {
            return Err(DomainError::referenced(
                "hamper",
                id,
                format!("order {}", o.order_number),
            ));
        }
        if let Some(q) = self.quotes.all().iter().find(|q| uses_hamper(&q.items)) {
            return Err(DomainError::referenced(
                "hamper",
                id,
                format!("quote {}", q.quote_number),
            ));
        }

        let hamper = self
            .hampers
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("hamper", id))?;
        info!(hamper_id = %id, "hamper deleted");
        self.log(
            ActivityKind::HamperDeleted,
            format!("Hamper {} deleted", hamper.name),
            Some(id.to_string()),
        );
        Ok(hamper)
    }

    pub fn add_customer(&mut self, draft: CustomerDraft) -> DomainResult<Customer> {
        draft.validate()?;
        let customer = draft.into_customer(CustomerId::new());
        self.customers.upsert(customer.clone());
        info!(customer_id = %customer.id, "customer created");
        self.log(
            ActivityKind::CustomerCreated,
            format!("Customer {} created", customer.name),
            Some(customer.id.to_string()),
        );
        Ok(customer)
    }

    pub fn update_customer(
        &mut self,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> DomainResult<Customer> {
        if self.customers.get(&id).is_none() {
            return Err(DomainError::not_found("customer", id));
        }
        draft.validate()?;
        let customer = draft.into_customer(id);
        self.customers.upsert(customer.clone());
        info!(customer_id = %id, "customer updated");
        self.log(
            ActivityKind::CustomerUpdated,
            format!("Customer {} updated", customer.name),
            Some(id.to_string()),
        );
        Ok(customer)
    }

    pub fn delete_customer(&mut self, id: CustomerId) -> DomainResult<Customer> {
        if self.customers.get(&id).is_none() {
            return Err(DomainError::not_found("customer", id));
        }
        let referenced_by = if let Some(o) = self.orders.all().iter().find(|o| o.customer_id == id) {
            Some(format!("order {}", o.order_number))
        } else if let Some(q) = self.quotes.all().iter().find(|q| q.customer_id == id) {
            Some(format!("quote {}", q.quote_number))
        } else {
            self.invoices
                .all()
                .iter()
                .find(|i| i.customer_id == id)
                .map(|i| format!("invoice {}", i.invoice_number))
        };
        if let Some(referenced_by) = referenced_by {
            return Err(DomainError::referenced("customer", id, referenced_by));
        }

        let customer = self
            .customers
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("customer", id))?;
        info!(customer_id = %id, "customer deleted");
        self.log(
            ActivityKind::CustomerDeleted,
            format!("Customer {} deleted", customer.name),
            Some(id.to_string()),
        );
        Ok(customer)
    }

    pub fn add_supplier(&mut self, draft: SupplierDraft) -> DomainResult<Supplier> {
        draft.validate()?;
        let supplier = draft.into_supplier(SupplierId::new());
        self.suppliers.upsert(supplier.clone());
        info!(supplier_id = %supplier.id, "supplier created");
        self.log(
            ActivityKind::SupplierCreated,
            format!("Supplier {} created", supplier.name),
            Some(supplier.id.to_string()),
        );
        Ok(supplier)
    }

    pub fn update_supplier(
        &mut self,
        id: SupplierId,
        draft: SupplierDraft,
    ) -> DomainResult<Supplier> {
        if self.suppliers.get(&id).is_none() {
            return Err(DomainError::not_found("supplier", id));
        }
        draft.validate()?;
        let supplier = draft.into_supplier(id);
        self.suppliers.upsert(supplier.clone());
        info!(supplier_id = %id, "supplier updated");
        self.log(
            ActivityKind::SupplierUpdated,
            format!("Supplier {} updated", supplier.name),
            Some(id.to_string()),
        );
        Ok(supplier)
    }

    pub fn delete_supplier(&mut self, id: SupplierId) -> DomainResult<Supplier> {
        if self.suppliers.get(&id).is_none() {
            return Err(DomainError::not_found("supplier", id));
        }
        if let Some(p) = self
            .products
            .all()
            .iter()
            .find(|p| p.supplier_id == Some(id))
        {
            return Err(DomainError::referenced(
                "supplier",
                id,
                format!("product {}", p.name),
            ));
        }

        let supplier = self
            .suppliers
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("supplier", id))?;
        info!(supplier_id = %id, "supplier deleted");
        self.log(
            ActivityKind::SupplierDeleted,
            format!("Supplier {} deleted", supplier.name),
            Some(id.to_string()),
        );
        Ok(supplier)
    }
}
