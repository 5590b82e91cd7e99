//! The business engine: every mutating operation of the application.
//!
//! The engine owns one repository per collection and takes `&mut self` for
//! every mutation, so planning (validation, stock deltas, totals) and
//! committing happen inside one exclusive borrow. Nothing is written unless
//! the whole operation validated.

mod catalog;
mod invoices;
mod orders;
mod quotes;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use hamperdesk_activity::{ActivityKind, ActivityLogEntry, record};
use hamperdesk_core::{
    Clock, CustomerId, DomainError, DomainResult, Entity, HamperId, InvoiceId, OrderId, ProductId,
    QuoteId, SupplierId,
};
use hamperdesk_invoicing::Invoice;
use hamperdesk_parties::{Customer, Supplier};
use hamperdesk_products::{Hamper, Product};
use hamperdesk_sales::{Order, Quote};

use crate::repository::{BlobRepository, Repository};
use crate::sequence::{SequenceGenerator, SequenceKind};
use crate::store::{BlobStore, InMemoryBlobStore, StoreError};

pub struct Engine {
    products: Box<dyn Repository<Product>>,
    hampers: Box<dyn Repository<Hamper>>,
    customers: Box<dyn Repository<Customer>>,
    suppliers: Box<dyn Repository<Supplier>>,
    orders: Box<dyn Repository<Order>>,
    quotes: Box<dyn Repository<Quote>>,
    invoices: Box<dyn Repository<Invoice>>,
    activity: Box<dyn Repository<ActivityLogEntry>>,
    sequences: SequenceGenerator,
    clock: Box<dyn Clock>,
}

fn repo<T: Entity>(store: &Arc<dyn BlobStore>) -> Result<Box<dyn Repository<T>>, StoreError> {
    Ok(Box::new(BlobRepository::<T>::open(store.clone())?))
}

impl Engine {
    /// Load every collection from `store`.
    pub fn open(store: Arc<dyn BlobStore>, clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        let engine = Self {
            products: repo(&store)?,
            hampers: repo(&store)?,
            customers: repo(&store)?,
            suppliers: repo(&store)?,
            orders: repo(&store)?,
            quotes: repo(&store)?,
            invoices: repo(&store)?,
            activity: repo(&store)?,
            sequences: SequenceGenerator::open(store)?,
            clock,
        };
        info!(
            products = engine.products.len(),
            hampers = engine.hampers.len(),
            customers = engine.customers.len(),
            orders = engine.orders.len(),
            quotes = engine.quotes.len(),
            invoices = engine.invoices.len(),
            "engine opened"
        );
        Ok(engine)
    }

    /// Empty engine over a fresh in-memory store.
    pub fn in_memory(clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        Self::open(Arc::new(InMemoryBlobStore::new()), clock)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn products(&self) -> &[Product] {
        self.products.all()
    }

    pub fn hampers(&self) -> &[Hamper] {
        self.hampers.all()
    }

    pub fn customers(&self) -> &[Customer] {
        self.customers.all()
    }

    pub fn suppliers(&self) -> &[Supplier] {
        self.suppliers.all()
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.all()
    }

    pub fn quotes(&self) -> &[Quote] {
        self.quotes.all()
    }

    pub fn invoices(&self) -> &[Invoice] {
        self.invoices.all()
    }

    /// Newest first.
    pub fn activity_log(&self) -> &[ActivityLogEntry] {
        self.activity.all()
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn hamper(&self, id: &HamperId) -> Option<&Hamper> {
        self.hampers.get(id)
    }

    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.get(id)
    }

    pub fn supplier(&self, id: &SupplierId) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn quote(&self, id: &QuoteId) -> Option<&Quote> {
        self.quotes.get(id)
    }

    pub fn invoice(&self, id: &InvoiceId) -> Option<&Invoice> {
        self.invoices.get(id)
    }

    pub fn invoice_for_order(&self, order_id: &OrderId) -> Option<&Invoice> {
        self.invoices.all().iter().find(|i| &i.order_id == order_id)
    }

    pub fn next_order_number(&self) -> String {
        self.sequences.peek(
            SequenceKind::Order,
            self.clock.year(),
            self.orders.all().iter().map(|o| o.order_number.as_str()),
        )
    }

    pub fn next_quote_number(&self) -> String {
        self.sequences.peek(
            SequenceKind::Quote,
            self.clock.year(),
            self.quotes.all().iter().map(|q| q.quote_number.as_str()),
        )
    }

    pub fn next_invoice_number(&self) -> String {
        self.sequences.peek(
            SequenceKind::Invoice,
            self.clock.year(),
            self.invoices.all().iter().map(|i| i.invoice_number.as_str()),
        )
    }

    fn reserve_number(&mut self, kind: SequenceKind) -> String {
        let year = self.clock.year();
        match kind {
            SequenceKind::Order => self.sequences.reserve(
                kind,
                year,
                self.orders.all().iter().map(|o| o.order_number.as_str()),
            ),
            SequenceKind::Quote => self.sequences.reserve(
                kind,
                year,
                self.quotes.all().iter().map(|q| q.quote_number.as_str()),
            ),
            SequenceKind::Invoice => self.sequences.reserve(
                kind,
                year,
                self.invoices.all().iter().map(|i| i.invoice_number.as_str()),
            ),
        }
    }

    fn require_customer(&self, id: &CustomerId) -> DomainResult<&Customer> {
        self.customers
            .get(id)
            .ok_or_else(|| DomainError::validation(format!("unknown customer {id}")))
    }

    fn log(&mut self, kind: ActivityKind, message: impl Into<String>, related_id: Option<String>) {
        let entry = ActivityLogEntry::new(kind, message, related_id, self.clock.now());
        let mut log = self.activity.all().to_vec();
        record(&mut log, entry);
        self.activity.replace_all(log);
    }
}
