//! Read-only lookups the cost engine, stock ledger and VAT allocator consume.

use std::collections::HashMap;

use hamperdesk_core::{HamperId, ProductId};

use crate::hamper::Hamper;
use crate::product::Product;

pub trait ProductCatalog {
    fn product(&self, id: &ProductId) -> Option<&Product>;
}

pub trait HamperCatalog {
    fn hamper(&self, id: &HamperId) -> Option<&Hamper>;
}

impl ProductCatalog for [Product] {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.iter().find(|p| &p.id == id)
    }
}

impl ProductCatalog for HashMap<ProductId, Product> {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.get(id)
    }
}

impl HamperCatalog for [Hamper] {
    fn hamper(&self, id: &HamperId) -> Option<&Hamper> {
        self.iter().find(|h| &h.id == id)
    }
}

impl HamperCatalog for HashMap<HamperId, Hamper> {
    fn hamper(&self, id: &HamperId) -> Option<&Hamper> {
        self.get(id)
    }
}
