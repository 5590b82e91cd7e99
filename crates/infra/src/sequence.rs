//! Year-scoped document numbering.
//!
//! Counters are persisted per `(kind, year)` under the `sequences` key. The
//! next number is one past the larger of the stored counter and the highest
//! number already present in the collection, so imported or hand-edited
//! documents are never renumbered over.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::store::{BlobStore, StoreError};

pub const SEQUENCES_KEY: &str = "sequences";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Order,
    Quote,
    Invoice,
}

impl SequenceKind {
    fn name(&self) -> &'static str {
        match self {
            SequenceKind::Order => "order",
            SequenceKind::Quote => "quote",
            SequenceKind::Invoice => "invoice",
        }
    }

    fn prefix(&self, year: i32) -> String {
        match self {
            SequenceKind::Order => format!("{year}"),
            SequenceKind::Quote => format!("PRE-{year}-"),
            SequenceKind::Invoice => format!("FAC-{year}-"),
        }
    }

    /// `20260001`, `PRE-2026-0001`, `FAC-2026-0001`.
    pub fn format(&self, year: i32, seq: u32) -> String {
        format!("{}{seq:04}", self.prefix(year))
    }

    /// Sequence part of `number` if it belongs to `year`.
    pub fn parse(&self, year: i32, number: &str) -> Option<u32> {
        let rest = number.strip_prefix(&self.prefix(year))?;
        if rest.len() < 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok()
    }
}

pub struct SequenceGenerator {
    store: Arc<dyn BlobStore>,
    counters: BTreeMap<String, u32>,
}

impl SequenceGenerator {
    pub fn open(store: Arc<dyn BlobStore>) -> Result<Self, StoreError> {
        let counters = match store.get(SEQUENCES_KEY)? {
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Json {
                key: SEQUENCES_KEY.to_string(),
                source,
            })?,
            None => BTreeMap::new(),
        };
        Ok(Self { store, counters })
    }

    fn counter_key(kind: SequenceKind, year: i32) -> String {
        format!("{}:{year}", kind.name())
    }

    fn next_seq<'a, I>(&self, kind: SequenceKind, year: i32, existing: I) -> u32
    where
        I: IntoIterator<Item = &'a str>,
    {
        let stored = self
            .counters
            .get(&Self::counter_key(kind, year))
            .copied()
            .unwrap_or(0);
        let scanned = existing
            .into_iter()
            .filter_map(|n| kind.parse(year, n))
            .max()
            .unwrap_or(0);
        stored.max(scanned) + 1
    }

    /// Next number for display, without reserving it.
    pub fn peek<'a, I>(&self, kind: SequenceKind, year: i32, existing: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        kind.format(year, self.next_seq(kind, year, existing))
    }

    /// Claim the next number.
    pub fn reserve<'a, I>(&mut self, kind: SequenceKind, year: i32, existing: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let seq = self.next_seq(kind, year, existing);
        self.counters.insert(Self::counter_key(kind, year), seq);
        self.persist();
        let number = kind.format(year, seq);
        debug!(kind = kind.name(), %number, "sequence number reserved");
        number
    }

    fn persist(&self) {
        let result = serde_json::to_value(&self.counters)
            .map_err(|source| StoreError::Json {
                key: SEQUENCES_KEY.to_string(),
                source,
            })
            .and_then(|value| self.store.set(SEQUENCES_KEY, value));
        if let Err(e) = result {
            error!(error = %e, "failed to persist sequence counters");
        }
    }
}
