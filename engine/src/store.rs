//! Entity store - the in-memory state container.
//!
//! The store holds one snapshot of every collection, replaced wholesale after
//! each successful remote load. Collections keep the order the remote store
//! returned them in; that order is the tie-break for equal-score matches and
//! equal-key sorts, so it must survive a reload unchanged.

use crate::entity::{
    Buyer, BuyerId, Lead, LeadId, Property, PropertyId, Seller, SellerId, Task, TaskId,
};
use serde::{Deserialize, Serialize};

/// One key/value row from the remote config sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

/// A full snapshot of the remote dataset, as produced by one load call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub leads: Vec<Lead>,
    pub properties: Vec<Property>,
    pub tasks: Vec<Task>,
    pub buyers: Vec<Buyer>,
    pub sellers: Vec<Seller>,
    pub config: Vec<ConfigEntry>,
}

/// Per-collection record counts, for badges and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub leads: usize,
    pub properties: usize,
    pub tasks: usize,
    pub buyers: usize,
    pub sellers: usize,
}

/// In-memory collections synced from the remote store.
///
/// There is no incremental patching: every successful mutation is followed by
/// a full reload, and [`EntityStore::replace`] swaps the whole state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStore {
    leads: Vec<Lead>,
    properties: Vec<Property>,
    tasks: Vec<Task>,
    buyers: Vec<Buyer>,
    sellers: Vec<Seller>,
    config: Vec<ConfigEntry>,
}

impl EntityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire state with a freshly loaded snapshot.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.leads = snapshot.leads;
        self.properties = snapshot.properties;
        self.tasks = snapshot.tasks;
        self.buyers = snapshot.buyers;
        self.sellers = snapshot.sellers;
        self.config = snapshot.config;
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn buyers(&self) -> &[Buyer] {
        &self.buyers
    }

    pub fn sellers(&self) -> &[Seller] {
        &self.sellers
    }

    pub fn config(&self) -> &[ConfigEntry] {
        &self.config
    }

    /// Look up a lead by identifier. Empty and dangling identifiers resolve
    /// to `None`.
    pub fn lead(&self, id: &LeadId) -> Option<&Lead> {
        if id.is_empty() {
            return None;
        }
        self.leads.iter().find(|l| &l.id == id)
    }

    pub fn property(&self, id: &PropertyId) -> Option<&Property> {
        if id.is_empty() {
            return None;
        }
        self.properties.iter().find(|p| &p.id == id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        if id.is_empty() {
            return None;
        }
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn buyer(&self, id: &BuyerId) -> Option<&Buyer> {
        if id.is_empty() {
            return None;
        }
        self.buyers.iter().find(|b| &b.id == id)
    }

    pub fn seller(&self, id: &SellerId) -> Option<&Seller> {
        if id.is_empty() {
            return None;
        }
        self.sellers.iter().find(|s| &s.id == id)
    }

    /// Config value by key, if present.
    pub fn config_value(&self, key: &str) -> Option<&str> {
        self.config
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value.as_str())
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            leads: self.leads.len(),
            properties: self.properties.len(),
            tasks: self.tasks.len(),
            buyers: self.buyers.len(),
            sellers: self.sellers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
            && self.properties.is_empty()
            && self.tasks.is_empty()
            && self.buyers.is_empty()
            && self.sellers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_lead(id: &str) -> Snapshot {
        Snapshot {
            leads: vec![Lead {
                id: LeadId::new(id),
                name: "Asha".to_string(),
                property_id: PropertyId::new("prop-missing"),
                ..Lead::default()
            }],
            sellers: vec![Seller {
                id: SellerId::new("seller-1"),
                name: "Owner One".to_string(),
                ..Seller::default()
            }],
            ..Snapshot::default()
        }
    }

    #[test]
    fn replace_swaps_everything() {
        let mut store = EntityStore::new();
        assert!(store.is_empty());

        store.replace(snapshot_with_lead("lead-1"));
        assert_eq!(store.counts().leads, 1);
        assert!(store.lead(&LeadId::new("lead-1")).is_some());

        store.replace(Snapshot::default());
        assert!(store.is_empty());
        assert!(store.lead(&LeadId::new("lead-1")).is_none());
    }

    #[test]
    fn dangling_reference_resolves_to_none() {
        let mut store = EntityStore::new();
        store.replace(snapshot_with_lead("lead-1"));

        let lead = store.lead(&LeadId::new("lead-1")).unwrap();
        assert!(store.property(&lead.property_id).is_none());
    }

    #[test]
    fn empty_id_never_matches() {
        let mut store = EntityStore::new();
        let mut snapshot = snapshot_with_lead("lead-1");
        // A row that came back without an identifier
        snapshot.leads.push(Lead::default());
        store.replace(snapshot);

        assert!(store.lead(&LeadId::default()).is_none());
    }

    #[test]
    fn replace_preserves_remote_order() {
        let mut store = EntityStore::new();
        let snapshot = Snapshot {
            leads: vec![
                Lead {
                    id: LeadId::new("b"),
                    ..Lead::default()
                },
                Lead {
                    id: LeadId::new("a"),
                    ..Lead::default()
                },
            ],
            ..Snapshot::default()
        };
        store.replace(snapshot);

        let ids: Vec<_> = store.leads().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn config_lookup() {
        let mut store = EntityStore::new();
        store.replace(Snapshot {
            config: vec![ConfigEntry {
                key: "highValueThreshold".to_string(),
                value: "2000000".to_string(),
            }],
            ..Snapshot::default()
        });

        assert_eq!(store.config_value("highValueThreshold"), Some("2000000"));
        assert_eq!(store.config_value("missing"), None);
    }
}
