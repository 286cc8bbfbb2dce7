//! Tag catalog: address -> human-readable description.

use crate::program::addr::{Address, Namespace};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// An (address, description) pair, as listed in the program file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub address: Address,
    pub description: String,
}

impl TagEntry {
    pub fn new(address: Address, description: impl Into<String>) -> Self {
        Self {
            address,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagCatalog {
    entries: BTreeMap<Address, String>,
}

impl TagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a description. Returns the address back if it is already
    /// catalogued; the existing description is kept.
    pub fn insert(&mut self, address: Address, description: String) -> Result<(), Address> {
        match self.entries.entry(address) {
            Entry::Occupied(e) => Err(e.key().clone()),
            Entry::Vacant(v) => {
                v.insert(description);
                Ok(())
            }
        }
    }

    pub fn get(&self, address: &Address) -> Option<&str> {
        self.entries.get(address).map(String::as_str)
    }

    /// Description for rendering. Uncatalogued addresses read as "".
    pub fn describe(&self, address: &Address) -> &str {
        self.get(address).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &str)> {
        self.entries.iter().map(|(a, d)| (a, d.as_str()))
    }

    /// Entry count per namespace, for load summaries.
    pub fn namespace_counts(&self) -> BTreeMap<Namespace, usize> {
        let mut counts = BTreeMap::new();
        for (address, _) in self.iter() {
            *counts.entry(address.namespace).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(s: &str) -> Address {
        s.parse().expect("valid address")
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let mut catalog = TagCatalog::new();
        catalog
            .insert(addr("B3:2/0"), "Plant ESD".to_string())
            .expect("first insert");
        let dup = catalog.insert(addr("B3:2/0"), "Other".to_string());
        assert_eq!(dup, Err(addr("B3:2/0")));
        assert_eq!(catalog.get(&addr("B3:2/0")), Some("Plant ESD"));
    }

    #[test]
    fn missing_description_reads_empty() {
        let catalog = TagCatalog::new();
        assert_eq!(catalog.describe(&addr("O:0/0")), "");
        assert_eq!(catalog.get(&addr("O:0/0")), None);
    }

    #[test]
    fn iterates_in_address_order_and_counts_namespaces() {
        let mut catalog = TagCatalog::new();
        for (a, d) in [
            ("I:0/10", "Fire Eye 3 Failure Alarm"),
            ("I:0/2", "Pull Station 3 Zone 2"),
            ("T4:0", "Message Control Timer"),
        ] {
            catalog.insert(addr(a), d.to_string()).expect("insert");
        }
        let inputs: Vec<String> = catalog
            .iter()
            .filter(|(a, _)| a.namespace == Namespace::Input)
            .map(|(a, _)| a.to_string())
            .collect();
        assert_eq!(inputs, vec!["I:0/2", "I:0/10"]);
        assert_eq!(catalog.namespace_counts().get(&Namespace::Timer), Some(&1));
    }
}
