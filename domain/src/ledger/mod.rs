//! Per-session monotone records: the seen set and the classification history.
//!
//! Both structures only grow. [`SeenSet`] is a plain set union;
//! [`History`] keeps the first classification recorded for a name and
//! ignores any later one.

use crate::availability::{Availability, Partition};
use crate::candidate::{CreatorTag, DomainName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Every name ever produced for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet(BTreeSet<DomainName>);

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `names` into the set; returns how many were new
    pub fn register<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a DomainName>,
    {
        names
            .into_iter()
            .filter(|n| self.0.insert((*n).clone()))
            .count()
    }

    pub fn contains(&self, name: &DomainName) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainName> {
        self.0.iter()
    }

    pub fn as_set(&self) -> &BTreeSet<DomainName> {
        &self.0
    }
}

impl FromIterator<DomainName> for SeenSet {
    fn from_iter<T: IntoIterator<Item = DomainName>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Classification outcome recorded for one name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub status: Availability,
    pub source: CreatorTag,
}

/// name → first recorded classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(BTreeMap<DomainName, HistoryRecord>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a classification unless the name already has one.
    /// Returns whether the record was written.
    pub fn record(&mut self, name: DomainName, status: Availability, source: CreatorTag) -> bool {
        if self.0.contains_key(&name) {
            return false;
        }
        self.0.insert(name, HistoryRecord { status, source });
        true
    }

    /// Record both sides of a partition; returns how many were new
    pub fn record_partition(&mut self, partition: &Partition) -> usize {
        let mut written = 0;
        for (name, tag) in &partition.available {
            if self.record(name.clone(), Availability::Available, tag.clone()) {
                written += 1;
            }
        }
        for (name, tag) in &partition.taken {
            if self.record(name.clone(), Availability::Taken, tag.clone()) {
                written += 1;
            }
        }
        written
    }

    pub fn get(&self, name: &DomainName) -> Option<&HistoryRecord> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DomainName, &HistoryRecord)> {
        self.0.iter()
    }

    /// Names ever classified as available
    pub fn available(&self) -> impl Iterator<Item = &DomainName> {
        self.0
            .iter()
            .filter(|(_, r)| r.status == Availability::Available)
            .map(|(n, _)| n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        DomainName::parse(s).unwrap()
    }

    #[test]
    fn test_seen_set_union_is_idempotent() {
        let mut seen = SeenSet::new();
        let batch = [name("a.com"), name("b.com")];
        assert_eq!(seen.register(&batch), 2);
        assert_eq!(seen.register(&[name("b.com"), name("c.com")]), 1);
        assert_eq!(seen.register(&batch), 0);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_history_first_write_wins() {
        let mut history = History::new();
        assert!(history.record(name("foo.com"), Availability::Available, "CreatorA".into()));
        assert!(!history.record(name("foo.com"), Availability::Taken, "CreatorB".into()));

        let record = history.get(&name("foo.com")).unwrap();
        assert_eq!(record.status, Availability::Available);
        assert_eq!(record.source.as_str(), "CreatorA");
    }

    #[test]
    fn test_record_partition() {
        let mut partition = Partition::new();
        partition.insert(name("a.com"), "CreatorA".into(), Availability::Available);
        partition.insert(name("b.com"), "CreatorB".into(), Availability::Taken);

        let mut history = History::new();
        assert_eq!(history.record_partition(&partition), 2);
        assert_eq!(history.record_partition(&partition), 0);
        assert_eq!(history.available().count(), 1);
    }

    #[test]
    fn test_history_serializes_as_name_map() {
        let mut history = History::new();
        history.record(name("a.com"), Availability::Taken, "CreatorC".into());
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["a.com"]["status"], "TAKEN");
        assert_eq!(json["a.com"]["source"], "CreatorC");
    }
}
