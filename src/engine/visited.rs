//! Cycle guard: (address, type) pairs already entered during one merge call.

use std::collections::HashMap;

use crate::value::TypeTag;

struct Visit {
    tag: TypeTag,
    next: Option<Box<Visit>>,
}

/// Scoped to one top-level merge. Entries are never removed.
#[derive(Default)]
pub(crate) struct VisitedSet {
    visits: HashMap<usize, Box<Visit>>,
}

impl VisitedSet {
    /// Record `(addr, tag)`. Returns false if it was already recorded.
    pub(crate) fn insert(&mut self, addr: usize, tag: TypeTag) -> bool {
        let mut cursor = self.visits.get(&addr).map(|v| &**v);
        while let Some(visit) = cursor {
            if visit.tag == tag {
                return false;
            }
            cursor = visit.next.as_deref();
        }
        let next = self.visits.remove(&addr);
        self.visits.insert(addr, Box::new(Visit { tag, next }));
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.visits.values().map(|v| chain_len(v)).sum()
    }
}

fn chain_len(visit: &Visit) -> usize {
    1 + visit.next.as_deref().map_or(0, chain_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_insert_is_rejected() {
        let mut visited = VisitedSet::default();
        assert!(visited.insert(0x10, TypeTag::Mapping));
        assert!(!visited.insert(0x10, TypeTag::Mapping));
    }

    #[test]
    fn test_same_address_different_type_is_chained() {
        let mut visited = VisitedSet::default();
        assert!(visited.insert(0x10, TypeTag::Record("outer".to_string())));
        assert!(visited.insert(0x10, TypeTag::Record("inner".to_string())));
        assert!(!visited.insert(0x10, TypeTag::Record("outer".to_string())));
        assert_eq!(visited.len(), 2);
    }
}
