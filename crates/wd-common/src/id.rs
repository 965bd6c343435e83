//! Interned identifiers for cases, resources, and activities.
//!
//! The classifier and several detectors run quadratic loops over events
//! within a case. Comparing interned `u32` ids there is much cheaper than
//! hashing the original string keys on every comparison, so all names are
//! interned exactly once while the log is being indexed.

use std::collections::HashMap;

/// A string interner assigning dense `u32` ids in first-appearance order.
///
/// First-appearance ordering matters: iterating `0..len()` visits names in
/// the order they occur in the log, which keeps detector output
/// deterministic for a given input.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    names: Vec<String>,
    index: HashMap<String, u32>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a name, returning its id. Repeated names return the same id.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    /// Look up a name without interning it.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// Resolve an id back to its name.
    ///
    /// Panics if the id was not produced by this interner; ids are only
    /// ever constructed through `intern`, so this is unreachable in
    /// practice.
    pub fn resolve(&self, id: u32) -> &str {
        &self.names[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

macro_rules! typed_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

typed_id!(
    /// Identifier of one process instance (ticket/order/claim).
    CaseId
);
typed_id!(
    /// Identifier of the actor who performed an event.
    ResourceId
);
typed_id!(
    /// Identifier of a named task within a case.
    ActivityId
);
