//! Property table and operations
//!
//! Objects store their own properties in a table keyed by name. Lookup goes
//! through a hash index; enumeration follows insertion order, which is what
//! `for (key in obj)` observes for string keys.

use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A named property in an object's property table
#[derive(Clone, Debug)]
pub struct Property {
    /// Property name
    pub key: Rc<str>,
    /// Property value
    pub value: Value,
}

impl Property {
    /// Create a new property
    #[inline]
    pub fn new(key: Rc<str>, value: Value) -> Self {
        Property { key, value }
    }
}

/// Property table structure
///
/// Layout:
/// - slots: properties in insertion order; deleted entries leave a hole
/// - index: name -> slot
///
/// Holes are squeezed out once they outnumber live entries.
#[derive(Debug, Default)]
pub struct PropertyTable {
    /// Properties in insertion order (None = deleted)
    slots: Vec<Option<Property>>,
    /// Hash index into slots
    index: HashMap<Rc<str>, usize>,
    /// Number of holes in slots
    deleted: usize,
}

impl PropertyTable {
    /// Minimum number of holes before compaction is considered
    const MIN_COMPACT: usize = 8;

    /// Create a new empty property table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a property table with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        PropertyTable {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            deleted: 0,
        }
    }

    /// Get the number of properties
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get a property by key
    pub fn get(&self, key: &str) -> Option<&Property> {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_ref()
    }

    /// Get a mutable property reference by key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Property> {
        let idx = *self.index.get(key)?;
        self.slots[idx].as_mut()
    }

    /// Insert or update a property
    ///
    /// Returns true if this was a new property, false if updated.
    /// Updating keeps the property's enumeration position.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        if let Some(prop) = self.get_mut(key) {
            prop.value = value;
            return false;
        }

        let key: Rc<str> = Rc::from(key);
        self.index.insert(key.clone(), self.slots.len());
        self.slots.push(Some(Property::new(key, value)));
        true
    }

    /// Delete a property by key
    ///
    /// Returns true if the property existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let Some(idx) = self.index.remove(key) else {
            return false;
        };

        self.slots[idx] = None;
        self.deleted += 1;

        if self.deleted >= Self::MIN_COMPACT && self.deleted > self.index.len() {
            self.compact();
        }
        true
    }

    /// Drop holes and rebuild the index
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index.clear();
        for (i, prop) in self.slots.iter().flatten().enumerate() {
            self.index.insert(prop.key.clone(), i);
        }
        self.deleted = 0;
    }

    /// Iterate over all properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.slots.iter().flatten()
    }

    /// Iterate over all property keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> + '_ {
        self.iter().map(|p| &p.key)
    }

    /// Check if a property exists
    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}
