use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use crate::{DtPicker, format::FormatError, options::PickerOptions};

/// One picker per bound element, keyed by whatever identifies the element
/// in the host (an id, a node handle).
#[derive(Debug)]
pub struct PickerRegistry<K> {
    pickers: HashMap<K, DtPicker>,
}

impl<K> Default for PickerRegistry<K> {
    fn default() -> Self {
        Self {
            pickers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> PickerRegistry<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a picker to `key`, or returns the one already bound there.
    ///
    /// An existing picker keeps its state; `initial_text` and `options` are
    /// only used for a new binding.
    ///
    /// # Errors
    /// Returns `FormatError` if a new binding's format is not a usable
    /// template. Nothing is registered in that case.
    pub fn bind(
        &mut self,
        key: K,
        initial_text: &str,
        options: PickerOptions,
    ) -> Result<&mut DtPicker, FormatError> {
        match self.pickers.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(DtPicker::bind(initial_text, options)?)),
        }
    }

    pub fn get(&self, key: &K) -> Option<&DtPicker> {
        self.pickers.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut DtPicker> {
        self.pickers.get_mut(key)
    }

    /// Detaches and returns the picker bound to `key`.
    pub fn unbind(&mut self, key: &K) -> Option<DtPicker> {
        self.pickers.remove(key)
    }

    pub fn len(&self) -> usize {
        self.pickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickers.is_empty()
    }
}
