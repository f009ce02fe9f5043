use std::{
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};

use ahash::AHashMap;
use viewbuf_bytes::LookupBuffer;
use viewbuf_common::Result;
use viewbuf_values::{DataType, DateTimeValue, TypedValue};

use crate::{
    options::DecodeOptions,
    slots::{SlotTable, TableLayout, populate_slots},
};

/// Tables with at most this many items are searched linearly.
const LINEAR_LOOKUP_MAX_ITEMS: usize = 4;

/// An ordered table of named, type-tagged item values, as returned for the
/// summary of an entry.
///
/// Names keep their on-wire order. Lookup by name is case-insensitive; when
/// several items share a name, the first one wins.
#[derive(Debug, Clone)]
pub struct NamedTable {
    inner: Arc<NamedTableInner>,
}

#[derive(Debug)]
struct NamedTableInner {
    slots: SlotTable,
    names: Vec<String>,
    lookup: OnceLock<AHashMap<String, usize>>,
}

impl NamedTable {
    /// Decodes the named table at `offset` of `buffer`, returning the table and
    /// its declared total length.
    pub fn decode(
        buffer: &LookupBuffer,
        offset: usize,
        options: &DecodeOptions,
    ) -> Result<(NamedTable, usize)> {
        let data = buffer.read()?;
        Self::decode_from(buffer, &data, offset, options)
    }

    pub(crate) fn decode_from(
        buffer: &LookupBuffer,
        data: &[u8],
        offset: usize,
        options: &DecodeOptions,
    ) -> Result<(NamedTable, usize)> {
        let table = populate_slots(
            buffer,
            data,
            offset,
            TableLayout::Named,
            &options.value_decoder(),
            options.decode_all_values,
        )?;
        let consumed = table.consumed;
        let inner = NamedTableInner {
            slots: table.slots,
            names: table.names,
            lookup: OnceLock::new(),
        };
        Ok((
            NamedTable {
                inner: Arc::new(inner),
            },
            consumed,
        ))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    /// Declared total length of the table in bytes, including its header.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.inner.slots.total_len()
    }

    /// Item names in on-wire order.
    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.inner.names.get(index).map(String::as_str)
    }

    /// Returns the value of item `index`, decoding it on first access.
    pub fn value(&self, index: usize) -> Result<&TypedValue> {
        self.inner.slots.value(index)
    }

    pub fn data_type(&self, index: usize) -> Option<DataType> {
        self.inner.slots.data_type(index)
    }

    /// On-wire length of every value in bytes, including its type tag.
    pub fn value_lengths(&self) -> Vec<usize> {
        self.inner.slots.value_lengths()
    }

    pub fn is_released(&self) -> bool {
        self.inner.slots.is_released()
    }

    /// Returns `true` if an item with this name (ignoring case) exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Returns the index of the first item named `name`, ignoring case.
    pub fn find_index(&self, name: &str) -> Option<usize> {
        if let Some(lookup) = self.build_lookup() {
            lookup.get(&name.to_lowercase()).copied()
        } else {
            self.inner
                .names
                .iter()
                .position(|candidate| names_match(candidate, name))
        }
    }

    /// Returns the value of the first item named `name`, ignoring case.
    pub fn get(&self, name: &str) -> Result<Option<&TypedValue>> {
        self.find_index(name).map(|i| self.value(i)).transpose()
    }

    /// Returns the item as a string: a text value, or the first element of a text
    /// list. Any other value, and a missing item, yields `default`.
    pub fn get_as_string(&self, name: &str, default: &str) -> Result<String> {
        Ok(self
            .get(name)?
            .and_then(TypedValue::coerce_string)
            .unwrap_or_else(|| default.to_string()))
    }

    /// Returns the item as a list of strings; numbers and times are converted to
    /// their display form.
    pub fn get_as_string_list(&self, name: &str, default: &[&str]) -> Result<Vec<String>> {
        Ok(self
            .get(name)?
            .and_then(TypedValue::coerce_string_list)
            .unwrap_or_else(|| default.iter().map(|s| s.to_string()).collect()))
    }

    /// Returns the item as a number: a number value, or the first element of a
    /// number list.
    pub fn get_as_number(&self, name: &str, default: f64) -> Result<f64> {
        Ok(self
            .get(name)?
            .and_then(TypedValue::coerce_number)
            .unwrap_or(default))
    }

    /// Like [`get_as_number`](Self::get_as_number), truncated to an integer.
    pub fn get_as_integer(&self, name: &str, default: i32) -> Result<i32> {
        Ok(self
            .get(name)?
            .and_then(TypedValue::coerce_integer)
            .unwrap_or(default))
    }

    pub fn get_as_number_list(&self, name: &str, default: &[f64]) -> Result<Vec<f64>> {
        Ok(self
            .get(name)?
            .and_then(TypedValue::coerce_number_list)
            .unwrap_or_else(|| default.to_vec()))
    }

    pub fn get_as_integer_list(&self, name: &str, default: &[i32]) -> Result<Vec<i32>> {
        Ok(self
            .get(name)?
            .and_then(TypedValue::coerce_integer_list)
            .unwrap_or_else(|| default.to_vec()))
    }

    /// Returns the item as a date/time: a time value, or the first element of a
    /// time list.
    pub fn get_as_time(&self, name: &str) -> Result<Option<DateTimeValue>> {
        Ok(self.get(name)?.and_then(TypedValue::coerce_time))
    }

    pub fn get_as_time_list(&self, name: &str) -> Result<Option<Vec<DateTimeValue>>> {
        Ok(self.get(name)?.and_then(TypedValue::coerce_time_list))
    }

    /// Returns all items keyed by name. Of several items whose names differ only
    /// in case, the first one is kept under its own spelling.
    pub fn to_map(&self) -> Result<BTreeMap<String, TypedValue>> {
        let mut map = BTreeMap::new();
        let mut seen = AHashMap::with_capacity(self.len());
        for (index, name) in self.inner.names.iter().enumerate() {
            if seen.insert(name.to_lowercase(), index).is_some() {
                continue;
            }
            map.insert(name.clone(), self.value(index)?.clone());
        }
        Ok(map)
    }

    fn build_lookup(&self) -> Option<&AHashMap<String, usize>> {
        if self.len() <= LINEAR_LOOKUP_MAX_ITEMS {
            return None;
        }
        let lookup = self.inner.lookup.get_or_init(|| {
            let mut lookup = AHashMap::with_capacity(self.len());
            for (index, name) in self.inner.names.iter().enumerate() {
                lookup.entry(name.to_lowercase()).or_insert(index);
            }
            lookup
        });
        Some(lookup)
    }
}

fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
