// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep merge of override layers.

use crate::value::{Table, Value};

/// Merge `overlay` on top of `base`, returning a new table.
///
/// - keys present on one side only are copied through
/// - two tables under the same key merge recursively
/// - any other collision is won by the overlay, wholesale (sequences are
///   replaced, never merged element by element)
/// - base keys keep their order; overlay-only keys are appended in overlay order
/// - an overlay selector replaces the base selector; a plain overlay keeps it
pub fn merge(base: &Table, overlay: &Table) -> Table {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

fn merge_into(target: &mut Table, overlay: &Table) {
    if let Some(selector) = overlay.selector() {
        target.set_selector(selector.clone());
    }
    for (key, value) in overlay.iter() {
        if let (Some(Value::Table(existing)), Value::Table(incoming)) = (target.get_mut(key), value)
        {
            merge_into(existing, incoming);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
