/// Display order of a gallery.
///
/// Either a manifest supplied by the gallery source decides the order, or
/// filenames are compared alphabetically. Both only look at filenames, so the
/// same policy can order references before any probe has resolved.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::state::data::{ImageRecord, ImageRef, Manifest};

/// Resolved ordering rule for one population
#[derive(Debug, Clone, Default)]
pub struct OrderingPolicy {
    /// filename -> manifest position; None means alphabetical
    positions: Option<HashMap<String, usize>>,
}

impl OrderingPolicy {
    /// Build the policy. A missing or empty manifest falls back to alphabetical order.
    pub fn new(manifest: Option<&Manifest>) -> Self {
        let positions = manifest.filter(|m| !m.is_empty()).map(|m| {
            // A filename listed twice keeps its last position
            m.filenames
                .iter()
                .enumerate()
                .map(|(index, name)| (name.clone(), index))
                .collect::<HashMap<_, _>>()
        });

        Self { positions }
    }

    pub fn alphabetical() -> Self {
        Self::default()
    }

    pub fn uses_manifest(&self) -> bool {
        self.positions.is_some()
    }

    /// Manifest position of a filename, None if unlisted or no manifest
    pub fn position(&self, filename: &str) -> Option<usize> {
        self.positions
            .as_ref()
            .and_then(|positions| positions.get(filename).copied())
    }

    /// Stable sort of arbitrary items by their filename.
    ///
    /// With a manifest, unlisted items go after every listed one and keep
    /// their encounter order among themselves.
    pub fn sort_by_filename<T, F>(&self, items: &mut [T], filename: F)
    where
        F: Fn(&T) -> &str,
    {
        match &self.positions {
            Some(positions) => items.sort_by_key(|item| {
                positions
                    .get(filename(item))
                    .copied()
                    .unwrap_or(usize::MAX)
            }),
            None => items.sort_by(|a, b| compare_filenames(filename(a), filename(b))),
        }
    }

    /// Order references before probing
    pub fn order_refs(&self, refs: &mut [ImageRef]) {
        self.sort_by_filename(refs, |r| r.filename());
    }

    /// Order a resolved record set, stamping each record with its manifest position
    pub fn order_records(&self, records: Vec<ImageRecord>) -> Vec<ImageRecord> {
        let mut records: Vec<ImageRecord> = records
            .into_iter()
            .map(|record| {
                let order = self.position(record.filename());
                record.with_order(order)
            })
            .collect();

        self.sort_by_filename(&mut records, |r| r.filename());
        records
    }
}

/// Filename collation used when no manifest is given.
///
/// Characters are compared case-folded first; on a tie lowercase sorts
/// before uppercase, then raw code points decide. "b.jpg", "a.jpg", "C.jpg"
/// therefore order as a, b, C.
///
/// Punctuation is not special-cased and compares by code point, so digits
/// sort before `_`: "a1.jpg" comes before "a_1.jpg". Locale-aware collation
/// puts punctuation first and orders that pair the other way.
pub fn compare_filenames(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| a.chars().map(case_rank).cmp(b.chars().map(case_rank)))
        .then_with(|| a.cmp(b))
}

fn case_rank(c: char) -> u8 {
    if c.is_uppercase() {
        1
    } else {
        0
    }
}
