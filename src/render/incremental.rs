/// Progressive row assembly.
///
/// The display order is fixed before probing starts, so a row can be shown as
/// soon as every image in it (and every image before it) has been probed.
/// Probes finishing out of order just wait in their slot.

use crate::layout::packer::Row;
use crate::state::data::ImageRecord;

#[derive(Debug, Clone)]
pub struct IncrementalAssembler {
    /// One slot per image, in display order
    slots: Vec<Option<ImageRecord>>,
    /// Length of the fully resolved leading run
    resolved_prefix: usize,
    /// Records already handed out as rows
    emitted: usize,
    images_per_row: usize,
}

impl IncrementalAssembler {
    pub fn new(len: usize, images_per_row: usize) -> Self {
        Self {
            slots: vec![None; len],
            resolved_prefix: 0,
            emitted: 0,
            images_per_row: images_per_row.max(1),
        }
    }

    pub fn images_per_row(&self) -> usize {
        self.images_per_row
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots filled so far
    pub fn resolved(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.resolved_prefix == self.slots.len()
    }

    /// Store the record for `slot` and return the rows that became ready.
    ///
    /// Out of range or already filled slots are ignored.
    pub fn resolve(&mut self, slot: usize, record: ImageRecord) -> Vec<Row> {
        match self.slots.get_mut(slot) {
            Some(entry) if entry.is_none() => *entry = Some(record),
            _ => return Vec::new(),
        }

        while self
            .slots
            .get(self.resolved_prefix)
            .is_some_and(|entry| entry.is_some())
        {
            self.resolved_prefix += 1;
        }

        let mut rows = Vec::new();
        while self.resolved_prefix - self.emitted >= self.images_per_row {
            rows.push(self.take_row(self.images_per_row));
        }
        // The last row may be short
        if self.is_complete() && self.emitted < self.slots.len() {
            rows.push(self.take_row(self.slots.len() - self.emitted));
        }

        rows
    }

    fn take_row(&mut self, len: usize) -> Row {
        let records: Vec<ImageRecord> = self.slots[self.emitted..self.emitted + len]
            .iter()
            .flatten()
            .cloned()
            .collect();
        self.emitted += len;
        Row::from_records(&records)
    }

    /// The complete record set in display order, once every slot is filled
    pub fn into_records(self) -> Option<Vec<ImageRecord>> {
        self.slots.into_iter().collect()
    }
}
