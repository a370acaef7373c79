/// Row packing.
///
/// Records are cut into contiguous rows of `images_per_row` and every tile
/// gets a share of the row width proportional to its aspect ratio. Since
/// width is proportional to aspect ratio, every tile in a row ends up with
/// the same height (see `RowDescriptor::height_for_width`).

use crate::state::data::{ImageRecord, FALLBACK_ASPECT_RATIO};

/// One image placed in a row
#[derive(Debug, Clone, PartialEq)]
pub struct PackedTile {
    pub record: ImageRecord,
    /// Percentage of the row width, 0..=100
    pub flex_share: f64,
}

/// A band of tiles whose shares add up to 100
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub tiles: Vec<PackedTile>,
}

impl Row {
    /// Compute shares for one group of records
    pub fn from_records(records: &[ImageRecord]) -> Self {
        let aspect_sum: f64 = records.iter().map(effective_ratio).sum();
        let equal_share = 100.0 / records.len().max(1) as f64;
        let proportional = aspect_sum.is_finite() && aspect_sum > 0.0;

        let tiles = records
            .iter()
            .map(|record| {
                let flex_share = if proportional {
                    effective_ratio(record) / aspect_sum * 100.0
                } else {
                    equal_share
                };

                PackedTile {
                    record: record.clone(),
                    flex_share,
                }
            })
            .collect();

        Row { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum of all shares, 100 up to rounding
    pub fn total_share(&self) -> f64 {
        self.tiles.iter().map(|t| t.flex_share).sum()
    }
}

/// Ratio used for layout math; anything unusable counts as square
fn effective_ratio(record: &ImageRecord) -> f64 {
    if record.aspect_ratio.is_finite() && record.aspect_ratio > 0.0 {
        record.aspect_ratio
    } else {
        FALLBACK_ASPECT_RATIO
    }
}

/// Partition ordered records into rows of `images_per_row` (at least 1).
/// The last row holds the remainder.
pub fn pack(records: &[ImageRecord], images_per_row: usize) -> Vec<Row> {
    records
        .chunks(images_per_row.max(1))
        .map(Row::from_records)
        .collect()
}
