use log::{debug, info};

use super::data::{ImageRecord, ImageRef, Manifest, RenderMode, RenderOptions};
use crate::error::LayoutSkip;
use crate::layout::{pack, OrderingPolicy, Row};
use crate::render::IncrementalAssembler;

/// Identifies one population of the session.
/// Results carrying an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationTicket(u64);

/// What the caller should do with the surface after a probe resolved
#[derive(Debug, Default, PartialEq)]
pub struct Progress {
    /// Rows to append below what is already shown
    pub append: Vec<Row>,
    /// Replace everything with these rows
    pub relayout: Option<Vec<Row>>,
    /// Every probe of the population has resolved
    pub completed: bool,
}

impl Progress {
    fn merge(&mut self, next: Progress) {
        self.append.extend(next.append);
        if next.relayout.is_some() {
            self.relayout = next.relayout;
        }
        self.completed |= next.completed;
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Populating {
        ticket: PopulationTicket,
        assembler: IncrementalAssembler,
        policy: OrderingPolicy,
    },
    Ready,
}

/// The layout state of one gallery view.
///
/// Owns the record set and the current row size. The record set is rebuilt
/// from scratch on every population; resizes only re-pack it. A resize while
/// a population is in flight is remembered and applied once it completes, so
/// a full layout never runs on a partial record set.
#[derive(Debug)]
pub struct LayoutSession {
    generation: u64,
    images_per_row: usize,
    options: RenderOptions,
    records: Vec<ImageRecord>,
    phase: Phase,
}

impl LayoutSession {
    pub fn new(images_per_row: usize) -> Self {
        Self {
            generation: 0,
            images_per_row: images_per_row.max(1),
            options: RenderOptions::default(),
            records: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn images_per_row(&self) -> usize {
        self.images_per_row
    }

    /// The complete record set in display order (empty while populating)
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn is_populating(&self) -> bool {
        matches!(self.phase, Phase::Populating { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    /// Is `ticket` the population currently in flight
    pub fn is_current(&self, ticket: PopulationTicket) -> bool {
        matches!(&self.phase, Phase::Populating { ticket: current, .. } if *current == ticket)
    }

    /// Start a new population, discarding the previous record set.
    ///
    /// Returns the ticket to tag probe results with and the references in
    /// display order; slot `i` of the population is `refs[i]`.
    pub fn begin(
        &mut self,
        mut refs: Vec<ImageRef>,
        manifest: Option<&Manifest>,
        options: RenderOptions,
    ) -> Result<(PopulationTicket, Vec<ImageRef>), LayoutSkip> {
        if refs.is_empty() {
            info!("No source images found for gallery processing");
            return Err(LayoutSkip::EmptySourceSet);
        }

        let policy = OrderingPolicy::new(manifest);
        if policy.uses_manifest() {
            info!("Sorting {} images based on manifest", refs.len());
        } else {
            info!("No manifest provided, sorting {} images alphabetically", refs.len());
        }
        policy.order_refs(&mut refs);

        self.generation += 1;
        let ticket = PopulationTicket(self.generation);
        self.options = options;
        self.records.clear();
        self.phase = Phase::Populating {
            ticket,
            assembler: IncrementalAssembler::new(refs.len(), self.images_per_row),
            policy,
        };

        Ok((ticket, refs))
    }

    /// Feed one probe result. Returns None for results of an outdated population.
    pub fn resolve(&mut self, ticket: PopulationTicket, slot: usize, record: ImageRecord) -> Option<Progress> {
        let Phase::Populating {
            ticket: current,
            assembler,
            ..
        } = &mut self.phase
        else {
            return None;
        };
        if *current != ticket {
            debug!("Dropping probe result of an outdated population");
            return None;
        }

        let rows = assembler.resolve(slot, record);
        if !assembler.is_complete() {
            let append = match self.options.mode {
                RenderMode::Incremental => rows,
                RenderMode::Batch => Vec::new(),
            };
            return Some(Progress {
                append,
                relayout: None,
                completed: false,
            });
        }

        Some(self.finish(rows))
    }

    /// Feed the whole batch at once, `records[i]` belonging to slot `i`
    pub fn complete(&mut self, ticket: PopulationTicket, records: Vec<ImageRecord>) -> Option<Progress> {
        let mut progress = Progress::default();
        for (slot, record) in records.into_iter().enumerate() {
            progress.merge(self.resolve(ticket, slot, record)?);
        }
        Some(progress)
    }

    fn finish(&mut self, last_rows: Vec<Row>) -> Progress {
        let Phase::Populating {
            assembler, policy, ..
        } = std::mem::replace(&mut self.phase, Phase::Ready)
        else {
            return Progress::default();
        };

        let packed_with = assembler.images_per_row();
        let records = assembler.into_records().unwrap_or_default();
        self.records = policy.order_records(records);
        info!("Gallery populated with {} images", self.records.len());

        // Batch galleries render here for the first time; incremental ones
        // only if a resize changed the row size mid-population
        let relayout = match self.options.mode {
            RenderMode::Batch => Some(self.current_rows()),
            RenderMode::Incremental if packed_with != self.images_per_row => {
                debug!("Row size changed during population, re-laying out");
                Some(self.current_rows())
            }
            RenderMode::Incremental => None,
        };

        Progress {
            append: if relayout.is_some() { Vec::new() } else { last_rows },
            relayout,
            completed: true,
        }
    }

    /// Apply a new row size. Returns the rows to render, or None while a
    /// population is in flight (the change is applied when it completes)
    /// or when there is nothing to show.
    pub fn relayout(&mut self, images_per_row: usize) -> Option<Vec<Row>> {
        self.images_per_row = images_per_row.max(1);

        if !self.is_ready() {
            debug!("Re-layout deferred, gallery not fully populated");
            return None;
        }
        if self.records.is_empty() {
            return None;
        }

        Some(self.current_rows())
    }

    /// Rows for the current record set and row size
    pub fn current_rows(&self) -> Vec<Row> {
        pack(&self.records, self.images_per_row)
    }
}
