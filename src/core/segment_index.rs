use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::period::PhaseType;
use crate::core::segmentation::Bar;

/// Whether a bar opens and/or closes its `(period, phase)` group.
///
/// Drives where resize handles and rounded corners appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentPositionEntry {
    pub is_first_segment: bool,
    pub is_last_segment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentPositionIndex {
    entries: IndexMap<usize, SegmentPositionEntry>,
}

impl SegmentPositionIndex {
    /// Looks up a bar by index. A miss means the index is stale relative to
    /// the bar set and resolves to "neither first nor last".
    #[must_use]
    pub fn get(&self, bar_index: usize) -> SegmentPositionEntry {
        self.entries.get(&bar_index).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, SegmentPositionEntry)> + '_ {
        self.entries.iter().map(|(index, entry)| (*index, *entry))
    }
}

/// Rebuilds the index from scratch for `bars`.
#[must_use]
pub fn build_segment_index(bars: &[Bar]) -> SegmentPositionIndex {
    let mut groups: IndexMap<(usize, PhaseType), Vec<usize>> = IndexMap::new();
    for (bar_index, bar) in bars.iter().enumerate() {
        groups
            .entry((bar.period_index, bar.phase))
            .or_default()
            .push(bar_index);
    }

    let mut entries = IndexMap::with_capacity(bars.len());
    for members in groups.values_mut() {
        members.sort_by_key(|&bar_index| {
            let bar = &bars[bar_index];
            (bar.day_index, OrderedFloat(bar.start_hour))
        });
        let last = members.len() - 1;
        for (position, &bar_index) in members.iter().enumerate() {
            entries.insert(
                bar_index,
                SegmentPositionEntry {
                    is_first_segment: position == 0,
                    is_last_segment: position == last,
                },
            );
        }
    }
    entries.sort_keys();

    SegmentPositionIndex { entries }
}
