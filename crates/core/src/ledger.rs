//! Combo ledger - match event deduplication
//!
//! Several check points can report the same physical elimination: every member of a
//! 3-run that is checked yields the same run. Two events are equivalent when they share
//! a match kind and an identical affected set, whatever their origin. Equivalent events
//! count once; when they disagree on `combo_delta`, the higher value is kept.

use std::collections::BTreeSet;

use tracing::debug;

use crate::types::Position;

/// One reported match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// Check point that produced the event
    pub origin: Position,
    /// Detection policy label of the tile at `origin`
    pub match_kind: &'static str,
    pub affected: BTreeSet<Position>,
    pub combo_delta: u32,
}

impl MatchEvent {
    /// Same match kind and same affected set
    pub fn is_equivalent(&self, other: &MatchEvent) -> bool {
        self.match_kind == other.match_kind && self.affected == other.affected
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComboLedger {
    /// Every recorded event in order
    log: Vec<MatchEvent>,
    /// One representative per equivalence class
    distinct: Vec<MatchEvent>,
}

impl ComboLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: MatchEvent) {
        self.log.push(event.clone());
        match self.distinct.iter_mut().find(|e| e.is_equivalent(&event)) {
            Some(existing) if event.combo_delta > existing.combo_delta => {
                debug!(
                    origin = %event.origin,
                    from = existing.combo_delta,
                    to = event.combo_delta,
                    "match event upgraded"
                );
                *existing = event;
            }
            Some(_) => {}
            None => self.distinct.push(event),
        }
    }

    /// Sum of `combo_delta` over distinct events
    pub fn total_combo(&self) -> u32 {
        self.distinct.iter().map(|e| e.combo_delta).sum()
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.log
    }

    pub fn distinct(&self) -> &[MatchEvent] {
        &self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn reset(&mut self) {
        self.log.clear();
        self.distinct.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(
        origin: (i32, i32),
        kind: &'static str,
        cells: &[(i32, i32)],
        combo: u32,
    ) -> MatchEvent {
        MatchEvent {
            origin: origin.into(),
            match_kind: kind,
            affected: cells.iter().map(|&p| Position::from(p)).collect(),
            combo_delta: combo,
        }
    }

    const RUN: [(i32, i32); 3] = [(0, 0), (1, 0), (2, 0)];

    #[test]
    fn equivalent_events_count_once() {
        let mut ledger = ComboLedger::new();
        ledger.record(event((0, 0), "run3", &RUN, 1));
        ledger.record(event((2, 0), "run3", &[(2, 0), (0, 0), (1, 0)], 1));
        assert_eq!(ledger.total_combo(), 1);
        assert_eq!(ledger.events().len(), 2);
        assert_eq!(ledger.distinct().len(), 1);
    }

    #[test]
    fn higher_combo_wins_regardless_of_order() {
        let mut ledger = ComboLedger::new();
        ledger.record(event((0, 0), "run3", &RUN, 1));
        ledger.record(event((1, 0), "run3", &RUN, 2));
        assert_eq!(ledger.total_combo(), 2);
        assert_eq!(ledger.distinct()[0].origin, Position::new(1, 0));

        ledger.record(event((2, 0), "run3", &RUN, 1));
        assert_eq!(ledger.total_combo(), 2);
        assert_eq!(ledger.distinct()[0].origin, Position::new(1, 0));
    }

    #[test]
    fn different_kind_or_area_is_distinct() {
        let mut ledger = ComboLedger::new();
        ledger.record(event((0, 0), "run3", &RUN, 1));
        ledger.record(event((0, 0), "none", &RUN, 1));
        ledger.record(event((0, 0), "run3", &[(0, 0), (1, 0), (2, 0), (3, 0)], 1));
        assert_eq!(ledger.total_combo(), 3);
    }

    #[test]
    fn reset_clears_log_and_total() {
        let mut ledger = ComboLedger::new();
        ledger.record(event((0, 0), "run3", &RUN, 1));
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_combo(), 0);
    }
}
