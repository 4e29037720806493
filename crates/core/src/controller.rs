//! Grid controller - owner of the grid and sequencer of every operation
//!
//! The controller owns the [`Grid`], the cursor, the [`ComboLedger`] and the generator.
//! Detection and resolution borrow the grid for one call and hand back owned outcomes.
//!
//! # Cursor
//!
//! `Idle` (no selection) -> `Selected` (one position) -> `Idle`. Moving the cursor onto the
//! current selection, or off the grid, cancels the selection. The select event goes to the
//! previously selected tile first; only if there was none does the newly selected tile
//! receive it.
//!
//! # Display batches
//!
//! Every animated mutation is published as a [`DisplayBatch`] (see [`take_batch`]). Until
//! the batch is acknowledged with [`resume`], mutating requests fail with
//! [`GridError::BatchPending`]. Each `resume` runs exactly one step of the pending work:
//!
//! ```text
//! swap settled    -> check swapped cells -> destroy | swap back
//! destroy settled -> fill
//! fill settled    -> check filled lines  -> destroy | idle
//! ```
//!
//! so a cascade is driven one batch at a time by the caller, never by recursion.
//!
//! [`take_batch`]: GridController::take_batch
//! [`resume`]: GridController::resume

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, warn};

use crate::config::GridConfig;
use crate::display::{BatchId, Display, DisplayBatch, DisplayIntent};
use crate::error::GridError;
use crate::fill;
use crate::generator::TileGenerator;
use crate::grid::Grid;
use crate::ledger::{ComboLedger, MatchEvent};
use crate::resolver::{self, Resolution};
use crate::snapshot::GridSnapshot;
use crate::tile::SelectAction;
use crate::types::{CursorEvent, CursorOp, Direction, Position};

/// Notification for observers (score/combo widgets, input feedback)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    Cursor(CursorEvent),
    /// Combo of the current cursor cycle went up
    ComboRaised(u32),
    ScoreAdded { delta: f32, total: f32 },
}

/// Work to run once the pending batch settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuation {
    Idle,
    SwapSettled {
        a: Position,
        b: Position,
        revert_on_miss: bool,
    },
    Destroyed,
    Filled,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: BatchId,
    next: Continuation,
}

#[derive(Debug)]
pub struct GridController<G> {
    config: GridConfig,
    grid: Grid,
    generator: G,
    cursor: Option<Position>,
    ledger: ComboLedger,
    /// Positions queued for the next check
    checks: Vec<Position>,
    /// Union of affected sets found by checks, waiting for destruction
    pending_destroy: BTreeSet<Position>,
    score: f32,
    /// Combo of the current cursor cycle
    combo: u32,
    /// Combo finalized by earlier passes of the current cursor cycle
    carried_combo: u32,
    initialized: bool,
    last_batch_id: BatchId,
    outbox: Option<DisplayBatch>,
    pending: Option<Pending>,
    events: Vec<GridEvent>,
}

impl<G: TileGenerator> GridController<G> {
    /// Create a controller over an empty grid; call [`initialize`](Self::initialize) next
    pub fn new(config: GridConfig, generator: G) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self::build(
            config,
            Grid::new(config.width, config.height),
            generator,
        ))
    }

    /// Create a controller over a prepared grid
    ///
    /// The grid is used as-is: no match-free guarantee is applied. Every non-empty tile
    /// must carry its capability set.
    pub fn with_grid(grid: Grid, generator: G) -> Result<Self, GridError> {
        grid.validate()?;
        let config = GridConfig::new(grid.width() as u16, grid.height() as u16);
        let mut controller = Self::build(config, grid, generator);
        controller.initialized = true;
        Ok(controller)
    }

    fn build(config: GridConfig, grid: Grid, generator: G) -> Self {
        Self {
            config,
            grid,
            generator,
            cursor: None,
            ledger: ComboLedger::new(),
            checks: Vec::new(),
            pending_destroy: BTreeSet::new(),
            score: 0.0,
            combo: 0,
            carried_combo: 0,
            initialized: false,
            last_batch_id: 0,
            outbox: None,
            pending: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn set_fill_direction(&mut self, direction: Direction) {
        self.config.fill_direction = direction;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// Combo accumulated over the check passes of the current cursor cycle
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Deduplicated combo of the latest check pass
    pub fn pass_combo(&self) -> u32 {
        self.ledger.total_combo()
    }

    pub fn ledger(&self) -> &ComboLedger {
        &self.ledger
    }

    /// Number of non-empty tiles
    pub fn tile_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Positions waiting for the next check
    pub fn queued_checks(&self) -> &[Position] {
        &self.checks
    }

    /// Positions found by checks and not destroyed yet
    pub fn queued_destroys(&self) -> &BTreeSet<Position> {
        &self.pending_destroy
    }

    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            kinds: self.grid.kinds(),
            cursor: self.cursor,
            score: self.score,
            combo: self.combo,
            pending_batch: self.pending_batch(),
        }
    }

    // ---------------------------------------------------------------------
    // Display protocol
    // ---------------------------------------------------------------------

    /// Take the batch waiting to be shown, if any
    pub fn take_batch(&mut self) -> Option<DisplayBatch> {
        self.outbox.take()
    }

    /// Id of the batch that must be resumed before the next request
    pub fn pending_batch(&self) -> Option<BatchId> {
        self.pending.map(|p| p.id)
    }

    /// True when no batch is waiting for acknowledgement
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Acknowledge that batch `id` has settled and run the next step
    pub fn resume(&mut self, id: BatchId) -> Result<(), GridError> {
        let Some(pending) = self.pending else {
            warn!(batch = id, "resume without a pending batch");
            return Err(GridError::NoBatchPending);
        };
        if pending.id != id {
            warn!(batch = id, expected = pending.id, "resume for stale batch");
            return Err(GridError::StaleBatch {
                expected: pending.id,
                got: id,
            });
        }
        self.pending = None;
        if self.outbox.as_ref().is_some_and(|b| b.id == id) {
            self.outbox = None;
        }
        debug!(batch = id, next = ?pending.next, "batch settled");

        match pending.next {
            Continuation::Idle => {}
            Continuation::SwapSettled {
                a,
                b,
                revert_on_miss,
            } => self.after_swap(a, b, revert_on_miss),
            Continuation::Destroyed => {
                let direction = self.config.fill_direction;
                self.refill(direction)?;
            }
            Continuation::Filled => {
                self.check_and_destroy_pass();
            }
        }
        Ok(())
    }

    /// Show and resume batches until the controller is idle
    ///
    /// Returns the number of batches shown. A batch already taken with
    /// [`take_batch`](Self::take_batch) must be resumed by the caller.
    pub fn run_until_idle<D>(&mut self, display: &mut D) -> Result<usize, GridError>
    where
        D: Display + ?Sized,
    {
        let mut shown = 0;
        while let Some(batch) = self.take_batch() {
            display.present(&batch);
            self.resume(batch.id)?;
            shown += 1;
        }
        Ok(shown)
    }

    fn ensure_idle(&self) -> Result<(), GridError> {
        match self.pending {
            Some(p) => {
                warn!(batch = p.id, "request while a display batch is pending");
                Err(GridError::BatchPending(p.id))
            }
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, intents: Vec<DisplayIntent>, next: Continuation, full_redraw: bool) {
        debug_assert!(self.pending.is_none(), "display batch already in flight");
        self.last_batch_id += 1;
        let id = self.last_batch_id;
        debug!(batch = id, intents = intents.len(), ?next, "dispatch batch");
        self.pending = Some(Pending { id, next });
        self.outbox = Some(DisplayBatch {
            id,
            intents,
            full_redraw,
        });
    }

    // ---------------------------------------------------------------------
    // Board setup
    // ---------------------------------------------------------------------

    /// Fill every cell with generated tiles so that no run exists on the board
    ///
    /// Cells are filled in row-major order; a tile that would complete a run is discarded
    /// and redrawn. Score, combo and cursor start from zero.
    #[instrument(skip(self), fields(width = self.grid.width(), height = self.grid.height()))]
    pub fn initialize(&mut self) -> Result<(), GridError> {
        self.ensure_idle()?;
        self.initialized = false;
        self.grid.clear();
        self.checks.clear();
        self.pending_destroy.clear();

        let positions: Vec<Position> = self.grid.positions().collect();
        let mut redraws = 0u32;
        for p in positions {
            let mut attempts = 0u32;
            loop {
                if attempts >= self.config.max_placement_attempts {
                    return Err(GridError::PlacementStarved {
                        position: p,
                        attempts,
                    });
                }
                attempts += 1;

                let tile = self.generator.next_tile()?;
                tile.validate()?;
                self.grid.set_at(p, tile);
                self.checks.push(p);
                if !self.check() {
                    break;
                }
                self.pending_destroy.clear();
            }
            redraws += attempts - 1;
        }

        self.ledger.reset();
        self.checks.clear();
        self.pending_destroy.clear();
        self.cursor = None;
        self.score = 0.0;
        self.combo = 0;
        self.carried_combo = 0;
        self.initialized = true;
        info!(redraws, "board initialized");

        self.dispatch(Vec::new(), Continuation::Idle, true);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------------

    /// Move the cursor to `target` and let the tiles react
    pub fn move_cursor(&mut self, target: Position) -> Result<CursorEvent, GridError> {
        self.ensure_idle()?;

        let previous = self.cursor.unwrap_or(Position::NONE);
        let op = if self.cursor == Some(target) || !self.grid.contains(target) {
            self.cursor = None;
            CursorOp::Cancel
        } else {
            self.cursor = Some(target);
            CursorOp::Confirm
        };
        let event = CursorEvent {
            op,
            target,
            previous,
        };
        self.start_cursor_cycle(event);
        self.dispatch_select(&event);
        Ok(event)
    }

    /// Drop the selection without notifying any tile
    fn cancel_cursor(&mut self) {
        let event = CursorEvent {
            op: CursorOp::Cancel,
            target: Position::NONE,
            previous: self.cursor.take().unwrap_or(Position::NONE),
        };
        self.start_cursor_cycle(event);
    }

    fn start_cursor_cycle(&mut self, event: CursorEvent) {
        self.combo = 0;
        self.carried_combo = 0;
        self.ledger.reset();
        self.events.push(GridEvent::Cursor(event));
        debug!(
            op = ?event.op,
            target = %event.target,
            previous = %event.previous,
            "cursor moved"
        );
    }

    fn dispatch_select(&mut self, event: &CursorEvent) {
        if event.target.is_none() {
            return;
        }
        let action = match self
            .grid
            .get_at(event.previous)
            .or_else(|| self.grid.get_at(event.target))
        {
            Some(tile) => tile.on_select(event),
            None => return,
        };
        if let SelectAction::Swap {
            a,
            b,
            revert_on_miss,
        } = action
        {
            self.swap_tiles(
                a,
                b,
                Continuation::SwapSettled {
                    a,
                    b,
                    revert_on_miss,
                },
            );
        }
    }

    fn after_swap(&mut self, a: Position, b: Position, revert_on_miss: bool) {
        // A settled swap ends the selection cycle.
        self.cancel_cursor();
        self.add_check(&[a, b]);

        if !revert_on_miss {
            self.check_and_destroy_pass();
            return;
        }
        if self.check() {
            self.destroy_queued();
        } else {
            debug!(a = %a, b = %b, "no match, swapping back");
            self.swap_tiles(a, b, Continuation::Idle);
        }
    }

    // ---------------------------------------------------------------------
    // Swap
    // ---------------------------------------------------------------------

    /// Exchange two tiles and publish the movement
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GridError> {
        self.ensure_idle()?;
        for p in [a, b] {
            if !self.grid.contains(p) {
                warn!(position = %p, "swap outside grid");
                return Err(GridError::OutOfRange(p));
            }
        }
        self.swap_tiles(a, b, Continuation::Idle);
        Ok(())
    }

    fn swap_tiles(&mut self, a: Position, b: Position, next: Continuation) {
        debug_assert!(self.grid.contains(a) && self.grid.contains(b));
        if !self.grid.swap(a, b) {
            return;
        }
        let intents: Vec<DisplayIntent> = [(a, b), (b, a)]
            .into_iter()
            .filter_map(|(to, from)| {
                self.grid.get_at(to).map(|tile| DisplayIntent::Move {
                    tile: tile.clone(),
                    from,
                    to,
                })
            })
            .collect();
        self.dispatch(intents, next, false);
    }

    // ---------------------------------------------------------------------
    // Check and destroy
    // ---------------------------------------------------------------------

    /// Queue positions for the next check
    ///
    /// Positions outside the grid are dropped with a warning.
    pub fn add_check(&mut self, positions: &[Position]) {
        for &p in positions {
            if !self.grid.contains(p) {
                warn!(position = %p, "check point outside grid");
                continue;
            }
            if !self.checks.contains(&p) {
                self.checks.push(p);
            }
        }
        debug!(queued = self.checks.len(), "check points added");
    }

    /// Queue positions for the next destroy, without a check
    ///
    /// Positions outside the grid are dropped with a warning.
    pub fn add_destroy(&mut self, positions: &[Position]) {
        for &p in positions {
            if self.grid.contains(p) {
                self.pending_destroy.insert(p);
            } else {
                warn!(position = %p, "destroy target outside grid");
            }
        }
    }

    /// Run detection over the queued check points
    ///
    /// Matches are recorded in the ledger and their affected cells are queued for
    /// destruction. The check queue is emptied. Returns whether any match was found.
    pub fn check(&mut self) -> bool {
        let mut found = false;
        for p in std::mem::take(&mut self.checks) {
            let Some(tile) = self.grid.get_at(p) else {
                debug!(position = %p, "check point outside grid");
                continue;
            };
            let outcome = tile.on_match(&self.grid);
            if !outcome.is_match() {
                continue;
            }
            debug!(
                origin = %p,
                kind = tile.kind,
                cells = outcome.affected.len(),
                combo = outcome.combo_delta,
                "match found"
            );
            self.pending_destroy.extend(outcome.affected.iter().copied());
            self.ledger.record(MatchEvent {
                origin: p,
                match_kind: tile.match_kind(),
                affected: outcome.affected,
                combo_delta: outcome.combo_delta,
            });
            found = true;
        }

        let combo = self.carried_combo + self.ledger.total_combo();
        if self.initialized && combo > self.combo {
            self.events.push(GridEvent::ComboRaised(combo));
        }
        self.combo = combo;
        found
    }

    /// Destroy every queued position and start the refill
    pub fn destroy(&mut self) -> Result<Resolution, GridError> {
        self.ensure_idle()?;
        Ok(self.destroy_queued())
    }

    /// Check queued positions and destroy what matched
    pub fn check_and_destroy(&mut self) -> Result<bool, GridError> {
        self.ensure_idle()?;
        Ok(self.check_and_destroy_pass())
    }

    fn check_and_destroy_pass(&mut self) -> bool {
        self.carried_combo = self.combo;
        self.ledger.reset();
        if self.check() {
            self.destroy_queued();
            true
        } else {
            false
        }
    }

    fn destroy_queued(&mut self) -> Resolution {
        let seeds = std::mem::take(&mut self.pending_destroy);
        let resolution = resolver::resolve(&mut self.grid, seeds);
        if resolution.score != 0.0 {
            self.score += resolution.score;
            self.events.push(GridEvent::ScoreAdded {
                delta: resolution.score,
                total: self.score,
            });
        }
        self.dispatch(resolution.intents.clone(), Continuation::Destroyed, false);
        resolution
    }

    /// Remove tiles without running destroy hooks, scoring or refilling
    pub fn destroy_without_effect(&mut self, positions: &[Position]) -> Result<(), GridError> {
        self.ensure_idle()?;
        if let Some(&p) = positions.iter().find(|p| !self.grid.contains(**p)) {
            warn!(position = %p, "destroy outside grid");
            return Err(GridError::OutOfRange(p));
        }
        let intents: Vec<DisplayIntent> = positions
            .iter()
            .filter_map(|&at| {
                self.grid
                    .take(at)
                    .filter(|tile| !tile.is_empty())
                    .map(|tile| DisplayIntent::Destroy { tile, at })
            })
            .collect();
        self.dispatch(intents, Continuation::Idle, false);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Fill
    // ---------------------------------------------------------------------

    /// Slide tiles into empty cells, generate new ones, then re-check the touched lines
    pub fn fill(&mut self, direction: Direction) -> Result<(), GridError> {
        self.ensure_idle()?;
        self.refill(direction)
    }

    fn refill(&mut self, direction: Direction) -> Result<(), GridError> {
        let report = fill::fill(&mut self.grid, direction, &mut self.generator)?;
        self.add_check(&report.checks);
        self.dispatch(report.intents, Continuation::Filled, false);
        Ok(())
    }
}
