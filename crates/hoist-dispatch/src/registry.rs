use std::collections::{BTreeMap, BTreeSet};

use hoist_core::{Direction, Floor, FloorView, PassengerId};

/// An outstanding request at a floor for travel in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HallCall {
    /// Floor where the call was placed.
    pub floor: Floor,
    /// Requested travel direction.
    pub direction: Direction,
    /// Tick at which the call was first registered.
    pub first_tick: u64,
    /// Passengers known to be waiting for this call.
    pub waiting: BTreeSet<PassengerId>,
}

impl HallCall {
    /// Number of passengers known to be waiting. Never less than one while
    /// the call exists.
    pub fn waiting_count(&self) -> usize {
        self.waiting.len().max(1)
    }
}

/// Outstanding up/down calls per floor.
///
/// Entries are only removed when ground truth says nobody is left waiting;
/// a car visiting a floor is not enough.
#[derive(Debug, Clone, Default)]
pub struct HallCallRegistry {
    calls: BTreeMap<(Floor, Direction), HallCall>,
}

impl HallCallRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a pending call. Repeating the same `(floor, direction)` keeps the
    /// original registration tick; passenger ids accumulate.
    /// Returns true if the call is new.
    pub fn register_call(
        &mut self,
        floor: Floor,
        direction: Direction,
        passenger: Option<PassengerId>,
        tick: u64,
    ) -> bool {
        let mut created = false;
        let call = self.calls.entry((floor, direction)).or_insert_with(|| {
            created = true;
            HallCall {
                floor,
                direction,
                first_tick: tick,
                waiting: BTreeSet::new(),
            }
        });
        if let Some(id) = passenger {
            call.waiting.insert(id);
        }
        created
    }

    /// Remove the call only if `still_waiting` is zero. Returns true if a call was removed.
    pub fn clear_if_empty(&mut self, floor: Floor, direction: Direction, still_waiting: usize) -> bool {
        if still_waiting > 0 {
            return false;
        }
        self.calls.remove(&(floor, direction)).is_some()
    }

    /// Overwrite both directions at a floor from ground truth.
    ///
    /// Returns the directions whose call was cleared.
    pub fn reconcile(&mut self, view: &FloorView, tick: u64) -> Vec<Direction> {
        let mut cleared = Vec::new();
        for direction in Direction::ALL {
            let queue = view.queue(direction);
            if self.clear_if_empty(view.floor, direction, queue.len()) {
                cleared.push(direction);
                continue;
            }
            if queue.is_empty() {
                continue;
            }
            let call = self
                .calls
                .entry((view.floor, direction))
                .or_insert_with(|| HallCall {
                    floor: view.floor,
                    direction,
                    first_tick: tick,
                    waiting: BTreeSet::new(),
                });
            call.waiting = queue.iter().copied().collect();
        }
        cleared
    }

    /// Floors with an outstanding call in `direction`.
    pub fn pending_floors(&self, direction: Direction) -> BTreeSet<Floor> {
        self.calls
            .keys()
            .filter(|(_, d)| *d == direction)
            .map(|(f, _)| *f)
            .collect()
    }

    /// Returns true if any floor has a call in either direction.
    pub fn any_pending(&self) -> bool {
        !self.calls.is_empty()
    }

    /// Returns true if `(floor, direction)` has an outstanding call.
    pub fn contains(&self, floor: Floor, direction: Direction) -> bool {
        self.calls.contains_key(&(floor, direction))
    }

    /// The call at `(floor, direction)`, if any.
    pub fn get(&self, floor: Floor, direction: Direction) -> Option<&HallCall> {
        self.calls.get(&(floor, direction))
    }

    /// Known waiting passengers for a call; zero if there is no call.
    pub fn waiting(&self, floor: Floor, direction: Direction) -> usize {
        self.get(floor, direction).map_or(0, HallCall::waiting_count)
    }

    /// All outstanding calls, ordered by floor then direction.
    pub fn iter(&self) -> impl Iterator<Item = &HallCall> {
        self.calls.values()
    }

    /// Number of outstanding calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
