use hoist_core::{CarDirection, CarId, Direction, Floor};

use crate::port::CommandRejected;

/// What kind of dispatch decision was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionKind {
    // Hall calls
    /// A new hall call entered the registry.
    CallRegistered {
        /// Floor of the call.
        floor: Floor,
        /// Requested direction.
        direction: Direction,
    },
    /// Ground truth showed nobody left waiting; the call was removed.
    CallCleared {
        /// Floor of the call.
        floor: Floor,
        /// Requested direction.
        direction: Direction,
    },

    // Cars
    /// A car took responsibility for a hall call.
    CarAssigned {
        /// The chosen car.
        car: CarId,
        /// Floor of the call.
        floor: Floor,
        /// Requested direction.
        direction: Direction,
        /// The winning score.
        score: i64,
    },
    /// A motion command was accepted by the building.
    TargetIssued {
        /// The commanded car.
        car: CarId,
        /// Target floor.
        floor: Floor,
        /// Whether the current leg was interrupted.
        immediate: bool,
    },
    /// A car's sweep state changed.
    DirectionChanged {
        /// The car.
        car: CarId,
        /// Previous state.
        from: CarDirection,
        /// New state.
        to: CarDirection,
    },
    /// A car ran out of work.
    CarIdled {
        /// The car.
        car: CarId,
    },
    /// A car decided to stop at a floor it was passing.
    OpportunisticStop {
        /// The car.
        car: CarId,
        /// The floor it will stop at.
        floor: Floor,
    },
    /// A committed stop turned out to be unnecessary and was dropped.
    StaleStopDropped {
        /// The car.
        car: CarId,
        /// The dropped floor.
        floor: Floor,
    },
    /// The building refused a motion command.
    CommandRejected {
        /// The commanded car.
        car: CarId,
        /// Requested floor.
        floor: Floor,
        /// Why it was refused.
        reason: CommandRejected,
    },
}

impl DecisionKind {
    /// Check whether a given car is involved in this decision.
    pub fn involves(&self, id: CarId) -> bool {
        match self {
            Self::CallRegistered { .. } | Self::CallCleared { .. } => false,
            Self::CarAssigned { car, .. }
            | Self::TargetIssued { car, .. }
            | Self::DirectionChanged { car, .. }
            | Self::CarIdled { car }
            | Self::OpportunisticStop { car, .. }
            | Self::StaleStopDropped { car, .. }
            | Self::CommandRejected { car, .. } => *car == id,
        }
    }
}

/// A record of one scheduler decision.
#[derive(Debug, Clone)]
pub struct Decision {
    /// The tick when this decision was made.
    pub tick: u64,
    /// The specific kind of decision.
    pub kind: DecisionKind,
    /// A human-readable description.
    pub description: String,
}

impl Decision {
    /// Create a new decision record.
    pub fn new(tick: u64, kind: DecisionKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates decisions during a run.
#[derive(Debug, Default)]
pub struct DecisionLog {
    entries: Vec<Decision>,
    max_entries: usize,
}

impl DecisionLog {
    /// Create a new log with the given maximum capacity (0 = unlimited).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Append a decision, dropping the oldest if the log exceeds its capacity.
    pub fn push(&mut self, decision: Decision) {
        self.entries.push(decision);
        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            let drain_count = self.entries.len() - self.max_entries;
            self.entries.drain(..drain_count);
        }
    }

    /// All recorded decisions, oldest first.
    pub fn entries(&self) -> &[Decision] {
        &self.entries
    }

    /// Decisions made at the given tick.
    pub fn at_tick(&self, tick: u64) -> Vec<&Decision> {
        self.entries.iter().filter(|d| d.tick == tick).collect()
    }

    /// Decisions involving the given car.
    pub fn for_car(&self, id: CarId) -> Vec<&Decision> {
        self.entries.iter().filter(|d| d.kind.involves(id)).collect()
    }

    /// Number of recorded decisions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all recorded decisions.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
