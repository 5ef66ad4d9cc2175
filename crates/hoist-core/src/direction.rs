use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A floor index in `[0, max_floor]`.
pub type Floor = u32;

/// The direction a hall call asks to travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards higher floors.
    Up,
    /// Towards lower floors.
    Down,
}

impl Direction {
    /// Both directions, up first.
    pub const ALL: [Direction; 2] = [Direction::Up, Direction::Down];

    /// The reverse direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// The direction of travel from `from` to `to`, or `None` if they are the same floor.
    pub fn toward(from: Floor, to: Floor) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Self::Up),
            std::cmp::Ordering::Less => Some(Self::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Returns true if `floor` lies strictly beyond `from` when travelling in this direction.
    pub fn is_ahead(self, from: Floor, floor: Floor) -> bool {
        match self {
            Self::Up => floor > from,
            Self::Down => floor < from,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(CoreError::UnknownDirection(other.to_string())),
        }
    }
}

/// The sweep state of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarDirection {
    /// Sweeping upwards.
    Up,
    /// Sweeping downwards.
    Down,
    /// No committed work; awaiting assignment.
    #[default]
    Idle,
}

impl CarDirection {
    /// The travel direction, or `None` when idle.
    pub fn travel(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Idle => None,
        }
    }

    /// Returns true if the car has no sweep direction.
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

impl From<Direction> for CarDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

impl fmt::Display for CarDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Idle => write!(f, "idle"),
        }
    }
}
