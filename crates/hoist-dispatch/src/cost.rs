use serde::{Deserialize, Serialize};

use hoist_core::{Direction, Floor};

use crate::car::CarState;

/// Scores how well a car can serve a hall call. Lower is better.
///
/// Cars already heading toward the call win; cars that would have to reverse
/// pay `passed_penalty`; cars moving against the call pay `opposite_penalty`.
/// Idle cars pay a small `idle_penalty` so that at equal distance a car
/// already sweeping the right way is not pre-empted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Added to the distance of an idle car.
    pub idle_penalty: u32,
    /// Added when the car sweeps the call's way but is already past the floor.
    pub passed_penalty: u32,
    /// Added when the car sweeps against the call's direction.
    pub opposite_penalty: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            idle_penalty: 2,
            passed_penalty: 20,
            opposite_penalty: 30,
        }
    }
}

impl CostModel {
    /// Score `car` for the call `(floor, direction)`. Full cars are not candidates.
    pub fn score(&self, car: &CarState, floor: Floor, direction: Direction) -> Option<u32> {
        if car.is_full() {
            return None;
        }
        let distance = car.floor().abs_diff(floor);
        let penalty = match car.direction().travel() {
            None => self.idle_penalty,
            Some(sweep) if sweep == direction && !car.has_passed(floor, direction) => 0,
            Some(sweep) if sweep == direction => self.passed_penalty,
            Some(_) => self.opposite_penalty,
        };
        Some(distance + penalty)
    }
}

/// Score an uncovered call for an idle car: distance, biased down by
/// `waiting_weight` per waiting passenger.
pub fn idle_score(from: Floor, floor: Floor, waiting: usize, waiting_weight: u32) -> i64 {
    let bias = i64::from(waiting_weight).saturating_mul(waiting as i64);
    i64::from(from.abs_diff(floor)) - bias
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_core::{CarDirection, CarId, PassengerId};

    fn car(floor: Floor, direction: CarDirection) -> CarState {
        let mut car = CarState::new(CarId(0), floor, 2);
        car.direction = direction;
        car
    }

    #[test]
    fn idle_car_pays_small_penalty() {
        let model = CostModel::default();
        assert_eq!(model.score(&car(0, CarDirection::Idle), 3, Direction::Down), Some(5));
        assert_eq!(model.score(&car(3, CarDirection::Idle), 3, Direction::Down), Some(2));
    }

    #[test]
    fn approaching_same_direction_is_free() {
        let model = CostModel::default();
        assert_eq!(model.score(&car(1, CarDirection::Up), 4, Direction::Up), Some(3));
        assert_eq!(model.score(&car(4, CarDirection::Up), 4, Direction::Up), Some(0));
        assert_eq!(model.score(&car(6, CarDirection::Down), 2, Direction::Down), Some(4));
    }

    #[test]
    fn passed_floor_pays_reversal() {
        let model = CostModel::default();
        assert_eq!(model.score(&car(5, CarDirection::Up), 4, Direction::Up), Some(21));
    }

    #[test]
    fn opposite_direction_is_worst() {
        let model = CostModel::default();
        assert_eq!(model.score(&car(1, CarDirection::Up), 4, Direction::Down), Some(33));
    }

    #[test]
    fn full_car_is_excluded() {
        let model = CostModel::default();
        let mut full = car(0, CarDirection::Idle);
        full.board(PassengerId(1), 5);
        full.board(PassengerId(2), 6);
        assert_eq!(model.score(&full, 0, Direction::Up), None);
    }

    #[test]
    fn idle_score_bias() {
        assert_eq!(idle_score(0, 4, 3, 0), 4);
        assert_eq!(idle_score(0, 4, 3, 2), -2);
        assert_eq!(idle_score(6, 4, 1, 1), 1);
    }
}
