use hoist_core::CarId;
use hoist_dispatch::DispatchEvent;

/// A building event as it was delivered to the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    /// The tick when the event was delivered.
    pub tick: u64,
    /// The event itself.
    pub event: DispatchEvent,
}

impl SimEvent {
    /// Create a trace record.
    pub fn new(tick: u64, event: DispatchEvent) -> Self {
        Self { tick, event }
    }
}

/// Trace of every event delivered during a run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events delivered at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events concerning the given car.
    pub fn events_for_car(&self, car: CarId) -> Vec<&SimEvent> {
        self.events
            .iter()
            .filter(|e| e.event.car() == Some(car))
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, DispatchEvent::TickStarted { tick: 1 }));
        log.push(SimEvent::new(1, DispatchEvent::ElevatorIdle { car: CarId(1) }));
        log.push(SimEvent::new(2, DispatchEvent::TickEnded { tick: 2 }));
        assert_eq!(log.len(), 3);
        assert_eq!(log.events_at_tick(1).len(), 2);
        assert_eq!(log.events_for_car(CarId(1)).len(), 1);
        assert!(log.events_for_car(CarId(0)).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(SimEvent::new(i, DispatchEvent::TickStarted { tick: i }));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(0, DispatchEvent::Init));
        log.clear();
        assert!(log.is_empty());
    }
}
