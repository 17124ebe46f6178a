use std::time::{SystemTime, UNIX_EPOCH};

/// Hands out event ids taken from the wall clock in nanoseconds.
///
/// Two readings can land on the same nanosecond, or the system clock can step
/// backwards, so an id is never allowed to fall at or below the previous one.
#[derive(Debug, Default)]
pub struct EventIdClock {
    last: Option<u128>,
}

impl EventIdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u128 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        self.advance(now)
    }

    fn advance(&mut self, reading: u128) -> u128 {
        let id = match self.last {
            Some(last) if reading <= last => last + 1,
            _ => reading,
        };
        self.last = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_strictly_increasing() {
        let mut clock = EventIdClock::new();
        let ids: Vec<u128> = (0..1000).map(|_| clock.next_id()).collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_repeated_reading_is_bumped() {
        let mut clock = EventIdClock::new();

        assert_eq!(clock.advance(100), 100);
        assert_eq!(clock.advance(100), 101);
    }

    #[test]
    fn test_clock_stepping_backwards_keeps_order() {
        let mut clock = EventIdClock::new();

        assert_eq!(clock.advance(500), 500);
        assert_eq!(clock.advance(200), 501);
        assert_eq!(clock.advance(900), 900);
    }

    #[test]
    fn test_next_id_is_nanoseconds_since_epoch() {
        let mut clock = EventIdClock::new();
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        assert!(clock.next_id() >= before);
    }
}
