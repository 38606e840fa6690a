/// A published event tagged with its bus sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<E> {
    pub seq: u64,
    pub event: E,
}

/// Read position of one subscriber.
///
/// Each consumer owns its cursor; the bus never tracks who is listening.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Subscription {
    next_seq: u64,
}

/// Typed change-notification log.
///
/// Publishers append; subscribers poll from their own cursor. Retention is
/// bounded: when the log exceeds `max_retained` the oldest events are evicted
/// down to half that, so a subscriber that falls too far behind skips them
/// rather than blocking the publisher.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Envelope<E>>,
    max_retained: usize,
}

pub const DEFAULT_MAX_RETAINED_EVENTS: usize = 1024;

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::with_max_retained(DEFAULT_MAX_RETAINED_EVENTS)
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
            max_retained: max_retained.max(1),
        }
    }

    /// Appends `event` and returns its sequence number.
    pub fn emit(&mut self, event: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Envelope { seq, event });
        if self.events.len() > self.max_retained {
            let keep = (self.max_retained / 2).max(1);
            let evict = self.events.len() - keep;
            self.events.drain(..evict);
        }
        seq
    }

    #[cfg(test)]
    fn retained(&self) -> usize {
        self.events.len()
    }

    /// A subscription that sees only events emitted after this call.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            next_seq: self.next_seq,
        }
    }

    /// Returns events not yet seen by `sub` and advances its cursor.
    pub fn poll(&self, sub: &mut Subscription) -> &[Envelope<E>] {
        let start = self.events.partition_point(|e| e.seq < sub.next_seq);
        sub.next_seq = self.next_seq;
        &self.events[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn poll_returns_only_unseen_events() {
        let mut bus = EventBus::new();
        bus.emit("before");
        let mut sub = bus.subscribe();
        bus.emit("a");
        bus.emit("b");

        let seen: Vec<_> = bus.poll(&mut sub).iter().map(|e| e.event).collect();
        assert_eq!(seen, vec!["a", "b"]);
        assert!(bus.poll(&mut sub).is_empty());

        bus.emit("c");
        let seen: Vec<_> = bus.poll(&mut sub).iter().map(|e| e.event).collect();
        assert_eq!(seen, vec!["c"]);
    }

    #[test]
    fn independent_subscribers_keep_their_own_cursor() {
        let mut bus = EventBus::new();
        let mut early = bus.subscribe();
        bus.emit(1);
        let mut late = bus.subscribe();
        bus.emit(2);

        assert_eq!(bus.poll(&mut early).len(), 2);
        assert_eq!(bus.poll(&mut late).len(), 1);
    }

    #[test]
    fn overflow_evicts_down_to_half_and_lagging_subscriber_skips() {
        let mut bus = EventBus::with_max_retained(4);
        let mut sub = bus.subscribe();
        for i in 0..10 {
            bus.emit(i);
            assert!(bus.retained() <= 4);
        }
        // 5th emit trims to [3, 4], 8th to [6, 7].
        let seen: Vec<_> = bus.poll(&mut sub).iter().map(|e| (e.seq, e.event)).collect();
        assert_eq!(seen, vec![(6, 6), (7, 7), (8, 8), (9, 9)]);
    }

    #[test]
    fn eviction_is_batched() {
        let mut bus = EventBus::with_max_retained(1024);
        for i in 0..1025 {
            bus.emit(i);
        }
        assert_eq!(bus.retained(), 512);
        for i in 0..512 {
            bus.emit(i);
        }
        // Nothing evicted until the log is full again.
        assert_eq!(bus.retained(), 1024);
    }

    #[test]
    fn single_slot_bus_keeps_latest() {
        let mut bus = EventBus::with_max_retained(1);
        let mut sub = bus.subscribe();
        bus.emit("a");
        bus.emit("b");
        let seen: Vec<_> = bus.poll(&mut sub).iter().map(|e| e.event).collect();
        assert_eq!(seen, vec!["b"]);
    }
}
