use grid_util::point::Point;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A notification emitted by the search, in the order things happen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    /// The cell was added to the open set.
    Opened(Point),
    /// The cell was expanded and its cost from the start is final. Never emitted for the start.
    Closed(Point),
    /// The goal was reached. Holds the cells strictly between start and goal, in walking order.
    PathFound(Vec<Point>),
}

/// Receives [SearchEvent]s while a search runs.
pub trait SearchObserver {
    fn notify(&mut self, event: &SearchEvent);
}

impl<F> SearchObserver for F
where
    F: FnMut(&SearchEvent),
{
    fn notify(&mut self, event: &SearchEvent) {
        self(event)
    }
}

/// Observer that records every event it receives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<SearchEvent>,
}

impl EventLog {
    pub fn opened(&self) -> impl Iterator<Item = Point> + '_ {
        self.events.iter().filter_map(|e| match e {
            SearchEvent::Opened(p) => Some(*p),
            _ => None,
        })
    }
    pub fn closed(&self) -> impl Iterator<Item = Point> + '_ {
        self.events.iter().filter_map(|e| match e {
            SearchEvent::Closed(p) => Some(*p),
            _ => None,
        })
    }
}

impl SearchObserver for EventLog {
    fn notify(&mut self, event: &SearchEvent) {
        self.events.push(event.clone());
    }
}

/// Shared flag used to abort a running search between two iterations.
///
/// Clones share the flag, so one clone can be handed to the search while another one is
/// kept by whoever decides to stop it (an observer, another thread, a UI handler).
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_observe_events() {
        let mut count = 0;
        let mut counter = |_: &SearchEvent| count += 1;
        counter.notify(&SearchEvent::Opened(Point::new(0, 0)));
        counter.notify(&SearchEvent::Closed(Point::new(0, 0)));
        assert_eq!(count, 2);
    }

    #[test]
    fn log_filters_by_kind() {
        let mut log = EventLog::default();
        log.notify(&SearchEvent::Opened(Point::new(1, 0)));
        log.notify(&SearchEvent::Closed(Point::new(1, 0)));
        log.notify(&SearchEvent::Opened(Point::new(2, 0)));
        assert_eq!(log.opened().collect::<Vec<_>>(), vec![Point::new(1, 0), Point::new(2, 0)]);
        assert_eq!(log.closed().count(), 1);
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
