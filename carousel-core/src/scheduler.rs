use crate::cancellation::CancellationToken;
use std::time::{Duration, Instant};

/// Handle for one dispatched filter run
#[derive(Debug, Clone)]
pub struct FilterTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// Debounce and generation bookkeeping for filter runs.
///
/// Every request restarts the debounce window and supersedes whatever run is
/// in flight. Each dispatched run gets the next generation; only the run
/// holding the current generation may be accepted back.
#[derive(Debug)]
pub struct FilterScheduler {
    debounce: Duration,
    pending_since: Option<Instant>,
    generation: u64,
    in_flight: Option<FilterTicket>,
}

impl FilterScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending_since: None,
            generation: 0,
            in_flight: None,
        }
    }

    /// Ask for a run; coalesces with other requests inside the debounce window
    pub fn request(&mut self, now: Instant) {
        self.supersede_in_flight();
        self.pending_since = Some(now);
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.pending_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.debounce)
    }

    /// Time left before a pending request becomes due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending_since
            .map(|since| self.debounce.saturating_sub(now.saturating_duration_since(since)))
    }

    /// Start a run for the pending request
    pub fn begin(&mut self) -> FilterTicket {
        self.supersede_in_flight();
        self.pending_since = None;
        self.generation += 1;

        let ticket = FilterTicket {
            generation: self.generation,
            token: CancellationToken::new(),
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Claim a finished run. False means the result is stale and must be dropped.
    pub fn accept(&mut self, generation: u64) -> bool {
        match &self.in_flight {
            Some(ticket) if ticket.generation == generation && !ticket.token.is_cancelled() => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending request and cancel the run in flight
    pub fn cancel_all(&mut self) {
        self.pending_since = None;
        self.supersede_in_flight();
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    fn supersede_in_flight(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.token.cancel();
            tracing::debug!(generation = previous.generation, "filter run superseded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_inside_window_coalesce() {
        let start = Instant::now();
        let mut scheduler = FilterScheduler::new(Duration::from_millis(100));

        scheduler.request(start);
        scheduler.request(start + Duration::from_millis(60));
        assert!(!scheduler.is_due(start + Duration::from_millis(120)));
        assert_eq!(
            scheduler.time_until_due(start + Duration::from_millis(110)),
            Some(Duration::from_millis(50))
        );
        assert!(scheduler.is_due(start + Duration::from_millis(160)));

        let ticket = scheduler.begin();
        assert_eq!(ticket.generation, 1);
        assert!(!scheduler.is_pending());
        assert!(!scheduler.is_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_only_current_generation_is_accepted() {
        let now = Instant::now();
        let mut scheduler = FilterScheduler::new(Duration::ZERO);

        scheduler.request(now);
        let first = scheduler.begin();
        scheduler.request(now);
        assert!(first.token.is_cancelled());

        let second = scheduler.begin();
        assert!(!scheduler.accept(first.generation));
        assert!(scheduler.accept(second.generation));
        // A result is only claimed once
        assert!(!scheduler.accept(second.generation));
    }

    #[test]
    fn test_request_while_in_flight_rejects_that_run() {
        let now = Instant::now();
        let mut scheduler = FilterScheduler::new(Duration::from_millis(100));

        scheduler.request(now);
        let ticket = scheduler.begin();
        scheduler.request(now);

        assert!(ticket.token.is_cancelled());
        assert!(!scheduler.accept(ticket.generation));
        assert!(scheduler.is_pending());
    }

    #[test]
    fn test_cancel_all() {
        let now = Instant::now();
        let mut scheduler = FilterScheduler::new(Duration::ZERO);
        scheduler.request(now);
        let ticket = scheduler.begin();
        scheduler.request(now);

        scheduler.cancel_all();
        assert!(ticket.token.is_cancelled());
        assert!(!scheduler.is_pending());
        assert!(!scheduler.is_in_flight());
    }
}
