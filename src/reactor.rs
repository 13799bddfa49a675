//! Boundary to the host's timer-driven event loop.

use embassy_time::Instant;

/// A recurring timer callback.
///
/// The reactor calls [`on_timer`](TimerCallback::on_timer) when the timer matures and re-arms it
/// for the returned instant. Calls are serial and never re-entrant.
pub trait TimerCallback {
    /// Handles a firing at `now` and returns the next waketime.
    fn on_timer(&self, now: Instant) -> Instant;
}

/// Timer registration facility of the host event loop.
///
/// Callbacks are borrowed for `'a`; the reactor keeps calling them until it is dropped.
pub trait Reactor<'a> {
    /// Identifies a registered timer.
    type Handle;

    /// Registers `callback`, first firing at `waketime`.
    fn register_timer(&mut self, callback: &'a dyn TimerCallback, waketime: Instant) -> Self::Handle;
}
