use bourse_core::Timestamp;

/// Port for time abstraction
///
/// Settlement stamps orders, executions and ledger entries with this clock:
/// - Real system time for production
/// - Fixed or manually advanced time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
