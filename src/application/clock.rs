// src/application/clock.rs

/// Time source for ids and display timestamps
pub trait Clock {
    fn now_millis(&self) -> i64;

    /// Wall-clock time as shown next to a note, e.g. "09:41"
    fn display_time(&self) -> String;
}
