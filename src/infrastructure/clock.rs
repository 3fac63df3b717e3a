// src/infrastructure/clock.rs
use crate::application::Clock;
use chrono::{Local, Utc};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn display_time(&self) -> String {
        Local::now().format("%H:%M").to_string()
    }
}
