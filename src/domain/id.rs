// src/domain/id.rs

/// Time-based id source. Ids are milliseconds since the epoch, bumped so that
/// two entities created within the same millisecond still get distinct ids.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, now_millis: i64) -> i64 {
        let id = now_millis.max(self.last + 1);
        self.last = id;
        id
    }
}
