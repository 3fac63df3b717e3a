// src/domain/image.rs
use serde::{Deserialize, Serialize};

/// A gallery image. `url` is a self-describing `data:` URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    pub url: String,
    pub timestamp: i64,
}
