// src/infrastructure/mod.rs
pub mod clock;
pub mod config;
pub mod converters;
pub mod file_store;
pub mod listeners;
pub mod memory_store;
pub mod renderer;

pub use clock::SystemClock;
pub use config::Config;
pub use converters::converter_for;
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use renderer::BrowserRenderer;
