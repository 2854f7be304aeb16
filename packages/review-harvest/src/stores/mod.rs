//! Checkpoint store implementations.

pub mod file;
pub mod memory;

pub use file::{load_submissions, JsonFileCheckpoint, CHECKPOINT_FILE_NAME};
pub use memory::MemoryCheckpoint;
