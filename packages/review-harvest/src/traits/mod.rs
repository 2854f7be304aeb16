pub mod checkpoint;
pub mod source;
