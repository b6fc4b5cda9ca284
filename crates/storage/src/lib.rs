#![forbid(unsafe_code)]

pub mod checkpoint;

pub use checkpoint::{
    CheckpointError, CheckpointStore, InMemoryCheckpointStore, JsonDirCheckpointStore,
};
