pub mod config;
pub mod input;
pub mod logging;
pub mod study;

pub use study::{EngineConfig, EngineError, EngineResult, StudyEngine, StudySnapshot};
