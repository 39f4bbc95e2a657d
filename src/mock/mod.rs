mod engine;

pub use engine::{MockEngineError, RecordedRequest, ScriptedEngine};
