pub mod caret;
pub mod runtime;
pub mod sequencer;
pub mod task;
