pub mod answers;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use answers::{correct, wrong, AnswerScript};
#[allow(unused_imports)]
pub use mocks::RecordingHandler;
#[allow(unused_imports)]
pub use setup::{spec_config, TestSetup, TestSetupBuilder};
