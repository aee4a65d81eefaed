//! Test harness utilities shared by the unit and behavioural suites.

mod platform;
mod reporter;
mod world;

pub use platform::{Fault, PlatformCall, RecordingPlatform, TEST_IDENTITY};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{StepResult, TestWorld, new_world, test_config};
