// ABOUTME: Capture module: collects workspace state by running external tools.
// ABOUTME: Splits process execution (runner) from record assembly (collector).

pub mod collector;
pub mod runner;

pub use collector::{CollectError, Collector};
pub use runner::{CommandError, CommandRunner, SystemRunner};
