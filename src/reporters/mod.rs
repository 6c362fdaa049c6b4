//! Progress and output reporting for codec sessions
//!
//! The codec core never prints. It calls into a reporter, so the same
//! simulation can drive console output or run silently under test.

mod console;
mod silent;

pub use console::ConsoleSimulationReporter;
pub use silent::SilentSimulationReporter;

use crate::codec::{PipelineStage, SimulationReport};
use crate::reed_muller::CodeOrder;

/// Base trait for all reporters
pub trait Reporter: Send + Sync {
    /// Report general progress with a message and completion percentage
    fn report_progress(&self, message: &str, progress: f64);

    /// Report an error that occurred during operation
    fn report_error(&self, error: &str);

    /// Report successful completion of an operation
    fn report_complete(&self, message: &str);
}

/// Trait for reporting simulation progress and results
///
/// Extends the base Reporter trait with pipeline-specific methods
pub trait SimulationReporter: Reporter {
    /// Report the code chosen for the session
    fn report_code(&self, order: CodeOrder, k: usize, n: usize);

    /// Report the start of a pipeline step over `blocks` blocks
    fn report_stage_start(&self, stage: PipelineStage, blocks: usize);

    /// Report blocks finished so far, called once per batch
    fn report_block_progress(&self, stage: PipelineStage, completed: usize, total: usize);

    /// Report final simulation results
    fn report_results(&self, report: &SimulationReport);
}
