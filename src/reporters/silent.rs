//! Silent reporter for tests and quiet runs

use super::{Reporter, SimulationReporter};
use crate::codec::{PipelineStage, SimulationReport};
use crate::reed_muller::CodeOrder;

/// Silent implementation for simulation runs
#[derive(Default)]
pub struct SilentSimulationReporter;

impl SilentSimulationReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for SilentSimulationReporter {
    fn report_progress(&self, _message: &str, _progress: f64) {}
    fn report_error(&self, _error: &str) {}
    fn report_complete(&self, _message: &str) {}
}

impl SimulationReporter for SilentSimulationReporter {
    fn report_code(&self, _order: CodeOrder, _k: usize, _n: usize) {}
    fn report_stage_start(&self, _stage: PipelineStage, _blocks: usize) {}
    fn report_block_progress(&self, _stage: PipelineStage, _completed: usize, _total: usize) {}
    fn report_results(&self, _report: &SimulationReport) {}
}
