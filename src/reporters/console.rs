//! Console reporter for codec sessions

use super::{Reporter, SimulationReporter};
use crate::codec::{PipelineStage, SimulationReport};
use crate::reed_muller::CodeOrder;

/// Console implementation for simulation runs
#[derive(Default)]
pub struct ConsoleSimulationReporter;

impl ConsoleSimulationReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleSimulationReporter {
    fn report_progress(&self, message: &str, progress: f64) {
        println!("{} ({:.1}%)", message, progress * 100.0);
    }

    fn report_error(&self, error: &str) {
        eprintln!("Error: {}", error);
    }

    fn report_complete(&self, message: &str) {
        println!("{}", message);
    }
}

impl SimulationReporter for ConsoleSimulationReporter {
    fn report_code(&self, order: CodeOrder, k: usize, n: usize) {
        println!(
            "Using {}: {} message bits per {}-bit block, corrects {} errors per block",
            order,
            k,
            n,
            order.correctable_errors()
        );
    }

    fn report_stage_start(&self, stage: PipelineStage, blocks: usize) {
        println!("{} {} blocks...", stage, blocks);
    }

    fn report_block_progress(&self, stage: PipelineStage, completed: usize, total: usize) {
        if total > 0 {
            self.report_progress(&stage.to_string(), completed as f64 / total as f64);
        }
    }

    fn report_results(&self, report: &SimulationReport) {
        print!("{}", report);
    }
}
