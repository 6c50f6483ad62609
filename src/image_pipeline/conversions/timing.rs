use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    DevelopSdr,
    WriteSdr,
    DevelopHdr,
    WriteHdr,
    Transcode,
    Encode,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Decode => "decode_raw",
            Stage::DevelopSdr => "develop_sdr",
            Stage::WriteSdr => "write_sdr_jpeg",
            Stage::DevelopHdr => "develop_hdr",
            Stage::WriteHdr => "write_hdr_tiff",
            Stage::Transcode => "transcode_hdr_raw",
            Stage::Encode => "encode_ultrahdr",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StepTiming {
    pub stage: Stage,
    pub duration: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, stage: Stage, duration: Duration) {
        self.steps.push(StepTiming { stage, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, stage: Stage) -> Option<Duration> {
        self.steps.iter().find(|s| s.stage == stage).map(|s| s.duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            debug!(
                "{:<20} {:>10.3}ms ({:>5.1}%)",
                step.stage.name(),
                step.duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        debug!("{:<20} {:>10.3}ms", "total", total.as_secs_f64() * 1000.0);
    }
}

pub struct Timer {
    start: Instant,
    stage: Stage,
}

impl Timer {
    pub fn start(stage: Stage) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    /// Records the elapsed time into `timings`.
    pub fn stop(self, timings: &mut PipelineTimings) {
        timings.add_step(self.stage, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_accumulate_in_order() {
        let mut timings = PipelineTimings::new();
        timings.add_step(Stage::Decode, Duration::from_millis(30));
        timings.add_step(Stage::Encode, Duration::from_millis(70));
        Timer::start(Stage::Transcode).stop(&mut timings);

        assert_eq!(timings.steps().len(), 3);
        assert_eq!(timings.steps()[2].stage, Stage::Transcode);
        assert_eq!(timings.get_step(Stage::Encode), Some(Duration::from_millis(70)));
        assert_eq!(timings.get_step(Stage::WriteSdr), None);
        assert!(timings.total_duration() >= Duration::from_millis(100));
    }
}
