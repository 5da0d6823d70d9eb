use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use crate::game::{FixedInterval, GameConfig, GameLoop, Pacer, Phase};
use crate::input::{AxisSource, RandomInput, ScriptedInput};
use crate::output::FramedWriter;

/// Options specific to unattended runs
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    /// Frame destination; stdout when absent
    pub output: Option<PathBuf>,
    /// L/R/U/D/F steering script, replayed in a loop
    pub script: Option<String>,
    /// Stop after this many iterations even if the run is still going
    pub max_steps: Option<u64>,
}

/// How an unattended run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub phase: Phase,
    pub iterations: u64,
    pub frames: u64,
    pub score: u32,
}

/// Synchronous run streaming framed snapshots to a byte sink
pub struct HeadlessMode {
    config: GameConfig,
    options: HeadlessOptions,
}

impl HeadlessMode {
    pub fn new(config: GameConfig, options: HeadlessOptions) -> Self {
        Self { config, options }
    }

    pub fn run(&self) -> Result<RunSummary> {
        let writer: Box<dyn Write> = match &self.options.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(std::io::stdout().lock()),
        };

        let mut pacer = FixedInterval(self.config.tick_interval());
        self.run_with(writer, &mut pacer)
    }

    /// Run to completion against any writer and pacer
    pub fn run_with<W: Write, P: Pacer>(&self, writer: W, pacer: &mut P) -> Result<RunSummary> {
        let input = self.build_input()?;
        let sink = FramedWriter::new(writer, self.config.frame_marker);
        let mut game = GameLoop::new(self.config.clone(), input, sink)
            .context("Invalid game configuration")?;

        let mut iterations = 0;
        let phase = loop {
            let phase = game.tick().context("Failed to emit frame")?;
            iterations += 1;

            if phase.is_terminal() {
                break phase;
            }

            if self.options.max_steps.is_some_and(|max| iterations >= max) {
                info!(iterations, "step budget exhausted, stopping unfinished run");
                break phase;
            }

            pacer.wait();
        };

        let summary = RunSummary {
            phase,
            iterations,
            frames: game.sink().frames_written(),
            score: game.state().score,
        };
        info!(?summary, "headless run finished");

        Ok(summary)
    }

    fn build_input(&self) -> Result<Box<dyn AxisSource>> {
        Ok(match &self.options.script {
            Some(script) => Box::new(
                ScriptedInput::parse(script, true).context("Invalid steering script")?,
            ),
            None => Box::new(RandomInput::new(self.config.seed)),
        })
    }
}
