//! Ordered, numbered pipeline steps and the runner that drives them

use std::io::Write;
use std::path::PathBuf;

use crate::core::error::{Error, Result};
use crate::generation::{StepExecutor, Variant};

/// Work performed by a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Materialize the engine root, the test directory and the ignore file
    CreateSkeleton,
    /// Prepare the directory holding every dummy app
    VendorApps,
    GenerateApp(Variant),
    ConfigureApp(Variant),
    RemoveUnneededFiles(Variant),
    ConfigureBackend(Variant),
    ConfigureTestFramework(Variant),
}

/// A declared step: ordinal, label and action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub ordinal: usize,
    pub label: String,
    pub action: StepAction,
}

/// Steps in declaration order with ordinals assigned at declaration time
#[derive(Debug, Clone, Default)]
pub struct StepPlan {
    steps: Vec<Step>,
}

impl StepPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next step; ordinals start at 1 and increase by one
    pub fn declare(&mut self, label: impl Into<String>, action: StepAction) -> &mut Self {
        let ordinal = self.steps.len() + 1;
        self.steps.push(Step {
            ordinal,
            label: label.into(),
            action,
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Runs a plan strictly in order, printing `STEP <n>: <label>` before each step.
///
/// A blank separator line precedes every status line except the first. The first
/// failing step aborts the run; nothing is retried or rolled back.
pub struct StepRunner<W: Write> {
    out: W,
    destination: PathBuf,
}

impl<W: Write> StepRunner<W> {
    pub fn new(out: W, destination: impl Into<PathBuf>) -> Self {
        Self {
            out,
            destination: destination.into(),
        }
    }

    pub async fn run(&mut self, plan: &StepPlan, executor: &dyn StepExecutor) -> Result<()> {
        for step in plan.steps() {
            self.announce(step)?;

            tracing::debug!(ordinal = step.ordinal, label = %step.label, "Running step");
            if let Err(e) = executor.execute(&step.action).await {
                tracing::error!(
                    ordinal = step.ordinal,
                    label = %step.label,
                    destination = %self.destination.display(),
                    error = %e,
                    "Step failed"
                );
                return Err(Error::Step {
                    ordinal: step.ordinal,
                    label: step.label.clone(),
                    destination: self.destination.clone(),
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }

    fn announce(&mut self, step: &Step) -> Result<()> {
        if step.ordinal > 1 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "STEP {}: {}", step.ordinal, step.label)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
