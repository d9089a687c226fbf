use rand::Rng;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use bootlib::oc;
use bootlib::oc::Invocation;
use bootlib::resources::Workload;

/// Number of replaces a chaos run makes, whatever the batch size.
pub static CHAOS_ROUNDS: u32 = 20;

/// What to do to the batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum Op {
    /// Create every boot in the batch.
    Init,
    /// Replace every boot in the batch.
    Replace,
    /// Replace randomly chosen boots, in no particular order.
    Chaos,
    /// Delete every boot in the batch.
    Del,
}

/// A benchmark run: an operation over `size` boots.
#[derive(Clone, Debug)]
pub struct Batch {
    pub op: Op,
    /// Number of boots.  For `chaos` this is the largest suffix picked.
    pub size: u32,
    /// Offset added to every sequential index.  Not used by `chaos`.
    pub group: i64,
    /// Number of replaces `chaos` makes.
    pub chaos_rounds: u32,
}

/// The outcome of a run.  Only the count and the time are kept, not how each
/// call went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub invocations: usize,
    pub elapsed: Duration,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "('totally cost', {secs})",
            secs = float_repr(self.elapsed.as_secs_f64())
        )
    }
}

/// Render seconds the way a Python float prints: shortest round-trip digits,
/// a trailing `.0` on whole numbers, and a signed two-digit exponent once the
/// value is small or large enough to switch to scientific notation.
fn float_repr(secs: f64) -> String {
    let shortest = format!("{secs:?}");
    match shortest.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => shortest,
    }
}

impl Batch {
    /// The CLI calls this batch makes, in order.
    ///
    /// `init`, `replace`, and `del` use suffixes `group..group + size`.
    /// `chaos` picks each suffix uniformly from `0..=size`, so it can repeat
    /// names and can name a boot one past the end of the batch.
    pub fn plan<R: Rng + ?Sized>(&self, workload: &Workload, rng: &mut R) -> Vec<Invocation> {
        match self.op {
            Op::Init => self
                .sequential_suffixes()
                .map(|suffix| Invocation::Create(workload.boot(suffix)))
                .collect(),
            Op::Replace => self
                .sequential_suffixes()
                .map(|suffix| Invocation::Replace(workload.boot(suffix)))
                .collect(),
            Op::Chaos => (0..self.chaos_rounds)
                .map(|_| {
                    let suffix = rng.gen_range(0..=i64::from(self.size));
                    Invocation::Replace(workload.boot(suffix))
                })
                .collect(),
            Op::Del => self
                .sequential_suffixes()
                .map(|suffix| Invocation::delete(workload.kind, workload.name(suffix)))
                .collect(),
        }
    }

    /// Plan the batch and run it, one CLI call at a time.  Each command line
    /// is written to `out` before it runs, and the total time after the last.
    ///
    /// A call which fails, or cannot even be started, is logged and skipped
    /// over.  Only failing to write to `out` stops the run.
    pub async fn run<R: Rng + ?Sized, W: Write>(
        &self,
        config: &oc::Config,
        workload: &Workload,
        rng: &mut R,
        out: &mut W,
    ) -> std::io::Result<Summary> {
        let start = Instant::now();

        let invocations = self.plan(workload, rng);
        for invocation in &invocations {
            match invocation.command_line(config) {
                Ok(line) => {
                    writeln!(out, "{line}")?;
                    out.flush()?;
                }
                Err(error) => {
                    tracing::warn!(name = invocation.name(), %error, "could not render command");
                    continue;
                }
            }

            match oc::run(config, invocation).await {
                Ok(exit_status) => {
                    tracing::debug!(name = invocation.name(), %exit_status, "cluster CLI exited")
                }
                Err(error) => {
                    tracing::warn!(name = invocation.name(), %error, "could not run cluster CLI")
                }
            }
        }

        let summary = Summary {
            invocations: invocations.len(),
            elapsed: start.elapsed(),
        };
        writeln!(out, "{summary}")?;
        out.flush()?;

        Ok(summary)
    }

    fn sequential_suffixes(&self) -> impl Iterator<Item = i64> {
        let group = self.group;
        (0..self.size).map(move |i| i64::from(i).saturating_add(group))
    }
}
