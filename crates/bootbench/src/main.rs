use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use bootbench::bench::{Batch, Op, CHAOS_ROUNDS};
use bootlib::oc;
use bootlib::resources::{BootKind, Workload};

/// Boot benchmarks: create, replace, or delete boots in bulk through the
/// cluster CLI, and time it.
#[derive(Clone, Debug, Parser)]
struct Args {
    /// Operation to run.
    #[clap(long, value_enum)]
    pub op: Op,

    /// Number of boots.  For `chaos`, the largest suffix to pick.
    #[clap(long, default_value_t = 100)]
    pub size: u32,

    /// Offset added to each boot index, so repeated runs don't collide.
    /// Defaults to 10 for java boots and 0 for the others.
    #[clap(long, allow_negative_numbers = true)]
    pub group: Option<i64>,

    /// Kind of boot to generate.
    #[clap(long, value_enum, default_value = "java", env = "BOOT_KIND")]
    pub kind: BootKind,

    /// Image to put in the boot spec.  Defaults to the kind's startkit image.
    #[clap(long, env = "BOOT_IMAGE")]
    pub image: Option<String>,

    /// Number of replaces `chaos` makes.
    #[clap(long, default_value_t = CHAOS_ROUNDS)]
    pub chaos_rounds: u32,

    #[command(flatten)]
    pub oc: oc::Config,
}

impl Args {
    /// The batch to run and the workload it runs against, with the image
    /// and group defaults of the chosen kind filled in.
    fn batch_and_workload(&self) -> (Batch, Workload) {
        let workload = match &self.image {
            Some(image) => Workload::new(self.kind).with_image(image.clone()),
            None => Workload::new(self.kind),
        };
        let batch = Batch {
            op: self.op,
            size: self.size,
            group: self.group.unwrap_or(self.kind.default_group()),
            chaos_rounds: self.chaos_rounds,
        };

        (batch, workload)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (batch, workload) = args.batch_and_workload();
    tracing::info!(
        op = ?batch.op,
        size = batch.size,
        group = batch.group,
        kind = %workload.kind,
        image = workload.image.as_str(),
        "starting"
    );

    let mut rng = rand::thread_rng();
    match batch
        .run(&args.oc, &workload, &mut rng, &mut std::io::stdout())
        .await
    {
        Ok(summary) => {
            tracing::info!(
                invocations = summary.invocations,
                elapsed = ?summary.elapsed,
                "finished"
            );
        }
        Err(error) => {
            tracing::error!(?error, "could not write to stdout");
            process::exit(1);
        }
    }
}
