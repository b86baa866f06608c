//! Compiles a criteria set from the command line and prints the query.
//!
//! ```text
//! cohort -c "screening status=NOT: Ceased" -c "subject age=between 60 and 71" \
//!     --hub 23159 --screening-centre 23162 --count 10
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use cohort_criteria::{compile, ActorContext, SubjectSnapshot};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cohort", about = "Compile subject selection criteria to SQL")]
struct Args {
    /// Criterion as KEY=VALUE; repeat for multiple criteria.
    #[arg(short = 'c', long = "criteria", value_name = "KEY=VALUE")]
    criteria: Vec<String>,

    /// Acting user id.
    #[arg(long, default_value_t = 0)]
    user_id: i64,

    /// Organisation id of the acting user's hub.
    #[arg(long)]
    hub: i64,

    /// Organisation id of the acting user's screening centre.
    #[arg(long)]
    screening_centre: i64,

    /// JSON file with the prior subject snapshot, for 'unchanged' criteria.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Maximum number of rows the query should return.
    #[arg(long)]
    count: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut criteria = Vec::with_capacity(args.criteria.len());
    for item in &args.criteria {
        let Some((key, value)) = item.split_once('=') else {
            bail!("criterion '{}' is not KEY=VALUE", item);
        };
        criteria.push((key.to_string(), value.to_string()));
    }

    let actor = ActorContext::new(args.user_id, args.hub, args.screening_centre);

    let snapshot: Option<SubjectSnapshot> = match &args.snapshot {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            Some(serde_json::from_str(&raw).context("parsing snapshot JSON")?)
        }
        None => None,
    };

    let query = compile(&criteria, &actor, snapshot.as_ref(), args.count)?;

    println!("{}", query.text);
    println!("{}", serde_json::to_string_pretty(&query.binds)?);
    Ok(())
}
