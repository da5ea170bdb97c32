use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use maskedit::config::load_app_config;
use maskedit::{logging, run_replay};

const USAGE: &str = "usage: maskedit <source.png> <script.json> <output.png>";

struct CliArgs {
    source: PathBuf,
    script: PathBuf,
    output: PathBuf,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    match (args.next(), args.next(), args.next(), args.next()) {
        (Some(source), Some(script), Some(output), None) => Ok(CliArgs {
            source,
            script,
            output,
        }),
        _ => bail!(USAGE),
    }
}

fn main() -> Result<()> {
    logging::init();
    let args = parse_args()?;
    let config = load_app_config();

    let report = run_replay(&args.source, &args.script, &args.output, &config)
        .with_context(|| format!("replay of {} failed", args.script.display()))?;
    if report.failed_submissions > 0 {
        eprintln!(
            "{} of {} restorations failed",
            report.failed_submissions, report.submissions
        );
    }
    Ok(())
}
