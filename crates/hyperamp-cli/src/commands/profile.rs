use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hyperamp_profile::profile_path;
use tracing::info;

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Seed file, or directory scanned recursively for seed files.
    #[arg(long)]
    pub input: PathBuf,
    /// Destination of the rendered profiling report.
    #[arg(long)]
    pub out: PathBuf,
    /// Extension of seed files when `--input` is a directory.
    #[arg(long, default_value = "nt")]
    pub extension: String,
}

pub fn run(args: &ProfileArgs) -> Result<(), Box<dyn Error>> {
    let report = profile_path(&args.input, &args.extension)?;
    report.write(&args.out)?;
    let calibration = report.calibration();
    info!(
        report = %args.out.display(),
        hypertype_mean = calibration.hypertype.mean,
        edge_size_mean = calibration.edge_size.mean,
        occurrence_mean = calibration.occurrence.mean,
        "profiling report written"
    );
    Ok(())
}
