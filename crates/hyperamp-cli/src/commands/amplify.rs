use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use hyperamp_gen::{amplify, AmplifyConfig};
use tracing::info;

#[derive(Args, Debug)]
pub struct AmplifyArgs {
    /// Output directory for rotated files, indexes and the manifest.
    #[arg(long)]
    pub out: PathBuf,
    /// YAML configuration; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Profiling report used to calibrate the distributions.
    #[arg(long)]
    pub calibration: Option<PathBuf>,
    /// Master seed override.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Hyperedge target override.
    #[arg(long)]
    pub hyperedges: Option<u64>,
    /// Vertex target override.
    #[arg(long)]
    pub vertices: Option<u64>,
}

impl AmplifyArgs {
    fn resolve_config(&self) -> Result<AmplifyConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => AmplifyConfig::load(path)?,
            None => AmplifyConfig::default(),
        };
        if let Some(path) = &self.calibration {
            config.calibration = Some(path.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(hyperedges) = self.hyperedges {
            config.targets.hyperedges = hyperedges;
        }
        if let Some(vertices) = self.vertices {
            config.targets.vertices = vertices;
        }
        Ok(config)
    }
}

pub fn run(args: &AmplifyArgs) -> Result<(), Box<dyn Error>> {
    let config = args.resolve_config()?;
    info!(
        out = %args.out.display(),
        seed = config.seed,
        hyperedges = config.targets.hyperedges,
        vertices = config.targets.vertices,
        "starting amplification"
    );
    let summary = amplify(&config, &args.out)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
