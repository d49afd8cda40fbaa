use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use pdr_core::runs::RunSet;
use pdr_core::serde::from_yaml_slice;
use pdr_scatter::{HarnessSettings, ScatterOptions, ScatterPlotReport};

#[derive(Args, Debug)]
pub struct ScatterArgs {
    /// Properties file mapping run ids to attributes.
    #[arg(long)]
    pub properties: PathBuf,
    /// YAML report configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Output path; the format suffix is appended when missing.
    #[arg(long)]
    pub out: PathBuf,
    /// Default to LaTeX output and compact figures.
    #[arg(long)]
    pub tex: bool,
    /// Plot the Y value relative to X unless the configuration says otherwise.
    #[arg(long)]
    pub relative: bool,
}

pub fn run(args: &ScatterArgs) -> Result<(), Box<dyn Error>> {
    let runs = RunSet::load(&args.properties)?;
    let contents = fs::read(&args.config)?;
    let options: ScatterOptions = from_yaml_slice(&contents)?;
    let settings = HarnessSettings {
        tex: args.tex,
        relative: args.relative,
    };
    let report = ScatterPlotReport::new(options, &settings)?;
    let path = report.write(&runs, &args.out)?;
    println!("{}", path.display());
    Ok(())
}
