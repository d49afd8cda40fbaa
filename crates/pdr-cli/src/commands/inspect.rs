use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use pdr_core::runs::RunSet;
use pdr_core::serde::{to_canonical_json_bytes, to_yaml_string};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Properties file mapping run ids to attributes.
    #[arg(long)]
    pub properties: PathBuf,
    /// Print YAML instead of canonical JSON.
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Debug, Serialize)]
struct Inventory {
    runs: usize,
    problems: usize,
    algorithms: Vec<String>,
    attributes: Vec<String>,
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let runs = RunSet::load(&args.properties)?;
    let attributes: BTreeSet<String> = runs
        .iter()
        .flat_map(|(_, run)| run.attribute_names().map(str::to_string))
        .collect();
    let inventory = Inventory {
        runs: runs.len(),
        problems: runs.problem_runs().len(),
        algorithms: runs.algorithms(),
        attributes: attributes.into_iter().collect(),
    };
    if args.yaml {
        print!("{}", to_yaml_string(&inventory)?);
    } else {
        let json = to_canonical_json_bytes(&inventory)?;
        println!("{}", String::from_utf8(json)?);
    }
    Ok(())
}
