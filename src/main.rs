extern crate hygro;

use clap::Parser;
use hygro::output::write_monthly_report;
use hygro::{run_analysis, MaterialRegistry};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct HygroArgs {
    /// project JSON describing the construction, climate series and optional
    /// ground parameters
    project_file: String,
    /// materials JSON supplying the registry referenced by the project's
    /// layer material ids
    #[arg(long, short)]
    materials_file: Option<String>,
    /// also write the month-by-month results as CSV
    #[arg(long, default_value_t = false)]
    monthly_csv: bool,
}

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = HygroArgs::parse();

    let project_file = args.project_file.as_str();
    let project_file_ext = Path::new(project_file).extension().and_then(OsStr::to_str);
    let project_file_stem = match project_file_ext {
        Some(ext) => &project_file[..(project_file.len() - ext.len() - 1)],
        None => project_file,
    };

    let registry = match args.materials_file {
        Some(materials_file) => {
            MaterialRegistry::from_json(BufReader::new(File::open(materials_file)?))?
        }
        None => MaterialRegistry::new(),
    };

    let result = run_analysis(BufReader::new(File::open(project_file)?), &registry)?;
    info!(
        "overall result: {} (U = {} W/m2K)",
        result.overall_result,
        hygro::output::round_u_value(result.u_value)
    );

    let result_file = format!("{project_file_stem}_analysis.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&result_file)?), &result)?;
    info!("analysis written to {result_file}");

    if args.monthly_csv {
        let csv_file = format!("{project_file_stem}_monthly.csv");
        write_monthly_report(BufWriter::new(File::create(&csv_file)?), &result)?;
        info!("monthly report written to {csv_file}");
    }

    Ok(())
}
