use std::path::PathBuf;

use clap::Parser;
use log::info;

/// Trains and packages a classifier from a prepared training directory.
///
/// The directory must contain training data, encoders and a manifest as
/// written by one of the data writers; the manifest decides which backend
/// trainer runs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Training directory prepared by a data writer
    dir: PathBuf,

    /// Extra arguments passed through to the backend trainer
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    trainer_args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("training classifier in {}", args.dir.display());
    let archive = featkit::train_and_package(&args.dir, &args.trainer_args)?;
    println!("packaged classifier: {}", archive.display());
    Ok(())
}
