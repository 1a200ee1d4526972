//! Export command - Write learned values of a saved agent
//!
//! Value grids are also written during training with `easy21 train --export-dir`.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    easy21::{Action, State},
    export::{ValueGridExporter, ValueTransform},
    learning::SavedAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Export learned values of a trained agent")]
pub struct ExportArgs {
    /// Path to trained agent file
    pub agent: PathBuf,

    /// Output file (CSV grid) or directory (with --all)
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Value transform for CSV grids (hit, stick, max, hit-minus-stick)
    #[arg(long, short = 't', default_value = "max")]
    pub transform: String,

    /// Write one CSV per transform into the output directory
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Export format
    #[arg(long, short = 'f', value_enum, default_value = "csv")]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Dealer-by-player grid of transformed values
    Csv,
    /// Every learned (state, action) entry
    Json,
}

#[derive(Debug, Serialize)]
struct ValueEntry {
    dealer_showing: u8,
    player_sum: i32,
    action: Action,
    value: f64,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let table = saved.value_table();

    match args.format {
        ExportFormat::Json => {
            let snapshot: BTreeMap<(State, Action), f64> = table.snapshot();
            let entries: Vec<ValueEntry> = snapshot
                .into_iter()
                .map(|((state, action), value)| ValueEntry {
                    dealer_showing: state.dealer_showing,
                    player_sum: state.player_sum,
                    action,
                    value,
                })
                .collect();
            let file = File::create(&args.output)
                .with_context(|| format!("Failed to create {}", args.output.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &entries)?;
            writer.flush()?;
            println!(
                "Exported {} value entries to {}",
                entries.len(),
                args.output.display()
            );
        }
        ExportFormat::Csv if args.all => {
            std::fs::create_dir_all(&args.output)
                .with_context(|| format!("Failed to create {}", args.output.display()))?;
            for transform in ValueTransform::ALL {
                let path = args
                    .output
                    .join(ValueGridExporter::file_name(&saved.algorithm, transform));
                let rows = ValueGridExporter::export(table, transform, &path)?;
                println!("Exported {rows} rows to {}", path.display());
            }
        }
        ExportFormat::Csv => {
            let transform: ValueTransform = args.transform.parse()?;
            let rows = ValueGridExporter::export(table, transform, &args.output)?;
            println!(
                "Exported {rows} rows ({transform}) to {}",
                args.output.display()
            );
        }
    }

    Ok(())
}
