use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tablescore::data::frame::Frame;
use tablescore::data::ingest;
use tablescore::export;
use tablescore::model::source::{DEFAULT_MODEL_FILE, LocalFile, ModelSource, RemoteUrl};
use tablescore::pipeline;

/// Score a tabular upload with a trained classifier and export the results
/// to Excel.
#[derive(Parser)]
#[command(name = "tablescore", version)]
struct Cli {
    /// Input table (.csv or .ftr/.feather)
    input: PathBuf,

    /// Rows to sample for scoring
    #[arg(short = 'n', long, default_value_t = 5_000)]
    sample_size: usize,

    /// Path to a serialized model (default: model_final.json beside the
    /// executable)
    #[arg(long, conflicts_with = "model_url")]
    model: Option<PathBuf>,

    /// URL serving the serialized model
    #[arg(long)]
    model_url: Option<String>,

    /// Timeout for the model download, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Output workbook path
    #[arg(short, long, default_value = "predictions.xlsx")]
    output: PathBuf,
}

impl Cli {
    fn model_source(&self) -> Result<Box<dyn ModelSource>> {
        if let Some(url) = &self.model_url {
            let source = RemoteUrl::new(url).with_timeout(Duration::from_secs(self.timeout));
            return Ok(Box::new(source));
        }
        if let Some(path) = &self.model {
            return Ok(Box::new(LocalFile::new(path)));
        }
        Ok(Box::new(LocalFile::beside_executable(DEFAULT_MODEL_FILE)?))
    }
}

/// Render the first `n` rows for the terminal, the preview the upload page
/// showed inline.
fn preview(frame: &Frame, n: usize) -> String {
    let head = frame.head(n);
    let mut out = frame.names().join(", ");
    for row in 0..head.n_rows() {
        out.push('\n');
        for col in 0..head.n_cols() {
            if col > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}", head.cell(row, col));
        }
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let frame = ingest::ingest(&bytes, &name)?;
    println!("{}\n", preview(&frame, 5));

    let model = cli.model_source()?.load()?;
    let scored = pipeline::score(&frame, &model, cli.sample_size)?;
    println!("{}\n", preview(&scored, 10));

    let workbook = export::to_xlsx(&scored)?;
    std::fs::write(&cli.output, &workbook)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(
        "wrote {} scored rows to {} ({})",
        scored.n_rows(),
        cli.output.display(),
        export::XLSX_MIME
    );

    Ok(())
}
