use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use clap::Parser;
use log::info;
use thiserror::Error;

use mzconnect::io::{PeakTableError, PeakTableStyle, PeakTableWriter, ScanTableError, ScanTableReader};
use mzconnect::prelude::*;
use mzconnect::{
    ConnectorConfigError, DataFileRef, PeakBuilderParameters, SimpleConnectorParameters,
    Tolerance, Weighting,
};

#[derive(Debug, Error)]
enum MzConnectError {
    #[error(transparent)]
    ScanTable(#[from] ScanTableError),
    #[error(transparent)]
    PeakTable(#[from] PeakTableError),
    #[error("Invalid parameters: {0}")]
    Config(#[from] ConnectorConfigError),
    #[error("Failed to read parameters from {path}: {source}")]
    Parameters {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("An I/O error occurred: {0}")]
    IOError(#[from] io::Error),
}

/// Build chromatographic peaks from a table of centroided scans
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The scan table to read, with `time mz intensity` rows. Use `-` for stdin.
    input_path: String,

    /// Where to write the peak table. Use `-` for stdout.
    #[arg(short, long, default_value = "-")]
    output_path: String,

    /// The m/z tolerance for connecting points across scans
    #[arg(short = 'm', long, default_value_t = 0.01)]
    mz_tolerance: f64,

    /// Interpret the m/z tolerance as parts-per-million instead of Daltons
    #[arg(long)]
    ppm: bool,

    /// The relative intensity difference worth one full m/z tolerance
    #[arg(short, long, default_value_t = 0.5)]
    intensity_tolerance: f64,

    /// The minimum retention time span of a reported peak
    #[arg(short = 'd', long, default_value_t = 0.0)]
    minimum_peak_duration: f64,

    /// The minimum height of a reported peak
    #[arg(short = 'H', long, default_value_t = 0.0)]
    minimum_peak_height: f64,

    /// Split peaks on points below this quantile of their intensities
    #[arg(short = 't', long)]
    chromatographic_threshold: Option<f64>,

    /// Load the peak builder parameters from a JSON file instead of the options above
    #[arg(short, long)]
    parameters: Option<PathBuf>,

    /// The intensity weighting for peak m/z
    #[arg(short, long, default_value_t)]
    weighting: Weighting,

    /// Write the m/z, extent, height and area of each peak as well
    #[arg(long)]
    detailed: bool,

    /// The data file name recorded on each peak, defaults to the input file name
    #[arg(long)]
    data_file: Option<String>,
}

impl Args {
    fn builder_parameters(&self) -> Result<PeakBuilderParameters, MzConnectError> {
        if let Some(path) = self.parameters.as_ref() {
            let handle = fs::File::open(path)?;
            return serde_json::from_reader(io::BufReader::new(handle)).map_err(|source| {
                MzConnectError::Parameters {
                    path: path.clone(),
                    source,
                }
            });
        }
        let mz_tolerance = if self.ppm {
            Tolerance::PPM(self.mz_tolerance)
        } else {
            Tolerance::Da(self.mz_tolerance)
        };
        let mut params = SimpleConnectorParameters::new(
            mz_tolerance,
            self.intensity_tolerance,
            self.minimum_peak_duration,
            self.minimum_peak_height,
        );
        if let Some(level) = self.chromatographic_threshold {
            params = params.with_chromatographic_threshold(level);
        }
        Ok(params.into())
    }

    fn data_file(&self) -> DataFileRef {
        match self.data_file.as_ref() {
            Some(name) => DataFileRef::new(name.as_str()),
            None if self.input_path == "-" => DataFileRef::new("stdin"),
            None => {
                let path = PathBuf::from(&self.input_path);
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.input_path.clone());
                DataFileRef::new(name)
            }
        }
    }
}

fn run(args: Args) -> Result<(), MzConnectError> {
    let start = Instant::now();
    let parameters = args.builder_parameters()?;
    let mut builder = parameters.build()?;
    info!("Building peaks with {} using {parameters:?}", parameters.name());

    let input: Box<dyn Read> = if args.input_path == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(fs::File::open(&args.input_path)?)
    };
    let output: Box<dyn Write> = if args.output_path == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&args.output_path)?)
    };
    let style = if args.detailed {
        PeakTableStyle::Detailed
    } else {
        PeakTableStyle::Summary
    };
    let mut writer = PeakTableWriter::with_style(BufWriter::new(output), style);
    writer.set_weighting(args.weighting);
    writer.write_header()?;

    let data_file = args.data_file();
    let reader = ScanTableReader::new(input);
    let mut n_scans = 0usize;
    for scan in reader {
        let scan = scan?;
        n_scans += 1;
        let finished = builder.add_scan(scan.scan, &scan.peaks, &data_file);
        writer.write_peaks(&finished)?;
    }
    let finished = builder.finish_peaks();
    writer.write_peaks(&finished)?;
    writer.flush()?;

    info!(
        "Wrote {} peaks from {n_scans} scans of {data_file} in {:0.3?}",
        writer.peak_count(),
        start.elapsed()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{e}");
        exit(1);
    }
}
