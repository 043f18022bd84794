use super::CliError;
use super::helpers::Verbosity;
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use text2mcpl_core::container::FloatPrecision;
use text2mcpl_core::{ConversionConfig, ConversionRequest, render_human_summary, run_conversion};
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct ConvertArgs {
    /// Text file with one `x y z px py pz ekin` record per line
    #[arg(value_name = "input_file.txt")]
    input: PathBuf,

    /// Output MCPL file (`.mcpl` is appended when missing)
    #[arg(value_name = "output_file.mcpl")]
    output: PathBuf,

    /// PDG code assigned to every particle
    #[arg(
        long,
        default_value_t = text2mcpl_core::common::constants::NEUTRON_PDG_CODE,
        allow_negative_numbers = true
    )]
    pdg_code: i32,

    /// Statistical weight assigned to every particle
    #[arg(long, default_value_t = text2mcpl_core::common::constants::DEFAULT_WEIGHT)]
    weight: f64,

    /// Header comment
    #[arg(long, default_value = text2mcpl_core::common::constants::DEFAULT_HEADER_COMMENT)]
    comment: String,

    /// Header source name (defaults to the output argument)
    #[arg(long)]
    source_name: Option<String>,

    /// Keep the uncompressed .mcpl instead of gzipping it
    #[arg(long)]
    no_gzip: bool,

    /// Store floating-point fields in double precision
    #[arg(long)]
    double_precision: bool,

    /// Write a JSON run summary to this path
    #[arg(long, value_name = "path")]
    summary: Option<PathBuf>,

    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl ConvertArgs {
    pub(super) fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Default,
            (false, 1) => Verbosity::Debug,
            (false, _) => Verbosity::Trace,
        }
    }

    fn into_request(self) -> ConversionRequest {
        let config = ConversionConfig {
            pdg_code: self.pdg_code,
            weight: self.weight,
            comment: self.comment,
            source_name: self.source_name,
            gzip: !self.no_gzip,
            precision: if self.double_precision {
                FloatPrecision::Double
            } else {
                FloatPrecision::Single
            },
            ..ConversionConfig::default()
        };

        let request = ConversionRequest::new(self.input, self.output).with_config(config);
        match self.summary {
            Some(path) => request.with_summary_path(path),
            None => request,
        }
    }
}

pub(super) fn run_convert_command(args: ConvertArgs) -> Result<i32, CliError> {
    let request = args.into_request();
    debug!(?request.config, "resolved conversion config");
    let summary = run_conversion(&request).map_err(CliError::Convert)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render_human_summary(&summary))
        .context("failed to write conversion summary to stdout")?;
    if let Some(path) = &request.summary_path {
        writeln!(stdout, "JSON summary: {}", path.display())
            .context("failed to write conversion summary to stdout")?;
    }

    Ok(0)
}
