mod commands;
mod helpers;

use clap::Parser;
use text2mcpl_core::ConvertError;

pub fn run_from_env() -> i32 {
    let args = std::env::args().collect::<Vec<_>>();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let compatibility_error = error.as_convert_error();
            eprintln!("{}", compatibility_error.diagnostic_line());
            eprintln!("{}", compatibility_error.fatal_exit_line());
            compatibility_error.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_logging(cli.convert.verbosity());
            commands::run_convert_command(cli.convert)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "text2mcpl",
    version,
    about = "Convert a text list of particle hits into an MCPL file"
)]
struct Cli {
    #[command(flatten)]
    convert: commands::ConvertArgs,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Convert(ConvertError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_convert_error(&self) -> ConvertError {
        match self {
            Self::Usage(message) => {
                ConvertError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Convert(error) => error.clone(),
            Self::Internal(error) => ConvertError::internal("INTERNAL.CLI", format!("{error:#}")),
        }
    }
}
