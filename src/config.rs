use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "secret-santa.csv";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Parser)]
#[command(name = "secret-santa", version, about = "Draw Secret Santa pairs from an employee list")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draw assignments from local files and write them as CSV
    Generate(GenerateArgs),
    /// Run the HTTP service that turns uploads into assignment files
    Serve(ServerConfig),
    /// Convert the first sheet of a spreadsheet to CSV
    Normalize(NormalizeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Employee list (.csv, .xlsx, .xls)
    #[arg(short, long)]
    pub employees: PathBuf,

    /// Last round's assignments, to avoid repeat pairings
    #[arg(short, long)]
    pub previous: Option<PathBuf>,

    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Fixed RNG seed, for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: String,

    /// Largest accepted request body
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Args)]
pub struct NormalizeArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    /// Defaults to the input path with a .csv extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl NormalizeArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("csv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_defaults_output_path() {
        let cli = Cli::try_parse_from(["secret-santa", "generate", "--employees", "staff.xlsx"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
                assert!(args.previous.is_none());
                assert!(args.seed.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_explicit_port() {
        let cli = Cli::try_parse_from(["secret-santa", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Command::Serve(config) => assert_eq!(config.port, 9000),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn normalize_output_defaults_next_to_input() {
        let args = NormalizeArgs {
            input: PathBuf::from("data/staff.xlsx"),
            output: None,
        };
        assert_eq!(args.output_path(), PathBuf::from("data/staff.csv"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
