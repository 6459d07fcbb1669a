use clap::Parser;

use secret_santa::config::{Cli, Command};
use secret_santa::display::print_summary;
use secret_santa::parser::{normalize_to_csv, UploadedFile};
use secret_santa::santa::generate_to_file;
use secret_santa::web;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        // Messages are meant for the person who supplied the files; print as-is.
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Serve(config) => {
            println!("Starting web server on port {}...", config.port);
            println!("Access the site at http://localhost:{}", config.port);
            web::start_server(config).await?;
        }
        Command::Generate(args) => {
            println!("Loading employees from {}...", args.employees.display());
            let (run, output) = generate_to_file(&args)?;
            print_summary(&run.employees, &run.forbidden, &output);
        }
        Command::Normalize(args) => {
            let input = UploadedFile::from_path(&args.input)?;
            let csv = normalize_to_csv(&input)?;
            let output = args.output_path();
            std::fs::write(&output, csv)?;
            println!("CSV saved to: {}", output.display());
        }
    }

    Ok(())
}
