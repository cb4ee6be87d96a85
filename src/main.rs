use clap::Parser;
use compress_img::cli::{Args, Commands};
use compress_img::commands::{run_compress, run_count, run_rename};
use compress_img::config::Config;
use compress_img::error::Result;
use compress_img::logger;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logger::set_quiet_mode(args.quiet);
    logger::set_verbose_mode(args.verbose);

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            compress_img::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Compress {
            file,
            new_name,
            replace,
            force,
            preserve,
            no_preserve,
        } => {
            let config = Config::from_env()?;
            let preserve = if no_preserve { Vec::new() } else { preserve };
            run_compress(&config, &file, new_name, replace, force, preserve).await
        }
        Commands::Count => {
            let config = Config::from_env()?;
            run_count(&config).await
        }
        Commands::Rename { file, force } => run_rename(&file, force),
    }
}
