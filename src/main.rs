mod app;

use app::cli::Cli;
use app::config::ConfigError;
use app::models::Outcome;
use clap::CommandFactory;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match app::run() {
        Ok(Outcome::Written(path)) => {
            println!("done, {} has been generated", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::NoMatches) => {
            println!("no music files found after filtering, exit");
            ExitCode::FAILURE
        }
        Err(err) if err.downcast_ref::<ConfigError>().is_some() => {
            eprintln!("{}", Cli::command().render_help());
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
