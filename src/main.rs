use clap::Parser;
use notepane::cli::commands::Cli;
use notepane::cli::handlers;
use notepane::logging;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => notepane::tui::run(cli.data_dir.as_deref()),
        Some(_) => {
            logging::init_cli();
            handlers::dispatch(cli)
        }
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
