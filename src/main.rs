use clap::Parser;
use signaldash::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    signaldash::logging::init_logging(cli.verbose);
    run(cli)
}
