use clap::Parser;
use nightshield::api::{Cli, run};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    nightshield::logging::init(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
