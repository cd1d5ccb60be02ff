use clap::Parser;
use timeline_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_default("timeline");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}
