use clap::Parser;
use pythia::Lifecycle;

mod cli;
mod config;
mod logging;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.log_format);

    let config = cli.load_config()?;
    let lifecycle = Lifecycle::global();
    let context = lifecycle.init(&config.pythia)?;
    let output = cli.run(&context, &config);
    lifecycle.deinit();

    println!("{}", serde_json::to_string_pretty(&output?)?);
    Ok(())
}
