use anyhow::Result;
use clap::Parser;
use flat_matcher::cli::{self, Cli};
use flat_matcher::config::AppConfig;
use flat_matcher::logging;

fn main() -> Result<()> {
    let args = Cli::parse();
    let cfg = AppConfig::load()?;
    logging::init(args.log_level.as_deref(), &cfg.settings.logging.level);
    cli::run(args, &cfg)
}
