use log::LevelFilter;

#[derive(Debug, clap::Args)]
pub(crate) struct Verbose {
    /// Increase log output, repeat for more detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

impl Verbose {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Initializes `env_logger` at the level chosen by `-v`. `RUST_LOG` takes
/// precedence when set.
pub(crate) fn init_logging(verbose: &Verbose) {
    env_logger::Builder::new()
        .filter_level(verbose.level())
        .parse_env("RUST_LOG")
        .init();
}
