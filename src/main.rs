mod config;
mod finder;
mod fixture;
mod recording;
mod report;
mod update;

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

/// Fixture Updater: rewrites the SDK version (`pnsdk` query parameter) in the
/// request URLs recorded inside `*.bundle/*.plist` test fixtures.
#[derive(Parser, Debug)]
#[command(name = "fixture-updater", version, about)]
struct Cli {
    /// Directory holding the fixture bundles
    #[arg(short = 'f', long = "fixtures")]
    fixtures: PathBuf,

    /// SDK version written into the `pnsdk` parameter (also accepted as -sdk).
    ///
    /// Without it the tool only prints each recording's request data.
    #[arg(long = "updatesdk", value_name = "VERSION")]
    update_sdk: Option<String>,

    /// Config file (defaults to .fixture-updater.toml in the current directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reproduce the original script: discard rewritten URLs, keep only
    /// currentRequest/originalRequest, strip queries lacking `pnsdk`
    #[arg(long)]
    legacy: bool,

    /// Print request data instead of rewriting, even when a version is given
    #[arg(long)]
    inspect: bool,
}

impl Cli {
    fn mode(&self, config: &config::Config) -> update::Mode {
        match (&self.update_sdk, self.inspect) {
            (Some(sdk_version), false) => update::Mode::Update {
                sdk_version: sdk_version.clone(),
                options: config.rewrite_options(self.legacy),
            },
            _ => update::Mode::Inspect,
        }
    }
}

/// Options whose next argument is a value and must not be rewritten.
const VALUE_OPTIONS: [&str; 4] = ["-f", "--fixtures", "--updatesdk", "--config"];

/// Map the single-dash `-sdk` spelling onto `--updatesdk`, which clap
/// would otherwise read as the short flags `-s -d -k`.
///
/// Values of options and everything after `--` pass through unchanged.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut after_separator = false;
    let mut value_next = false;
    args.into_iter()
        .map(|arg| {
            if after_separator || std::mem::take(&mut value_next) {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    after_separator = true;
                    arg
                }
                Some("-sdk") => {
                    value_next = true;
                    OsString::from("--updatesdk")
                }
                Some(s) if VALUE_OPTIONS.contains(&s) => {
                    value_next = true;
                    arg
                }
                Some(s) => match s.strip_prefix("-sdk=") {
                    Some(value) => OsString::from(format!("--updatesdk={}", value)),
                    None => arg,
                },
                None => arg,
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    info!("loading configuration");
    let config = config::Config::load(cli.config.as_deref())?;
    debug!(bundle = %config.patterns.bundle, fixture = %config.patterns.fixture, "naming patterns");

    let finder = finder::FixtureFinder::new(&cli.fixtures, &config.patterns)?;
    let _main_span = info_span!("fixture_update", root = %finder.root().display()).entered();

    let mode = cli.mode(&config);
    match &mode {
        update::Mode::Inspect => info!("inspecting recorded requests"),
        update::Mode::Update { sdk_version, options } => {
            info!(sdk_version = %sdk_version, legacy = cli.legacy, "updating fixtures");
            debug!(?options, "rewrite options");
        }
    }

    let summary = update::run(&finder, &mode)?;
    info!(%summary, "done");

    Ok(())
}
