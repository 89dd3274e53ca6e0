use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::BenchArgs;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;

/// Parses arguments, applies any config file, and runs the benchmark to
/// completion.
///
/// # Errors
///
/// Returns an error for invalid arguments or configuration, when no target
/// is usable, or when the worker pool cannot be launched.
pub fn run() -> AppResult<()> {
    let (args, matches) = parse_args(std::env::args_os())?;
    let args = resolve_args(args, &matches)?;

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run_local(args))?;
    Ok(())
}

fn parse_args<I>(raw_args: I) -> AppResult<(BenchArgs, ArgMatches)>
where
    I: IntoIterator<Item = OsString>,
{
    let matches = BenchArgs::command().get_matches_from(raw_args);
    let args = BenchArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn resolve_args(mut args: BenchArgs, matches: &ArgMatches) -> AppResult<BenchArgs> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}
