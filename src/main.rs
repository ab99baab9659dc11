use std::process::ExitCode;

use clap::Parser;
use idlehook::{
    daemon::{
        args::{usage_error_message, DaemonArgs},
        start_daemon,
    },
    utils::{logging::enable_logging, runtime::single_thread_runtime},
};
use tracing::error;

fn main() -> ExitCode {
    let program = std::env::args_os()
        .next()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").into());
    let args = match DaemonArgs::try_parse() {
        Ok(args) => args,
        // --help and --version go to stdout as usual
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            eprint!("{}", usage_error_message(&program, &e));
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    if let Err(e) = enable_logging(&program, args.verbose, args.log_dir.as_deref()) {
        eprintln!("{program}: cannot set up logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match single_thread_runtime().and_then(|runtime| runtime.block_on(start_daemon(args))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
