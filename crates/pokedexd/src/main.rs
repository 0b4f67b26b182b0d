//! `pokedexd` binary: serves Pokémon queries over stdin and stdout.

use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            writeln!(
                io::stderr().lock(),
                "pokedexd: failed to start runtime: {error}"
            )
            .unwrap_or_default();
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(pokedexd::run_server());
    // The stdin reader may still be parked on a blocking read.
    runtime.shutdown_background();

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(io::stderr().lock(), "pokedexd: {error}").unwrap_or_default();
            ExitCode::FAILURE
        }
    }
}
