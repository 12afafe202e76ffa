use anyhow::{Context, Result};
use rgbw_core::{write_report, HostOptions, InvokeFailurePolicy, ShaderState};
use rgbw_script_host::{ReturnValue, ScriptSession};
use std::{
    io::{self, Write},
    process::ExitCode,
};

mod logging;

fn main() -> ExitCode {
    logging::init_tracing();
    match run(HostOptions::default(), io::stdout().lock()) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// open → load → publish → invoke → print → close. Returns the exit code.
fn run<W: Write>(options: HostOptions, out: W) -> Result<u8> {
    let policy = options.on_invoke_error;
    let mut session = ScriptSession::open(options).context("starting interpreter")?;

    if let Err(e) = session.load_script() {
        eprintln!("Couldn't load file: {e}");
        return Ok(1);
    }

    session
        .publish_state(&ShaderState::default())
        .context("publishing shader state")?;

    let returned = match session.invoke() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("ERROR: {e}");
            if policy == InvokeFailurePolicy::Abort {
                return Ok(1);
            }
            ReturnValue::nil()
        }
    };

    let entries = session.read_result(returned).context("reading result")?;
    tracing::debug!(entries = entries.len(), ?policy, "printing result");
    write_report(out, &entries).context("writing results")?;

    session.close();
    Ok(0)
}
