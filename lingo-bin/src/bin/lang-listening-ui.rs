use lingo_cli::{ListenCli, parse_args, report_error};

// Not `#[tokio::main]`: fd 3 has to be checked before the runtime opens
// descriptors of its own.
fn main() {
    let cli: ListenCli = parse_args();

    match cli.run_blocking() {
        Ok(status) => std::process::exit(status),
        Err(e) => std::process::exit(report_error::<ListenCli>(&e)),
    }
}
