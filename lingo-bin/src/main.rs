use lingo_cli::{Cli, parse_args, report_error};

#[tokio::main]
async fn main() {
    let cli: Cli = parse_args();

    match cli.run().await {
        Ok(status) => std::process::exit(status),
        Err(e) => std::process::exit(report_error::<Cli>(&e)),
    }
}
