use lingo_cli::{GenerateCli, parse_args, report_error};

#[tokio::main]
async fn main() {
    let cli: GenerateCli = parse_args();

    if let Err(e) = cli.run().await {
        std::process::exit(report_error::<GenerateCli>(&e));
    }
}
