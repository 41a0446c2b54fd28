use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let result = vtty::cli::run().await;

    // Snapshot goes to stdout, diagnostics to stderr; flush both before exit
    use std::io::{self, Write};
    let _ = io::stderr().flush();
    let _ = io::stdout().flush();

    result
}
