use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = actual_request_url::cli::Cli::parse();
    if let Err(e) = actual_request_url::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
