#[tokio::main]
async fn main() {
    if let Err(e) = btc_staker_cli::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
