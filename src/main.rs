use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = hawwa::cli::Cli::parse();
    if let Err(e) = hawwa::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
