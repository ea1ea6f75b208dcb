use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::dictionary::Dictionary;
use server::network::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ServerConfig::parse();
    let dictionary = Dictionary::load(&config.dictionary)?;
    let mut server = Server::bind(&config, Box::new(dictionary)).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
