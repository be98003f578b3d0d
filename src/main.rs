use citemetrics::app;

use std::env;

/// Main entry point for the web application
///
/// Starts the citation metrics web server. An optional first argument
/// overrides the bind address.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Default bind address
    let addr = if args.len() >= 2 {
        args[1].clone()
    } else {
        "127.0.0.1:3000".to_string()
    };

    // Start the web application
    app::run(&addr).await?;

    Ok(())
}
