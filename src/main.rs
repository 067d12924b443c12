use opd_tokens::{simulation, web};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("web") => {
            let port = args
                .get(2)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            println!("Starting web server on port {}...", port);
            println!("Dashboard at http://localhost:{}", port);
            web::start_server(port).await?;
        }
        Some("live") => {
            let tick_ms = args
                .get(2)
                .and_then(|p| p.parse::<u64>().ok())
                .unwrap_or(1000);
            simulation::run_live(tick_ms).await?;
        }
        // Scripted scenario (original behavior)
        _ => simulation::run_scripted()?,
    }

    Ok(())
}
