//! Standalone mock API server, for driving the session layer by hand.

use tokio::net::TcpListener;

const DEFAULT_PORT: &str = "3001";

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock todo API listening on {addr}");
    mock_server::run(listener).await
}
