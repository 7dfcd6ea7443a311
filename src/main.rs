//! Unreliable Nutrition Contract (UNC)
//!
//! An MCP server that reconciles nutrition logs from four upstream sources.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use unc::build_info;
use unc::config::Config;
use unc::mcp::UncService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("unc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env()?;
    let fetcher = config.build_fetcher()?;
    eprintln!("Sources: {}", fetcher.describe());

    // Create the UNC service
    let service = UncService::new(fetcher);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
