pub mod api;
pub mod routes;

use std::net::SocketAddr;

/// Start the Axum HTTP server and block until it shuts down.
///
/// This function is `async` and must be called from a tokio runtime.
/// `main.rs` builds the runtime explicitly for the `serve` command so
/// that all other CLI sub-commands remain synchronous.
pub async fn run_server_async(bind_addr: &str) -> std::io::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // Load and validate the catalogue before accepting any connections so
    // a corrupt pack surfaces here and not as skipped effects mid-query.
    crate::init().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let report = crate::data::validate::validate_pack_at(std::path::Path::new(
        &std::env::var(crate::data::catalogue::DATA_PATH_ENV)
            .unwrap_or_else(|_| crate::data::catalogue::DEFAULT_CATALOGUE_PATH.to_string()),
    ));
    if report.has_errors() {
        for diag in &report.diagnostics {
            eprintln!("{}: {}: {}", diag.severity, diag.context, diag.message);
        }
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "catalogue pack failed validation",
        ));
    }

    let app = routes::build_router();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("dogma server listening on http://{bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Synchronous entry point: creates a tokio runtime and drives the async
/// server. Called from the `serve` sub-command.
pub fn run_server(bind_addr: &str) -> std::io::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        .block_on(run_server_async(bind_addr))
}
