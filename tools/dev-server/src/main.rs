//! Development Server for AppHub
//!
//! Serves the web bundle (the wasm-pack output plus the HTML shell) and a
//! local registration endpoint so the identity client can be exercised
//! without the production backend.
//!
//! ```text
//! PORT=8080 APPHUB_WEB_DIR=web cargo run -p dev-server
//! ```

mod api;
mod registry;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::get_service,
};
use tower_http::services::ServeDir;

use crate::registry::Registry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let web_dir = std::env::var("APPHUB_WEB_DIR").unwrap_or_else(|_| String::from("web"));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let serve_dir = ServeDir::new(&web_dir)
        .precompressed_gzip()
        .precompressed_br();

    let app = api::router(Arc::new(Registry::new()))
        .fallback_service(get_service(serve_dir).handle_error(|_| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .layer(axum::middleware::from_fn(fix_content_type));

    println!("╔═══════════════════════════════════════════════════╗");
    println!("║             AppHub Development Server             ║");
    println!("╠═══════════════════════════════════════════════════╣");
    println!("║  URL: http://localhost:{:<27}║", port);
    println!("║  Web: {:<44}║", web_dir);
    println!("║  API: POST {:<39}║", api::FINGERPRINT_PATH);
    println!("║  Press Ctrl+C to stop                             ║");
    println!("╚═══════════════════════════════════════════════════╝");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Fix MIME types for module scripts and wasm
async fn fix_content_type(request: Request<Body>, next: axum::middleware::Next) -> Response<Body> {
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let content_type = if path.ends_with(".js") || path.ends_with(".mjs") {
        "application/javascript; charset=utf-8"
    } else if path.ends_with(".wasm") {
        "application/wasm"
    } else if path.ends_with(".css") {
        "text/css; charset=utf-8"
    } else if path.ends_with(".html") {
        "text/html; charset=utf-8"
    } else {
        return response;
    };

    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
