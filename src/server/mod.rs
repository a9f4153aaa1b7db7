//! Preview server with rebuild on change and periodic revalidation

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::commands::generate::{rebuild, ContentWatcher};
use crate::LearnSite;

/// Output directory currently being served; follows `public_dir` across rebuilds
pub type ServedDir = Arc<RwLock<PathBuf>>;

/// Serve the generated site; unless `static_mode`, rebuild on changes and
/// every `revalidate` seconds
pub async fn start(site: &LearnSite, ip: &str, port: u16, static_mode: bool) -> Result<()> {
    let served: ServedDir = Arc::new(RwLock::new(site.public_dir.clone()));
    let app = router(served.clone());

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if !static_mode {
        let watcher = ContentWatcher::new(site)?;
        let site = site.clone();
        if site.config.revalidate > 0 {
            println!("Revalidating every {}s.", site.config.revalidate);
        }
        println!("Watching for changes...");
        tokio::spawn(refresh(site, watcher, served));
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Static file router over the served directory with the 404 page as fallback
pub fn router(served: ServedDir) -> Router {
    Router::new()
        .fallback(serve_file)
        .with_state(served)
        .layer(TraceLayer::new_for_http())
}

async fn serve_file(State(served): State<ServedDir>, request: Request<Body>) -> Response {
    let public_dir = current_dir(&served);
    let mut files = ServeDir::new(&public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(public_dir.join("404.html")));

    match files.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn current_dir(served: &ServedDir) -> PathBuf {
    match served.read() {
        Ok(dir) => dir.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Point the server at the site's output directory after a config reload
fn follow_public_dir(served: &ServedDir, site: &LearnSite) {
    let mut dir = match served.write() {
        Ok(dir) => dir,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *dir != site.public_dir {
        tracing::info!("Now serving {:?} (was {:?})", site.public_dir, *dir);
        *dir = site.public_dir.clone();
    }
}

/// Regenerate on content changes and on the revalidation interval
async fn refresh(mut site: LearnSite, mut watcher: ContentWatcher, served: ServedDir) {
    let revalidate = site.config.revalidate;
    let period = Duration::from_secs(revalidate.max(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = watcher.changed() => {
                let Some(changed) = changed else { break };
                for path in &changed {
                    tracing::info!("File changed: {}", path.display());
                }
                rebuild(&mut site).await;
            }
            _ = ticker.tick(), if revalidate > 0 => {
                tracing::debug!("Revalidating content");
                rebuild(&mut site).await;
            }
        }
        follow_public_dir(&served, &site);
    }

    tracing::warn!("File watcher stopped");
}
