//! Backend entry-point: wires the REST endpoints over the in-memory store.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, rt, web};
use mockable::DefaultClock;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{configure_api, json_config, path_config, query_config};
use backend::outbound::persistence::MemoryStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let state = HttpState::with_memory_store(MemoryStore::new(), Arc::new(DefaultClock));
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(SameSite::Lax)
            .build();

        App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(
                web::scope("/api")
                    .wrap(session)
                    .configure(configure_api),
            )
            .service(ready)
            .service(live)
    })
    .disable_signals()
    .bind(("0.0.0.0", 8080))?
    .run();

    // Fail liveness before draining, so the orchestrator stops routing to
    // this instance while in-flight requests finish.
    let server_handle = server.handle();
    let draining = health_state.clone();
    rt::spawn(async move {
        if let Err(e) = rt::signal::ctrl_c().await {
            warn!(error = %e, "shutdown signal listener failed");
            return;
        }
        draining.mark_unhealthy();
        server_handle.stop(true).await;
    });

    health_state.mark_ready();
    server.await
}
