use actix_web::error::JsonPayloadError;
use actix_web::{web, App, HttpServer};
use sea_orm::Database;

use crate::config::Config;
use crate::handlers::get_leaderboard::get_leaderboard;
use crate::handlers::get_matches::get_matches;
use crate::handlers::post_create_match::post_create_match;
use crate::handlers::post_finalize::post_finalize;
use crate::handlers::post_frame::post_frame;
use crate::http_types::AppHttpError;
use crate::server_state::ServerState;

pub struct Handle {
    pub server: actix_web::dev::Server,
    pub addrs: Vec<std::net::SocketAddr>,
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let handle = create(config).await?;
    handle.server.await?;
    Ok(())
}

pub async fn create(config: Config) -> anyhow::Result<Handle> {
    let mut db_options = sea_orm::ConnectOptions::new(&config.db_path);
    db_options.max_connections(32);
    let db = Database::connect(db_options).await?;
    let port = config.server_config.port;
    let app_state = ServerState {
        config: config.server_config,
        db,
    };

    let server = HttpServer::new(move || {
        let json_config = web::JsonConfig::default()
            .limit(app_state.config.max_payload_bytes)
            .error_handler(|err, _req| {
                let mapped = match &err {
                    JsonPayloadError::Overflow { .. }
                    | JsonPayloadError::OverflowKnownLength { .. } => {
                        AppHttpError::PayloadTooLarge
                    }
                    _ => AppHttpError::BadClientData,
                };
                actix_web::Error::from(mapped)
            });
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config)
            .service(post_create_match)
            .service(post_frame)
            .service(post_finalize)
            .service(get_matches)
            .service(get_leaderboard)
    })
    .workers(8)
    .bind(("::", port))?;
    let addrs = server.addrs();
    let server = server.run(); // Does not actually run the server but creates a future.
    Ok(Handle { server, addrs })
}
