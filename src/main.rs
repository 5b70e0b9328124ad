use std::io;

use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopfront::api::{self, AppState};
use shopfront::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shopfront=info,actix_web=info")),
        )
        .compact()
        .init();

    let config = Config::from_env();
    let admin_addr = config.admin_addr.clone();
    let public_addr = config.public_addr.clone();
    let static_dir = config.static_dir.clone();

    let state = AppState::new(config).map_err(io::Error::other)?;
    state.init_storage().await.map_err(io::Error::other)?;
    info!("Storage ready under {}", state.config.data_dir.display());

    let admin_state = state.clone();
    let admin_static = static_dir.clone();
    let admin = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(admin_state.clone()))
            .service(Files::new("/static", admin_static.clone()))
            .configure(api::admin::configure)
    })
    .bind(&admin_addr)?
    .run();

    let public = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .service(Files::new("/static", static_dir.clone()))
            .configure(api::storefront::configure)
    })
    .bind(&public_addr)?
    .run();

    info!("Admin listening on http://{}", admin_addr);
    info!("Storefront listening on http://{}", public_addr);
    futures::future::try_join(admin, public).await?;
    Ok(())
}
