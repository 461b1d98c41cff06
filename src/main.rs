use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod render;
mod sheet;
mod store;
#[cfg(test)]
mod testing;

use config::{Config, StoreBackend};
use sheet::SheetGenerator;
use store::{FlatFileStore, RecordStore, SqliteStore};

pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Config,
    pub sheet: Arc<SheetGenerator>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::FlatFile => {
            log::info!("Using flat-file store at {}", config.data_file);
            Arc::new(FlatFileStore::new(&config.data_file))
        }
        StoreBackend::Sqlite => {
            log::info!("Initializing SQLite store at {}", config.database_url);
            Arc::new(
                SqliteStore::new(&config.database_url).expect("Failed to initialize database"),
            )
        }
    };

    let sheet = Arc::new(SheetGenerator::from_config(&config));

    log::info!("Starting qrref-backend on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                store: Arc::clone(&store),
                config: config.clone(),
                sheet: Arc::clone(&sheet),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::records::config)
            .configure(controllers::view::config)
            .configure(controllers::sheet::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
