use log::info;
use quiz_engine_rust::{
    config::ServerConfig,
    handlers::connection_handler::handle_connection,
    loggers::file_logger::init_file_logger,
    registry::Lists,
    storage::result_store::{InMemoryResultStore, ResultStore, SqliteResultStore},
};
use std::{error::Error, sync::Arc};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env();

    if let Err(error) = init_file_logger(&config.log_dir) {
        eprintln!("Logging disabled: {}", error);
    }
    info!("App started!");

    let store: Arc<dyn ResultStore> = if config.uses_in_memory_store() {
        info!("Keeping results in memory");
        Arc::new(InMemoryResultStore::new())
    } else {
        Arc::new(SqliteResultStore::open(&config.database_path)?)
    };

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Listening on: {}", &config.addr);

    let lists = Lists::new(store, config);

    while let Ok((stream, addr)) = listener.accept().await {
        tokio::spawn(handle_connection(lists.clone(), stream, addr));
    }

    Ok(())
}
