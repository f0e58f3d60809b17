use actix_web::{middleware, App, HttpServer};
use moisture::{rest_config, Backend, Registry, ServiceError, Settings};
use std::io;

fn startup_error(err: ServiceError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = Settings::from_env().map_err(startup_error)?;

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "actix_server=info,actix_web=info,moisture=info");
    }
    env_logger::init();

    // one store handle for the whole process, each worker gets its own client on it
    let backend = Backend::connect(&settings.store).map_err(startup_error)?;

    let address = settings.address();
    log::info!("listening on {}", address);

    HttpServer::new(move || {
        App::new()
            // enable logger
            .wrap(middleware::Logger::default())
            .data(Registry::new(backend.store()))
            .configure(rest_config)
    })
    .bind(address)?
    .run()
    .await
}
