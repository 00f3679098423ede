use crate::routes::*;
use actix_web::dev::Server;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use notesync::BoxedRemote;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub fn run(listener: TcpListener, remote: BoxedRemote) -> Result<Server, std::io::Error> {
    let remote: Data<BoxedRemote> = Data::new(remote);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .wrap(TracingLogger::default())
            .service(web::scope("/api").configure(api_config))
            .configure(index_config)
            .app_data(remote.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
