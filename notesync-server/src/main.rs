use notesync_server::configuration::CONFIGURATION;
use notesync_server::startup::run;
use notesync_server::telemetry::{get_subscriber, init_tracing};
use std::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber =
        get_subscriber(&CONFIGURATION).with(tracing_subscriber::fmt::Layer::default());
    init_tracing(subscriber);

    let address = format!("{}:{}", CONFIGURATION.host, CONFIGURATION.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("note service listening on {}", address);
    run(listener, CONFIGURATION.get_remote().await)?.await
}
