use lazy_static::lazy_static;
use notesync::HttpRemote;
use notesync_server::configuration::CONFIGURATION;
use notesync_server::startup::run;
use notesync_server::telemetry::{get_subscriber, init_tracing};
use std::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;

lazy_static! {
    static ref TRACING: () = {
        let subscriber = get_subscriber(&*CONFIGURATION)
            .with(tracing_subscriber::fmt::Layer::default().with_test_writer());
        init_tracing(subscriber);
    };
}

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    /// An [`HttpRemote`] pointed at this app's API root.
    pub fn remote(&self) -> HttpRemote {
        HttpRemote::new(format!("{}/api", self.address))
    }
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // We retrieve the port assigned to us by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    lazy_static::initialize(&TRACING);

    let server = run(listener, CONFIGURATION.get_remote().await).expect("Failed to bind address");
    let _ = tokio::spawn(server);
    TestApp { address }
}
