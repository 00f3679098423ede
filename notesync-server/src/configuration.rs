use notesync::remote::util::populate_sample_notes;
use notesync::{BoxedRemote, InMemoryRemote};

#[derive(serde::Deserialize, Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    populate: bool,
}

impl Settings {
    pub async fn get_remote(&self) -> BoxedRemote {
        let remote: BoxedRemote = Box::new(InMemoryRemote::new());
        if self.populate {
            populate_sample_notes(&remote).await;
        }
        remote
    }
}

lazy_static! {
    pub static ref CONFIGURATION: Settings =
        get_configuration().expect("Failed to read configuration.yml.");
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("debug", false)?
        .set_default("host", "localhost")?
        .set_default("port", 8000)?
        .set_default("populate", false)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::default()
                .prefix("notesync")
                .separator("_"),
        )
        .build()?;
    config.try_deserialize()
}
