mod sighting;
mod telemetry;

use walrus_sample_util::{load_env_file, AppConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    sighting::WALRUS.emit();

    Ok(())
}
