//! Layered report configuration: defaults, then a config file, then
//! `CVP__*` environment variables (e.g. `CVP__EXPORT__FILE_NAME`).

use cvp_core::config::ReportConfig;
use tracing::debug;

const DEFAULT_CONFIG_NAME: &str = "cvp";
const ENV_PREFIX: &str = "CVP";

pub fn load(path: Option<&str>) -> Result<ReportConfig, Box<dyn std::error::Error>> {
    let file = match path {
        Some(p) => config::File::with_name(p),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let loaded: ReportConfig = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    loaded.export.validate()?;
    debug!(?loaded, "report configuration loaded");
    Ok(loaded)
}
