use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::{self, Handle};
use tracing_subscriber::{fmt, EnvFilter, Registry};

static RELOAD_HANDLE: OnceCell<Handle<EnvFilter, Registry>> = OnceCell::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Json,
    Pretty,
    Compact,
}

/// Installs the global subscriber on the first call. Later calls only swap the
/// filter, so the level can be changed after the config has been reloaded.
pub fn init(level: &str, mode: Mode) -> Result<()> {
    let reload = RELOAD_HANDLE.get_or_try_init(|| {
        let (filter, handle) = reload::Layer::new(EnvFilter::try_new(level)?);

        let registry = tracing_subscriber::registry().with(filter);

        match mode {
            Mode::Default => registry
                .with(fmt::layer().with_file(true).with_line_number(true))
                .try_init(),
            Mode::Json => registry
                .with(fmt::layer().json().with_file(true).with_line_number(true))
                .try_init(),
            Mode::Pretty => registry
                .with(fmt::layer().pretty().with_file(true).with_line_number(true))
                .try_init(),
            Mode::Compact => registry
                .with(fmt::layer().compact().with_file(true).with_line_number(true))
                .try_init(),
        }?;

        Ok::<_, anyhow::Error>(handle)
    })?;

    reload.reload(EnvFilter::try_new(level)?)?;

    Ok(())
}
