use crate::config::{CONFIG_FILE_NAME, ENV_PREFIX, PtgConfig};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use std::path::Path;

impl PtgConfig {
    /// Load configuration from multiple sources.
    /// Priority: environment variables > config file > defaults
    ///
    /// `config_path` must exist when given; otherwise `ptg.toml` in `cwd` is
    /// used if present.
    pub fn load(config_path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config_file = match config_path {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = cwd.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        let mut figment = Figment::new().merge(Serialized::defaults(Self::default_config()));

        if let Some(path) = &config_file {
            tracing::debug!("Loading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // PTG_DEFAULTS__PROVIDER, PTG_TRAVERSAL__MAX_FILES, ...
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    /// Parse a configuration document layered over the defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Self::default_config()))
                .merge(Toml::string(toml)),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: "Check ptg.toml syntax and field types".to_string(),
            }
            .into()
        })
    }
}
