use crate::error::{ErrorKind, ScnError, ScnErrorExt};
use std::path::{Path, PathBuf};

macro_rules! config {
    ($($field:ident : $ty:ty $default:block),* $(,)?) => {
        paste::paste! {
            mod default {
                $(pub fn $field() -> $ty $default)*
            }

            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            pub struct Config {
                $(
                    #[serde(default = "default::" $field)]
                    pub $field: $ty,
                )*

                #[serde(skip)]
                had_error_parsing: bool,
            }

            impl Config {
                pub fn new() -> Self {
                    Self {
                        $($field: default::$field(),)*
                        had_error_parsing: false,
                    }
                }
            }
        }
    };
}

config!(
    endpoint: String { String::from(crate::DEFAULT_ENDPOINT) },
    telemetry_enabled: bool { true },
    resample_interval: f32 { crate::RESAMPLE_INTERVAL },
    request_timeout_ms: u64 { 5000 },
);

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    fn with_error(self) -> Config {
        Config {
            had_error_parsing: true,
            ..self
        }
    }

    pub fn had_error_parsing(&self) -> bool {
        self.had_error_parsing
    }

    pub fn config_path() -> Result<PathBuf, ScnError> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            ScnError::because(ErrorKind::NoPath, String::from("no config directory"))
        })?;
        path.push("scinotes");

        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        path.push("config.ron");
        Ok(path)
    }

    pub fn from_disk(path: &Path) -> Config {
        tracing::info!("load config from {}", path.display());
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Config::default();
            }
            Err(err) => {
                ScnError::from(err).display_with("could not open config file");
                return Config::default().with_error();
            }
        };

        match ron::from_str(&file) {
            Ok(config) => config,
            Err(err) => {
                ScnError::from(err).display_with("could not parse config file");
                Config::default().with_error()
            }
        }
    }

    pub fn to_ron_string(&self) -> Result<String, ScnError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new()
                .new_line(String::from("\n"))
                .indentor(String::from("  ")),
        )?)
    }

    pub fn save(&self, path: &Path) {
        tracing::info!("save config to {}", path.display());

        if self.had_error_parsing {
            tracing::error!(
                "not overwriting {}, it could not be parsed when it was loaded",
                path.display()
            );
            return;
        }

        let contents = match self.to_ron_string() {
            Ok(contents) => contents,
            Err(err) => {
                err.display_with("could not serialize config");
                return;
            }
        };

        let contents = format!("// this file generated automatically.\n{contents}");

        std::fs::write(path, contents)
            .map_err(ScnError::from)
            .display_with("could not write config file");
    }
}
