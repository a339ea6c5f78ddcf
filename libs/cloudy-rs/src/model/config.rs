use std::env;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_API_LOCATION;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Where should cloudy store data, including logs and a remembered
    /// session?
    pub writeable_path: String,
    /// Base url of the Cloudy backend.
    pub api_url: String,
    /// Should cloudy do background work like keep the store fresh and watch
    /// for idle sessions?
    pub background_work: bool,

    /// Should we log at all?
    pub logs: bool,
    /// Should logs be printed to stdout?
    pub stdout_logs: bool,
    /// Should logs be colored?
    pub colored_logs: bool,
}

impl Config {
    /// Configures cloudy for CLI use with no stdout logs or background work.
    /// `writeable_path_subfolder` is generally a hardcoded client name like
    /// `"cli"`.
    pub fn cli_config(writeable_path_subfolder: &str) -> Config {
        Config {
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            api_url: Self::api_url(),
            background_work: false,
            logs: true,
            stdout_logs: false,
            colored_logs: true,
        }
    }

    /// Configures cloudy for UI use with stdout logs and background work.
    pub fn ui_config(writeable_path_subfolder: &str) -> Config {
        Config {
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            api_url: Self::api_url(),
            background_work: true,
            logs: true,
            stdout_logs: true,
            colored_logs: true,
        }
    }

    /// Produces a full writeable path for cloudy to use based on environment
    /// variables and platform.
    pub fn writeable_path(writeable_path_subfolder: &str) -> String {
        let specified_path = env::var("CLOUDY_PATH");

        let default_path =
            env::var("HOME") // unix
                .or(env::var("HOMEPATH")) // windows
                .map(|home| format!("{home}/.cloudy/{writeable_path_subfolder}"));

        let Ok(writeable_path) = specified_path.or(default_path) else {
            panic!("no location for cloudy to initialize");
        };

        writeable_path
    }

    pub fn api_url() -> String {
        env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_LOCATION.to_string())
    }
}
