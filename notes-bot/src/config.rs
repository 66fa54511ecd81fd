use crate::notes::DisplayZone;
use std::env;
use std::path::PathBuf;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const DISCORD_TOKEN: &str = "DISCORD_TOKEN";
    /// Path of the JSON file notes are saved to
    pub const DATA_FILE: &str = "NOTES_DATA_FILE";
    /// Maximum characters per outbound message chunk
    pub const MAX_CHUNK: &str = "NOTES_MAX_CHUNK";
    /// IANA zone for `!load` without an argument (default: the server's local zone)
    pub const DISPLAY_TIMEZONE: &str = "NOTES_DISPLAY_TIMEZONE";
    /// Code-fence language for `!load` output; unset sends plain text
    pub const CODE_FENCE: &str = "NOTES_CODE_FENCE";
}

/// Default values
pub mod defaults {
    pub const DATA_FILE: &str = "data.json";
    pub const MAX_CHUNK: usize = crate::notes::format::DEFAULT_MAX_CHUNK;
}

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub data_file: PathBuf,
    pub max_chunk: usize,
    pub display_zone: DisplayZone,
    pub code_fence: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat blank values as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get(env_vars::DISCORD_TOKEN)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| format!("{} environment variable is not set.", env_vars::DISCORD_TOKEN))?;

        let max_chunk = match get(env_vars::MAX_CHUNK) {
            None => defaults::MAX_CHUNK,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(format!(
                        "{} must be a positive number, got {:?}",
                        env_vars::MAX_CHUNK,
                        raw
                    ));
                }
            },
        };

        let display_zone = match get(env_vars::DISPLAY_TIMEZONE) {
            None => DisplayZone::local(),
            Some(name) => DisplayZone::from_name(name.trim()).ok_or_else(|| {
                format!(
                    "{} must be an IANA timezone name like Europe/Berlin, got {:?}",
                    env_vars::DISPLAY_TIMEZONE,
                    name
                )
            })?,
        };

        Ok(Self {
            discord_token,
            data_file: PathBuf::from(
                get(env_vars::DATA_FILE).unwrap_or_else(|| defaults::DATA_FILE.to_string()),
            ),
            max_chunk,
            display_zone,
            code_fence: get(env_vars::CODE_FENCE).map(|l| l.trim().to_string()),
        })
    }
}
