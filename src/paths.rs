use std::path::PathBuf;

/// Returns the user's home directory, honouring `CHROMAPROMPT_HOME` first.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("CHROMAPROMPT_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(PathBuf::from)
        })
}

/// Returns the default path to ~/.env (or $CHROMAPROMPT_HOME/.env if set).
pub fn home_env_path() -> Option<PathBuf> {
    home_dir().map(|dir| dir.join(".env"))
}

/// Directory holding the optional config file and log files.
pub fn data_dir() -> PathBuf {
    match home_dir() {
        Some(dir) => dir.join(".chromaprompt"),
        None => PathBuf::from(".chromaprompt"),
    }
}

/// Config file consulted when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.yaml")
}

/// Directory for per-session JSON log files.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}
