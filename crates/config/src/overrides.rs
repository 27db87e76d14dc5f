use std::path::PathBuf;

use strip_ansi_escapes::strip;

use crate::{Config, LogFormat};

fn clean(value: String) -> Option<String> {
    // Launchers may pass colored values.
    let cleaned = String::from_utf8_lossy(&strip(value.as_bytes())).trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlays `HOST`, `PORT` (or `BACKEND_PORT`), `DATABASE_URL`,
    /// `PUBLIC_DIR` and `LOG_FORMAT`. Unparsable values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).and_then(clean);

        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT").or_else(|| get("BACKEND_PORT")) {
            match port.parse::<u16>() {
                Ok(port) => self.port = port,
                Err(err) => tracing::warn!(value = %port, error = %err, "Invalid PORT; keeping {}", self.port),
            }
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(dir) = get("PUBLIC_DIR") {
            self.public_dir = PathBuf::from(dir);
        }
        if let Some(format) = get("LOG_FORMAT") {
            match format.parse::<LogFormat>() {
                Ok(format) => self.log_format = format,
                Err(_) => tracing::warn!(value = %format, "Unknown LOG_FORMAT; keeping {}", self.log_format),
            }
        }
    }
}
