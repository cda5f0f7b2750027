use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    /// Forms untouched for this long are dropped
    pub form_idle_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".into(),
            port: 8080,
            static_dir: PathBuf::from("static"),
            form_idle_timeout: Duration::from_secs(12 * 60 * 60),
        }
    }
}

/// Defaults, overridden by `OCCUPANCY_*` environment variables
pub fn load_settings() -> Settings {
    settings_from(|key| std::env::var(key).ok())
}

fn settings_from(lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(v) = lookup("OCCUPANCY_BIND") {
        settings.bind_host = v;
    }
    if let Some(v) = lookup("OCCUPANCY_PORT") {
        match v.parse::<u16>() {
            Ok(port) => settings.port = port,
            Err(_) => tracing::warn!(value = %v, "Ignoring invalid OCCUPANCY_PORT"),
        }
    }
    if let Some(v) = lookup("OCCUPANCY_STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("OCCUPANCY_FORM_IDLE_MINUTES") {
        match v.parse::<u64>() {
            Ok(minutes) if minutes > 0 => settings.form_idle_timeout = Duration::from_secs(minutes * 60),
            _ => tracing::warn!(value = %v, "Ignoring invalid OCCUPANCY_FORM_IDLE_MINUTES"),
        }
    }

    settings
}

impl Settings {
    /// Applies command line flags on top of the loaded settings
    pub fn with_overrides(mut self, bind: Option<String>, port: Option<u16>) -> Self {
        if let Some(bind) = bind {
            self.bind_host = bind;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(settings_from(lookup_from(&[])), Settings::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = settings_from(lookup_from(&[
            ("OCCUPANCY_BIND", "127.0.0.1"),
            ("OCCUPANCY_PORT", "9000"),
            ("OCCUPANCY_STATIC_DIR", "/srv/static"),
            ("OCCUPANCY_FORM_IDLE_MINUTES", "90"),
        ]));
        assert_eq!(settings.bind_host, "127.0.0.1");
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(settings.form_idle_timeout, Duration::from_secs(90 * 60));
    }

    #[test]
    fn invalid_port_is_ignored() {
        let settings = settings_from(lookup_from(&[("OCCUPANCY_PORT", "http"), ("OCCUPANCY_FORM_IDLE_MINUTES", "0")]));
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.form_idle_timeout, Settings::default().form_idle_timeout);
    }

    #[test]
    fn cli_flags_win() {
        let settings = Settings::default().with_overrides(Some("localhost".into()), Some(3000));
        assert_eq!(settings.bind_host, "localhost");
        assert_eq!(settings.port, 3000);

        let untouched = Settings::default().with_overrides(None, None);
        assert_eq!(untouched, Settings::default());
    }
}
