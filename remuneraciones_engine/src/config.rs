use std::env;
use std::path::PathBuf;

/// Runtime configuration for the command line front end.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    /// Parameter file applied when the command line does not name one.
    pub parameters_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let log_level =
            env::var("REMUNERACIONES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let parameters_file = env::var("REMUNERACIONES_PARAMETERS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            telemetry: TelemetryConfig { log_level },
            parameters_file,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("REMUNERACIONES_LOG_LEVEL");
        env::remove_var("REMUNERACIONES_PARAMETERS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load();
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.parameters_file, None);
    }

    #[test]
    fn reads_parameter_file_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REMUNERACIONES_PARAMETERS", "parametros/2026.json");
        env::set_var("REMUNERACIONES_LOG_LEVEL", "debug");
        let config = AppConfig::load();
        assert_eq!(
            config.parameters_file,
            Some(PathBuf::from("parametros/2026.json"))
        );
        assert_eq!(config.telemetry.log_level, "debug");
        reset_env();
    }

    #[test]
    fn blank_parameter_path_is_ignored() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("REMUNERACIONES_PARAMETERS", "  ");
        assert_eq!(AppConfig::load().parameters_file, None);
        reset_env();
    }
}
