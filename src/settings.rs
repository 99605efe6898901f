//! Environment-backed settings.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory. Command-line flags override these, and
//! these override the built-in defaults.

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_SRUN_MEM: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `SMC_BIN_DIR`: directory holding the Monte Carlo executables.
    pub bin_dir: Option<PathBuf>,
    /// `SMC_FIGS_DIR`: directory the simulation outputs and figures go to.
    pub figs_dir: Option<PathBuf>,
    /// `SMC_DATA_DIR`: cache directory for the free-energy sweep.
    pub data_dir: Option<PathBuf>,
    /// `SMC_SRUN_MEM`: memory request (MB) passed to `srun --mem`.
    pub srun_mem: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bin_dir: None,
            figs_dir: None,
            data_dir: None,
            srun_mem: DEFAULT_SRUN_MEM,
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read the `SMC_*` variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let path = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        let srun_mem = match lookup("SMC_SRUN_MEM").map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v
                .parse::<u32>()
                .map_err(|_| AppError::input(format!("SMC_SRUN_MEM must be a whole number of MB, got '{v}'.")))?,
            _ => DEFAULT_SRUN_MEM,
        };

        Ok(Self {
            bin_dir: path("SMC_BIN_DIR"),
            figs_dir: path("SMC_FIGS_DIR"),
            data_dir: path("SMC_DATA_DIR"),
            srun_mem,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.srun_mem, 60);
    }

    #[test]
    fn reads_paths_and_memory() {
        let settings = Settings::from_lookup(lookup(&[
            ("SMC_BIN_DIR", "/opt/mc"),
            ("SMC_FIGS_DIR", "out"),
            ("SMC_DATA_DIR", " "),
            ("SMC_SRUN_MEM", "120"),
        ]))
        .unwrap();
        assert_eq!(settings.bin_dir, Some(PathBuf::from("/opt/mc")));
        assert_eq!(settings.figs_dir, Some(PathBuf::from("out")));
        assert_eq!(settings.data_dir, None);
        assert_eq!(settings.srun_mem, 120);
    }

    #[test]
    fn bad_memory_is_an_input_error() {
        let err = Settings::from_lookup(lookup(&[("SMC_SRUN_MEM", "lots")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
