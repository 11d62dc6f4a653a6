use anyhow::Context;
use dfscore::DomainCode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Pulse-train shape for one run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Bursts at a single fixed PRI.
    Fixed,
    /// Bursts cycling through a small staggered PRI set.
    Staggered,
    /// Chirped long pulses spread over seconds.
    Chirp,
    /// Uncorrelated background pulses only.
    Noise,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub domain: String,
    pub scenario: Scenario,
    #[serde(default = "default_bursts")]
    pub bursts: usize,
    #[serde(default = "default_pulses_per_burst")]
    pub pulses_per_burst: usize,
    #[serde(default = "default_pri_us")]
    pub pri_us: u64,
    #[serde(default = "default_stagger_pris_us")]
    pub stagger_pris_us: Vec<u64>,
    #[serde(default = "default_duration_us")]
    pub duration_us: u32,
    #[serde(default = "default_rssi")]
    pub rssi: u8,
    #[serde(default = "default_burst_gap_us")]
    pub burst_gap_us: u64,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_bursts() -> usize {
    3
}
fn default_pulses_per_burst() -> usize {
    24
}
fn default_pri_us() -> u64 {
    1_428
}
fn default_stagger_pris_us() -> Vec<u64> {
    vec![1_000, 1_500]
}
fn default_duration_us() -> u32 {
    1
}
fn default_rssi() -> u8 {
    26
}
fn default_burst_gap_us() -> u64 {
    200_000
}
fn default_seed() -> u64 {
    7
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(domain: String, scenario: Scenario, seed: u64) -> Self {
        Self {
            domain,
            scenario,
            bursts: default_bursts(),
            pulses_per_burst: default_pulses_per_burst(),
            pri_us: default_pri_us(),
            stagger_pris_us: default_stagger_pris_us(),
            duration_us: default_duration_us(),
            rssi: default_rssi(),
            burst_gap_us: default_burst_gap_us(),
            seed,
        }
    }

    /// Accepts the regulatory name or its numeric code.
    pub fn domain_code(&self) -> anyhow::Result<DomainCode> {
        let name = self.domain.to_ascii_lowercase();
        let code = match name.as_str() {
            "fcc" => DomainCode::Fcc,
            "etsi" => DomainCode::Etsi,
            "mkk" => DomainCode::Mkk,
            "china" => DomainCode::China,
            "korea" => DomainCode::Korea,
            other => other
                .parse::<u8>()
                .ok()
                .and_then(DomainCode::from_code)
                .with_context(|| format!("unknown regulatory domain '{}'", self.domain))?,
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_resolves_the_domain() {
        let cfg = WorkflowConfig::from_args("etsi".into(), Scenario::Fixed, 1);
        assert_eq!(cfg.domain_code().unwrap(), DomainCode::Etsi);
        assert_eq!(cfg.bursts, 3);
    }

    #[test]
    fn numeric_domain_codes_are_accepted() {
        let cfg = WorkflowConfig::from_args("3".into(), Scenario::Noise, 1);
        assert_eq!(cfg.domain_code().unwrap(), DomainCode::Mkk);
    }

    #[test]
    fn unknown_domain_is_an_error() {
        let cfg = WorkflowConfig::from_args("mars".into(), Scenario::Fixed, 1);
        assert!(cfg.domain_code().is_err());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"domain: fcc\nscenario: staggered\npri_us: 3030\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.scenario, Scenario::Staggered);
        assert_eq!(cfg.pri_us, 3030);
        // Omitted fields fall back to defaults.
        assert_eq!(cfg.pulses_per_burst, 24);
    }
}
