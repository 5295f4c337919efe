//! Run profiles: optional YAML files holding stepwise run settings.
//!
//! ```yaml
//! hstep: 600
//! node_values: [head, pressure]
//! link_values: [flow]
//! output_dir: results
//! status_report: full
//! ```

use std::path::{Path, PathBuf};

use es_core::Seconds;
use es_engine::StatusReport;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::run_service::{DEFAULT_HYDRAULIC_STEP, StepwiseOptions, dedup_names};

/// Settings for a stepwise run. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub hstep: Option<Seconds>,
    pub node_values: Vec<String>,
    pub link_values: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub print_nodes: bool,
    pub save_hydraulics: Option<bool>,
    pub status_report: Option<StatusReport>,
}

pub fn load_config(path: &Path) -> AppResult<RunConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

impl RunConfig {
    /// Layer `overrides` on top of `self`.
    ///
    /// Scalars in `overrides` win when set; attribute lists are appended.
    pub fn merge(self, overrides: RunConfig) -> RunConfig {
        let mut node_values = self.node_values;
        node_values.extend(overrides.node_values);
        let mut link_values = self.link_values;
        link_values.extend(overrides.link_values);

        RunConfig {
            hstep: overrides.hstep.or(self.hstep),
            node_values,
            link_values,
            output_dir: overrides.output_dir.or(self.output_dir),
            print_nodes: self.print_nodes || overrides.print_nodes,
            save_hydraulics: overrides.save_hydraulics.or(self.save_hydraulics),
            status_report: overrides.status_report.or(self.status_report),
        }
    }

    /// Fill defaults and validate.
    ///
    /// Attribute names that map to the same file (same name ignoring case)
    /// are kept once, first occurrence wins.
    pub fn to_options(&self) -> AppResult<StepwiseOptions> {
        let hydraulic_step = self.hstep.unwrap_or(DEFAULT_HYDRAULIC_STEP);
        if hydraulic_step <= 0 {
            return Err(AppError::InvalidInput(format!(
                "hstep must be a positive number of seconds, got {hydraulic_step}"
            )));
        }
        let defaults = StepwiseOptions::default();
        Ok(StepwiseOptions {
            hydraulic_step,
            node_values: dedup_names(&self.node_values),
            link_values: dedup_names(&self.link_values),
            output_dir: self.output_dir.clone().unwrap_or(defaults.output_dir),
            status_report: self.status_report.unwrap_or(defaults.status_report),
            save_hydraulics: self.save_hydraulics.unwrap_or(defaults.save_hydraulics),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        let opts = RunConfig::default().to_options().unwrap();
        assert_eq!(opts, StepwiseOptions::default());
    }

    #[test]
    fn yaml_profile_parses() {
        let yaml = "hstep: 600\nnode_values: [head, pressure]\nlink_values: [flow]\n\
                    output_dir: results\nstatus_report: full\nsave_hydraulics: false\n";
        let cfg: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.hstep, Some(600));
        assert_eq!(cfg.status_report, Some(StatusReport::Full));

        let opts = cfg.to_options().unwrap();
        assert_eq!(opts.output_dir, PathBuf::from("results"));
        assert_eq!(opts.node_values, ["head", "pressure"]);
        assert!(!opts.save_hydraulics);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_yaml::from_str::<RunConfig>("hsteps: 10\n").is_err());
    }

    #[test]
    fn overrides_win_and_lists_append() {
        let file = RunConfig {
            hstep: Some(600),
            node_values: vec!["head".into()],
            status_report: Some(StatusReport::Full),
            ..Default::default()
        };
        let cli = RunConfig {
            hstep: Some(60),
            node_values: vec!["HEAD".into(), "demand".into()],
            ..Default::default()
        };
        let opts = file.merge(cli).to_options().unwrap();
        assert_eq!(opts.hydraulic_step, 60);
        assert_eq!(opts.node_values, ["head", "demand"]);
        assert_eq!(opts.status_report, StatusReport::Full);
    }

    #[test]
    fn non_positive_hstep_is_rejected() {
        let cfg = RunConfig {
            hstep: Some(0),
            ..Default::default()
        };
        assert!(matches!(cfg.to_options(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        match load_config(&path) {
            Err(AppError::ConfigRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }
}
