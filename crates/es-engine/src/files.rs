use std::path::{Path, PathBuf};

/// The three files handed to the engine when a project is opened.
///
/// `report` and `binary` are optional; an absent file is passed to the engine
/// as an empty name, which disables that output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectFiles {
    pub input: PathBuf,
    pub report: Option<PathBuf>,
    pub binary: Option<PathBuf>,
}

impl ProjectFiles {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            report: None,
            binary: None,
        }
    }

    /// Treat empty paths as "not given".
    pub fn from_args(input: PathBuf, report: Option<PathBuf>, binary: Option<PathBuf>) -> Self {
        let given = |p: Option<PathBuf>| p.filter(|p| !p.as_os_str().is_empty());
        Self {
            input,
            report: given(report),
            binary: given(binary),
        }
    }

    pub fn report_path(&self) -> &Path {
        self.report.as_deref().unwrap_or(Path::new(""))
    }

    pub fn binary_path(&self) -> &Path {
        self.binary.as_deref().unwrap_or(Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_optional_paths_are_dropped() {
        let files = ProjectFiles::from_args(
            PathBuf::from("net.inp"),
            Some(PathBuf::new()),
            Some(PathBuf::from("net.bin")),
        );
        assert_eq!(files.report, None);
        assert_eq!(files.report_path(), Path::new(""));
        assert_eq!(files.binary_path(), Path::new("net.bin"));
    }
}
