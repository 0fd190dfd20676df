//! build.xml descriptor
//!
//! Only the project name is read: `<project name="..">`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use droidbuild_core::ConfigurationError;

use crate::xml::{attribute, visit_elements};

/// Conventional file name of the ant build file inside a project
pub const BUILD_FILE: &str = "build.xml";

const PROJECT_ELEMENT: &str = "project";
const NAME_ATTR: &str = "name";

/// Project name declared by an ant build.xml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    project_name: Option<String>,
    path: Option<PathBuf>,
}

impl ProjectDescriptor {
    /// An unparsed build file: no name and no path
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and parse the build file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ConfigurationError::new(format!("unable to read {}: {}", path.display(), e))
        })?;

        let mut project = Self {
            path: Some(path.to_path_buf()),
            ..Self::default()
        };
        project.parse(file).map_err(|e| e.in_source(path.display()))?;

        debug!("Loaded {:?}: project {:?}", path, project.project_name);
        Ok(project)
    }

    /// Parse the build file at `path` if one is given, otherwise start unparsed
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::new()),
        }
    }

    /// Read the project name from the `<project>` root of `source`.
    /// On error the descriptor is left unchanged.
    pub fn parse<R: Read>(&mut self, source: R) -> Result<(), ConfigurationError> {
        let mut name = None;

        visit_elements(source, PROJECT_ELEMENT, |element, depth| {
            if depth == 0 {
                name = attribute(element, NAME_ATTR)?;
            }
            Ok(())
        })?;

        match name {
            Some(name) if !name.is_empty() => {
                self.project_name = Some(name);
                Ok(())
            }
            Some(_) => Err(ConfigurationError::new(format!(
                "<{}> has an empty {} attribute",
                PROJECT_ELEMENT, NAME_ATTR
            ))),
            None => Err(ConfigurationError::new(format!(
                "<{}> is missing the {} attribute",
                PROJECT_ELEMENT, NAME_ATTR
            ))),
        }
    }

    /// Declared project name; `None` until parsed
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// File this build file was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<ProjectDescriptor, ConfigurationError> {
        let mut project = ProjectDescriptor::new();
        project.parse(xml.as_bytes())?;
        Ok(project)
    }

    #[test]
    fn test_construct_without_path() {
        let project = ProjectDescriptor::new();
        assert!(project.path().is_none());
        assert!(project.project_name().is_none());
        assert_eq!(ProjectDescriptor::load(None).unwrap(), project);
    }

    #[test]
    fn test_construct_with_missing_file() {
        assert!(ProjectDescriptor::from_path("/non existent/bogus_path").is_err());
    }

    #[test]
    fn test_construct_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BUILD_FILE);
        std::fs::write(
            &path,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project name=\"Hello Native\" default=\"help\">\n  <import file=\"custom_rules.xml\" optional=\"true\"/>\n</project>\n",
        )
        .unwrap();

        let project = ProjectDescriptor::load(Some(&path)).unwrap();
        assert_eq!(project.project_name(), Some("Hello Native"));
        assert_eq!(project.path(), Some(path.as_path()));
    }

    #[test]
    fn test_parse_trivial() {
        let project = parse("<project name=\"foo\"/>").unwrap();
        assert_eq!(project.project_name(), Some("foo"));
        assert!(project.path().is_none());
    }

    #[test]
    fn test_parse_unescapes_name() {
        let project = parse("<project name=\"Tom &amp; Jerry\"></project>").unwrap();
        assert_eq!(project.project_name(), Some("Tom & Jerry"));
    }

    #[test]
    fn test_missing_name() {
        let err = parse("<project/>").unwrap_err();
        assert!(err.message().contains(NAME_ATTR));
    }

    #[test]
    fn test_empty_name() {
        assert!(parse("<project name=\"\"/>").is_err());
    }

    #[test]
    fn test_missing_project() {
        let err = parse("<not-project name=\"foo\"/>").unwrap_err();
        assert!(err.message().contains("expected <project>"));
    }

    #[test]
    fn test_name_on_nested_element_is_ignored() {
        assert!(parse("<project><target name=\"release\"/></project>").is_err());
    }

    #[test]
    fn test_malformed() {
        assert!(parse("<project name=\"foo\">").is_err());
        assert!(parse("<project name=\"foo").is_err());
        assert!(parse("").is_err());
    }
}
