//! AndroidManifest.xml descriptor
//!
//! Only the SDK levels are read: `<manifest><uses-sdk android:minSdkVersion=".."
//! android:targetSdkVersion=".."/></manifest>`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use droidbuild_core::ConfigurationError;

use crate::xml::{int_attribute, visit_elements};

/// Conventional file name of the manifest inside a project
pub const MANIFEST_FILE: &str = "AndroidManifest.xml";

const MANIFEST_ELEMENT: &str = "manifest";
const USES_SDK_ELEMENT: &str = "uses-sdk";
const MIN_SDK_ATTR: &str = "minSdkVersion";
const TARGET_SDK_ATTR: &str = "targetSdkVersion";

/// SDK levels declared by an AndroidManifest.xml
///
/// `target_sdk` is stored exactly as written, even when it is negative or
/// below `min_sdk`; checking it is left to the build step that consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestDescriptor {
    min_sdk: i32,
    target_sdk: i32,
    path: Option<PathBuf>,
}

impl ManifestDescriptor {
    /// An unparsed manifest: both SDK levels are 0 and there is no path
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and parse the manifest at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ConfigurationError::new(format!("unable to read {}: {}", path.display(), e))
        })?;

        let mut manifest = Self {
            path: Some(path.to_path_buf()),
            ..Self::default()
        };
        manifest.parse(file).map_err(|e| e.in_source(path.display()))?;

        debug!(
            "Loaded {:?}: minSdkVersion={} targetSdkVersion={}",
            path, manifest.min_sdk, manifest.target_sdk
        );
        Ok(manifest)
    }

    /// Parse the manifest at `path` if one is given, otherwise start unparsed
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::new()),
        }
    }

    /// Read the SDK levels from `source`.
    ///
    /// The first `<uses-sdk>` below the `<manifest>` root must carry
    /// `minSdkVersion`; `targetSdkVersion` defaults to it. On error the
    /// descriptor is left unchanged.
    pub fn parse<R: Read>(&mut self, source: R) -> Result<(), ConfigurationError> {
        let mut levels: Option<(i32, Option<i32>)> = None;

        visit_elements(source, MANIFEST_ELEMENT, |element, depth| {
            if depth == 0 || element.local_name().as_ref() != USES_SDK_ELEMENT.as_bytes() {
                return Ok(());
            }
            if levels.is_some() {
                debug!("Ignoring additional <{}> element", USES_SDK_ELEMENT);
                return Ok(());
            }

            let min_sdk = int_attribute(element, MIN_SDK_ATTR)?.ok_or_else(|| {
                ConfigurationError::new(format!(
                    "<{}> is missing the {} attribute",
                    USES_SDK_ELEMENT, MIN_SDK_ATTR
                ))
            })?;
            let target_sdk = int_attribute(element, TARGET_SDK_ATTR)?;

            levels = Some((min_sdk, target_sdk));
            Ok(())
        })?;

        let (min_sdk, target_sdk) = levels.ok_or_else(|| {
            ConfigurationError::new(format!(
                "<{}> has no <{}> element",
                MANIFEST_ELEMENT, USES_SDK_ELEMENT
            ))
        })?;

        self.min_sdk = min_sdk;
        self.target_sdk = target_sdk.unwrap_or(min_sdk);
        Ok(())
    }

    /// Declared `minSdkVersion`
    pub fn min_sdk(&self) -> i32 {
        self.min_sdk
    }

    /// Declared `targetSdkVersion`, or `minSdkVersion` when none was declared
    pub fn target_sdk(&self) -> i32 {
        self.target_sdk
    }

    /// File this manifest was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
