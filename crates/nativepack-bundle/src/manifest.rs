//! Plugin manifest model.
//!
//! The same document shape is used for the development manifest at the
//! project root and the production manifest written into the staged output.
//! Fields the pipeline does not interpret are carried through unchanged.

use crate::{BundleError, BundleResult, COMPILED_SCRIPT_EXTENSION, Target};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Plugin manifest (`manifest.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Plugin identifier (e.g., "native-example").
    pub id: String,

    /// Plugin version (semver, e.g., "1.0.0").
    pub version: String,

    /// UI entry point, if the plugin ships a component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiSection>,

    /// Native library section.
    #[serde(default)]
    pub native: NativeSection,

    /// Remaining top-level fields (name, description, author, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `ui` section of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSection {
    /// Path of the UI entry file. Source form in development
    /// (`index.vue`), compiled file name in production (`index.js`).
    /// Absent or empty means the plugin ships no UI component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `native` section of the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeSection {
    /// Manifest key (e.g., "win32-x64") to library path relative to the package root.
    #[serde(default)]
    pub library: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Create a new manifest with minimal required fields.
    #[must_use]
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            ui: None,
            native: NativeSection::default(),
            extra: Map::new(),
        }
    }

    /// Load a manifest from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> BundleResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BundleError::MissingFile(path.display().to_string())
            } else {
                BundleError::Io(e)
            }
        })?;
        let manifest = Self::from_json(&json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> BundleResult<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    /// Release archive name: `{id}-v{version}.{extension}`.
    #[must_use]
    pub fn archive_file_name(&self, extension: &str) -> String {
        format!("{}-v{}.{}", self.id, self.version, extension)
    }

    /// Compiled script name for the declared UI component, if any.
    ///
    /// A `ui` section without a non-empty `component` declares no component.
    #[must_use]
    pub fn compiled_ui_component(&self) -> Option<String> {
        self.ui
            .as_ref()
            .and_then(|ui| ui.component.as_deref())
            .filter(|c| !c.trim().is_empty())
            .map(compiled_script_name)
    }

    /// Point the UI component at its compiled file name.
    ///
    /// No-op unless the manifest declares a component.
    pub fn set_ui_component(&mut self, component: &str) {
        if self.compiled_ui_component().is_none() {
            return;
        }
        if let Some(ui) = self.ui.as_mut() {
            ui.component = Some(component.to_string());
        }
    }

    /// Drop every library entry.
    pub fn clear_libraries(&mut self) {
        self.native.library.clear();
    }

    /// Record the library path for a target under its manifest key.
    pub fn add_library(&mut self, target: &Target, relative_path: &str) {
        self.native
            .library
            .insert(target.manifest_key().to_string(), relative_path.to_string());
    }

    /// Validate the manifest.
    pub fn validate(&self) -> BundleResult<()> {
        if self.id.trim().is_empty() {
            return Err(BundleError::InvalidManifest("id is required".to_string()));
        }

        if self.id.contains(['/', '\\']) {
            return Err(BundleError::InvalidManifest(format!(
                "id must not contain path separators: {}",
                self.id
            )));
        }

        if self.version.trim().is_empty() {
            return Err(BundleError::InvalidManifest(
                "version is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> BundleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> BundleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Name of the script the UI bundler emits for a source component:
/// the component's base name with the script extension.
///
/// ```
/// use nativepack_bundle::compiled_script_name;
///
/// assert_eq!(compiled_script_name("index.vue"), "index.js");
/// assert_eq!(compiled_script_name("src/ui/Panel.vue"), "Panel.js");
/// ```
#[must_use]
pub fn compiled_script_name(component: &str) -> String {
    let stem = Path::new(component)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| component.to_string());
    format!("{stem}.{COMPILED_SCRIPT_EXTENSION}")
}

#[cfg(test)]
#[path = "manifest/manifest_tests.rs"]
mod manifest_tests;
