//! Shared JSON fixtures for the motion and site crates: page layouts and
//! scroll scripts, indexed by `fixtures/manifest.json` at the workspace root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    layouts: HashMap<String, String>,
    #[serde(rename = "scroll-scripts")]
    scroll_scripts: HashMap<String, ScriptEntry>,
}

/// A script either stands alone or names the layout it runs against.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        layout: Option<String>,
    },
}

impl ScriptEntry {
    fn as_path(&self) -> &str {
        match self {
            ScriptEntry::Path(path) => path,
            ScriptEntry::Detailed { path, .. } => path,
        }
    }

    fn layout(&self) -> Option<&str> {
        match self {
            ScriptEntry::Path(_) => None,
            ScriptEntry::Detailed { layout, .. } => layout.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Page layouts: a viewport plus elements with layout boxes, in document order.
pub mod layouts {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.layouts.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.layouts, "layout", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.layouts, "layout", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.layouts, "layout", name)?;
        Ok(resolve_path(rel))
    }
}

/// Scroll scripts: timed scroll/tick steps with expected crossings.
pub mod scroll_scripts {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.scroll_scripts.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.scroll_scripts, "scroll script", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.scroll_scripts, "scroll script", name)?;
        super::load_json(entry.as_path())
    }

    /// Name of the layout the script was written against, if any.
    pub fn layout(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.scroll_scripts, "scroll script", name)?;
        Ok(entry.layout().map(str::to_string))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.scroll_scripts, "scroll script", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
