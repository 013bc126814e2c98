use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

use crate::changes::CommitPlan;
use crate::model::{Level, PerLevel, SourceLists};

const SETTINGS_DIR: &str = ".claude";
const LOCAL_FILE: &str = "settings.local.json";
const REPO_FILE: &str = "settings.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsPaths {
    pub files: PerLevel<PathBuf>,
}

impl SettingsPaths {
    pub fn for_project(project: &Path, user_file: PathBuf) -> Self {
        let dir = project.join(SETTINGS_DIR);
        Self {
            files: PerLevel::new(dir.join(LOCAL_FILE), dir.join(REPO_FILE), user_file),
        }
    }

    /// Local and Repo files live under `<project>/.claude`; the User file
    /// defaults to `$HOME/.claude/settings.json`.
    pub fn discover(project: &Path, user_override: Option<PathBuf>) -> Result<Self> {
        let user_file = match user_override {
            Some(p) => p,
            None => {
                let home = std::env::var_os("HOME")
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| anyhow!("HOME is not set (pass --user-settings)"))?;
                PathBuf::from(home).join(SETTINGS_DIR).join(REPO_FILE)
            }
        };
        Ok(Self::for_project(project, user_file))
    }
}

#[derive(Clone, Debug)]
struct SettingsFile {
    path: PathBuf,
    doc: Option<Value>,
    names: Vec<String>,
}

impl SettingsFile {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                doc: None,
                names: Vec::new(),
            });
        }
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let doc: Value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        if !doc.is_object() {
            anyhow::bail!("{} is not a JSON object", path.display());
        }
        let names = allow_list(&doc);
        Ok(Self {
            path: path.to_path_buf(),
            doc: Some(doc),
            names,
        })
    }
}

/// The three settings documents as loaded from disk.
#[derive(Clone, Debug)]
pub struct LoadedSettings {
    files: PerLevel<SettingsFile>,
}

impl LoadedSettings {
    pub fn load(paths: &SettingsPaths) -> Result<Self> {
        let local = SettingsFile::load(&paths.files[Level::Local]).context("load local settings")?;
        let repo = SettingsFile::load(&paths.files[Level::Repo]).context("load repo settings")?;
        let user = SettingsFile::load(&paths.files[Level::User]).context("load user settings")?;
        let loaded = Self {
            files: PerLevel::new(local, repo, user),
        };
        for (level, f) in loaded.files.iter() {
            tracing::debug!(
                %level,
                path = %f.path.display(),
                present = f.doc.is_some(),
                permissions = f.names.len(),
                "settings file loaded"
            );
        }
        Ok(loaded)
    }

    pub fn sources(&self) -> SourceLists {
        SourceLists {
            names: self.files.map(|_, f| f.names.clone()),
            present: self.files.map(|_, f| f.doc.is_some()),
        }
    }

    pub fn path(&self, level: Level) -> &Path {
        &self.files[level].path
    }

    /// Levels whose allow-list would change under `plan`.
    pub fn changed_levels(&self, plan: &CommitPlan) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .filter(|l| {
                let before: BTreeSet<&str> =
                    self.files[*l].names.iter().map(String::as_str).collect();
                let after: BTreeSet<&str> = plan.lists[*l].iter().map(String::as_str).collect();
                before != after
            })
            .filter(|l| self.files[*l].doc.is_some() || !plan.lists[*l].is_empty())
            .collect()
    }

    /// Writes the final allow-lists for every level that changed. Other keys in
    /// each document are left alone.
    pub fn apply(&mut self, plan: &CommitPlan) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for level in self.changed_levels(plan) {
            let file = &mut self.files[level];
            let mut doc = file
                .doc
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new()));
            set_allow_list(&mut doc, &plan.lists[level])
                .with_context(|| format!("update {}", file.path.display()))?;

            let mut bytes = serde_json::to_vec_pretty(&doc).context("serialize settings")?;
            bytes.push(b'\n');
            write_atomic(&file.path, &bytes)
                .with_context(|| format!("write {}", file.path.display()))?;
            tracing::info!(
                %level,
                path = %file.path.display(),
                permissions = plan.lists[level].len(),
                "settings written"
            );

            file.doc = Some(doc);
            file.names = plan.lists[level].clone();
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

fn allow_list(doc: &Value) -> Vec<String> {
    doc.get("permissions")
        .and_then(|p| p.get("allow"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Replaces the string entries of `permissions.allow` with `names`. Entries
/// that are not strings were never loaded as permissions; they are kept after
/// the names so a rewrite does not lose them.
fn set_allow_list(doc: &mut Value, names: &[String]) -> Result<()> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| anyhow!("settings root is not an object"))?;
    let permissions = root
        .entry("permissions")
        .or_insert_with(|| Value::Object(Map::new()));
    let permissions = permissions
        .as_object_mut()
        .ok_or_else(|| anyhow!("\"permissions\" is not an object"))?;

    let kept: Vec<Value> = permissions
        .get("allow")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| !v.is_string()).cloned().collect())
        .unwrap_or_default();
    if !kept.is_empty() {
        tracing::warn!(
            entries = kept.len(),
            "allow list has non-string entries; keeping them unchanged"
        );
    }

    let mut allow: Vec<Value> = names.iter().cloned().map(Value::String).collect();
    allow.extend(kept);
    permissions.insert("allow".to_string(), Value::Array(allow));
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err)
            .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn allow_list_skips_non_strings() {
        let doc = json!({"permissions": {"allow": ["Read", 3, null, "Edit"]}});
        assert_eq!(allow_list(&doc), vec!["Read", "Edit"]);
        assert!(allow_list(&json!({})).is_empty());
    }

    #[test]
    fn set_allow_list_keeps_siblings() {
        let mut doc = json!({"model": "x", "permissions": {"deny": ["Bash"], "allow": ["A"]}});
        set_allow_list(&mut doc, &["B".to_string()]).unwrap();
        assert_eq!(
            doc,
            json!({"model": "x", "permissions": {"deny": ["Bash"], "allow": ["B"]}})
        );
    }

    #[test]
    fn set_allow_list_keeps_non_string_entries() {
        let mut doc = json!({"permissions": {"allow": ["Read", {"tool": "x"}, 3, "Edit"]}});
        set_allow_list(&mut doc, &["Edit".to_string(), "Glob".to_string()]).unwrap();
        assert_eq!(
            doc,
            json!({"permissions": {"allow": ["Edit", "Glob", {"tool": "x"}, 3]}})
        );
        assert_eq!(allow_list(&doc), vec!["Edit", "Glob"]);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("settings.json");
        fs::create_dir_all(target.join("occupied")).unwrap();

        let err = write_atomic(&target, b"{}").unwrap_err();
        assert!(format!("{:#}", err).contains("rename"));
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("settings.json")]);
    }

    #[test]
    fn set_allow_list_rejects_non_object_permissions() {
        let mut doc = json!({"permissions": []});
        assert!(set_allow_list(&mut doc, &[]).is_err());
    }

    #[test]
    fn project_paths_follow_layout() {
        let p = SettingsPaths::for_project(Path::new("/w"), PathBuf::from("/h/u.json"));
        assert_eq!(
            p.files[Level::Local],
            PathBuf::from("/w/.claude/settings.local.json")
        );
        assert_eq!(p.files[Level::Repo], PathBuf::from("/w/.claude/settings.json"));
        assert_eq!(p.files[Level::User], PathBuf::from("/h/u.json"));
    }
}
