use std::fs;
use std::path::Path;

use anyhow::Result;
use serde_json::{Value, json};

use permsort::model::Level;
use permsort::session::{Key, Outcome, Session};
use permsort::settings::{LoadedSettings, SettingsPaths};

fn write_json(path: &Path, v: &Value) -> Result<()> {
    fs::create_dir_all(path.parent().expect("parent"))?;
    fs::write(path, serde_json::to_vec_pretty(v)?)?;
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

fn paths_in(root: &Path) -> SettingsPaths {
    SettingsPaths::for_project(&root.join("proj"), root.join("home/.claude/settings.json"))
}

#[test]
fn missing_files_load_as_absent_and_empty() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = paths_in(dir.path());
    let loaded = LoadedSettings::load(&paths)?;
    let sources = loaded.sources();
    for level in Level::ALL {
        assert!(!sources.present[level]);
        assert!(sources.names[level].is_empty());
    }
    Ok(())
}

#[test]
fn malformed_json_is_reported_with_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = paths_in(dir.path());
    fs::create_dir_all(paths.files[Level::Repo].parent().expect("parent"))?;
    fs::write(&paths.files[Level::Repo], b"{ not json")?;

    let err = LoadedSettings::load(&paths).expect_err("parse should fail");
    let msg = format!("{:#}", err);
    assert!(msg.contains("settings.json"), "{}", msg);
    assert!(msg.contains("load repo settings"), "{}", msg);
    Ok(())
}

#[test]
fn commit_rewrites_only_changed_levels_and_keeps_other_keys() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = paths_in(dir.path());
    write_json(
        &paths.files[Level::Local],
        &json!({"permissions": {"allow": ["Read", "Bash(ls)"]}}),
    )?;
    write_json(
        &paths.files[Level::Repo],
        &json!({"model": "opus", "permissions": {"allow": ["Edit"], "deny": ["Bash(rm:*)"]}}),
    )?;
    write_json(
        &paths.files[Level::User],
        &json!({"permissions": {"allow": ["WebFetch"]}}),
    )?;
    let user_before = fs::read(&paths.files[Level::User])?;

    let mut loaded = LoadedSettings::load(&paths)?;
    let mut session = Session::load(&loaded.sources());
    assert!(!session.has_unresolved_duplicates());

    // Local column sorted: Bash(ls), Read. Move Bash(ls) to Repo.
    session.handle_key(Key::Tab);
    session.handle_key(Key::Two);
    session.handle_key(Key::Enter);
    let Outcome::Commit(plan) = session.handle_key(Key::Yes) else {
        panic!("expected commit");
    };

    assert_eq!(loaded.changed_levels(&plan), vec![Level::Local, Level::Repo]);
    let written = loaded.apply(&plan)?;
    assert_eq!(written.len(), 2);
    session.finish_commit(&plan);

    assert_eq!(
        read_json(&paths.files[Level::Local])?,
        json!({"permissions": {"allow": ["Read"]}})
    );
    assert_eq!(
        read_json(&paths.files[Level::Repo])?,
        json!({"model": "opus", "permissions": {"allow": ["Bash(ls)", "Edit"], "deny": ["Bash(rm:*)"]}})
    );
    assert_eq!(fs::read(&paths.files[Level::User])?, user_before);

    // A second commit of the same plan has nothing left to write.
    assert!(loaded.apply(&session.commit_plan())?.is_empty());
    Ok(())
}

#[test]
fn duplicate_commit_creates_no_empty_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = paths_in(dir.path());
    write_json(
        &paths.files[Level::Local],
        &json!({"permissions": {"allow": ["Read", "Write"]}}),
    )?;
    write_json(
        &paths.files[Level::Repo],
        &json!({"permissions": {"allow": ["Write"]}}),
    )?;

    let mut loaded = LoadedSettings::load(&paths)?;
    let mut session = Session::load(&loaded.sources());
    session.handle_key(Key::Enter);
    let Outcome::Commit(plan) = session.handle_key(Key::Enter) else {
        panic!("expected commit");
    };
    loaded.apply(&plan)?;
    session.finish_commit(&plan);

    assert_eq!(
        read_json(&paths.files[Level::Local])?,
        json!({"permissions": {"allow": ["Read"]}})
    );
    assert_eq!(
        read_json(&paths.files[Level::Repo])?,
        json!({"permissions": {"allow": ["Write"]}})
    );
    assert!(!paths.files[Level::User].exists());

    let reloaded = LoadedSettings::load(&paths)?;
    assert!(Session::load(&reloaded.sources()).duplicates().is_empty());
    Ok(())
}
