//! Integration tests for memkeep.
//!
//! These tests run the full workflow: operations on a `Memory`, persistence
//! through `Storage` and the shell command layer.

use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use memkeep::date::parse_date_on;
use memkeep::entry::{ENCRYPTED_PLACEHOLDER, EntryStore};
use memkeep::error::MemoryError;
use memkeep::input::FixedPassword;
use memkeep::memory::{EntryEdit, Memory, NewEntry};
use memkeep::search::Query;
use memkeep::shell::Shell;
use memkeep::shell::command::{CommandRegistry, CommandResult, ShellContext};
use memkeep::shell::commands::register_all;
use memkeep::shell::completer::Completions;
use memkeep::storage::Storage;
use memkeep::vault::SecretVault;
use memkeep::{Trie, crypto};
use tempfile::TempDir;

fn setup_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = Storage::new(
        temp_dir.path().join("memories.json"),
        temp_dir.path().join("secrets.json"),
    );
    (storage, temp_dir)
}

fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_all(&mut registry);
    registry
}

fn note(content: &str, tags: &[&str]) -> NewEntry {
    NewEntry {
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        encrypt: false,
    }
}

fn secret(content: &str) -> NewEntry {
    NewEntry {
        content: content.to_string(),
        tags: vec!["secret".to_string()],
        encrypt: true,
    }
}

fn contents(memory: &Memory, query: &Query) -> Vec<String> {
    memory
        .find(query)
        .expect("find failed")
        .into_iter()
        .map(|e| e.content)
        .collect()
}

/// Local noon of `day`, as stored.
fn noon(day: NaiveDate) -> chrono::DateTime<Utc> {
    Local
        .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

// ============================================================================
// Store and persistence
// ============================================================================

#[test]
fn test_ids_start_at_100_and_increase() {
    let mut memory = Memory::new();
    let mut pw = FixedPassword::new("pw");

    let ids: Vec<u64> = (0..5)
        .map(|i| {
            memory
                .add(note(&format!("note {}", i), &[]), &mut pw)
                .unwrap()
                .id
        })
        .collect();

    assert_eq!(ids, vec![100, 101, 102, 103, 104]);
}

#[test]
fn test_persistence_round_trip() {
    let (storage, _temp_dir) = setup_storage();
    let mut pw = FixedPassword::new("hunter2");

    {
        let mut memory = storage.load().unwrap();
        memory.add(note("docker ps -a", &["docker"]), &mut pw).unwrap();
        memory.add(secret("AKIA1234"), &mut pw).unwrap();
        storage.save(&memory).unwrap();
    }

    let mut memory = storage.load().unwrap();
    assert_eq!(memory.entries().len(), 2);
    assert_eq!(memory.entries().find(100).unwrap().content, "docker ps -a");

    let stored = memory.entries().find(101).unwrap();
    assert!(stored.encrypted);
    assert_eq!(stored.content, ENCRYPTED_PLACEHOLDER);

    let got = memory.get(101, &mut pw).unwrap();
    assert_eq!(got.content, "AKIA1234");
}

#[test]
fn test_files_never_hold_plaintext_secret() {
    let (storage, temp_dir) = setup_storage();
    let mut memory = Memory::new();
    memory
        .add(secret("correct horse battery staple"), &mut FixedPassword::new("pw"))
        .unwrap();
    storage.save(&memory).unwrap();

    let entries = std::fs::read_to_string(temp_dir.path().join("memories.json")).unwrap();
    let secrets = std::fs::read_to_string(temp_dir.path().join("secrets.json")).unwrap();
    assert!(!entries.contains("correct horse"));
    assert!(!secrets.contains("correct horse"));
    assert!(entries.contains("usageCount"));
    assert!(secrets.contains("\"100\""));
}

#[test]
fn test_reads_hand_written_store() {
    let (storage, temp_dir) = setup_storage();
    std::fs::write(
        temp_dir.path().join("memories.json"),
        r#"[
            {"id": 100, "content": "ls -la", "tags": ["shell"],
             "timestamp": "2026-02-10T09:30:00Z", "encrypted": false, "usageCount": 3},
            {"id": 105, "content": "git stash pop", "tags": [],
             "timestamp": "2026-02-11T09:30:00Z", "encrypted": false, "usageCount": 0}
        ]"#,
    )
    .unwrap();

    let mut memory = storage.load().unwrap();
    assert_eq!(memory.entries().find(100).unwrap().usage_count, 3);

    let added = memory
        .add(note("cargo test", &[]), &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(added.id, 106);
}

#[test]
fn test_store_with_missing_secret_stays_usable() {
    let (storage, temp_dir) = setup_storage();
    std::fs::write(
        temp_dir.path().join("memories.json"),
        r#"[
            {"id": 100, "content": "[encrypted]", "tags": [],
             "timestamp": "2026-02-10T09:30:00Z", "encrypted": true, "usageCount": 0},
            {"id": 101, "content": "df -h", "tags": ["disk"],
             "timestamp": "2026-02-11T09:30:00Z", "encrypted": false, "usageCount": 0}
        ]"#,
    )
    .unwrap();

    let mut memory = storage.load().unwrap();
    let before = memory.clone();
    let result = memory.edit(
        100,
        EntryEdit {
            content: None,
            tags: Some(vec!["k".into()]),
        },
        &mut FixedPassword::new("pw"),
    );
    assert!(result.is_err());
    assert_eq!(memory, before);

    let added = memory
        .add(note("du -sh *", &["disk"]), &mut FixedPassword::new("pw"))
        .unwrap();
    assert_eq!(added.id, 102);
    storage.save(&memory).unwrap();
    assert_eq!(storage.load().unwrap().entries().len(), 3);
}

#[test]
fn test_corrupt_file_is_persistence_error() {
    let (storage, temp_dir) = setup_storage();
    std::fs::write(temp_dir.path().join("memories.json"), "{not json").unwrap();

    assert!(matches!(
        storage.load(),
        Err(MemoryError::Persistence { .. })
    ));
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_scenarios() {
    let mut memory = Memory::new();
    let mut pw = FixedPassword::new("pw");
    memory.add(note("React hook", &["frontend"]), &mut pw).unwrap();
    memory.add(note("React useEffect", &[]), &mut pw).unwrap();
    memory.add(note("JavaScript closures", &["js"]), &mut pw).unwrap();
    memory.add(note("kubectl logs", &["k8s", "React"]), &mut pw).unwrap();

    assert_eq!(
        contents(&memory, &Query::default()),
        vec![
            "React hook",
            "React useEffect",
            "JavaScript closures",
            "kubectl logs"
        ]
    );
    assert_eq!(
        contents(&memory, &Query::new("react")),
        vec!["React hook", "React useEffect", "kubectl logs"]
    );
    assert!(!contents(&memory, &Query::new("Rea*")).contains(&"JavaScript closures".to_string()));
    assert_eq!(contents(&memory, &Query::new("k8s")), vec!["kubectl logs"]);
    assert_eq!(
        contents(&memory, &Query::new("*").with_limit(2)),
        vec!["React hook", "React useEffect"]
    );
}

#[test]
fn test_search_by_day_after_reload() {
    let (storage, _temp_dir) = setup_storage();
    let today = Local::now().date_naive();
    let fixed = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

    let mut entries = EntryStore::new();
    entries.add_at("old".into(), vec![], false, noon(fixed));
    entries.add_at("day before".into(), vec![], false, noon(fixed - Duration::days(1)));
    entries.add_at("fresh".into(), vec![], false, Utc::now());
    storage
        .save(&Memory::from_parts(entries, SecretVault::new()))
        .unwrap();

    let memory = storage.load().unwrap();

    let on_today = parse_date_on("today", today).unwrap();
    assert_eq!(
        contents(&memory, &Query::default().on_day(on_today)),
        vec!["fresh"]
    );

    let on_fixed = parse_date_on("2026-02-10", today).unwrap();
    assert_eq!(
        contents(&memory, &Query::default().on_day(on_fixed)),
        vec!["old"]
    );

    let german = parse_date_on("09.02.2026", today).unwrap();
    assert_eq!(
        contents(&memory, &Query::default().on_day(german)),
        vec!["day before"]
    );
}

// ============================================================================
// Secrets
// ============================================================================

#[test]
fn test_get_counts_only_successful_unlocks() {
    let mut memory = Memory::new();
    memory
        .add(secret("db-password"), &mut FixedPassword::new("right"))
        .unwrap();

    let result = memory.get(100, &mut FixedPassword::new("wrong"));
    assert!(matches!(result, Err(MemoryError::DecryptionFailed)));
    assert_eq!(memory.entries().find(100).unwrap().usage_count, 0);

    let got = memory.get(100, &mut FixedPassword::new("right")).unwrap();
    assert_eq!(got.content, "db-password");
    assert_eq!(memory.entries().find(100).unwrap().usage_count, 1);
}

#[test]
fn test_edit_secret_keeps_it_encrypted() {
    let (storage, _temp_dir) = setup_storage();
    let mut pw = FixedPassword::new("pw");
    let mut memory = Memory::new();
    memory.add(secret("v1"), &mut pw).unwrap();

    memory
        .edit(
            100,
            EntryEdit {
                content: Some("v2".into()),
                tags: None,
            },
            &mut pw,
        )
        .unwrap();
    storage.save(&memory).unwrap();

    let mut reloaded = storage.load().unwrap();
    let entry = reloaded.entries().find(100).unwrap();
    assert!(entry.encrypted);
    assert_eq!(entry.content, ENCRYPTED_PLACEHOLDER);
    assert_eq!(reloaded.get(100, &mut pw).unwrap().content, "v2");
}

#[test]
fn test_vault_blob_format() {
    let blob = crypto::encrypt("hello", "pw").unwrap();
    let parts: Vec<&str> = blob.split(':').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].len(), 32);
    assert_eq!(parts[1].len(), 32);
    assert_ne!(blob, crypto::encrypt("hello", "pw").unwrap());
    assert_eq!(crypto::decrypt(&blob, "pw").unwrap(), "hello");
}

// ============================================================================
// Delete and tags
// ============================================================================

#[test]
fn test_delete_removes_secret_and_reuses_max_id() {
    let mut memory = Memory::new();
    let mut pw = FixedPassword::new("pw");
    memory.add(note("a", &[]), &mut pw).unwrap();
    memory.add(note("b", &[]), &mut pw).unwrap();
    memory.add(secret("c"), &mut pw).unwrap();

    memory.delete(102).unwrap();
    assert!(memory.entries().find(102).is_none());
    assert!(!memory.vault().contains(102));
    assert_eq!(memory.entries().next_id(), 102);

    memory.delete(100).unwrap();
    assert_eq!(memory.entries().next_id(), 102);
    assert!(matches!(memory.delete(100), Err(MemoryError::NotFound(100))));
}

#[test]
fn test_tag_counts_keep_in_entry_duplicates() {
    let mut memory = Memory::new();
    let mut pw = FixedPassword::new("pw");
    memory.add(note("one", &["a", "b"]), &mut pw).unwrap();
    memory.add(note("two", &["a"]), &mut pw).unwrap();
    memory.add(note("three", &["b", "b"]), &mut pw).unwrap();

    assert_eq!(
        memory.tags(),
        vec![("b".to_string(), 3), ("a".to_string(), 2)]
    );
}

// ============================================================================
// Shell
// ============================================================================

#[test]
fn test_shell_workflow() {
    let (storage, _temp_dir) = setup_storage();
    let shell = Shell::new();
    let mut memory = storage.load().unwrap();
    let mut pw = FixedPassword::new("pw");

    let steps = [
        "add -t git,cli git log --oneline",
        "add -e -t aws AKIA-SECRET",
        "edit 100 -t git",
        "get 101",
    ];
    for line in steps {
        let result = shell.execute_line(line, &mut memory, &mut pw);
        assert!(
            matches!(result, CommandResult::Success(_)),
            "'{}' failed: {:?}",
            line,
            result
        );
    }
    storage.save(&memory).unwrap();

    let reloaded = storage.load().unwrap();
    assert_eq!(reloaded.entries().find(100).unwrap().tags, vec!["git"]);
    assert_eq!(reloaded.entries().find(101).unwrap().usage_count, 1);

    match shell.execute_line("find git", &mut memory, &mut pw) {
        CommandResult::Success(Some(table)) => {
            assert!(table.contains("git log --oneline"));
            assert!(!table.contains("AKIA"));
        }
        other => panic!("Expected table, got {:?}", other),
    }
}

#[test]
fn test_commands_through_registry() {
    let registry = create_registry();
    let mut memory = Memory::new();
    let mut pw = FixedPassword::new("pw");
    let mut completions = Completions::default();

    let mut ctx = ShellContext::new(&mut memory, &mut pw, &mut completions)
        .with_registry(&registry);
    let add = registry.get("save").unwrap();
    assert!(matches!(
        add.execute(&["-t", "notes", "buy", "milk"], &mut ctx),
        CommandResult::Success(_)
    ));
    assert!(ctx.modified);

    let tags = registry.get("t").unwrap();
    match tags.execute(&[], &mut ctx) {
        CommandResult::Success(Some(out)) => assert!(out.contains("notes")),
        other => panic!("Expected tags, got {:?}", other),
    }

    let delete = registry.get("rm").unwrap();
    assert!(matches!(
        delete.execute(&["100"], &mut ctx),
        CommandResult::Success(_)
    ));
    assert!(ctx.memory.entries().is_empty());
    assert!(ctx.completions.ids.is_empty());
}

#[test]
fn test_failed_command_leaves_memory_untouched() {
    let shell = Shell::new();
    let mut memory = Memory::new();
    shell.execute_line("add -e token", &mut memory, &mut FixedPassword::new("pw"));
    let before = memory.clone();

    for line in ["get 101", "get 100", "delete 555", "find [", "find x -d someday"] {
        let result = shell.execute_line(line, &mut memory, &mut FixedPassword::new("bad"));
        assert!(matches!(result, CommandResult::Error(_)), "'{}' should fail", line);
    }
    assert_eq!(memory, before);
}

#[test]
fn test_trie_backs_command_completion() {
    let registry = create_registry();
    let names: Trie = ["add", "edit", "get"].into_iter().collect();

    assert_eq!(names.completions("e"), vec!["edit"]);
    assert_eq!(registry.completions("ed"), vec!["edit"]);
}
