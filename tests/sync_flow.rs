// ============================================================================
// SheetLoc - 同步流程集成测试
// ============================================================================
//
// 文件: tests/sync_flow.rs
// 职责: 使用内存表格驱动完整的 拉取 -> 同步 -> 刷新 -> 写出 流程
//
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use sheetloc::get_spreadsheet_data;
use sheetloc::models::config::SyncOptions;
use sheetloc::remote::memory::MemoryDocument;
use tempfile::TempDir;

fn options(dir: &Path) -> SyncOptions {
    SyncOptions {
        row_limit: 100,
        wait_seconds: 0.0,
        data_json_path: dir.join("src/lib/languageData.json"),
        locales_output_path: dir.join("src/i18n/locales.ts"),
        translations_output_dir: dir.join("translations"),
        sync_local_changes: true,
        auto_translate: false,
        max_concurrency: 2,
    }
}

fn titles(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn write_cache(options: &SyncOptions, content: Value) {
    std::fs::create_dir_all(options.data_json_path.parent().unwrap()).unwrap();
    std::fs::write(&options.data_json_path, content.to_string()).unwrap();
}

#[tokio::test]
async fn bootstrap_writes_every_output_file() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path());
    let doc = Arc::new(
        MemoryDocument::new()
            .with_sheet(
                "home",
                &["Key", "en", "DE"],
                &[&["Welcome", "Welcome", "Willkommen"], &["bye", "Bye", ""]],
            )
            .with_sheet("common", &["key", "en"], &[&["ok", "OK"]]),
    );

    let outcome = get_spreadsheet_data(doc.clone(), &titles(&["home", "common"]), &options)
        .await
        .unwrap();

    assert!(!outcome.synced);
    assert_eq!(outcome.locales, vec!["en-GB", "de-DE"]);
    assert_eq!(
        std::fs::read_to_string(&options.locales_output_path).unwrap(),
        "export const locales = [\"en-GB\",\"de-DE\"];\nexport default locales;"
    );
    assert_eq!(
        read_json(&options.translations_output_dir.join("en-gb.json")),
        json!({ "home": { "welcome": "Welcome", "bye": "Bye" }, "common": { "ok": "OK" } })
    );
    assert_eq!(
        read_json(&options.translations_output_dir.join("de-de.json")),
        json!({ "home": { "welcome": "Willkommen" } })
    );

    let persisted = read_json(&options.data_json_path);
    let records = persisted.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.contains(&json!({ "common": { "en-GB": { "ok": "OK" } } })));
    assert!(records.contains(&json!({
        "home": {
            "en-GB": { "welcome": "Welcome", "bye": "Bye" },
            "de-DE": { "welcome": "Willkommen" }
        }
    })));
}

#[tokio::test]
async fn newer_local_keys_are_appended_and_refetched_once() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path());
    write_cache(&options, json!([{ "home": { "en": { "welcome": "Hi" } } }]));
    let doc = Arc::new(MemoryDocument::new().with_sheet("home", &["key", "en"], &[&["other", "X"]]));

    let outcome = get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();

    let sheet = doc.sheet("home").unwrap();
    let batches = sheet.appended_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].get("key"), Some("welcome"));
    assert_eq!(batches[0][0].get("en"), Some("Hi"));

    // initial read, updater read, one refresh
    assert_eq!(sheet.get_rows_calls(), 3);
    assert!(outcome.synced);
    assert_eq!(
        serde_json::to_value(&outcome.translations).unwrap(),
        json!({ "en-GB": { "home": { "other": "X", "welcome": "Hi" } } })
    );
    assert_eq!(
        read_json(&options.translations_output_dir.join("en-gb.json")),
        json!({ "home": { "other": "X", "welcome": "Hi" } })
    );
}

#[tokio::test]
async fn second_run_after_sync_does_not_push_again() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path());
    write_cache(&options, json!([{ "home": { "en-GB": { "welcome": "Hi" } } }]));
    let doc = Arc::new(MemoryDocument::new().with_sheet("home", &["key", "en"], &[&["other", "X"]]));

    get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();
    let outcome = get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();

    assert!(!outcome.synced);
    assert_eq!(doc.sheet("home").unwrap().appended_batches().len(), 1);
}

#[tokio::test]
async fn auto_translate_adds_formulas_for_empty_locale_columns() {
    let dir = TempDir::new().unwrap();
    let mut options = options(dir.path());
    options.auto_translate = true;
    write_cache(&options, json!([{ "home": { "en-GB": { "welcome": "Hi" } } }]));
    let doc = Arc::new(MemoryDocument::new().with_sheet(
        "home",
        &["key", "en", "fr", "de"],
        &[&["other", "X", "Y", "Z"], &["bye", "Bye", "Au revoir", "Tschüss"]],
    ));

    get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();

    let appended = &doc.sheet("home").unwrap().appended_batches()[0][0];
    assert_eq!(appended.get("en"), Some("Hi"));
    assert_eq!(appended.get("fr"), Some("=GOOGLETRANSLATE(B4;$B$1;C$1)"));
    assert_eq!(appended.get("de"), Some("=GOOGLETRANSLATE(B4;$B$1;D$1)"));
}

#[tokio::test]
async fn disabled_sync_never_touches_the_remote() {
    let dir = TempDir::new().unwrap();
    let mut options = options(dir.path());
    options.sync_local_changes = false;
    write_cache(&options, json!([{ "home": { "en-GB": { "welcome": "Hi" } } }]));
    let doc = Arc::new(MemoryDocument::new().with_sheet("home", &["key", "en"], &[&["other", "X"]]));

    let outcome = get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();

    assert!(!outcome.synced);
    let sheet = doc.sheet("home").unwrap();
    assert!(sheet.appended_batches().is_empty());
    assert_eq!(sheet.get_rows_calls(), 1);
    // the aggregate file now mirrors the remote
    assert_eq!(
        read_json(&options.data_json_path),
        json!([{ "home": { "en-GB": { "other": "X" } } }])
    );
}

#[tokio::test]
async fn failed_remote_write_aborts_before_writing_files() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path());
    write_cache(&options, json!([{ "home": { "en-GB": { "welcome": "Hi" } } }]));
    let doc = Arc::new(MemoryDocument::new().with_sheet("home", &["key", "en"], &[&["other", "X"]]));
    doc.sheet("home").unwrap().fail_mutations(true);

    let result = get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options).await;

    assert!(result.is_err());
    assert!(!options.translations_output_dir.exists());
    assert!(!options.locales_output_path.exists());
}

#[tokio::test]
async fn unreadable_sheets_do_not_block_the_others() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path());
    let doc = Arc::new(
        MemoryDocument::new()
            .with_sheet("home", &["key", "en"], &[&["hello", "Hello"]])
            .with_sheet("flaky", &["key", "en"], &[&["a", "A"]]),
    );
    doc.sheet("flaky").unwrap().fail_reads(true);

    let outcome = get_spreadsheet_data(doc.clone(), &titles(&["home", "flaky", "missing"]), &options)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&outcome.translations).unwrap(),
        json!({ "en-GB": { "home": { "hello": "Hello" } } })
    );
    assert!(options.data_json_path.exists());
}

#[tokio::test]
async fn rows_beyond_the_row_limit_are_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let mut options = options(dir.path());
    options.row_limit = 1;
    write_cache(
        &options,
        json!([{ "home": { "en-GB": { "a": "A", "b": "old b" } } }]),
    );
    let doc = Arc::new(MemoryDocument::new().with_sheet(
        "home",
        &["key", "en"],
        &[&["a", "A"], &["b", "b (edited)"]],
    ));

    get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();

    let sheet = doc.sheet("home").unwrap();
    assert_eq!(sheet.rows()[1].get("en"), Some("b (edited)"));
    assert!(sheet.saved_rows().is_empty());
    assert!(sheet.appended_batches().is_empty());
}

#[tokio::test]
async fn remote_edits_survive_when_a_sheet_read_fails() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path());
    write_cache(&options, json!([{ "home": { "en-GB": { "hello": "Hello" } } }]));
    let doc = Arc::new(MemoryDocument::new().with_sheet(
        "home",
        &["key", "en"],
        &[&["hello", "Hello (edited)"]],
    ));
    doc.sheet("home").unwrap().fail_reads(true);

    let outcome = get_spreadsheet_data(doc.clone(), &titles(&["home"]), &options)
        .await
        .unwrap();

    assert!(!outcome.synced);
    let sheet = doc.sheet("home").unwrap();
    assert!(sheet.saved_rows().is_empty());
    assert_eq!(sheet.rows()[0].get("en"), Some("Hello (edited)"));
}
