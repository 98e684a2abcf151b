// ============================================================================
// SheetLoc - English Translation Table
// ============================================================================
//
// 文件: src/i18n/en_us.rs
// 职责: English translation content definition
// 边界:
//   - ✅ English translation strings definition
//   - ❌ Should not contain translation logic
//   - ❌ Should not contain other language translations
//
// ============================================================================

/// English translation table
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // Sync command
    ("sync.start", "Syncing {} sheets with the spreadsheet..."),
    ("sync.failed", "Spreadsheet sync failed"),
    (
        "sync.local_newer",
        "Local language data is newer than translation files. Checking for changes...",
    ),
    (
        "sync.no_changes",
        "No local changes found that need to be synced to the spreadsheet",
    ),
    ("sync.changes_found", "Found {} local entries to sync to the spreadsheet"),
    ("sync.pushed", "Local changes were pushed to the spreadsheet"),
    ("sync.summary", "Wrote {} locales ({} entries) to {}"),
    // Fetching
    ("fetch.processing_sheets", "Processing {} sheets: {}"),
    (
        "fetch.no_sheet_titles",
        "No sheet titles provided, cannot process spreadsheet data",
    ),
    ("fetch.sheet_skipped", "Skipping sheet \"{}\": {}"),
    ("fetch.sheet_read_failed", "Could not read sheet \"{}\", its data is skipped"),
    (
        "fetch.sync_skipped",
        "Local sync skipped because these sheets could not be read: {}",
    ),
    ("fetch.refreshing", "Refreshing spreadsheet data after sync..."),
    // Remote updates
    ("updater.start", "Updating spreadsheet with {} local entries..."),
    ("updater.processing_sheet", "Processing sheet: {}"),
    (
        "updater.sheet_not_found",
        "Sheet \"{}\" not found in the document, cannot update",
    ),
    ("updater.no_rows", "No rows found in sheet \"{}\", cannot update"),
    (
        "updater.locale_column_missing",
        "No column for locale \"{}\" in sheet \"{}\", values skipped",
    ),
    ("updater.adding_rows", "Adding {} new keys to sheet {}..."),
    (
        "updater.finished",
        "Finished updating spreadsheet: {} cells updated, {} rows added",
    ),
    // Local files
    (
        "cache.read_failed",
        "Error reading or parsing {}: {}",
    ),
    (
        "freshness.compare_failed",
        "Error comparing file modification times: {}",
    ),
    ("writer.locale_empty", "No translations found for locale \"{}\""),
    ("writer.locale_written", "Successfully wrote translations for {}"),
    ("writer.locales_written", "Wrote locales file with {} locales: {}"),
    ("writer.data_written", "Updated {} with fresh spreadsheet data"),
    // Diff command
    ("diff.failed", "Failed to compare local data with the spreadsheet"),
    ("diff.no_local_cache", "No local language data found at {}"),
    ("diff.clean", "Spreadsheet already contains every local key"),
    ("diff.pending", "{} local entries are missing from the spreadsheet:"),
    // Scheduler
    ("scheduler.batch_start", "Starting {} tasks"),
    ("scheduler.batch_complete", "{}/{} tasks succeeded"),
    ("scheduler.task_start", "Task started: {}"),
    ("scheduler.task_failed", "Task {} failed after {}s: {}"),
    ("scheduler.task_join_error", "Task {} aborted: {}"),
    // Init command
    ("init.start", "Initializing SheetLoc configuration..."),
    ("init.config_exists", "Configuration file already exists: {}"),
    ("init.use_force_hint", "Use --force to overwrite the existing file"),
    ("init.config_created", "Configuration file created: {}"),
    (
        "init.next_steps",
        "Edit the sheet list, then export GOOGLE_CLIENT_EMAIL, GOOGLE_PRIVATE_KEY, GOOGLE_SPREADSHEET_ID and GOOGLE_ACCESS_TOKEN",
    ),
    ("init.create_failed", "Failed to create configuration file: {}"),
];
