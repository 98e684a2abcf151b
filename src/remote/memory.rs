// ============================================================================
// SheetLoc - 内存表格后端
// ============================================================================
//
// 文件: src/remote/memory.rs
// 职责: 基于内存的表格文档实现，用于测试和离线演练
// 边界:
//   - ✅ 工作表数据存储（表头 + 行）
//   - ✅ 写入操作记录（保存/追加）
//   - ✅ 可注入的写入失败
//   - ❌ 不应包含网络访问
//   - ❌ 不应包含同步算法
//
// ============================================================================

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::error::{Result, SyncError};
use crate::remote::{RowRecord, SheetRow, SpreadsheetDocument, Worksheet};

/// 工作表内部数据
#[derive(Debug, Default)]
struct SheetData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// 内存工作表
#[derive(Debug, Default)]
pub struct MemoryWorksheet {
    title: String,
    data: Mutex<SheetData>,
    saved_rows: Mutex<Vec<SheetRow>>,
    appended_batches: Mutex<Vec<Vec<RowRecord>>>,
    get_rows_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_mutations: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryWorksheet {
    /// 创建工作表
    pub fn new(title: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        let data = SheetData {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        };
        Self {
            title: title.to_string(),
            data: Mutex::new(data),
            ..Default::default()
        }
    }

    /// 后续读取全部失败
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// 后续写入全部失败
    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// 当前表头
    pub fn headers(&self) -> Vec<String> {
        lock(&self.data).headers.clone()
    }

    /// 当前全部数据行（不含表头）
    pub fn rows(&self) -> Vec<RowRecord> {
        let data = lock(&self.data);
        data.rows
            .iter()
            .map(|values| RowRecord::from_columns(&data.headers, values))
            .collect()
    }

    /// 已保存的行（按调用顺序）
    pub fn saved_rows(&self) -> Vec<SheetRow> {
        lock(&self.saved_rows).clone()
    }

    /// 每次追加调用的行批次
    pub fn appended_batches(&self) -> Vec<Vec<RowRecord>> {
        lock(&self.appended_batches).clone()
    }

    /// 读取行的调用次数
    pub fn get_rows_calls(&self) -> usize {
        self.get_rows_calls.load(Ordering::SeqCst)
    }

    fn check_mutation(&self, operation: &str) -> Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(SyncError::remote(
                operation,
                format!("sheet \"{}\" rejected the write", self.title),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Worksheet for MemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn get_rows(&self, limit: Option<usize>) -> Result<Vec<SheetRow>> {
        self.get_rows_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SyncError::remote(
                "get rows",
                format!("sheet \"{}\" is unavailable", self.title),
            ));
        }

        let data = lock(&self.data);
        let limit = limit.unwrap_or(usize::MAX);
        Ok(data
            .rows
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, values)| {
                SheetRow::new(index + 2, RowRecord::from_columns(&data.headers, values))
            })
            .collect())
    }

    async fn save_row(&self, row: &SheetRow) -> Result<()> {
        self.check_mutation("save row")?;

        let mut data = lock(&self.data);
        let index = row
            .row_number
            .checked_sub(2)
            .filter(|index| *index < data.rows.len())
            .ok_or_else(|| {
                SyncError::remote("save row", format!("row {} does not exist", row.row_number))
            })?;
        let headers = data.headers.clone();
        let stored = &mut data.rows[index];
        for (_, header, value) in row.changed_cells() {
            let Some(column) = headers.iter().position(|h| h == header) else {
                continue;
            };
            if stored.len() <= column {
                stored.resize(column + 1, String::new());
            }
            stored[column] = value.to_string();
        }
        drop(data);

        lock(&self.saved_rows).push(row.clone());
        Ok(())
    }

    async fn add_rows(&self, rows: Vec<RowRecord>) -> Result<()> {
        self.check_mutation("append rows")?;

        let mut data = lock(&self.data);
        for record in &rows {
            let values = record.values_for(&data.headers);
            data.rows.push(values);
        }
        drop(data);

        lock(&self.appended_batches).push(rows);
        Ok(())
    }
}

/// 内存表格文档
#[derive(Debug, Default)]
pub struct MemoryDocument {
    sheets: BTreeMap<String, Arc<MemoryWorksheet>>,
    load_calls: AtomicUsize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加工作表
    pub fn with_sheet(mut self, title: &str, headers: &[&str], rows: &[&[&str]]) -> Self {
        self.sheets.insert(
            title.to_string(),
            Arc::new(MemoryWorksheet::new(title, headers, rows)),
        );
        self
    }

    /// 获取具体的内存工作表，便于检查写入记录
    pub fn sheet(&self, title: &str) -> Option<Arc<MemoryWorksheet>> {
        self.sheets.get(title).cloned()
    }

    /// 加载元数据的调用次数
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpreadsheetDocument for MemoryDocument {
    async fn load_info(&self) -> Result<()> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn sheets_by_title(&self) -> BTreeMap<String, Arc<dyn Worksheet>> {
        self.sheets
            .iter()
            .map(|(title, sheet)| (title.clone(), Arc::clone(sheet) as Arc<dyn Worksheet>))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rows_are_numbered_after_the_header() {
        let sheet = MemoryWorksheet::new("home", &["key", "en"], &[&["a", "A"], &["b", "B"]]);
        let rows = sheet.get_rows(Some(1)).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[0].to_object().get("en"), Some("A"));
    }

    #[tokio::test]
    async fn save_and_append_are_recorded() {
        let sheet = MemoryWorksheet::new("home", &["key", "en"], &[&["a", "A"]]);
        let mut row = sheet.get_rows(None).await.unwrap().remove(0);
        row.set("en", "AA");
        sheet.save_row(&row).await.unwrap();
        sheet
            .add_rows(vec![[("key", "b"), ("en", "B")].into_iter().collect()])
            .await
            .unwrap();

        let rows = sheet.rows();
        assert_eq!(rows[0].get("en"), Some("AA"));
        assert_eq!(rows[1].get("key"), Some("b"));
        assert_eq!(sheet.saved_rows().len(), 1);
        assert_eq!(sheet.appended_batches().len(), 1);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_remote_errors() {
        let sheet = MemoryWorksheet::new("home", &["key", "en"], &[]);
        sheet.fail_mutations(true);
        let err = sheet.add_rows(vec![RowRecord::new()]).await.unwrap_err();
        assert!(matches!(err, SyncError::Remote { .. }));
        assert!(sheet.appended_batches().is_empty());
    }
}
