// ============================================================================
// SheetLoc - 远程表格接口
// ============================================================================
//
// 文件: src/remote/mod.rs
// 职责: 表格文档、工作表和行的访问契约定义
// 边界:
//   - ✅ 文档/工作表异步 trait 定义
//   - ✅ 行数据结构（保持列顺序）
//   - ✅ 后端子模块导出
//   - ❌ 不应包含同步算法
//   - ❌ 不应包含语言规范化
//
// ============================================================================

pub mod memory;
pub mod sheets_api;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::error::Result;

/// 把从 0 开始的列序号转换为 A1 表示法的列字母 (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push((b'A' + offset as u8) as char);
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// 行记录: 表头 -> 单元格文本，保持列顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowRecord {
    cells: Vec<(String, String)>,
}

impl RowRecord {
    /// 创建空记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 按列顺序由表头和值构造记录，缺失的值视为空串
    pub fn from_columns(headers: &[String], values: &[String]) -> Self {
        let cells = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let value = values.get(index).cloned().unwrap_or_default();
                (header.clone(), value)
            })
            .collect();
        Self { cells }
    }

    /// 表头（列顺序）
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(header, _)| header.as_str())
    }

    /// 精确读取
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, value)| value.as_str())
    }

    /// 大小写不敏感读取
    pub fn get_ci(&self, header: &str) -> Option<&str> {
        let header = header.to_lowercase();
        self.cells
            .iter()
            .find(|(h, _)| h.to_lowercase() == header)
            .map(|(_, value)| value.as_str())
    }

    /// 写入单元格，已存在的表头原位更新，否则追加到末尾
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(h, _)| *h == header) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((header, value)),
        }
    }

    /// 按给定表头顺序输出单元格值
    pub fn values_for(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|header| self.get(header).unwrap_or_default().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

impl<H: Into<String>, V: Into<String>> FromIterator<(H, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut record = RowRecord::new();
        for (header, value) in iter {
            record.insert(header, value);
        }
        record
    }
}

/// 已存在于工作表中的数据行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 表格中的行号（从 1 开始，第 1 行为表头）
    pub row_number: usize,
    record: RowRecord,
    /// 自上次保存以来修改过的表头
    changed: Vec<String>,
}

impl SheetRow {
    pub fn new(row_number: usize, record: RowRecord) -> Self {
        Self {
            row_number,
            record,
            changed: Vec::new(),
        }
    }

    /// 行的扁平映射（原始表头 -> 文本）
    pub fn to_object(&self) -> &RowRecord {
        &self.record
    }

    /// 修改单元格，需要调用 [`Worksheet::save_row`] 才会写回
    pub fn set(&mut self, header: &str, value: impl Into<String>) {
        self.record.insert(header, value);
        if !self.changed.iter().any(|h| h == header) {
            self.changed.push(header.to_string());
        }
    }

    /// 待保存的单元格: (列序号, 表头, 值)，按修改顺序
    pub fn changed_cells(&self) -> Vec<(usize, &str, &str)> {
        self.changed
            .iter()
            .filter_map(|header| {
                let column = self.record.headers().position(|h| h == header)?;
                let value = self.record.get(header)?;
                Some((column, header.as_str(), value))
            })
            .collect()
    }

    /// 保存成功后清空修改记录
    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }
}

/// 工作表句柄
#[async_trait]
pub trait Worksheet: Send + Sync {
    /// 工作表标题
    fn title(&self) -> &str;

    /// 读取数据行（不含表头），`limit` 为 None 时读取全部
    async fn get_rows(&self, limit: Option<usize>) -> Result<Vec<SheetRow>>;

    /// 保存单行中通过 [`SheetRow::set`] 修改过的单元格，其余单元格保持不变
    async fn save_row(&self, row: &SheetRow) -> Result<()>;

    /// 在表尾追加新行
    async fn add_rows(&self, rows: Vec<RowRecord>) -> Result<()>;
}

/// 表格文档
#[async_trait]
pub trait SpreadsheetDocument: Send + Sync {
    /// 加载文档元数据（工作表列表）
    async fn load_info(&self) -> Result<()>;

    /// 按标题索引的工作表
    fn sheets_by_title(&self) -> BTreeMap<String, Arc<dyn Worksheet>>;
}
