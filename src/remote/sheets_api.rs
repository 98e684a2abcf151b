// ============================================================================
// SheetLoc - Google Sheets REST 后端
// ============================================================================
//
// 文件: src/remote/sheets_api.rs
// 职责: 通过 Sheets v4 REST 接口实现表格文档契约
// 边界:
//   - ✅ 元数据读取（工作表列表）
//   - ✅ 行读取、单行保存、批量追加
//   - ✅ A1 区间与请求 URL 构造
//   - ❌ 不应包含访问令牌签发与刷新
//   - ❌ 不应包含重试和退避策略
//   - ❌ 不应包含同步算法
//
// ============================================================================

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde::{Deserialize, Serialize};

use crate::models::config::{Credentials, ENV_ACCESS_TOKEN};
use crate::models::error::{Result, SyncError};
use crate::remote::{column_letter, RowRecord, SheetRow, SpreadsheetDocument, Worksheet};

/// 默认接口地址
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// 读取整行时使用的最右列
const LAST_COLUMN: &str = "ZZ";

/// 元数据响应
#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// values 接口的请求/响应体
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// 共享的请求上下文
struct ApiContext {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl ApiContext {
    /// 构造 `{base}/{id}/{segments...}` 形式的地址，路径段会被转义
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| SyncError::remote("build url", err))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SyncError::remote("build url", "base url cannot be a base"))?;
            path.pop_if_empty();
            path.push(&self.spreadsheet_id);
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<serde_json::Value> {
        tracing::debug!(%method, %url, "sheets api request");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| SyncError::remote(operation, err))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| SyncError::remote(operation, err))?;

        if !status.is_success() {
            return Err(SyncError::remote(operation, format!("{status}: {text}")));
        }
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn read_range(&self, operation: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.url(&["values", range], &[])?;
        let body = self
            .send::<()>(operation, Method::GET, url, None)
            .await?;
        let values: ValueRange = serde_json::from_value(body)?;
        Ok(values
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 带引号的工作表名，用于 A1 区间
fn quoted_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// 读取数据行的区间，`limit` 为 None 时读取整张表
fn rows_range(title: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) => format!("{}!A1:{}{}", quoted_title(title), LAST_COLUMN, limit + 1),
        None => quoted_title(title),
    }
}

/// 单个单元格的 A1 区间
fn cell_range(title: &str, column: usize, row_number: usize) -> String {
    format!("{}!{}{}", quoted_title(title), column_letter(column), row_number)
}

/// 行中待写回的单元格: (A1 区间, 值)
///
/// 只包含修改过的单元格，读取时以显示值返回的公式列不会被写回。
fn cell_updates(title: &str, row: &SheetRow) -> Vec<(String, String)> {
    row.changed_cells()
        .into_iter()
        .map(|(column, _, value)| (cell_range(title, column, row.row_number), value.to_string()))
        .collect()
}

/// Sheets REST 工作表
#[derive(Debug)]
pub struct SheetsApiWorksheet {
    context: Arc<ApiContext>,
    title: String,
}

impl SheetsApiWorksheet {
    /// 读取第一行表头
    async fn header_row(&self) -> Result<Vec<String>> {
        let range = format!("{}!1:1", quoted_title(&self.title));
        let mut rows = self.context.read_range("read header", &range).await?;
        Ok(if rows.is_empty() {
            Vec::new()
        } else {
            rows.swap_remove(0)
        })
    }
}

#[async_trait]
impl Worksheet for SheetsApiWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn get_rows(&self, limit: Option<usize>) -> Result<Vec<SheetRow>> {
        let range = rows_range(&self.title, limit);
        let mut values = self.context.read_range("get rows", &range).await?.into_iter();
        let Some(headers) = values.next() else {
            return Ok(Vec::new());
        };

        Ok(values
            .enumerate()
            .map(|(index, row)| SheetRow::new(index + 2, RowRecord::from_columns(&headers, &row)))
            .collect())
    }

    async fn save_row(&self, row: &SheetRow) -> Result<()> {
        for (range, value) in cell_updates(&self.title, row) {
            let body = ValueRange {
                range: Some(range.clone()),
                major_dimension: Some("ROWS".to_string()),
                values: vec![vec![serde_json::Value::String(value)]],
            };
            let url = self
                .context
                .url(&["values", &range], &[("valueInputOption", "USER_ENTERED")])?;
            self.context
                .send("save row", Method::PUT, url, Some(&body))
                .await?;
        }
        Ok(())
    }

    async fn add_rows(&self, rows: Vec<RowRecord>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let headers = self.header_row().await?;
        let body = ValueRange {
            range: None,
            major_dimension: Some("ROWS".to_string()),
            values: rows
                .iter()
                .map(|record| {
                    record
                        .values_for(&headers)
                        .into_iter()
                        .map(serde_json::Value::String)
                        .collect()
                })
                .collect(),
        };
        let target = format!("{}!A1:append", quoted_title(&self.title));
        let url = self.context.url(
            &["values", &target],
            &[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ],
        )?;
        self.context
            .send("append rows", Method::POST, url, Some(&body))
            .await?;
        Ok(())
    }
}

/// Sheets REST 文档
#[derive(Debug)]
pub struct SheetsApiDocument {
    context: Arc<ApiContext>,
    sheets: RwLock<BTreeMap<String, Arc<SheetsApiWorksheet>>>,
}

impl SheetsApiDocument {
    /// 使用凭据构造文档，需要预先签发的访问令牌
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let access_token = credentials
            .access_token
            .clone()
            .ok_or_else(|| SyncError::MissingCredentials(vec![ENV_ACCESS_TOKEN.to_string()]))?;
        Self::new(
            DEFAULT_BASE_URL,
            &credentials.spreadsheet_id,
            &access_token,
            Duration::from_secs(30),
        )
    }

    /// 构造文档
    pub fn new(
        base_url: &str,
        spreadsheet_id: &str,
        access_token: &str,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| SyncError::remote("build http client", err))?;
        let context = ApiContext {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
        };
        Ok(Self {
            context: Arc::new(context),
            sheets: RwLock::new(BTreeMap::new()),
        })
    }
}

#[async_trait]
impl SpreadsheetDocument for SheetsApiDocument {
    async fn load_info(&self) -> Result<()> {
        let url = self
            .context
            .url(&[], &[("fields", "sheets.properties")])?;
        let body = self
            .context
            .send::<()>("load metadata", Method::GET, url, None)
            .await?;
        let metadata: SpreadsheetMetadata = serde_json::from_value(body)?;

        let sheets: BTreeMap<String, Arc<SheetsApiWorksheet>> = metadata
            .sheets
            .into_iter()
            .map(|entry| {
                let title = entry.properties.title;
                let sheet = SheetsApiWorksheet {
                    context: Arc::clone(&self.context),
                    title: title.clone(),
                };
                (title, Arc::new(sheet))
            })
            .collect();
        tracing::debug!(sheets = sheets.len(), "loaded spreadsheet metadata");

        let mut guard = self
            .sheets
            .write()
            .map_err(|_| SyncError::remote("load metadata", "sheet index lock poisoned"))?;
        *guard = sheets;
        Ok(())
    }

    fn sheets_by_title(&self) -> BTreeMap<String, Arc<dyn Worksheet>> {
        let guard = match self.sheets.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .iter()
            .map(|(title, sheet)| (title.clone(), Arc::clone(sheet) as Arc<dyn Worksheet>))
            .collect()
    }
}
