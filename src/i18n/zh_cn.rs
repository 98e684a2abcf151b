// ============================================================================
// SheetLoc - 中文翻译表
// ============================================================================
//
// 文件: src/i18n/zh_cn.rs
// 职责: 中文翻译内容定义
// 边界:
//   - ✅ 中文翻译字符串定义
//   - ❌ 不应包含翻译逻辑
//   - ❌ 不应包含其他语言翻译
//
// ============================================================================

/// 中文翻译表
pub const TRANSLATIONS: &[(&str, &str)] = &[
    // 同步命令
    ("sync.start", "正在与表格同步 {} 个工作表..."),
    ("sync.failed", "表格同步失败"),
    ("sync.local_newer", "本地语言数据比翻译文件更新，正在检查变更..."),
    ("sync.no_changes", "没有需要同步到表格的本地变更"),
    ("sync.changes_found", "发现 {} 条需要同步到表格的本地条目"),
    ("sync.pushed", "本地变更已推送到表格"),
    ("sync.summary", "已写入 {} 个语言（{} 条）到 {}"),
    // 拉取
    ("fetch.processing_sheets", "正在处理 {} 个工作表: {}"),
    ("fetch.no_sheet_titles", "未提供工作表名称，无法处理表格数据"),
    ("fetch.sheet_skipped", "跳过工作表 \"{}\": {}"),
    ("fetch.sheet_read_failed", "无法读取工作表 \"{}\"，已跳过其数据"),
    ("fetch.sync_skipped", "以下工作表读取失败，本次跳过本地同步: {}"),
    ("fetch.refreshing", "同步完成，正在重新拉取表格数据..."),
    // 远程更新
    ("updater.start", "正在用 {} 条本地条目更新表格..."),
    ("updater.processing_sheet", "正在处理工作表: {}"),
    ("updater.sheet_not_found", "文档中不存在工作表 \"{}\"，无法更新"),
    ("updater.no_rows", "工作表 \"{}\" 没有数据行，无法更新"),
    ("updater.locale_column_missing", "工作表 \"{1}\" 中没有语言 \"{0}\" 对应的列，已跳过"),
    ("updater.adding_rows", "正在向工作表 {1} 添加 {0} 个新 key..."),
    ("updater.finished", "表格更新完成: 更新 {} 个单元格，新增 {} 行"),
    // 本地文件
    ("cache.read_failed", "读取或解析 {} 失败: {}"),
    ("freshness.compare_failed", "比较文件修改时间失败: {}"),
    ("writer.locale_empty", "语言 \"{}\" 没有翻译内容"),
    ("writer.locale_written", "已写入 {} 的翻译"),
    ("writer.locales_written", "已写入语言列表文件，共 {} 个语言: {}"),
    ("writer.data_written", "已用最新表格数据更新 {}"),
    // 差异预览
    ("diff.failed", "对比本地数据与表格失败"),
    ("diff.no_local_cache", "未找到本地语言数据: {}"),
    ("diff.clean", "表格已包含全部本地 key"),
    ("diff.pending", "表格中缺少 {} 条本地条目:"),
    // 调度器
    ("scheduler.batch_start", "开始执行 {} 个任务"),
    ("scheduler.batch_complete", "{}/{} 个任务成功"),
    ("scheduler.task_start", "任务开始: {}"),
    ("scheduler.task_failed", "任务 {} 在 {} 秒后失败: {}"),
    ("scheduler.task_join_error", "任务 {} 异常中止: {}"),
    // 初始化命令
    ("init.start", "正在初始化 SheetLoc 配置..."),
    ("init.config_exists", "配置文件已存在: {}"),
    ("init.use_force_hint", "使用 --force 覆盖已有文件"),
    ("init.config_created", "配置文件已创建: {}"),
    (
        "init.next_steps",
        "请编辑工作表列表，并设置 GOOGLE_CLIENT_EMAIL、GOOGLE_PRIVATE_KEY、GOOGLE_SPREADSHEET_ID 和 GOOGLE_ACCESS_TOKEN 环境变量",
    ),
    ("init.create_failed", "创建配置文件失败: {}"),
];
