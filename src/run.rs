//! 运行控制：建表一次，发现候选文件，线程池里逐文件 读取 -> 解析 -> 扫描 -> 改写 -> 输出
//!
//! 单个文件的任何失败都只记在该文件名下，不会中断其它文件。

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::backend::rewrite::{rewrite, RewriteOptions};
use crate::cli::progress::ProgressBar;
use crate::diag::{codes, DiagSink, Diagnostic, SourceMap};
use crate::frontend::parser::{parse_declaration, parse_source};
use crate::frontend::span::FileId;
use crate::middle::policy::{AmbiguityPolicy, HintTable};
use crate::middle::scan::scan;
use crate::middle::symbols::{build_symbol_table, SymbolTable};
use crate::project::Project;
use crate::utils::parallel::{build_pool, process_files_parallel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// 改写结果收集起来，由调用方按路径顺序打印
    Print,
    /// 原子地写回源文件
    Overwrite,
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub declaration: PathBuf,
    pub root: PathBuf,
    pub mode: OutputMode,
    pub options: RewriteOptions,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub threads: usize,
    pub hints: HintTable,
    pub progress: bool,
}

impl RunConfig {
    pub fn new(declaration: PathBuf, root: PathBuf) -> Self {
        Self::from_project(&Project::with_defaults(&root), declaration)
    }

    pub fn from_project(p: &Project, declaration: PathBuf) -> Self {
        Self {
            declaration,
            root: p.root.clone(),
            mode: if p.overwrite { OutputMode::Overwrite } else { OutputMode::Print },
            options: RewriteOptions { inject_import: p.add_import, qualify: p.qualify },
            extensions: p.extensions.clone(),
            exclude: p.exclude.clone(),
            threads: p.threads,
            hints: p.hints.clone(),
            progress: false,
        }
    }
}

/// 一个被改写的文件
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub replacements: usize,
    /// 只有 Print 模式才保留改写后的全文
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_scanned: usize,
    /// 有替换的文件，按路径排序
    pub rewritten: Vec<FileOutcome>,
    /// 按路径排序
    pub failures: Vec<FileFailure>,
    pub replacements: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// 仅包含带诊断文件的原文，渲染用
    pub sources: SourceMap,
}

impl RunSummary {
    #[inline] pub fn files_changed(&self) -> usize { self.rewritten.len() }
    #[inline] pub fn has_failures(&self) -> bool { !self.failures.is_empty() }
}

enum FileStatus {
    Unchanged,
    Rewritten { replacements: usize, text: Option<String> },
    Failed(String),
}

struct FileReport {
    status: FileStatus,
    diagnostics: Vec<Diagnostic>,
    /// 有诊断时保留原文
    source: Option<String>,
}

/// 读取并解析 R.java，构建符号表；失败时把带位置的错误写进 `diags`
pub fn load_symbol_table(path: &Path, sm: &mut SourceMap, diags: &mut DiagSink) -> Result<SymbolTable> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("read declaration file `{}` failed", path.display()))?;
    let name = path.display().to_string();
    let fid = sm.add_file(name.clone(), src.clone());

    let table = parse_declaration(&src, fid)
        .and_then(|decl| build_symbol_table(&decl))
        .map_err(|e| {
            diags.error(codes::MALFORMED_DECLARATION, &name, e.span(), e.to_string());
            e
        })
        .with_context(|| format!("malformed declaration file `{}`", path.display()))?;

    tracing::info!(
        path = %path.display(),
        package = table.package(),
        entries = table.len(),
        "symbol table built"
    );
    Ok(table)
}

/// 建表 + 处理整个工程
pub fn run(cfg: &RunConfig) -> Result<RunSummary> {
    let mut sm = SourceMap::new();
    let mut diags = DiagSink::new();
    let table = load_symbol_table(&cfg.declaration, &mut sm, &mut diags)?;
    run_with_table(cfg, &table)
}

/// 用已经建好的符号表处理整个工程
pub fn run_with_table(cfg: &RunConfig, table: &SymbolTable) -> Result<RunSummary> {
    let _span = tracing::info_span!("run", root = %cfg.root.display()).entered();

    let files = discover_files(cfg)?;
    tracing::info!(files = files.len(), "candidate files found");

    let pool = build_pool(cfg.threads)?;
    let policy = AmbiguityPolicy::new(table, &cfg.hints);

    // FileId 与 files 下标一致
    let mut sources = SourceMap::new();
    let ids: Vec<FileId> = files.iter().map(|p| sources.reserve(p.display().to_string())).collect();

    let progress = cfg
        .progress
        .then(|| Mutex::new(ProgressBar::new(30, files.len(), "restoring".to_string())));

    let reports = process_files_parallel(&pool, &files, |i, path| {
        let report = process_file(path, ids[i], &policy, cfg);
        if let Some(pb) = &progress {
            if let Ok(mut pb) = pb.lock() {
                pb.inc();
            }
        }
        report
    });

    if let Some(pb) = &progress {
        if let Ok(pb) = pb.lock() {
            pb.finish();
        }
    }

    let mut summary = RunSummary { files_scanned: files.len(), ..RunSummary::default() };
    for ((path, id), report) in files.into_iter().zip(ids).zip(reports) {
        if let Some(src) = report.source {
            sources.set_source(id, src);
        }
        summary.diagnostics.extend(report.diagnostics);
        match report.status {
            FileStatus::Unchanged => {}
            FileStatus::Rewritten { replacements, text } => {
                summary.replacements += replacements;
                summary.rewritten.push(FileOutcome { path, replacements, text });
            }
            FileStatus::Failed(message) => summary.failures.push(FileFailure { path, message }),
        }
    }
    summary.sources = sources;

    tracing::info!(
        scanned = summary.files_scanned,
        changed = summary.files_changed(),
        replacements = summary.replacements,
        failed = summary.failures.len(),
        "run finished"
    );
    Ok(summary)
}

/// 遍历工程目录，按扩展名收集候选文件；排除 R.java 本身和配置里列出的文件名。结果按路径排序。
pub fn discover_files(cfg: &RunConfig) -> Result<Vec<PathBuf>> {
    if !cfg.root.is_dir() {
        bail!("project path `{}` is not a directory", cfg.root.display());
    }
    let declaration = fs::canonicalize(&cfg.declaration).ok();
    let declaration_name = cfg.declaration.file_name();

    let mut out = Vec::new();
    for entry in walkdir::WalkDir::new(&cfg.root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| cfg.extensions.iter().any(|want| want.eq_ignore_ascii_case(e)));
        if !ext_ok {
            continue;
        }
        let name = entry.file_name();
        if cfg.exclude.iter().any(|x| name == x.as_str()) {
            tracing::debug!(path = %path.display(), "excluded by name");
            continue;
        }
        if declaration_name == Some(name) && declaration.is_some() && fs::canonicalize(path).ok() == declaration {
            continue;
        }
        out.push(path.to_path_buf());
    }
    out.sort();
    Ok(out)
}

fn process_file(path: &Path, file: FileId, policy: &AmbiguityPolicy<'_>, cfg: &RunConfig) -> FileReport {
    let name = path.display().to_string();
    let mut diags = DiagSink::new();

    let src = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("read failed: {e}");
            tracing::warn!(path = %name, "{msg}");
            diags.error(codes::IO, &name, None, msg.clone());
            return FileReport { status: FileStatus::Failed(msg), diagnostics: diags.into_vec(), source: None };
        }
    };

    let unit = match parse_source(&src, file) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(path = %name, "parse failed: {e}");
            diags.error(codes::PARSE, &name, e.span, e.message.clone());
            return FileReport {
                status: FileStatus::Failed(format!("parse failed: {e}")),
                diagnostics: diags.into_vec(),
                source: Some(src),
            };
        }
    };

    let report = scan(&unit, policy);
    report.report_to(&name, &mut diags);
    if report.count == 0 {
        tracing::debug!(path = %name, "no resource ids, skipped");
        return finish(FileStatus::Unchanged, diags, src);
    }

    let result = match rewrite(path, &unit, policy, cfg.options) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(path = %name, "{e}");
            diags.error(codes::CONFLICT, &name, None, e.to_string());
            return finish(FileStatus::Failed(e.to_string()), diags, src);
        }
    };

    let text = match cfg.mode {
        OutputMode::Print => Some(result.text),
        OutputMode::Overwrite => {
            if let Err(e) = write_atomic(path, &result.text) {
                let msg = format!("{e:#}");
                tracing::warn!(path = %name, "write failed: {msg}");
                diags.error(codes::IO, &name, None, msg.clone());
                return finish(FileStatus::Failed(msg), diags, src);
            }
            None
        }
    };
    tracing::info!(path = %name, replacements = result.replacement_count, "rewrote file");
    finish(FileStatus::Rewritten { replacements: result.replacement_count, text }, diags, src)
}

fn finish(status: FileStatus, diags: DiagSink, src: String) -> FileReport {
    let source = (!diags.is_empty()).then_some(src);
    FileReport { status, diagnostics: diags.into_vec(), source }
}

/// 临时文件写在同一目录，写完再 rename 覆盖：要么完整替换，要么原样不动
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in `{}` failed", dir.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write temp file for `{}` failed", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync temp file for `{}` failed", path.display()))?;
    if let Ok(meta) = fs::metadata(path) {
        // 沿用原文件权限；失败不影响写入
        if let Err(e) = fs::set_permissions(tmp.path(), meta.permissions()) {
            tracing::warn!(path = %path.display(), "keep file permissions failed: {e}");
        }
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace `{}` failed", path.display()))?;
    Ok(())
}
