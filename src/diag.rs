// src/diag.rs
use std::fmt;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

// 统一复用 frontend 的 Span / FileId，并沿用 crate::diag::Span 的访问路径
pub use crate::frontend::span::{FileId, Span};

/// 诊断代码
pub mod codes {
    /// 一个值对应多个声明
    pub const AMBIGUOUS: &str = "R001";
    pub const MALFORMED_DECLARATION: &str = "R010";
    pub const PARSE: &str = "R100";
    /// 编辑重叠
    pub const CONFLICT: &str = "R200";
    pub const IO: &str = "R300";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub code: String,
    pub file_id: String,       // 用于显示的“逻辑文件名/路径”字符串
    pub span: Option<Span>,
    pub message: String,
    pub severity: Severity,
}

#[derive(Default, Clone, Debug)]
pub struct DiagSink {
    buf: Vec<Diagnostic>,
}

impl DiagSink {
    #[inline]
    pub fn new() -> Self { Self { buf: Vec::new() } }

    fn push<S: Into<String>>(&mut self, severity: Severity, code: &str, file_id: &str, span: Option<Span>, msg: S) {
        self.buf.push(Diagnostic {
            code: code.to_string(),
            file_id: file_id.to_string(),
            span,
            message: msg.into(),
            severity,
        });
    }

    pub fn error<S: Into<String>>(&mut self, code: &str, file_id: &str, span: Option<Span>, msg: S) {
        self.push(Severity::Error, code, file_id, span, msg);
    }

    pub fn warn<S: Into<String>>(&mut self, code: &str, file_id: &str, span: Option<Span>, msg: S) {
        self.push(Severity::Warning, code, file_id, span, msg);
    }

    #[inline] pub fn is_empty(&self) -> bool { self.buf.is_empty() }
    #[inline] pub fn len(&self) -> usize { self.buf.len() }
    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { self.buf.iter() }
    #[inline] pub fn into_vec(self) -> Vec<Diagnostic> { self.buf }

    pub fn has_errors(&self) -> bool {
        self.buf.iter().any(|d| d.severity == Severity::Error)
    }
}

// 便于调试/日志
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        if let Some(sp) = self.span {
            write!(f, "[{} {}] {} @{}..{}: {}", sev, self.code, self.file_id, sp.start, sp.end, self.message)
        } else {
            write!(f, "[{} {}] {}: {}", sev, self.code, self.file_id, self.message)
        }
    }
}

/* =========================
 *        源文件表
 * ========================= */

/// FileId -> (显示名, 源文本)，渲染诊断时取原文
#[derive(Default, Debug)]
pub struct SourceMap {
    files: Vec<(String, String)>,
}

impl SourceMap {
    pub fn new() -> Self { Self::default() }

    pub fn add_file(&mut self, name: String, src: String) -> FileId {
        let id = FileId(self.files.len());
        self.files.push((name, src));
        id
    }

    /// 占位：先分配 FileId，源文本稍后（仅在需要渲染诊断时）补上
    pub fn reserve(&mut self, name: String) -> FileId {
        self.add_file(name, String::new())
    }

    pub fn set_source(&mut self, id: FileId, src: String) {
        if let Some(slot) = self.files.get_mut(id.0) {
            slot.1 = src;
        }
    }

    pub fn name(&self, id: FileId) -> Option<&str> {
        self.files.get(id.0).map(|(n, _)| n.as_str())
    }

    pub fn source(&self, id: FileId) -> Option<&str> {
        self.files.get(id.0).map(|(_, s)| s.as_str())
    }

    pub fn len(&self) -> usize { self.files.len() }
    pub fn is_empty(&self) -> bool { self.files.is_empty() }
}

/// 用 ariadne 渲染诊断到 stderr；找不到原文的诊断退化为单行输出
pub fn render_diagnostics(diags: &[Diagnostic], sm: &SourceMap, colored: bool) {
    for d in diags {
        let located = d.span.and_then(|sp| {
            let src = sm.source(sp.file)?;
            (sp.end <= src.len() && !src.is_empty()).then_some((sp, src))
        });
        let Some((sp, src)) = located else {
            eprintln!("{}", d);
            continue;
        };

        let (kind, color) = match d.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
            Severity::Note => (ReportKind::Advice, Color::Cyan),
        };
        let name = d.file_id.clone();
        let range = sp.range();
        let report = Report::build(kind, (name.clone(), range.clone()))
            .with_config(Config::default().with_color(colored).with_index_type(IndexType::Byte))
            .with_code(&d.code)
            .with_message(&d.message)
            .with_label(Label::new((name.clone(), range)).with_message(&d.message).with_color(color))
            .finish();
        if report.eprint((name, Source::from(src))).is_err() {
            eprintln!("{}", d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_includes_location() {
        let mut sink = DiagSink::new();
        sink.error("R100", "A.java", Some(Span::new(FileId(0), 3, 5)), "boom");
        sink.warn("R001", "B.java", None, "hmm");
        let lines: Vec<String> = sink.iter().map(|d| d.to_string()).collect();
        assert_eq!(lines, vec!["[error R100] A.java @3..5: boom", "[warning R001] B.java: hmm"]);
        assert!(sink.has_errors());
    }

    #[test]
    fn source_map_round_trips_ids() {
        let mut sm = SourceMap::new();
        let a = sm.reserve("A.java".into());
        let b = sm.add_file("B.java".into(), "class B {}".into());
        sm.set_source(a, "class A {}".into());
        assert_eq!(sm.name(b), Some("B.java"));
        assert_eq!(sm.source(a), Some("class A {}"));
        assert_eq!(sm.len(), 2);
    }
}
