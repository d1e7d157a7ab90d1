//! 扫描：只读遍历一个文件的整数字面量，统计会被替换的个数
//!
//! 改写阶段调用同一个 `classify`，两遍对“什么算命中”不可能出现分歧。

use crate::diag::{codes, DiagSink};
use crate::frontend::ast::{IntLiteral, SourceUnit};
use crate::frontend::span::Span;
use crate::middle::policy::AmbiguityPolicy;
use crate::middle::symbols::ResourceEntry;

/// 一个被判定为资源引用的字面量
#[derive(Clone, Debug)]
pub struct Classified<'u, 't> {
    pub literal: &'u IntLiteral,
    pub entry: &'t ResourceEntry,
    pub ambiguous: bool,
    /// 歧义时的全部候选名（声明顺序）
    pub candidates: Vec<&'t str>,
}

/// 同一个值命中多个声明时的诊断信息
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ambiguity {
    pub span: Span,
    pub value: i32,
    pub chosen: String,
    pub candidates: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub count: usize,
    pub ambiguities: Vec<Ambiguity>,
}

impl ScanReport {
    /// 把歧义写成 warning 诊断
    pub fn report_to(&self, file_name: &str, diags: &mut DiagSink) {
        for a in &self.ambiguities {
            diags.warn(
                codes::AMBIGUOUS,
                file_name,
                Some(a.span),
                format!(
                    "0x{:08X} matches {}; using `{}`",
                    a.value as u32,
                    a.candidates.join(", "),
                    a.chosen
                ),
            );
        }
    }
}

/// 对文件里每个整数字面量调用歧义策略，按出现顺序返回命中的那些
pub fn classify<'u, 't>(unit: &'u SourceUnit, policy: &AmbiguityPolicy<'t>) -> Vec<Classified<'u, 't>> {
    unit.literals
        .iter()
        .filter_map(|lit| {
            let r = policy.resolve(lit.value, &lit.context);
            let entry = r.entry?;
            let candidates = if r.ambiguous {
                r.candidates.iter().map(|e| e.qualified_name.as_str()).collect()
            } else {
                Vec::new()
            };
            Some(Classified { literal: lit, entry, ambiguous: r.ambiguous, candidates })
        })
        .collect()
}

/// 只读扫描，不修改 token 流；同一输入多次运行结果相同
pub fn scan(unit: &SourceUnit, policy: &AmbiguityPolicy<'_>) -> ScanReport {
    let hits = classify(unit, policy);
    let ambiguities = hits
        .iter()
        .filter(|c| c.ambiguous)
        .map(|c| Ambiguity {
            span: c.literal.span,
            value: c.entry.value,
            chosen: c.entry.qualified_name.clone(),
            candidates: c.candidates.iter().map(|s| s.to_string()).collect(),
        })
        .collect();
    ScanReport { count: hits.len(), ambiguities }
}
