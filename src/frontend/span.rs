//! 源位置信息（供 ariadne/DiagSink 使用）

use std::ops::Range;

/// 逻辑文件 ID（与 SourceMap / ariadne 的文件缓存一一对应）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

/// 半开区间 [start, end)，单位为字节偏移
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(file: FileId, start: usize, end: usize) -> Span {
        debug_assert!(start <= end, "span start after end");
        Span { file, start, end }
    }

    #[inline]
    pub fn range(&self) -> Range<usize> { self.start..self.end }

    /// 从 pest 的 span 构造
    #[inline]
    pub fn from_pest(s: pest::Span<'_>, file: FileId) -> Span {
        Span { file, start: s.start(), end: s.end() }
    }
}
