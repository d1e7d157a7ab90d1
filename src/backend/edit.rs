//! 编辑缓冲区：建立在不可变 token 流上的一组有序、互不重叠的文本编辑
//!
//! - 替换：token 区间 [start, end) 换成新文本
//! - 插入：空区间 [p, p)，新文本放在第 p 个 token 之前
//! 重叠的编辑在加入时立即报错，不会静默丢弃其中一个。

use std::ops::Range;

use crate::error::ConflictingEditError;
use crate::frontend::token::TokenStream;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub tokens: Range<usize>,
    pub text: String,
}

impl Edit {
    #[inline]
    pub fn is_insert(&self) -> bool { self.tokens.is_empty() }

    /// 两个编辑是否作用在同一段 token 上。
    /// 同一位置的两个插入不算冲突（按加入顺序输出）；插入落在替换区间内部算冲突。
    fn overlaps(&self, other: &Range<usize>) -> bool {
        let a = &self.tokens;
        let b = other;
        match (a.is_empty(), b.is_empty()) {
            (true, true) => false,
            (true, false) => b.start < a.start && a.start < b.end,
            (false, true) => a.start < b.start && b.start < a.end,
            (false, false) => a.start < b.end && b.start < a.end,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    /// 始终按 (start, 插入在前) 有序
    edits: Vec<Edit>,
    token_count: usize,
}

impl EditBuffer {
    pub fn new(tokens: &TokenStream) -> Self {
        Self { edits: Vec::new(), token_count: tokens.len() }
    }

    #[inline] pub fn len(&self) -> usize { self.edits.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.edits.is_empty() }
    #[inline] pub fn edits(&self) -> &[Edit] { &self.edits }

    /// 把 token 区间 [start, end) 替换为 `text`
    pub fn replace<S: Into<String>>(&mut self, tokens: Range<usize>, text: S) -> Result<(), ConflictingEditError> {
        debug_assert!(tokens.start < tokens.end, "replace needs a non-empty token range");
        self.add(Edit { tokens, text: text.into() })
    }

    /// 在第 `before` 个 token 之前插入 `text`（`before == len` 表示追加到末尾）
    pub fn insert_before<S: Into<String>>(&mut self, before: usize, text: S) -> Result<(), ConflictingEditError> {
        self.add(Edit { tokens: before..before, text: text.into() })
    }

    fn add(&mut self, edit: Edit) -> Result<(), ConflictingEditError> {
        assert!(
            edit.tokens.end <= self.token_count,
            "edit {:?} is outside the token stream (len {})",
            edit.tokens,
            self.token_count
        );
        if let Some(existing) = self.edits.iter().find(|e| e.overlaps(&edit.tokens)) {
            return Err(ConflictingEditError {
                existing: existing.tokens.clone(),
                incoming: edit.tokens,
            });
        }
        // 插入排在同一起点的替换之前；同类按加入顺序
        let key = |e: &Edit| (e.tokens.start, !e.is_insert());
        let pos = self.edits.partition_point(|e| key(e) <= key(&edit));
        self.edits.insert(pos, edit);
        Ok(())
    }

    /// 回放 token 流：被编辑的区间换成新文本，其余 token（含空白与注释）原样输出
    pub fn materialize(&self, tokens: &TokenStream) -> String {
        debug_assert_eq!(tokens.len(), self.token_count, "edit buffer belongs to another token stream");
        if self.edits.is_empty() {
            return tokens.source().to_string();
        }

        let extra: usize = self.edits.iter().map(|e| e.text.len()).sum();
        let mut out = String::with_capacity(tokens.source().len() + extra);
        let mut cursor = 0usize;
        for e in &self.edits {
            out.push_str(tokens.text_of(cursor, e.tokens.start));
            out.push_str(&e.text);
            cursor = cursor.max(e.tokens.end);
        }
        out.push_str(tokens.text_of(cursor, tokens.len()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::lex;
    use crate::frontend::span::FileId;
    use pretty_assertions::assert_eq;

    fn stream(src: &str) -> TokenStream {
        lex(src, FileId(0)).unwrap()
    }

    #[test]
    fn no_edits_is_byte_identical() {
        let ts = stream("a  /* x */ b;\r\n");
        let buf = EditBuffer::new(&ts);
        assert_eq!(buf.materialize(&ts), "a  /* x */ b;\r\n");
    }

    #[test]
    fn replaces_and_inserts_in_order() {
        // tokens: f ( 1 , 2 ) ;
        let ts = stream("f(1,2);");
        let mut buf = EditBuffer::new(&ts);
        buf.replace(4..5, "TWO").unwrap();
        buf.replace(2..3, "ONE").unwrap();
        buf.insert_before(0, "// hi\n").unwrap();
        buf.insert_before(ts.len(), "\n").unwrap();
        assert_eq!(buf.materialize(&ts), "// hi\nf(ONE,TWO);\n");
    }

    #[test]
    fn insert_before_a_replacement_at_the_same_token() {
        let ts = stream("x y");
        let mut buf = EditBuffer::new(&ts);
        buf.replace(2..3, "Y").unwrap();
        buf.insert_before(2, "+").unwrap();
        assert_eq!(buf.materialize(&ts), "x +Y");
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let ts = stream("a b c d");
        let mut buf = EditBuffer::new(&ts);
        buf.replace(2..5, "X").unwrap();
        let err = buf.replace(4..6, "Y").unwrap_err();
        assert_eq!(err, ConflictingEditError { existing: 2..5, incoming: 4..6 });
        assert!(buf.insert_before(3, "!").is_err());
        // 紧挨着不算重叠
        buf.replace(5..6, "Z").unwrap();
        buf.insert_before(2, "<").unwrap();
        assert_eq!(buf.materialize(&ts), "a <XZd");
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn same_range_twice_is_a_conflict() {
        let ts = stream("a");
        let mut buf = EditBuffer::new(&ts);
        buf.replace(0..1, "b").unwrap();
        assert!(buf.replace(0..1, "c").is_err());
    }
}
