//! 无损 token 流：token 首尾相接覆盖整个源文本，回放即可得到原文

use crate::frontend::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Bom,
    Whitespace,
    LineComment,
    BlockComment,
    Str,
    TextBlock,
    Char,
    Int,
    Float,
    Ident,
    Punct,
    Unknown,
}

impl TokenKind {
    /// BOM、空白与注释：结构分析时跳过，回放时原样保留
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Bom | TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct TokenStream {
    source: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    pub(crate) fn new(source: String, tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.windows(2).all(|w| w[0].span.end == w[1].span.start),
            "token stream must be contiguous"
        );
        debug_assert_eq!(tokens.last().map_or(0, |t| t.span.end), source.len());
        Self { source, tokens }
    }

    #[inline] pub fn source(&self) -> &str { &self.source }
    #[inline] pub fn len(&self) -> usize { self.tokens.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.tokens.is_empty() }
    #[inline] pub fn tokens(&self) -> &[Token] { &self.tokens }

    #[inline]
    pub fn kind(&self, i: usize) -> TokenKind { self.tokens[i].kind }

    #[inline]
    pub fn text(&self, i: usize) -> &str {
        &self.source[self.tokens[i].span.range()]
    }

    /// token 区间 [start, end) 对应的原文
    pub fn text_of(&self, start: usize, end: usize) -> &str {
        if start >= end {
            return "";
        }
        let from = self.tokens[start].span.start;
        let to = self.tokens[end - 1].span.end;
        &self.source[from..to]
    }

    /// 非 trivia token 的下标序列
    pub fn significant(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect()
    }
}
