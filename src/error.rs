// src/error.rs
//! 错误分类：
//! - MalformedDeclarationError：R.java 形状不对，整个运行无法继续
//! - ParseError：某个候选文件解析失败，跳过该文件
//! - ConflictingEditError：编辑缓冲区出现重叠编辑（内部逻辑错误），跳过该文件的写出

use std::ops::Range;

use crate::frontend::span::Span;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("`{0}` is a long literal, not an int")]
    Long(String),
    #[error("integer literal `{0}` does not fit in 32 bits")]
    OutOfRange(String),
    #[error("invalid integer literal `{0}`")]
    Invalid(String),
}

#[derive(thiserror::Error, Debug, Clone)]
pub enum MalformedDeclarationError {
    #[error("declaration file does not parse: {message}")]
    Syntax { message: String, span: Option<Span> },
    #[error("declaration file has no package statement")]
    MissingPackage,
    #[error("field `{category}.{field}` has type `{ty}`, expected `int` or `int[]`")]
    UnsupportedType { category: String, field: String, ty: String, span: Span },
    #[error("field `{category}.{field}` is not initialized with a literal integer (found `{found}`)")]
    NotLiteral { category: String, field: String, found: String, span: Span },
    #[error("field `{category}.{field}`: {source}")]
    BadLiteral {
        category: String,
        field: String,
        #[source]
        source: LiteralError,
        span: Span,
    },
    #[error("`{name}` is declared more than once")]
    Duplicate { name: String, span: Span },
    #[error("resource category `{category}` contains a nested type `{nested}`")]
    NestedCategory { category: String, nested: String, span: Span },
}

impl MalformedDeclarationError {
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. } => *span,
            Self::MissingPackage => None,
            Self::UnsupportedType { span, .. }
            | Self::NotLiteral { span, .. }
            | Self::BadLiteral { span, .. }
            | Self::Duplicate { span, .. }
            | Self::NestedCategory { span, .. } => Some(*span),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new<S: Into<String>>(message: S, span: Option<Span>) -> Self {
        Self { message: message.into(), span }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("edit over tokens {incoming:?} overlaps pending edit over tokens {existing:?}")]
pub struct ConflictingEditError {
    pub existing: Range<usize>,
    pub incoming: Range<usize>,
}

/// pest 的错误位置 -> Span
pub(crate) fn pest_error_span<R>(err: &pest::error::Error<R>, file: crate::frontend::span::FileId) -> Span {
    use pest::error::InputLocation;
    match err.location {
        InputLocation::Pos(p) => Span::new(file, p, p),
        InputLocation::Span((s, e)) => Span::new(file, s, e),
    }
}
