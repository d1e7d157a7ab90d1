//! 两类文件的语法树
//! - DeclarationFile：R.java（package / 外层类 / 分类内部类 / 字段）
//! - SourceUnit：任意候选源文件（token 流 + package/import 位置 + 整数字面量节点）

use std::fmt;
use crate::frontend::span::{FileId, Span};
use crate::frontend::token::TokenStream;

/* =========================
 *        R.java
 * ========================= */

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationFile {
    pub file: FileId,
    pub package: Option<Named>,
    pub imports: Vec<Named>,
    pub class: TypeDecl,
}

/// 带位置的名字（package 名、import 路径、类名……）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Named {
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub nested: Vec<TypeDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    /// 声明类型原文（`int` / `int[]` / 其它）
    pub ty: String,
    /// `int[] X` 或 `int X[]`
    pub is_array: bool,
    pub init: Initializer,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Initializer {
    Int(IntLit),
    Array(Vec<IntLit>),
    /// 既不是整数字面量也不是字面量数组，原文保留用于报错
    Other { text: String, span: Span },
}

impl Initializer {
    pub fn span(&self) -> Option<Span> {
        match self {
            Initializer::Int(lit) => Some(lit.span),
            Initializer::Array(items) => items.first().map(|l| l.span),
            Initializer::Other { span, .. } => Some(*span),
        }
    }
}

/// 未求值的整数字面量（值在建表时按 32 位解析）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntLit {
    pub text: String,
    pub negated: bool,
    pub span: Span,
}

impl fmt::Display for IntLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated { write!(f, "-{}", self.text) } else { f.write_str(&self.text) }
    }
}

/* =========================
 *        候选源文件
 * ========================= */

#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub file: FileId,
    pub tokens: TokenStream,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub literals: Vec<IntLiteral>,
}

/// `package a.b.c;`，`end` 是 `;` 之后的 token 下标
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageDecl {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub is_static: bool,
    pub wildcard: bool,
}

impl ImportDecl {
    /// 该 import 是否已经让 `<package>.R` 可见
    pub fn covers_r_of(&self, package: &str) -> bool {
        if self.is_static {
            return false;
        }
        if self.wildcard {
            self.path == package
        } else {
            self.path.strip_prefix(package).is_some_and(|rest| rest == ".R")
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntLiteral {
    /// token 下标
    pub token: usize,
    pub span: Span,
    /// 解析出的 32 位值；long / 越界字面量为 None
    pub value: Option<i32>,
    pub context: LiteralContext,
}

/// 字面量所处的语法环境，交给歧义策略使用
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiteralContext {
    /// 最内层调用的方法名，例如 `findViewById(...)` 中的 `findViewById`
    pub callee: Option<String>,
    /// 作为数组初始化器 `{a, b, c}` 第 i 个元素出现
    pub array_index: Option<usize>,
    /// 前面紧跟一元负号
    pub negated: bool,
}
