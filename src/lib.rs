//! restore-r：把反编译 Android 代码里的裸整数资源 id 换回 `R.<category>.<name>` 引用
//!
//! 流水线：
//! - frontend：Java 词法（无损 token 流）、R.java 结构解析、源文件结构扫描
//! - middle：符号表、歧义策略、只读扫描
//! - backend：编辑缓冲区与改写
//! - run：发现文件、线程池、输出

pub mod backend;
pub mod cli;
pub mod diag;
pub mod error;
pub mod frontend;
pub mod middle;
pub mod project;
pub mod run;
pub mod utils;

pub use backend::rewrite::{rewrite, RewriteOptions, RewriteResult};
pub use error::{ConflictingEditError, MalformedDeclarationError, ParseError};
pub use middle::policy::{AmbiguityPolicy, HintTable};
pub use middle::scan::{scan, ScanReport};
pub use middle::symbols::{build_symbol_table, SymbolTable};
pub use run::{run, OutputMode, RunConfig, RunSummary};
