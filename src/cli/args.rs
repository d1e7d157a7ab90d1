// src/cli/args.rs
// 命令行参数解析

use std::path::PathBuf;

use clap::Parser;

use crate::project::Project;

/// Restore R values in decompiled Android code
#[derive(Parser, Debug, Clone)]
#[command(name = "restore-r")]
#[command(version)]
pub struct CliArgs {
    /// Location of the generated R.java
    #[arg(short = 'r', long = "r-file", value_name = "R_JAVA")]
    pub r_file: Option<PathBuf>,

    /// Root directory of the Android project to rewrite
    #[arg(short = 'p', long = "project", value_name = "DIR")]
    pub project: PathBuf,

    /// Add `import <package>.R;` to files that get rewritten
    #[arg(short = 'i', long = "add-import")]
    pub add_import: bool,

    /// Overwrite the source files instead of printing them
    #[arg(long)]
    pub overwrite: bool,

    /// Write `<package>.R.<category>.<name>` instead of `R.<category>.<name>`
    #[arg(long)]
    pub qualify: bool,

    /// Worker threads (0 = one per CPU)
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Config file to use instead of `<project>/restore-r.toml`
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print every value -> name mapping of the symbol table before rewriting
    #[arg(long)]
    pub dump_table: bool,

    /// Exit with status 2 when any file could not be processed
    #[arg(long)]
    pub strict: bool,

    /// Only print rewritten text and the final summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// 命令行开关覆盖配置文件；开关只能打开，不能关掉配置里已打开的项
    pub fn apply_to(&self, proj: &mut Project) {
        if let Some(r) = &self.r_file {
            proj.declaration = Some(r.clone());
        }
        proj.add_import |= self.add_import;
        proj.overwrite |= self.overwrite;
        proj.qualify |= self.qualify;
        if let Some(n) = self.threads {
            proj.threads = n;
        }
    }

    /// 默认日志级别；`RESTORE_R_LOG` 设置时以它为准
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, 0) => "error",
            (_, 0) => "warn",
            (_, 1) => "info",
            (_, 2) => "debug",
            _ => "trace",
        }
    }
}
