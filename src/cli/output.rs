// src/cli/output.rs
use std::io::{self, Write};

use crate::cli::colors::{ColorSupport, ansi};
use crate::run::{OutputMode, RunSummary};
use crate::middle::symbols::SymbolTable;

/// 输出格式化器：改写结果与汇总写 stdout，失败与提示写 stderr
pub struct OutputFormatter {
    color_support: ColorSupport,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self { color_support: ColorSupport::detect(), quiet }
    }

    /// `0X7F0A0012 = id.button_send`
    pub fn dump_table(&self, out: &mut impl Write, table: &SymbolTable) -> io::Result<()> {
        for line in table.dump() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// 每个被改写的文件一行 `Processed <path>`；Print 模式下紧跟改写后的全文
    pub fn outcomes(&self, out: &mut impl Write, summary: &RunSummary, mode: OutputMode) -> io::Result<()> {
        for f in &summary.rewritten {
            if mode == OutputMode::Overwrite && self.quiet {
                continue;
            }
            writeln!(out, "Processed {}", f.path.display())?;
            if let Some(text) = &f.text {
                write!(out, "{}", text)?;
                if !text.ends_with('\n') {
                    writeln!(out)?;
                }
            }
        }
        Ok(())
    }

    /// 汇总行；有失败时再列出失败文件
    pub fn summary(&self, out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
        writeln!(out, "{}", Self::totals_line(summary))?;
        if summary.failures.is_empty() {
            return Ok(());
        }
        let mut err = io::stderr().lock();
        let header = format!("{} file(s) could not be processed:", summary.failures.len());
        if self.color_support.is_enabled() {
            writeln!(err, "{}{}{}", ansi::RED, header, ansi::RESET)?;
        } else {
            writeln!(err, "{}", header)?;
        }
        for f in &summary.failures {
            writeln!(err, "  {}: {}", f.path.display(), f.message)?;
        }
        Ok(())
    }

    pub fn totals_line(summary: &RunSummary) -> String {
        format!(
            "Replaced {} hex values in {} files.",
            summary.replacements,
            summary.files_changed()
        )
    }

    pub fn error(&self, message: &str) {
        if self.color_support.is_enabled() {
            eprintln!("{}error:{} {}", ansi::RED, ansi::RESET, message);
        } else {
            eprintln!("error: {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color_support.is_enabled() {
            eprintln!("{}warning:{} {}", ansi::YELLOW, ansi::RESET, message);
        } else {
            eprintln!("warning: {}", message);
        }
    }
}
