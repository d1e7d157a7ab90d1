// src/cli/progress.rs
use std::io::{self, Write};
use std::time::Instant;
use crate::cli::colors::{ColorSupport, ansi};

/// 彩色进度条，画在 stderr 上，不干扰 stdout 上的改写结果
pub struct ProgressBar {
    width: usize,
    current: usize,
    total: usize,
    label: String,
    start_time: Instant,
    color_support: ColorSupport,
}

impl ProgressBar {
    pub fn new(width: usize, total: usize, label: String) -> Self {
        Self {
            width,
            current: 0,
            total,
            label,
            start_time: Instant::now(),
            color_support: ColorSupport::detect(),
        }
    }

    /// 完成一个文件
    pub fn inc(&mut self) {
        self.current = (self.current + 1).min(self.total);
        self.render();
    }

    fn render(&self) {
        if self.total == 0 {
            return;
        }
        let line = self.line();
        let mut err = io::stderr().lock();
        // 进度条写失败不影响结果
        let _ = write!(err, "\r{}", line);
        let _ = err.flush();
    }

    fn line(&self) -> String {
        let progress = (self.current as f64 / self.total as f64).min(1.0);
        let filled = (progress * self.width as f64) as usize;
        let colored = self.color_support.is_enabled();

        let mut bar = String::with_capacity(self.width * 10);
        for i in 0..self.width {
            let (ch, color) = if i < filled {
                ('=', ansi::GREEN)
            } else if i == filled {
                ('>', ansi::CYAN)
            } else {
                ('-', ansi::BRIGHT_BLACK)
            };
            if colored {
                bar.push_str(color);
                bar.push(ch);
                bar.push_str(ansi::RESET);
            } else {
                bar.push(ch);
            }
        }

        if colored {
            format!(
                "{}{}{} {} {}{}/{}{}",
                ansi::BOLD, self.label, ansi::RESET, bar, ansi::BLUE, self.current, self.total, ansi::RESET
            )
        } else {
            format!("{} {} {}/{}", self.label, bar, self.current, self.total)
        }
    }

    pub fn finish(&self) {
        if self.total == 0 {
            return;
        }
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut err = io::stderr().lock();
        let _ = if self.color_support.is_enabled() {
            writeln!(err, "\n{}{} completed in {:.2}s{}", ansi::GREEN, self.label, elapsed, ansi::RESET)
        } else {
            writeln!(err, "\n{} completed in {:.2}s", self.label, elapsed)
        };
    }
}
