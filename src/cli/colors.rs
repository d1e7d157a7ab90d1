// src/cli/colors.rs
use std::env;
use std::io::IsTerminal;

/// 颜色支持检测
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSupport {
    Enabled,
    Disabled,
}

impl ColorSupport {
    /// 检测 stderr 是否适合彩色输出（诊断、进度条、汇总都写到 stderr）
    pub fn detect() -> Self {
        Self::from_env(
            env::var("NO_COLOR").ok().as_deref(),
            env::var("FORCE_COLOR").ok().as_deref(),
            env::var("TERM").ok().as_deref(),
            std::io::stderr().is_terminal(),
        )
    }

    fn from_env(no_color: Option<&str>, force: Option<&str>, term: Option<&str>, tty: bool) -> Self {
        if no_color.is_some() {
            return Self::Disabled;
        }
        if let Some(force) = force {
            return if force == "0" { Self::Disabled } else { Self::Enabled };
        }
        if term == Some("dumb") || !tty {
            return Self::Disabled;
        }
        Self::Enabled
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// ANSI 颜色代码
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BRIGHT_BLACK: &str = "\x1b[90m";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_switches() {
        assert_eq!(ColorSupport::from_env(Some(""), Some("1"), None, true), ColorSupport::Disabled);
        assert_eq!(ColorSupport::from_env(None, Some("1"), Some("dumb"), false), ColorSupport::Enabled);
        assert_eq!(ColorSupport::from_env(None, Some("0"), None, true), ColorSupport::Disabled);
        assert_eq!(ColorSupport::from_env(None, None, Some("dumb"), true), ColorSupport::Disabled);
        assert_eq!(ColorSupport::from_env(None, None, Some("xterm"), false), ColorSupport::Disabled);
        assert_eq!(ColorSupport::from_env(None, None, Some("xterm"), true), ColorSupport::Enabled);
    }
}
