// src/project.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::middle::policy::HintTable;

/// 工程根目录下的可选配置文件名
pub const CONFIG_FILE: &str = "restore-r.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RestoreToml {
    #[serde(default)]
    declaration: DeclarationTable,
    #[serde(default)]
    rewrite: RewriteTable,
    /// [hints] findViewById = "id"
    #[serde(default)]
    hints: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclarationTable {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RewriteTable {
    #[serde(default)]
    add_import: Option<bool>,
    #[serde(default)]
    qualify: Option<bool>,
    #[serde(default)]
    overwrite: Option<bool>,
    #[serde(default)]
    extensions: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
    #[serde(default)]
    threads: Option<usize>,
}

/// 工程配置（restore-r.toml 与默认值合并后的结果；命令行参数再覆盖它）
#[derive(Debug, Clone)]
pub struct Project {
    /// 工程根目录（被扫描的目录）
    pub root: PathBuf,
    /// R.java 的位置（相对路径以 root 为基准）
    pub declaration: Option<PathBuf>,
    pub add_import: bool,
    pub qualify: bool,
    pub overwrite: bool,
    /// 不带点的扩展名，默认 ["java"]
    pub extensions: Vec<String>,
    /// 按文件名排除，默认 ["R.java"]
    pub exclude: Vec<String>,
    /// 0 = rayon 默认线程数
    pub threads: usize,
    pub hints: HintTable,
}

impl Project {
    pub fn with_defaults(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            declaration: None,
            add_import: false,
            qualify: false,
            overwrite: false,
            extensions: vec!["java".to_string()],
            exclude: vec!["R.java".to_string()],
            threads: 0,
            hints: HintTable::default(),
        }
    }

    fn apply(&mut self, cfg: RestoreToml) {
        if let Some(p) = cfg.declaration.path.filter(|p| !p.trim().is_empty()) {
            self.declaration = Some(self.root.join(p));
        }
        let rw = cfg.rewrite;
        if let Some(v) = rw.add_import { self.add_import = v; }
        if let Some(v) = rw.qualify { self.qualify = v; }
        if let Some(v) = rw.overwrite { self.overwrite = v; }
        if let Some(v) = rw.extensions {
            self.extensions = v.into_iter().map(|e| normalize_extension(&e)).filter(|e| !e.is_empty()).collect();
        }
        if let Some(v) = rw.exclude { self.exclude = v; }
        if let Some(v) = rw.threads { self.threads = v; }
        // 用户提示覆盖同名默认项
        for (method, category) in cfg.hints {
            self.hints.insert(method, category);
        }
    }
}

/// 从指定目录加载工程：
/// - 读取 <root>/restore-r.toml（可选）
/// - 文件不存在：完全默认
/// - 解析失败：警告并使用默认值
pub fn load_from_dir(root: &Path) -> Result<Project> {
    let mut proj = Project::with_defaults(root);
    let path = root.join(CONFIG_FILE);
    let Ok(s) = fs::read_to_string(&path) else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(proj);
    };
    match toml::from_str::<RestoreToml>(&s) {
        Ok(cfg) => proj.apply(cfg),
        Err(e) => tracing::warn!("parse `{}` as TOML failed, using defaults: {e}", path.display()),
    }
    Ok(proj)
}

/// 用显式给出的配置文件加载；文件必须存在，内容不合法时同样退回默认值
pub fn load_with_config(root: &Path, config: &Path) -> Result<Project> {
    let mut proj = Project::with_defaults(root);
    let s = fs::read_to_string(config)
        .with_context(|| format!("read config `{}` failed", config.display()))?;
    match toml::from_str::<RestoreToml>(&s) {
        Ok(cfg) => proj.apply(cfg),
        Err(e) => tracing::warn!("parse `{}` as TOML failed, using defaults: {e}", config.display()),
    }
    Ok(proj)
}

fn normalize_extension(s: &str) -> String {
    s.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_config_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = load_from_dir(dir.path()).unwrap();
        assert_eq!(p.extensions, vec!["java"]);
        assert_eq!(p.exclude, vec!["R.java"]);
        assert_eq!(p.threads, 0);
        assert!(!p.add_import && !p.qualify && !p.overwrite);
        assert!(p.declaration.is_none());
        assert_eq!(p.hints.category_for("findViewById"), Some("id"));
    }

    #[test]
    fn config_overrides_defaults_and_extends_hints() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[declaration]
path = "gen/com/example/R.java"

[rewrite]
add_import = true
extensions = [".java", "KT"]
exclude = ["R.java", "BuildConfig.java"]
threads = 3

[hints]
bindIcon = "drawable"
findViewById = "layout"
"#,
        )
        .unwrap();
        let p = load_from_dir(dir.path()).unwrap();
        assert_eq!(p.declaration, Some(dir.path().join("gen/com/example/R.java")));
        assert!(p.add_import);
        assert!(!p.qualify);
        assert_eq!(p.extensions, vec!["java", "kt"]);
        assert_eq!(p.exclude, vec!["R.java", "BuildConfig.java"]);
        assert_eq!(p.threads, 3);
        assert_eq!(p.hints.category_for("bindIcon"), Some("drawable"));
        assert_eq!(p.hints.category_for("findViewById"), Some("layout"));
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[rewrite]\nthreads = \"many\"\n").unwrap();
        let p = load_from_dir(dir.path()).unwrap();
        assert_eq!(p.threads, 0);

        fs::write(dir.path().join(CONFIG_FILE), "[rewrite]\nbogus = 1\n").unwrap();
        let p = load_from_dir(dir.path()).unwrap();
        assert_eq!(p.extensions, vec!["java"]);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_with_config(dir.path(), &dir.path().join("nope.toml")).is_err());
    }
}
