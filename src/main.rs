// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process;

use restore_r::cli::{CliArgs, ColorSupport, OutputFormatter};
use restore_r::diag::{render_diagnostics, DiagSink, Severity, SourceMap};
use restore_r::project::{self, Project};
use restore_r::run::{self, RunConfig};

/// 有文件处理失败且指定了 --strict
const EXIT_PARTIAL: i32 = 2;

fn init_tracing(args: &CliArgs) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("RESTORE_R_LOG")
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// 配置文件 -> 命令行覆盖
fn load_project(args: &CliArgs) -> Result<Project> {
    let mut proj = match &args.config {
        Some(cfg) => project::load_with_config(&args.project, cfg)?,
        None => project::load_from_dir(&args.project)?,
    };
    args.apply_to(&mut proj);
    Ok(proj)
}

fn main() {
    let args = CliArgs::parse();
    init_tracing(&args);
    let fmt = OutputFormatter::new(args.quiet);

    match real_main(&args, &fmt) {
        Ok(code) => process::exit(code),
        Err(e) => {
            fmt.error(&format!("{e:#}"));
            process::exit(1);
        }
    }
}

fn real_main(args: &CliArgs, fmt: &OutputFormatter) -> Result<i32> {
    let colored = ColorSupport::detect().is_enabled();

    // 1) 载入配置
    let proj = load_project(args).context("failed to load project configuration")?;
    let Some(declaration) = proj.declaration.clone() else {
        anyhow::bail!("no R.java given; pass `-r <R.java>` or set [declaration] path in {}", project::CONFIG_FILE);
    };

    // 2) 建符号表（失败即整体失败，先把带位置的诊断渲染出来）
    let mut sm = SourceMap::new();
    let mut diags = DiagSink::new();
    let table = match run::load_symbol_table(&declaration, &mut sm, &mut diags) {
        Ok(t) => t,
        Err(e) => {
            render_diagnostics(&diags.into_vec(), &sm, colored);
            return Err(e);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.dump_table {
        fmt.dump_table(&mut out, &table).context("write table dump failed")?;
    }
    if table.is_empty() {
        fmt.warning(&format!("`{}` declares no resource ids", declaration.display()));
    }

    // 3) 处理整个工程
    let mut cfg = RunConfig::from_project(&proj, declaration);
    cfg.progress = !args.quiet && proj.overwrite && io::stderr().is_terminal();
    let summary = run::run_with_table(&cfg, &table)?;

    // 4) 诊断 -> 改写结果 -> 汇总
    if args.quiet {
        let errors: Vec<_> = summary.diagnostics.iter().filter(|d| d.severity == Severity::Error).cloned().collect();
        render_diagnostics(&errors, &summary.sources, colored);
    } else {
        render_diagnostics(&summary.diagnostics, &summary.sources, colored);
    }
    fmt.outcomes(&mut out, &summary, cfg.mode).context("write output failed")?;
    fmt.summary(&mut out, &summary).context("write summary failed")?;
    out.flush().context("flush stdout failed")?;

    Ok(if args.strict && summary.has_failures() { EXIT_PARTIAL } else { 0 })
}
