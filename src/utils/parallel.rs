//! 并行处理工具模块
//! 使用 Rayon 在固定大小的线程池里逐文件处理

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 构建线程池；`threads == 0` 时交给 rayon 按 CPU 数决定
pub fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("restore-r-{i}"))
        .build()
        .with_context(|| format!("failed to build a thread pool with {threads} threads"))
}

/// 在线程池里并行处理每个文件，结果与 `files` 顺序一一对应
///
/// 闭包拿到文件下标和路径；任务之间不共享可变状态。
pub fn process_files_parallel<T, F>(pool: &rayon::ThreadPool, files: &[PathBuf], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &Path) -> T + Sync,
{
    pool.install(|| {
        files
            .par_iter()
            .enumerate()
            .map(|(i, path)| f(i, path))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_keep_input_order() {
        let pool = build_pool(4).unwrap();
        let files: Vec<PathBuf> = (0..64).map(|i| PathBuf::from(format!("f{i}.java"))).collect();
        let out = process_files_parallel(&pool, &files, |i, p| format!("{i}:{}", p.display()));
        assert_eq!(out.len(), 64);
        assert_eq!(out[0], "0:f0.java");
        assert_eq!(out[63], "63:f63.java");
    }

    #[test]
    fn zero_threads_uses_default() {
        let pool = build_pool(0).unwrap();
        assert!(pool.current_num_threads() >= 1);
    }
}
