//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-runtime`: 运行 page-runtime 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `layout-check`: 检查演示页面的布局与配置文件

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use walkdir::WalkDir;
use xshell::{Shell, cmd};

use page_runtime::{ComponentCatalog, DiagnosticResult, PageConfig, PageLayout, analyze_layout};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "开发辅助工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行 fmt、clippy、test 门禁检查
    CheckAll,
    /// 运行 page-runtime 覆盖率报告
    CovRuntime,
    /// 运行 workspace 覆盖率报告
    CovWorkspace,
    /// 检查布局文件（layout.json）与页面配置（page.json）
    ///
    /// 不带参数时检查 demos/ 下所有同名文件
    LayoutCheck {
        /// 指定文件或目录
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    match cli.command {
        Commands::CheckAll => {
            step("cargo fmt --all -- --check");
            cmd!(sh, "cargo fmt --all -- --check").run()?;

            step("cargo clippy --workspace --all-targets");
            cmd!(sh, "cargo clippy --workspace --all-targets").run()?;

            step("cargo test --workspace");
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Commands::CovRuntime => {
            ensure_cargo_llvm_cov_available(&sh)?;

            step("cargo llvm-cov -p page-runtime --all-features --html");
            cmd!(sh, "cargo llvm-cov -p page-runtime --all-features --html").run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::CovWorkspace => {
            ensure_cargo_llvm_cov_available(&sh)?;

            // 排除 tool crate 与只能在浏览器中运行的 host-web
            step("cargo llvm-cov --workspace --exclude xtask --exclude host-web --html");
            cmd!(
                sh,
                "cargo llvm-cov --workspace --exclude xtask --exclude host-web --all-features --html"
            )
            .run()?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        Commands::LayoutCheck { path } => {
            layout_check(path.as_deref())?;
        }
    }

    Ok(())
}

fn step(name: &str) {
    eprintln!("\n==> {name}");
}

fn ensure_cargo_llvm_cov_available(sh: &Shell) -> anyhow::Result<()> {
    if cmd!(sh, "cargo llvm-cov --version").quiet().run().is_ok() {
        return Ok(());
    }
    anyhow::bail!(
        "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
    )
}

//=============================================================================
// layout-check 命令实现
//=============================================================================

/// 默认检查目录（相对于 workspace root）
const DEMOS_DIR: &str = "demos";
const LAYOUT_FILE: &str = "layout.json";
const CONFIG_FILE: &str = "page.json";

/// 检查结果
#[derive(Default)]
struct LayoutCheckResult {
    files_checked: usize,
    /// 无法读取或解析的文件数量
    load_errors: usize,
    diagnostics: DiagnosticResult,
}

fn layout_check(path: Option<&Path>) -> anyhow::Result<()> {
    let files = match path {
        Some(p) if p.is_file() => vec![p.to_path_buf()],
        Some(p) if p.is_dir() => collect_page_files(p),
        Some(p) => anyhow::bail!("路径不存在: {}", p.display()),
        None => {
            let dir = Path::new(DEMOS_DIR);
            if !dir.exists() {
                anyhow::bail!("默认目录不存在: {DEMOS_DIR}\n请在 workspace 根目录运行，或指定路径");
            }
            collect_page_files(dir)
        }
    };

    if files.is_empty() {
        eprintln!("未找到 {LAYOUT_FILE} 或 {CONFIG_FILE}");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个文件...\n", files.len());

    let catalog = ComponentCatalog::builtin();
    let mut result = LayoutCheckResult::default();
    for file in &files {
        result.files_checked += 1;
        if let Err(e) = check_file(file, &catalog, &mut result.diagnostics) {
            eprintln!("[ERROR] {}: {e:#}", file.display());
            result.load_errors += 1;
        }
    }

    print_check_result(&result);

    if result.load_errors > 0 || result.diagnostics.has_errors() {
        anyhow::bail!("布局检查发现错误");
    }
    Ok(())
}

/// 收集目录下的布局与配置文件
fn collect_page_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name();
            name == LAYOUT_FILE || name == CONFIG_FILE
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

fn check_file(
    file: &Path,
    catalog: &ComponentCatalog,
    diagnostics: &mut DiagnosticResult,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file).context("无法读取文件")?;

    if file.file_name().is_some_and(|name| name == CONFIG_FILE) {
        let config = PageConfig::from_json(&content)?;
        config.validate()?;
        return Ok(());
    }

    let layout: PageLayout = serde_json::from_str(&content).context("布局格式错误")?;
    let mut result = analyze_layout(&layout, catalog);
    let source = file.display().to_string();
    for diag in &mut result.diagnostics {
        diag.element = Some(match diag.element.take() {
            Some(element) => format!("{source} {element}"),
            None => source.clone(),
        });
    }
    diagnostics.merge(result);
    Ok(())
}

fn print_check_result(result: &LayoutCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!("检查完成: {} 个文件", result.files_checked);
    eprintln!();

    for diag in &result.diagnostics.diagnostics {
        eprintln!("{diag}");
    }

    let error_count = result.load_errors + result.diagnostics.error_count();
    let warn_count = result.diagnostics.warn_count();

    eprintln!();
    if error_count > 0 {
        eprintln!("❌ {error_count} 个错误, {warn_count} 个警告");
    } else if warn_count > 0 {
        eprintln!("⚠️  0 个错误, {warn_count} 个警告");
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
}
