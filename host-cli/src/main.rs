//! # page-sim
//!
//! 展示页交互模拟器：在无头页面上回放事件场景，输出指令轨迹和最终状态。
//!
//! ## 用法
//!
//! ```bash
//! # 回放场景（页面布局与场景均为 JSON）
//! cargo run -p host-cli -- run --layout demos/showcase/layout.json --scenario demos/showcase/scenario.json
//! cargo run -p host-cli -- run --layout L --scenario S --config page.json --seed 42 --state
//!
//! # 查看组件目录
//! cargo run -p host-cli -- catalog
//! cargo run -p host-cli -- catalog --id servo
//!
//! # 检查页面布局
//! cargo run -p host-cli -- check --layout demos/showcase/layout.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use host_headless::{PageHarness, Scenario, load_page_config};
use page_runtime::{ComponentCatalog, PageConfig, PageController, PageLayout, analyze_layout};

#[derive(Parser)]
#[command(name = "page-sim")]
#[command(about = "展示页交互模拟器 - 在无头页面上回放事件场景")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 回放场景
    Run {
        /// 页面布局 JSON
        #[arg(long)]
        layout: PathBuf,

        /// 场景 JSON（步骤数组）
        #[arg(long)]
        scenario: PathBuf,

        /// 页面配置 JSON（缺失或无效时使用默认配置）
        #[arg(long)]
        config: Option<PathBuf>,

        /// 组件目录 JSON（默认：内置目录）
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// 粒子随机种子（覆盖配置）
        #[arg(long)]
        seed: Option<u64>,

        /// 回放结束后输出状态快照
        #[arg(long)]
        state: bool,
    },

    /// 列出组件目录，或输出单个组件渲染后的 HTML
    Catalog {
        /// 组件标识
        #[arg(long)]
        id: Option<String>,

        /// 组件目录 JSON（默认：内置目录）
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// 检查页面布局
    Check {
        /// 页面布局 JSON
        #[arg(long)]
        layout: PathBuf,

        /// 组件目录 JSON（默认：内置目录）
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = real_main(cli) {
        eprintln!("page-sim error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run {
            layout,
            scenario,
            config,
            catalog,
            seed,
            state,
        } => {
            let mut config = match config {
                Some(path) => load_page_config(&path),
                None => PageConfig::default(),
            };
            if seed.is_some() {
                config.particles.seed = seed;
            }
            run_scenario(
                &read_layout(&layout)?,
                &read_scenario(&scenario)?,
                config,
                read_catalog(catalog.as_deref())?,
                state,
            )
        }
        Commands::Catalog { id, catalog } => {
            print_catalog(&read_catalog(catalog.as_deref())?, id.as_deref())
        }
        Commands::Check { layout, catalog } => {
            check_layout(&read_layout(&layout)?, &read_catalog(catalog.as_deref())?)
        }
    }
}

//=============================================================================
// 输入文件
//=============================================================================

fn read_layout(path: &Path) -> anyhow::Result<PageLayout> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取布局文件 {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("布局文件格式错误 {}", path.display()))
}

fn read_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取场景文件 {}", path.display()))?;
    Scenario::from_json(&content).with_context(|| format!("场景文件格式错误 {}", path.display()))
}

fn read_catalog(path: Option<&Path>) -> anyhow::Result<ComponentCatalog> {
    let Some(path) = path else {
        return Ok(ComponentCatalog::builtin());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取组件目录 {}", path.display()))?;
    ComponentCatalog::from_json(&content)
        .with_context(|| format!("组件目录无效 {}", path.display()))
}

//=============================================================================
// 子命令
//=============================================================================

fn run_scenario(
    layout: &PageLayout,
    scenario: &Scenario,
    config: PageConfig,
    catalog: ComponentCatalog,
    print_state: bool,
) -> anyhow::Result<()> {
    let controller = PageController::new(config, catalog);
    let mut harness = PageHarness::new(controller, layout.clone());
    let report = scenario.run(&mut harness).context("场景回放失败")?;

    for entry in &report.trace {
        println!("{entry}");
    }
    eprintln!(
        "\n回放完成: {} 步, {} 条指令, 虚拟时间 {}ms",
        scenario.steps.len(),
        report.trace.len(),
        report.elapsed_ms
    );
    if harness.skipped_commands() > 0 {
        eprintln!("⚠️  {} 条指令因目标元素不存在被跳过", harness.skipped_commands());
    }

    if print_state {
        let snapshot = serde_json::json!({
            "state": report.state,
            "dom": report.dom,
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

fn print_catalog(catalog: &ComponentCatalog, id: Option<&str>) -> anyhow::Result<()> {
    match id {
        Some(id) => {
            let entry = catalog
                .get(id)
                .with_context(|| format!("组件目录中没有 '{id}'"))?;
            println!("{}", entry.content.render_html());
        }
        None => {
            for entry in catalog.entries() {
                println!("{:<14} {}", entry.key, entry.title);
            }
        }
    }
    Ok(())
}

fn check_layout(layout: &PageLayout, catalog: &ComponentCatalog) -> anyhow::Result<()> {
    let result = analyze_layout(layout, catalog);
    for diag in &result.diagnostics {
        eprintln!("{diag}");
    }

    eprintln!();
    if result.has_errors() {
        anyhow::bail!(
            "{} 个错误, {} 个警告",
            result.error_count(),
            result.warn_count()
        );
    } else if result.warn_count() > 0 {
        eprintln!("⚠️  0 个错误, {} 个警告", result.warn_count());
    } else {
        eprintln!("✅ 检查通过，无错误");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "page-sim",
            "run",
            "--layout",
            "layout.json",
            "--scenario",
            "scenario.json",
            "--seed",
            "42",
            "--state",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run {
            seed, state, config, ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(seed, Some(42));
        assert!(state);
        assert!(config.is_none());
    }

    #[test]
    fn test_run_requires_scenario() {
        assert!(Cli::try_parse_from(["page-sim", "run", "--layout", "l.json"]).is_err());
    }

    #[test]
    fn test_unknown_catalog_id() {
        let err = print_catalog(&ComponentCatalog::builtin(), Some("jetpack")).unwrap_err();
        assert!(err.to_string().contains("jetpack"));
    }

    #[test]
    fn test_check_layout_reports_missing_required() {
        let catalog = ComponentCatalog::builtin();
        assert!(check_layout(&PageLayout::showcase(), &catalog).is_ok());
        assert!(check_layout(&PageLayout::default(), &catalog).is_err());
    }
}
