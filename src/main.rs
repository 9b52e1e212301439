// ==========================================
// 仓库波次拣货优化系统 - 命令行入口
// ==========================================
// 子命令:
//   solve <INSTANCE> <OUTPUT>     单实例求解
//   batch <INPUT_DIR> <OUTPUT_DIR> 目录内 *.txt 顺序求解 + 汇总 CSV
// 退出码: 出错时为 1
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::time::Instant;
use wave_density_optimizer::config::{ConfigManager, SolverConfig};
use wave_density_optimizer::engine::WaveOrchestrator;
use wave_density_optimizer::exporter::{
    write_batch_summary, BatchSummaryRow, RunReport, SolutionWriter,
};
use wave_density_optimizer::importer::InstanceParser;
use wave_density_optimizer::{logging, APP_NAME, VERSION};

fn cli() -> Command {
    Command::new("wave-density-optimizer")
        .about("仓库波次拣货优化: 最大化 件数/巷道数")
        .version(VERSION)
        .arg_required_else_help(true)
        .arg(arg!(--"json-log" "以 JSON 格式输出日志").global(true))
        .subcommand(
            Command::new("solve")
                .about("求解单个实例并写出解文件")
                .arg(arg!(<INSTANCE> "实例文件路径").value_parser(value_parser!(PathBuf)))
                .arg(arg!(<OUTPUT> "解文件输出路径").value_parser(value_parser!(PathBuf)))
                .arg(
                    arg!(--"time-limit" [SECS] "全局时间预算（秒）,覆盖配置文件")
                        .value_parser(value_parser!(f64)),
                )
                .arg(arg!(--config [FILE] "JSON 配置文件").value_parser(value_parser!(PathBuf)))
                .arg(arg!(--report [FILE] "JSON 运行报告输出路径").value_parser(value_parser!(PathBuf))),
        )
        .subcommand(
            Command::new("batch")
                .about("顺序求解目录内全部 *.txt 实例")
                .arg(arg!(<INPUT_DIR> "实例目录").value_parser(value_parser!(PathBuf)))
                .arg(arg!(<OUTPUT_DIR> "输出目录").value_parser(value_parser!(PathBuf)))
                .arg(
                    arg!(--"time-limit" [SECS] "每个实例的全局时间预算（秒）")
                        .value_parser(value_parser!(f64)),
                )
                .arg(arg!(--config [FILE] "JSON 配置文件").value_parser(value_parser!(PathBuf))),
        )
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    if matches.get_flag("json-log") {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", APP_NAME, VERSION);

    let result = match matches.subcommand() {
        Some(("solve", sub_m)) => run_solve(sub_m).await,
        Some(("batch", sub_m)) => run_batch(sub_m).await,
        _ => Err(anyhow!("未知子命令")),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// 读取配置文件并应用命令行覆写
fn load_config(sub_m: &ArgMatches) -> Result<SolverConfig> {
    let manager = match sub_m.get_one::<PathBuf>("config") {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new(),
    };
    let mut config = manager.resolve_solver_config()?;
    if let Some(&secs) = sub_m.get_one::<f64>("time-limit") {
        config = config.with_time_budget(secs);
        config.validate()?;
    }
    Ok(config)
}

fn required_path<'a>(sub_m: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    sub_m
        .get_one::<PathBuf>(id)
        .ok_or_else(|| anyhow!("缺少参数 {}", id))
}

async fn run_solve(sub_m: &ArgMatches) -> Result<()> {
    let instance_path = required_path(sub_m, "INSTANCE")?;
    let output_path = required_path(sub_m, "OUTPUT")?;
    let config = load_config(sub_m)?;

    let instance = InstanceParser::new().parse_file(instance_path)?;
    let orchestrator = WaveOrchestrator::with_default_solver(config);
    let result = orchestrator.run(&instance).await?;

    SolutionWriter::new().write(output_path, &result.selection)?;

    if let Some(report_path) = sub_m.get_one::<PathBuf>("report") {
        RunReport::new(
            instance_path.display().to_string(),
            orchestrator.solver_name(),
            orchestrator.config(),
            &result.outcome,
            &result.selection,
        )
        .write_json(report_path)
        .with_context(|| format!("写出运行报告失败: {}", report_path.display()))?;
    }

    Ok(())
}

/// 求解单个实例（批量模式）
async fn solve_one(
    orchestrator: &WaveOrchestrator,
    instance_path: &Path,
    output_path: &Path,
) -> Result<wave_density_optimizer::WaveSelection> {
    let instance = InstanceParser::new().parse_file(instance_path)?;
    let result = orchestrator.run(&instance).await?;
    SolutionWriter::new().write(output_path, &result.selection)?;
    Ok(result.selection)
}

/// 输出目录不得与实例目录相同（解与实例同名,会覆盖输入）
fn ensure_distinct_dirs(input_dir: &Path, output_dir: &Path) -> Result<()> {
    let input = std::fs::canonicalize(input_dir)
        .with_context(|| format!("无法解析实例目录: {}", input_dir.display()))?;
    let output = std::fs::canonicalize(output_dir)
        .with_context(|| format!("无法解析输出目录: {}", output_dir.display()))?;
    if input == output {
        bail!("输出目录与实例目录相同,会覆盖实例文件: {}", output.display());
    }
    Ok(())
}

async fn run_batch(sub_m: &ArgMatches) -> Result<()> {
    let input_dir = required_path(sub_m, "INPUT_DIR")?;
    let output_dir = required_path(sub_m, "OUTPUT_DIR")?;
    let config = load_config(sub_m)?;

    let mut instances: Vec<PathBuf> = std::fs::read_dir(input_dir)
        .with_context(|| format!("无法读取实例目录: {}", input_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext == "txt"))
        .collect();
    instances.sort();

    if instances.is_empty() {
        bail!("目录中没有 .txt 实例: {}", input_dir.display());
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;
    ensure_distinct_dirs(input_dir, output_dir)?;

    let orchestrator = WaveOrchestrator::with_default_solver(config);
    let mut rows = Vec::with_capacity(instances.len());

    for path in &instances {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let started = Instant::now();

        let row = match solve_one(&orchestrator, path, &output_dir.join(&name)).await {
            Ok(selection) => {
                BatchSummaryRow::success(&name, &selection, started.elapsed().as_millis() as u64)
            }
            Err(e) => {
                tracing::warn!(instance = %name, error = %format!("{:#}", e), "实例求解失败");
                BatchSummaryRow::failure(&name, format!("{:#}", e), started.elapsed().as_millis() as u64)
            }
        };
        rows.push(row);
    }

    let summary_path = output_dir.join("summary.csv");
    write_batch_summary(&summary_path, &rows)?;

    let failed = rows.iter().filter(|r| r.status != "OK").count();
    tracing::info!(
        total = rows.len(),
        failed,
        summary = %summary_path.display(),
        "批量运行结束"
    );

    if failed > 0 {
        bail!("{} / {} 个实例求解失败", failed, rows.len());
    }
    Ok(())
}
