// ==========================================
// 仓库波次拣货优化系统 - 解文件写出器
// ==========================================
// 格式:
//   订单数
//   订单标识（升序,每行一个）
//   巷道数
//   巷道标识（升序,每行一个）
// ==========================================

use crate::domain::WaveSelection;
use crate::exporter::error::{ExportError, ExportResult};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionWriter;

impl SolutionWriter {
    pub fn new() -> Self {
        Self
    }

    /// 渲染为解文件文本
    pub fn render(&self, selection: &WaveSelection) -> String {
        let mut orders = selection.orders.clone();
        orders.sort_unstable();
        let mut aisles = selection.aisles.clone();
        aisles.sort_unstable();

        let mut out = String::new();
        let _ = writeln!(out, "{}", orders.len());
        for id in &orders {
            let _ = writeln!(out, "{}", id);
        }
        let _ = writeln!(out, "{}", aisles.len());
        for id in &aisles {
            let _ = writeln!(out, "{}", id);
        }
        out
    }

    /// 写出解文件（父目录不存在时自动创建）
    pub fn write(&self, path: impl AsRef<Path>, selection: &WaveSelection) -> ExportResult<()> {
        let path = path.as_ref();
        let to_err = |source| ExportError::FileWriteError {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(to_err)?;
        }
        std::fs::write(path, self.render(selection)).map_err(to_err)?;

        info!(
            path = %path.display(),
            orders = selection.orders.len(),
            aisles = selection.aisles.len(),
            "解文件已写出"
        );
        Ok(())
    }
}
