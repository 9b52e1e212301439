// ==========================================
// 仓库波次拣货优化系统 - 实例文件解析器
// ==========================================
// 格式:
//   第 1 行: 订单数 o  物料数 i  巷道数 a
//   o 行订单: k item qty item qty ...
//   a 行巷道: l item qty item qty ...
//   末行: 波次下限 LB  上限 UB（按总件数计）
// 说明: 空行忽略；订单/巷道标识即其出现顺序（从 0 开始）
// ==========================================

use crate::domain::{Aisle, Instance, ItemId, Order, WaveBounds, WaveSizeMeasure};
use crate::importer::error::{ParseError, ParseResult};
use crate::perf::PerfGuard;
use std::path::Path;
use tracing::{debug, info};

/// 一行非空文本及其行号
struct NumberedLine<'a> {
    number: usize,
    text: &'a str,
}

impl<'a> NumberedLine<'a> {
    fn integers(&self) -> ParseResult<Vec<usize>> {
        self.text
            .split_whitespace()
            .map(|token| {
                token.parse::<usize>().map_err(|_| ParseError::InvalidInteger {
                    line: self.number,
                    token: token.to_string(),
                })
            })
            .collect()
    }
}

// ==========================================
// InstanceParser - 实例解析器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceParser {
    measure: WaveSizeMeasure,
}

impl InstanceParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定波次规模口径（文件格式本身按件数计）
    pub fn with_measure(measure: WaveSizeMeasure) -> Self {
        Self { measure }
    }

    /// 解析实例文件
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseResult<Instance> {
        let _perf = PerfGuard::new("parse_instance");
        let path = path.as_ref();
        if !path.exists() {
            return Err(ParseError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::FileReadError {
            path: path.display().to_string(),
            source,
        })?;

        let instance = self.parse_str(&content)?;
        info!(
            path = %path.display(),
            orders = instance.orders().len(),
            items = instance.num_items(),
            aisles = instance.aisles().len(),
            wave_min = instance.bounds().min,
            wave_max = instance.bounds().max,
            "实例文件解析完成"
        );
        Ok(instance)
    }

    /// 解析实例文本
    pub fn parse_str(&self, content: &str) -> ParseResult<Instance> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(idx, text)| NumberedLine {
                number: idx + 1,
                text: text.trim(),
            })
            .filter(|l| !l.text.is_empty());

        // 1. 表头
        let header = lines.next().ok_or(ParseError::MissingHeader)?;
        let counts = header.integers()?;
        if counts.len() != 3 {
            return Err(ParseError::MalformedHeader {
                line: header.number,
                found: counts.len(),
            });
        }
        let (num_orders, num_items, num_aisles) = (counts[0], counts[1], counts[2]);

        // 2. 订单
        // 表头数量未经校验,不据此预分配
        let mut orders = Vec::new();
        for id in 0..num_orders {
            let line = lines
                .next()
                .ok_or_else(|| ParseError::UnexpectedEof(format!("订单 {}", id)))?;
            let pairs = parse_pairs(&line, num_items)?;
            if let Some(&(item, _)) = pairs.iter().find(|&&(_, qty)| qty == 0) {
                return Err(ParseError::ZeroQuantity {
                    line: line.number,
                    item,
                });
            }
            orders.push(Order::from_pairs(id, &pairs));
        }

        // 3. 巷道
        let mut aisles = Vec::new();
        for id in 0..num_aisles {
            let line = lines
                .next()
                .ok_or_else(|| ParseError::UnexpectedEof(format!("巷道 {}", id)))?;
            let pairs = parse_pairs(&line, num_items)?;
            aisles.push(Aisle::from_pairs(id, &pairs));
        }

        // 4. 波次上下限
        let line = lines
            .next()
            .ok_or_else(|| ParseError::UnexpectedEof("波次上下限行".to_string()))?;
        let limits = line.integers()?;
        if limits.len() != 2 {
            return Err(ParseError::MalformedBounds {
                line: line.number,
                found: limits.len(),
            });
        }

        if let Some(extra) = lines.next() {
            return Err(ParseError::TrailingData(extra.number));
        }

        let bounds = WaveBounds {
            min: limits[0] as u64,
            max: limits[1] as u64,
            measure: self.measure,
        };

        debug!(num_orders, num_items, num_aisles, "实例文本解析完成");
        Ok(Instance::new(orders, aisles, num_items, bounds))
    }
}

/// 解析 `k item qty item qty ...` 行
fn parse_pairs(line: &NumberedLine<'_>, num_items: usize) -> ParseResult<Vec<(ItemId, u32)>> {
    let values = line.integers()?;
    let declared = values.first().copied().unwrap_or(0);
    let rest = values.get(1..).unwrap_or(&[]);
    if values.is_empty() || declared.checked_mul(2) != Some(rest.len()) {
        return Err(ParseError::PairCountMismatch {
            line: line.number,
            declared,
            found: rest.len(),
        });
    }

    rest.chunks_exact(2)
        .map(|pair| {
            let (item, qty) = (pair[0], pair[1]);
            if item >= num_items {
                return Err(ParseError::ItemOutOfCatalog {
                    line: line.number,
                    item,
                    num_items,
                });
            }
            let qty = u32::try_from(qty).map_err(|_| ParseError::InvalidInteger {
                line: line.number,
                token: qty.to_string(),
            })?;
            Ok((item, qty))
        })
        .collect()
}
