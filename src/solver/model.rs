// ==========================================
// 仓库波次拣货优化系统 - 线性规划模型
// ==========================================
// 职责: 与后端无关的整数规划描述（变量、目标、约束）
// 说明: 子问题构建器产出该模型,求解适配器负责翻译给具体后端
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 变量句柄（模型内下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VarKind {
    Binary,
    Continuous { lower: f64, upper: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
}

/// 线性表达式 Σ coef·var + constant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) -> &mut Self {
        if coef != 0.0 {
            self.terms.push((var, coef));
        }
        self
    }

    pub fn with_term(mut self, var: VarId, coef: f64) -> Self {
        self.add_term(var, coef);
        self
    }

    pub fn evaluate(&self, assignment: &Assignment) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * assignment.value(var))
            .sum::<f64>()
            + self.constant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    LessEq,
    GreaterEq,
    Equal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub cmp: Comparison,
    pub rhs: f64,
}

impl Constraint {
    pub fn is_satisfied(&self, assignment: &Assignment, tol: f64) -> bool {
        let lhs = self.expr.evaluate(assignment);
        match self.cmp {
            Comparison::LessEq => lhs <= self.rhs + tol,
            Comparison::GreaterEq => lhs >= self.rhs - tol,
            Comparison::Equal => (lhs - self.rhs).abs() <= tol,
        }
    }
}

// ==========================================
// LinearProgram - 最大化问题
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
    pub name: String,
    variables: Vec<Variable>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
    start_values: Vec<(VarId, f64)>, // MIP 初始解提示
    #[serde(skip)]
    names: HashMap<String, VarId>,
}

impl LinearProgram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_variable(name.into(), VarKind::Binary)
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add_variable(name.into(), VarKind::Continuous { lower, upper })
    }

    fn add_variable(&mut self, name: String, kind: VarKind) -> VarId {
        let id = VarId(self.variables.len());
        self.names.insert(name.clone(), id);
        self.variables.push(Variable { name, kind });
        id
    }

    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        cmp: Comparison,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            cmp,
            rhs,
        });
    }

    pub fn set_start_value(&mut self, var: VarId, value: f64) {
        self.start_values.push((var, value));
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn start_values(&self) -> &[(VarId, f64)] {
        &self.start_values
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VarId> {
        self.names.get(name).copied()
    }

    pub fn objective_value(&self, assignment: &Assignment) -> f64 {
        self.objective.evaluate(assignment)
    }

    /// 检查赋值是否满足全部约束与变量界
    pub fn is_feasible(&self, assignment: &Assignment, tol: f64) -> bool {
        if assignment.len() != self.variables.len() {
            return false;
        }
        let bounds_ok = self.variables.iter().enumerate().all(|(idx, var)| {
            let v = assignment.value(VarId(idx));
            match var.kind {
                VarKind::Binary => v.abs() <= tol || (v - 1.0).abs() <= tol,
                VarKind::Continuous { lower, upper } => v >= lower - tol && v <= upper + tol,
            }
        });
        bounds_ok && self.constraints.iter().all(|c| c.is_satisfied(assignment, tol))
    }
}

// ==========================================
// Assignment - 变量取值
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// 全零赋值
    pub fn zeros(program: &LinearProgram) -> Self {
        Self {
            values: vec![0.0; program.variables().len()],
        }
    }

    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, var: VarId, value: f64) {
        if let Some(slot) = self.values.get_mut(var.0) {
            *slot = value;
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasibility_check_respects_bounds_and_rows() {
        let mut lp = LinearProgram::new("t");
        let x = lp.add_binary("x");
        let d = lp.add_continuous("d", 0.0, 4.0);
        lp.set_objective(LinearExpr::new().with_term(x, 3.0).with_term(d, -1.0));
        lp.add_constraint(
            "cover",
            LinearExpr::new().with_term(d, 1.0).with_term(x, -3.0),
            Comparison::GreaterEq,
            0.0,
        );

        let mut a = Assignment::zeros(&lp);
        assert!(lp.is_feasible(&a, 1e-9));

        a.set(x, 1.0);
        assert!(!lp.is_feasible(&a, 1e-9));

        a.set(d, 3.0);
        assert!(lp.is_feasible(&a, 1e-9));
        assert_eq!(lp.objective_value(&a), 0.0);

        a.set(d, 5.0);
        assert!(!lp.is_feasible(&a, 1e-9));
        assert_eq!(lp.variable_by_name("d"), Some(d));
    }
}
