use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use bnb_core::{
    BnbStatus, BranchRelation, NodeClass, NodeLog, NodeRecord, ObjectiveSense, SearchStats,
};
use serde::Serialize;

use crate::instances::{Instance, Run};
use crate::layout::{tree_positions, Position};

/// Everything written by `--json`.
#[derive(Serialize)]
pub struct Export<'a> {
    pub instance: &'a str,
    pub model: &'a Instance,
    pub status: BnbStatus,
    pub sense: ObjectiveSense,
    pub value: f64,
    pub solution: &'a [f64],
    pub var_names: &'a [String],
    pub stats: &'a SearchStats,
    pub nodes: &'a NodeLog,
    pub positions: Vec<Position>,
}

impl<'a> Export<'a> {
    pub fn new(instance: &'a str, model: &'a Instance, run: &'a Run) -> Self {
        Self {
            instance,
            model,
            status: run.result.status,
            sense: run.result.sense,
            value: run.result.value,
            solution: &run.result.solution,
            var_names: &run.var_names,
            stats: &run.result.stats,
            nodes: &run.result.nodes,
            positions: tree_positions(&run.result.nodes),
        }
    }
}

pub fn save_json(export: &Export<'_>, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), export)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn var_name(names: &[String], var: usize) -> String {
    names.get(var).cloned().unwrap_or_else(|| format!("x{}", var))
}

fn node_line(node: &NodeRecord, names: &[String]) -> String {
    let mut line = format!("#{}", node.id);
    if let Some(branch) = node.branch {
        let op = match branch.relation {
            BranchRelation::Le => "<=",
            BranchRelation::Ge => ">=",
        };
        let _ = write!(line, " [{} {} {}]", var_name(names, branch.var), op, branch.bound);
    }

    let mut tags = Vec::new();
    if node.is_infeasible() {
        tags.push("Infeasible");
    } else {
        let _ = write!(line, " Z={:.4}", node.bound);
        match node.class {
            NodeClass::Pruned => tags.push("Pruned"),
            NodeClass::PrunedInteger => tags.push("Integer"),
            NodeClass::Branched | NodeClass::Open => {}
        }
    }
    if node.is_new_incumbent {
        tags.push("New incumbent");
    }
    if !tags.is_empty() {
        let _ = write!(line, " {}", tags.join(", "));
    }
    if let Some(failure) = &node.failure {
        let _ = write!(line, " (oracle failure: {})", failure);
    }
    line
}

/// Indented text rendering of the search tree, children under their parent.
pub fn render_tree(log: &NodeLog, names: &[String]) -> String {
    let mut out = String::new();
    let mut stack: Vec<(&NodeRecord, usize)> =
        log.iter().filter(|n| n.is_root()).map(|n| (n, 0)).rev().collect();

    while let Some((node, indent)) = stack.pop() {
        let _ = writeln!(out, "{}{}", "  ".repeat(indent), node_line(node, names));
        let children: Vec<&NodeRecord> = log.children_of(&node.id).collect();
        for child in children.into_iter().rev() {
            stack.push((child, indent + 1));
        }
    }
    out
}

/// Number with at most six decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let s = format!("{:.6}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn format_solution(solution: &[f64], names: &[String]) -> String {
    let nonzero: Vec<String> = solution
        .iter()
        .enumerate()
        .filter(|(_, v)| v.abs() > 1e-9)
        .map(|(j, &v)| format!("{}={}", var_name(names, j), fmt_num(v)))
        .collect();
    if nonzero.is_empty() {
        "all zero".to_string()
    } else {
        nonzero.join(" ")
    }
}

/// Short run report.
pub fn summary(instance: &str, run: &Run) -> String {
    let result = &run.result;
    let stats = &result.stats;
    let mut out = String::new();

    let _ = writeln!(out, "instance:   {}", instance);
    let _ = writeln!(out, "status:     {:?}", result.status);
    if result.status.has_solution() {
        let _ = writeln!(out, "objective:  {}", fmt_num(result.value));
        let _ = writeln!(
            out,
            "solution:   {}",
            format_solution(&result.solution, &run.var_names)
        );
    }
    for note in &run.notes {
        let _ = writeln!(out, "            {}", note);
    }
    let _ = writeln!(
        out,
        "nodes:      {} (branched {}, pruned {}, integer {})",
        stats.nodes_explored, stats.nodes_branched, stats.nodes_pruned, stats.integer_nodes
    );
    let _ = writeln!(out, "incumbents: {}", stats.incumbent_updates);
    let _ = writeln!(out, "max depth:  {}", stats.max_depth);
    if stats.oracle_failures > 0 {
        let _ = writeln!(out, "failures:   {}", stats.oracle_failures);
    }
    let _ = writeln!(out, "time:       {} ms", stats.solve_time_ms);
    out
}
