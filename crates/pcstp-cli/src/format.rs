//! Instance file parsing. The core crate never touches a filesystem or a
//! text format; this module owns both kinds this binary accepts.
//!
//! Two formats are supported:
//! - `.pcs`, a minimal line-oriented format in the spirit of SteinLib's
//!   `.stp` (this port does not claim bit-for-bit SteinLib compatibility,
//!   since no reference `.stp` PCSTP file ships with the retrieved source).
//! - `.json`, a direct serde mirror of `Instance::build`'s arguments, for
//!   instances generated programmatically.

use anyhow::{bail, Context, Result};
use pcstp::instance::{ArcInput, Instance};
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Pcs,
    Json,
}

impl Format {
    pub fn detect(path: &Path) -> Result<Format> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("pcs") | Some("stp") | Some("txt") => Ok(Format::Pcs),
            other => bail!("cannot infer instance format from extension {other:?}; pass --format explicitly"),
        }
    }

    pub fn parse(self, text: &str) -> Result<Instance> {
        match self {
            Format::Pcs => parse_pcs(text),
            Format::Json => parse_json(text),
        }
    }
}

/// A plain-data mirror of `Instance::build`'s arguments, for the `.json`
/// format.
#[derive(Deserialize)]
struct ArcSpec {
    tail: usize,
    head: usize,
    cost: f64,
}

#[derive(Deserialize)]
struct InstanceSpec {
    n: usize,
    arcs: Vec<ArcSpec>,
    #[serde(default)]
    revenue: Vec<f64>,
    #[serde(default)]
    terminal: Vec<bool>,
    #[serde(default)]
    fixed_in: Vec<bool>,
    #[serde(default)]
    fixed_out: Vec<bool>,
    #[serde(default)]
    root: Option<usize>,
    #[serde(default = "default_true")]
    asym: bool,
    #[serde(default = "default_true")]
    is_int: bool,
    #[serde(default)]
    is_mwcs: bool,
}

fn default_true() -> bool {
    true
}

fn pad_bool(mut v: Vec<bool>, n: usize) -> Vec<bool> {
    v.resize(n, false);
    v
}

fn pad_f64(mut v: Vec<f64>, n: usize) -> Vec<f64> {
    v.resize(n, 0.0);
    v
}

pub fn parse_json(text: &str) -> Result<Instance> {
    let spec: InstanceSpec = serde_json::from_str(text).context("parsing instance JSON")?;
    let n = spec.n;
    let arcs = spec.arcs.into_iter().map(|a| ArcInput::new(a.tail, a.head, a.cost)).collect();
    let instance = Instance::build(
        n,
        arcs,
        pad_f64(spec.revenue, n),
        pad_bool(spec.terminal, n),
        pad_bool(spec.fixed_in, n),
        pad_bool(spec.fixed_out, n),
        spec.root,
        spec.asym,
        spec.is_int,
        spec.is_mwcs,
    )?;
    Ok(instance)
}

/// Parses the `.pcs` line format:
///
/// ```text
/// n 4
/// asym 1
/// r 0
/// e 0 1 2.0
/// e 1 2 3.0
/// p 2 5.0
/// t 2
/// i 3
/// o 1
/// ```
///
/// `n` must appear first. Node ids are 0-based. Unknown leading keywords are
/// rejected; blank lines and `#` comments are skipped.
pub fn parse_pcs(text: &str) -> Result<Instance> {
    let mut n: Option<usize> = None;
    let mut asym = true;
    let mut is_int = true;
    let mut is_mwcs = false;
    let mut root: Option<usize> = None;
    let mut arcs: Vec<ArcInput> = Vec::new();
    let mut revenue: Vec<f64> = Vec::new();
    let mut terminal: Vec<bool> = Vec::new();
    let mut fixed_in: Vec<bool> = Vec::new();
    let mut fixed_out: Vec<bool> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tok = line.split_whitespace();
        let kw = tok.next().unwrap();
        let rest: Vec<&str> = tok.collect();
        let ctx = || format!("line {}: {line:?}", lineno + 1);

        match kw {
            "n" => {
                let count: usize = rest.first().context(ctx())?.parse().with_context(ctx)?;
                n = Some(count);
                revenue = vec![0.0; count];
                terminal = vec![false; count];
                fixed_in = vec![false; count];
                fixed_out = vec![false; count];
            }
            "asym" => asym = rest.first().context(ctx())?.parse::<u8>().with_context(ctx)? != 0,
            "int" => is_int = rest.first().context(ctx())?.parse::<u8>().with_context(ctx)? != 0,
            "mwcs" => is_mwcs = rest.first().context(ctx())?.parse::<u8>().with_context(ctx)? != 0,
            "r" => root = Some(rest.first().context(ctx())?.parse().with_context(ctx)?),
            "e" => {
                let [t, h, c]: [&str; 3] = rest.as_slice().try_into().map_err(|_| anyhow::anyhow!("{}: `e` needs tail head cost", ctx()))?;
                arcs.push(ArcInput::new(t.parse().with_context(ctx)?, h.parse().with_context(ctx)?, c.parse().with_context(ctx)?));
            }
            "p" => {
                let [i, val]: [&str; 2] = rest.as_slice().try_into().map_err(|_| anyhow::anyhow!("{}: `p` needs node revenue", ctx()))?;
                let i: usize = i.parse().with_context(ctx)?;
                revenue[i] = val.parse().with_context(ctx)?;
            }
            "t" => terminal[rest.first().context(ctx())?.parse::<usize>().with_context(ctx)?] = true,
            "i" => fixed_in[rest.first().context(ctx())?.parse::<usize>().with_context(ctx)?] = true,
            "o" => fixed_out[rest.first().context(ctx())?.parse::<usize>().with_context(ctx)?] = true,
            other => bail!("{}: unknown keyword {other:?}", ctx()),
        }
    }

    let n = n.context("missing `n <count>` line")?;
    let instance = Instance::build(n, arcs, revenue, terminal, fixed_in, fixed_out, root, asym, is_int, is_mwcs)?;
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_tiny_pcs_instance() {
        let text = "n 3\nr 0\ne 0 1 1.0\ne 1 2 2.0\ne 0 2 10.0\np 2 5.0\nt 2\n";
        let inst = parse_pcs(text).unwrap();
        assert_eq!(inst.n, 3);
        assert_eq!(inst.m, 3);
        assert_eq!(inst.r, Some(0));
        assert!(inst.t[2]);
        assert_eq!(inst.p[2], 5.0);
    }

    #[test]
    fn parses_a_tiny_json_instance() {
        let text = r#"{"n":2,"arcs":[{"tail":0,"head":1,"cost":1.0}],"revenue":[0.0,3.0],"terminal":[false,true],"root":0}"#;
        let inst = parse_json(text).unwrap();
        assert_eq!(inst.n, 2);
        assert_eq!(inst.r, Some(0));
        assert_eq!(inst.p[1], 3.0);
    }

    #[test]
    fn rejects_unknown_keyword() {
        let text = "n 1\nbogus 1\n";
        assert!(parse_pcs(text).is_err());
    }

    #[test]
    fn detects_and_parses_a_pcs_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instance.pcs");
        std::fs::write(&path, "n 2\nr 0\ne 0 1 4.0\np 1 9.0\nt 1\n").unwrap();

        let format = Format::detect(&path).unwrap();
        assert_eq!(format, Format::Pcs);
        let text = std::fs::read_to_string(&path).unwrap();
        let inst = format.parse(&text).unwrap();
        assert_eq!(inst.n, 2);
        assert_eq!(inst.p[1], 9.0);
    }
}
