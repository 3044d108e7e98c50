//! CVRPLIB (TSPLIB-style) instance parsing.
//!
//! Supports `EUC_2D` instances with `NODE_COORD_SECTION`, `DEMAND_SECTION`
//! and `DEPOT_SECTION`. Nodes are renumbered so the depot becomes node `0` and
//! the remaining nodes keep their file order, which matches the customer ids
//! used in CVRPLIB `.sol` files.

use std::path::Path;

use thiserror::Error;

use crate::error::AilsError;
use crate::instance::{DistanceMetric, Instance, Point};

/// Error raised while reading a CVRPLIB file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("missing {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Instance(#[from] AilsError),
}

impl From<ParseError> for AilsError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Instance(inner) => inner,
            other => AilsError::Instance(other.to_string()),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Coords,
    Demands,
    Depot,
}

/// Reads an instance from a CVRPLIB file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance, ParseError> {
    let contents = std::fs::read_to_string(path)?;
    parse_instance(&contents)
}

/// Parses an instance from CVRPLIB text.
///
/// Coordinates are measured with [`DistanceMetric::RoundedEuclidean`], the
/// CVRPLIB convention for `EUC_2D`.
///
/// # Example
///
/// ```
/// use ails_core::loading::parse_instance;
///
/// let text = "NAME : toy\nTYPE : CVRP\nDIMENSION : 3\nEDGE_WEIGHT_TYPE : EUC_2D\n\
///             CAPACITY : 10\nNODE_COORD_SECTION\n1 0 0\n2 3 4\n3 6 8\n\
///             DEMAND_SECTION\n1 0\n2 4\n3 5\nDEPOT_SECTION\n1\n-1\nEOF\n";
/// let instance = parse_instance(text).unwrap();
/// assert_eq!(instance.name(), "toy");
/// assert_eq!(instance.size(), 2);
/// assert_eq!(instance.distance(0, 2), 10.0);
/// ```
pub fn parse_instance(text: &str) -> Result<Instance, ParseError> {
    let mut name = String::from("unnamed");
    let mut dimension: Option<usize> = None;
    let mut capacity: Option<u32> = None;
    let mut coords: Vec<Option<Point>> = Vec::new();
    let mut demands: Vec<Option<u32>> = Vec::new();
    let mut depot: Option<usize> = None;
    let mut section = Section::Header;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match line {
            "NODE_COORD_SECTION" => {
                section = Section::Coords;
                continue;
            }
            "DEMAND_SECTION" => {
                section = Section::Demands;
                continue;
            }
            "DEPOT_SECTION" => {
                section = Section::Depot;
                continue;
            }
            "EOF" => break,
            _ => {}
        }

        match section {
            Section::Header => {
                let Some((key, value)) = line.split_once(':') else {
                    return Err(syntax(
                        line_no,
                        format!("expected 'KEY : VALUE', got '{line}'"),
                    ));
                };
                let value = value.trim();
                match key.trim() {
                    "NAME" => name = value.to_string(),
                    "DIMENSION" => {
                        let n = parse_num::<usize>(value, line_no)?;
                        coords = vec![None; n];
                        demands = vec![None; n];
                        dimension = Some(n);
                    }
                    "CAPACITY" => capacity = Some(parse_num(value, line_no)?),
                    "EDGE_WEIGHT_TYPE" if value != "EUC_2D" => {
                        return Err(syntax(
                            line_no,
                            format!("unsupported edge weight type '{value}'"),
                        ));
                    }
                    _ => {}
                }
            }
            Section::Coords => {
                let mut parts = line.split_whitespace();
                let id = node_index(parts.next(), dimension, line_no)?;
                let x = parse_num::<f64>(parts.next().unwrap_or(""), line_no)?;
                let y = parse_num::<f64>(parts.next().unwrap_or(""), line_no)?;
                coords[id] = Some(Point::new(x, y));
            }
            Section::Demands => {
                let mut parts = line.split_whitespace();
                let id = node_index(parts.next(), dimension, line_no)?;
                demands[id] = Some(parse_num(parts.next().unwrap_or(""), line_no)?);
            }
            Section::Depot => {
                // The section is terminated by -1
                let id = parse_num::<i64>(line, line_no)?;
                if id >= 1 && depot.is_none() {
                    depot = Some(node_index(Some(line), dimension, line_no)?);
                }
            }
        }
    }

    let dimension = dimension.ok_or(ParseError::Missing("DIMENSION"))?;
    let capacity = capacity.ok_or(ParseError::Missing("CAPACITY"))?;
    let depot = depot.unwrap_or(0);

    let mut builder = Instance::builder(name)
        .capacity(capacity)
        .metric(DistanceMetric::RoundedEuclidean);
    for node in 0..dimension {
        let point = coords[node].ok_or(ParseError::Missing("node coordinates"))?;
        let demand = demands[node].ok_or(ParseError::Missing("node demand"))?;
        if node == depot {
            builder = builder.depot(point);
        } else {
            builder = builder.customer(point, demand);
        }
    }
    Ok(builder.build()?)
}

fn syntax(line: usize, message: String) -> ParseError {
    ParseError::Syntax { line, message }
}

fn parse_num<T: std::str::FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| syntax(line, format!("invalid number '{value}'")))
}

// 1-based file id to 0-based slot.
fn node_index(
    token: Option<&str>,
    dimension: Option<usize>,
    line: usize,
) -> Result<usize, ParseError> {
    let dimension = dimension.ok_or(ParseError::Missing("DIMENSION"))?;
    let id = parse_num::<usize>(token.unwrap_or(""), line)?;
    if id == 0 || id > dimension {
        return Err(syntax(line, format!("node id {id} outside 1..={dimension}")));
    }
    Ok(id - 1)
}
