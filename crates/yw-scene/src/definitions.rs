//! The behaviour side of a scene: what each process type consumes and
//! produces, and how each mover type travels.

use std::path::Path;

use indexmap::IndexMap;
use log::info;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use yw_core::{Counts, MotionKind};

use crate::error::{SceneError, SceneResult};

const PROCESSES: &str = "processes";
const MOVERS: &str = "movers";

/// Behaviour of one process type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessDef {
    /// Ticks per production run.
    pub time: u32,
    /// Consumed per run.
    pub input: Counts,
    /// Produced per run; at most one category.
    pub output: Counts,
}

/// Behaviour of one mover type.
#[derive(Debug, Clone, PartialEq)]
pub struct MoverDef {
    /// Distance per tick.
    pub speed: f64,
    /// Items carried per trip.
    pub capacity: u32,
    /// How the mover travels.
    pub movement: MotionKind,
}

/// Validated process and mover definitions, keyed by type label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    /// Process types in file order.
    pub processes: IndexMap<String, ProcessDef>,
    /// Mover types in file order.
    pub movers: IndexMap<String, MoverDef>,
}

/// The ways an item list may be written.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemList {
    Counts(Counts),
    Names(Vec<String>),
    Name(String),
}

impl ItemList {
    fn into_counts(self) -> Counts {
        match self {
            Self::Counts(counts) => counts,
            Self::Names(names) => {
                let mut counts = Counts::new();
                for name in names {
                    *counts.entry(name).or_default() += 1;
                }
                counts
            }
            Self::Name(name) => Counts::from([(name, 1)]),
        }
    }
}

impl Definitions {
    /// Read and validate a definitions file.
    pub fn load(path: &Path) -> SceneResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| SceneError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let value: Value = serde_yaml::from_str(&contents).map_err(|err| SceneError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let defs = Self::from_value(&value)?;
        info!(
            "definitions verified: {} ({} process types, {} mover types)",
            path.display(),
            defs.processes.len(),
            defs.movers.len()
        );
        Ok(defs)
    }

    /// Parse and validate definitions from YAML text.
    pub fn from_yaml_str(contents: &str) -> SceneResult<Self> {
        let value: Value = serde_yaml::from_str(contents).map_err(|err| SceneError::Parse {
            path: "<inline>".into(),
            message: err.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Validate an already parsed YAML document.
    pub fn from_value(value: &Value) -> SceneResult<Self> {
        let root = value.as_mapping().ok_or_else(|| SceneError::TopLevelKeys {
            found: Vec::new(),
        })?;
        let found = key_names(root);
        let expected = [PROCESSES, MOVERS];
        if found.len() != expected.len() || !expected.iter().all(|k| found.iter().any(|f| f == k)) {
            return Err(SceneError::TopLevelKeys { found });
        }

        let mut defs = Self::default();
        for (name, body) in section(root, PROCESSES)? {
            defs.processes.insert(name.clone(), parse_process(&name, body)?);
        }
        for (name, body) in section(root, MOVERS)? {
            defs.movers.insert(name.clone(), parse_mover(&name, body)?);
        }
        Ok(defs)
    }
}

fn key_names(map: &Mapping) -> Vec<String> {
    map.keys().map(value_name).collect()
}

fn value_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Entries of a `processes` or `movers` section. An empty section is fine.
fn section<'a>(root: &'a Mapping, key: &str) -> SceneResult<Vec<(String, &'a Mapping)>> {
    let entries = match root.get(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Mapping(map)) => map,
        Some(_) => {
            return Err(SceneError::NotAMapping {
                section: key.to_string(),
            });
        }
    };

    let mut out = Vec::with_capacity(entries.len());
    for (name, body) in entries {
        let name = value_name(name);
        let Value::Mapping(body) = body else {
            return Err(SceneError::NotAMapping { section: name });
        };
        out.push((name, body));
    }
    Ok(out)
}

fn parse_process(name: &str, body: &Mapping) -> SceneResult<ProcessDef> {
    let has = |key: &str| body.contains_key(key);
    if !has("time") || !(has("input") || has("output")) {
        return Err(SceneError::ProcessKeys {
            name: name.to_string(),
            found: key_names(body),
        });
    }

    let input = item_list(name, body, "input")?;
    let output = item_list(name, body, "output")?;
    if output.len() > 1 {
        return Err(SceneError::TooManyOutputs {
            name: name.to_string(),
            count: output.len(),
        });
    }

    Ok(ProcessDef {
        time: positive_int(name, body, "time")?,
        input,
        output,
    })
}

fn parse_mover(name: &str, body: &Mapping) -> SceneResult<MoverDef> {
    let found = key_names(body);
    let extra = found
        .iter()
        .any(|k| !matches!(k.as_str(), "speed" | "capacity" | "movement"));
    if extra || !body.contains_key("speed") || !body.contains_key("capacity") {
        return Err(SceneError::MoverKeys {
            name: name.to_string(),
            found,
        });
    }

    let speed = body
        .get("speed")
        .and_then(Value::as_f64)
        .filter(|speed| *speed > 0.0)
        .ok_or_else(|| not_positive(name, "speed", "number"))?;

    let movement = match body.get("movement") {
        None | Some(Value::Null) => MotionKind::default(),
        Some(value) => serde_yaml::from_value(value.clone()).map_err(|_| {
            SceneError::UnknownMovement {
                name: name.to_string(),
                value: value_name(value),
            }
        })?,
    };

    Ok(MoverDef {
        speed,
        capacity: positive_int(name, body, "capacity")?,
        movement,
    })
}

/// Absent lists are empty; present-but-null lists are an error.
fn item_list(name: &str, body: &Mapping, key: &str) -> SceneResult<Counts> {
    match body.get(key) {
        None => Ok(Counts::new()),
        Some(Value::Null) => Err(SceneError::EmptyItemList {
            name: name.to_string(),
            key: key.to_string(),
        }),
        Some(value) => serde_yaml::from_value::<ItemList>(value.clone())
            .map(ItemList::into_counts)
            .map_err(|err| SceneError::InvalidItemList {
                name: name.to_string(),
                key: key.to_string(),
                message: err.to_string(),
            }),
    }
}

fn positive_int(name: &str, body: &Mapping, key: &str) -> SceneResult<u32> {
    body.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| not_positive(name, key, "integer"))
}

fn not_positive(name: &str, key: &str, expected: &'static str) -> SceneError {
    SceneError::NotPositive {
        name: name.to_string(),
        key: key.to_string(),
        expected,
    }
}
