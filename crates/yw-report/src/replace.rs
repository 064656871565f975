//! Rewriting the object classes of an existing dump.
//!
//! Every quoted occurrence of an existing class, e.g. `"Person"`, is swapped
//! for a class drawn at random with the configured weights. Lines are
//! streamed, so dumps of any size work and line endings are kept as they are.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::error::{ReportError, ReportResult};

/// Class taken out when none is named.
pub const DEFAULT_EXISTING: &str = "Person";

/// Prefix of rewritten files by default.
pub const DEFAULT_PREFIX: &str = "replaced";

/// Weighted class substitution.
#[derive(Debug, Clone)]
pub struct Replacer {
    classes: Vec<String>,
    weights: WeightedIndex<f64>,
    existing: Vec<String>,
}

impl Replacer {
    /// Swap each of `existing` for one of `classes`, picked with `weights`.
    ///
    /// Weights are relative and need not sum to one. The two class lists must
    /// be disjoint.
    pub fn new(classes: Vec<String>, weights: &[f64], existing: Vec<String>) -> ReportResult<Self> {
        if classes.len() != weights.len() {
            return Err(ReportError::WeightCount {
                classes: classes.len(),
                weights: weights.len(),
            });
        }
        if let Some(class) = existing.iter().find(|e| classes.contains(e)) {
            return Err(ReportError::OverlappingClass {
                class: class.clone(),
            });
        }
        let weights =
            WeightedIndex::new(weights).map_err(|err| ReportError::Weights(err.to_string()))?;
        Ok(Self {
            classes,
            weights,
            existing,
        })
    }

    /// Rewrite one line, returning it with the number of swaps made.
    pub fn replace_line<R: Rng>(&self, line: &str, rng: &mut R) -> (String, u64) {
        let mut line = line.to_string();
        let mut swaps = 0;
        for class in &self.existing {
            let needle = format!("\"{class}\"");
            if !line.contains(&needle) {
                continue;
            }
            let mut out = String::with_capacity(line.len());
            let mut rest = line.as_str();
            while let Some(at) = rest.find(&needle) {
                out.push_str(&rest[..at]);
                out.push('"');
                out.push_str(&self.classes[self.weights.sample(rng)]);
                out.push('"');
                rest = &rest[at + needle.len()..];
                swaps += 1;
            }
            out.push_str(rest);
            line = out;
        }
        (line, swaps)
    }

    /// Rewrite `input` into `out` line by line.
    pub fn replace_stream<I: BufRead, W: Write, R: Rng>(
        &self,
        mut input: I,
        mut out: W,
        rng: &mut R,
    ) -> ReportResult<u64> {
        let mut buf = String::new();
        let mut swaps = 0;
        while input.read_line(&mut buf)? > 0 {
            let (line, n) = self.replace_line(&buf, rng);
            out.write_all(line.as_bytes())?;
            swaps += n;
            buf.clear();
        }
        out.flush()?;
        Ok(swaps)
    }

    /// Rewrite `path` into a sibling file named `<prefix>_<name>`.
    pub fn replace_file<R: Rng>(
        &self,
        path: &Path,
        prefix: &str,
        rng: &mut R,
    ) -> ReportResult<Replaced> {
        let output = prefixed(path, prefix);
        let input = BufReader::new(File::open(path)?);
        let out = BufWriter::new(File::create(&output)?);
        let swaps = self.replace_stream(input, out, rng)?;
        info!(
            "rewrote {} into {} ({swaps} objects replaced)",
            path.display(),
            output.display()
        );
        Ok(Replaced { output, swaps })
    }
}

/// Outcome of [`Replacer::replace_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// File that was written.
    pub output: PathBuf,
    /// Objects whose class was swapped.
    pub swaps: u64,
}

/// `dir/name` becomes `dir/<prefix>_name`.
pub fn prefixed(path: &Path, prefix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{prefix}_{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn person_to(classes: &[&str], weights: &[f64]) -> Replacer {
        Replacer::new(strings(classes), weights, strings(&[DEFAULT_EXISTING])).unwrap()
    }

    #[test]
    fn every_quoted_occurrence_is_swapped() {
        let replacer = person_to(&["pallet", "box"], &[1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(3);
        let line = r#"{"objects":[{"type":"Person"},{"type":"Person"},{"type":"Personnel"}]}"#;
        let (out, swaps) = replacer.replace_line(line, &mut rng);

        assert_eq!(swaps, 2);
        assert!(!out.contains("\"Person\""));
        assert!(out.contains("\"Personnel\""));
        assert_eq!(out.matches("\"pallet\"").count() + out.matches("\"box\"").count(), 2);
    }

    #[test]
    fn zero_weight_class_is_never_drawn() {
        let replacer = person_to(&["forklift", "hardhat"], &[0.0, 3.0]);
        let mut rng = StdRng::seed_from_u64(11);
        let line = "\"Person\" ".repeat(200);
        let (out, swaps) = replacer.replace_line(&line, &mut rng);
        assert_eq!(swaps, 200);
        assert!(!out.contains("forklift"));
        assert_eq!(out.matches("\"hardhat\"").count(), 200);
    }

    #[test]
    fn weights_shape_the_mix() {
        let replacer = person_to(&["common", "rare"], &[9.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(5);
        let line = "\"Person\"".repeat(2_000);
        let (out, _) = replacer.replace_line(&line, &mut rng);
        let rare = out.matches("\"rare\"").count();
        assert!((100..400).contains(&rare), "rare drawn {rare} times");
    }

    #[test]
    fn several_existing_classes() {
        let replacer = Replacer::new(
            strings(&["shelf"]),
            &[1.0],
            strings(&["pallet", "box"]),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let (out, swaps) = replacer.replace_line(r#"["pallet","box","bbox"]"#, &mut rng);
        assert_eq!(out, r#"["shelf","shelf","bbox"]"#);
        assert_eq!(swaps, 2);
    }

    #[test]
    fn stream_keeps_line_endings() {
        let replacer = person_to(&["cart"], &[1.0]);
        let mut rng = StdRng::seed_from_u64(0);
        let input = "{\"type\":\"Person\"}\r\nplain\n{\"type\":\"Person\"}";
        let mut out = Vec::new();
        let swaps = replacer
            .replace_stream(input.as_bytes(), &mut out, &mut rng)
            .unwrap();
        assert_eq!(swaps, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"type\":\"cart\"}\r\nplain\n{\"type\":\"cart\"}"
        );
    }

    #[test]
    fn invalid_setups_are_rejected() {
        let existing = strings(&[DEFAULT_EXISTING]);
        assert!(matches!(
            Replacer::new(strings(&["a", "b"]), &[1.0], existing.clone()),
            Err(ReportError::WeightCount { classes: 2, weights: 1 })
        ));
        assert!(matches!(
            Replacer::new(strings(&["a"]), &[-1.0], existing.clone()),
            Err(ReportError::Weights(_))
        ));
        assert!(matches!(
            Replacer::new(strings(&[]), &[], existing),
            Err(ReportError::Weights(_))
        ));
        assert!(matches!(
            Replacer::new(strings(&["Person"]), &[1.0], strings(&["Person"])),
            Err(ReportError::OverlappingClass { .. })
        ));
    }

    #[test]
    fn file_is_written_next_to_its_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("mdx-frames.json");
        std::fs::write(&source, "{\"type\":\"Person\"}\n").unwrap();

        let replacer = person_to(&["box"], &[1.0]);
        let mut rng = StdRng::seed_from_u64(0);
        let done = replacer.replace_file(&source, "updated", &mut rng).unwrap();

        assert_eq!(done.output, dir.path().join("updated_mdx-frames.json"));
        assert_eq!(done.swaps, 1);
        assert_eq!(
            std::fs::read_to_string(&done.output).unwrap(),
            "{\"type\":\"box\"}\n"
        );
    }
}
