use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Name of the metadata file written next to every fixture.
pub const METADATA_FILE: &str = "metadata.json";

/// The record of a generation run, written as `metadata.json`.
///
/// `pattern_nodes` holds the target indices of the pattern nodes and is
/// omitted for fixtures without a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub algorithm: String,
    pub n: usize,
    pub k: Option<usize>,
    pub density: f64,
    pub seed: u64,
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_nodes: Option<Vec<usize>>,
}

impl Metadata {
    pub fn write<W: Write>(&self, mut output: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut output, self)?;
        writeln!(output)?;
        Ok(())
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut output = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut output)?;
        output.flush()?;
        Ok(())
    }
}
