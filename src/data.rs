use crate::error::GrowthError;
use crate::model::{Observation, RawRecord, Record};
use anyhow::{Context, Result, bail};
use glob::glob;
use rmp_serde::decode;
use serde::Deserialize;
use std::{collections::BTreeSet, fs, io::BufReader, path::Path};

/// Layout of a records file: an array of `record` tables.
#[derive(Deserialize)]
struct RecordFile {
    #[serde(default)]
    record: Vec<RawRecord>,
}

/// Growth records in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Validate raw rows and build a table from them.
    pub fn from_raw(raw_records: Vec<RawRecord>) -> Result<Self, GrowthError> {
        let records = raw_records
            .into_iter()
            .enumerate()
            .map(|(row, raw)| raw.into_record(row))
            .collect::<Result<_, _>>()?;
        Ok(Self { records })
    }

    /// Load a table from a TOML or MessagePack file, chosen by extension.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let record_file: RecordFile = match file.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let contents = fs::read_to_string(file)
                    .with_context(|| format!("failed to read {file:?}"))?;
                toml::from_str(&contents).context("failed to deserialize records")?
            }
            Some("msgpack") => {
                let reader = fs::File::open(file)
                    .map(BufReader::new)
                    .with_context(|| format!("failed to open {file:?}"))?;
                decode::from_read(reader).context("failed to deserialize records")?
            }
            _ => return Err(GrowthError::UnsupportedFormat(file.to_path_buf()).into()),
        };

        let table = Self::from_raw(record_file.record)
            .with_context(|| format!("invalid records in {file:?}"))?;
        Ok(table)
    }

    /// Load and concatenate every file matching a glob pattern, in path order.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let mut files: Vec<_> = glob(pattern)
            .context("failed to glob records files")?
            .filter_map(Result::ok)
            .collect();
        if files.is_empty() {
            bail!("no records files match {pattern:?}");
        }
        files.sort();

        let mut records = Vec::new();
        for file in &files {
            let table = Self::from_file(file)?;
            log::info!("loaded {} records from {file:?}", table.len());
            records.extend(table.records);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observations of one subject ordered by time.
    ///
    /// Rows sharing a time step keep their table order.
    pub fn subject(&self, chick: u32) -> Vec<Observation> {
        let mut obs_vec: Vec<_> = self
            .records
            .iter()
            .filter(|rec| rec.chick == chick)
            .map(Record::observation)
            .collect();
        obs_vec.sort_by_key(|obs| obs.time);
        obs_vec
    }

    /// Diet of a subject, taken from its first record.
    pub fn subject_diet(&self, chick: u32) -> Option<u32> {
        self.records
            .iter()
            .find(|rec| rec.chick == chick)
            .map(|rec| rec.diet)
    }

    pub fn subjects(&self) -> Vec<u32> {
        let chicks: BTreeSet<_> = self.records.iter().map(|rec| rec.chick).collect();
        chicks.into_iter().collect()
    }

    pub fn diets(&self) -> Vec<u32> {
        let diets: BTreeSet<_> = self.records.iter().map(|rec| rec.diet).collect();
        diets.into_iter().collect()
    }
}
