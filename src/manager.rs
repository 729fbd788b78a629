use crate::config::Config;
use crate::data::Table;
use crate::growth::{self, DietTimeGrowth, Increase, TimeGrowth};
use crate::healthy;
use crate::summary;
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(Serialize)]
struct GrowthReport {
    increases: Vec<Increase>,
    by_time: Vec<TimeGrowth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_time_and_diet: Option<Vec<DietTimeGrowth>>,
}

/// Runs analyses on the records of a study directory.
pub struct Manager {
    study_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(study_dir: P) -> Result<Self> {
        let study_dir = study_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(study_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { study_dir, cfg })
    }

    pub fn healthy_gain(&self, chick: Option<u32>) -> Result<()> {
        let table = self.load_table().context("failed to load table")?;

        let gains = match chick {
            None => healthy::healthy_gain_by_subject(&table),
            Some(chick) => {
                let subject_gain = healthy::healthy_gain_of_subject(&table, chick)
                    .with_context(|| format!("failed to compute gain of subject {chick}"))?;
                log::info!("{subject_gain:?}");
                vec![subject_gain]
            }
        };

        self.save_results("healthy-gain.json", &gains)
            .context("failed to save healthy gains")?;

        Ok(())
    }

    pub fn growth(&self) -> Result<()> {
        let table = self.load_table().context("failed to load table")?;

        let increases = growth::weight_increases(&table, self.cfg.growth.first_increase);
        let by_time = growth::growth_by_time(&increases);
        let by_time_and_diet = self
            .cfg
            .growth
            .by_diet
            .then(|| growth::growth_by_time_and_diet(&increases));

        let report = GrowthReport {
            increases,
            by_time,
            by_time_and_diet,
        };
        self.save_results("growth.json", &report)
            .context("failed to save growth")?;

        Ok(())
    }

    pub fn summarize(&self) -> Result<()> {
        let table = self.load_table().context("failed to load table")?;

        let summaries = summary::summarize_by_diet_time(&table);
        log::info!("summarized {} groups", summaries.len());
        self.save_results("summary.json", &summaries)
            .context("failed to save summary")?;

        let annotated = summary::annotate(&table);
        self.save_results("annotated.json", &annotated)
            .context("failed to save annotated records")?;

        let joined = summary::join_summaries(&table, &summaries);
        self.save_results("joined.json", &joined)
            .context("failed to save joined records")?;

        Ok(())
    }

    pub fn clean(&self) -> Result<()> {
        let results_dir = self.results_dir();
        if results_dir.exists() {
            fs::remove_dir_all(&results_dir)
                .with_context(|| format!("failed to remove {results_dir:?}"))?;
            log::info!("removed {results_dir:?}");
        }
        Ok(())
    }

    fn load_table(&self) -> Result<Table> {
        let pattern = self.study_dir.join(&self.cfg.input.records_file);
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let table = Table::from_pattern(pattern)?;
        log::info!("loaded {} records of {} subjects", table.len(), table.subjects().len());
        Ok(table)
    }

    fn save_results<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let results_dir = self.results_dir();
        fs::create_dir_all(&results_dir)
            .with_context(|| format!("failed to create {results_dir:?}"))?;

        let file = results_dir.join(name);
        let file = File::create(&file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);

        if self.cfg.output.pretty {
            serde_json::to_writer_pretty(&mut writer, value)?;
        } else {
            serde_json::to_writer(&mut writer, value)?;
        }
        writer.flush().context("failed to flush writer stream")?;

        log::info!("saved {name}");
        Ok(())
    }

    fn results_dir(&self) -> PathBuf {
        self.study_dir.join("results")
    }
}
