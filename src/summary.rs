//! Grouped statistics over (diet, time) and their row-level broadcasts.

use crate::data::Table;
use crate::model::Record;
use crate::stats::{Accumulator, compute_mean, compute_median, compute_var};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub diet: u32,
    pub time: u32,
    pub n_records: usize,
    pub max_chick: u32,
    pub weight_mean: f64,
    pub weight_std: f64,
    pub weight_median: f64,
}

/// Weight statistics for every (diet, time) group, ascending by key.
pub fn summarize_by_diet_time(table: &Table) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<(u32, u32), Vec<&Record>> = BTreeMap::new();
    for rec in table.records() {
        groups.entry((rec.diet, rec.time)).or_default().push(rec);
    }

    groups
        .into_iter()
        .map(|((diet, time), recs)| {
            let weights: Vec<f64> = recs.iter().map(|rec| rec.weight).collect();
            GroupSummary {
                diet,
                time,
                n_records: recs.len(),
                max_chick: recs.iter().map(|rec| rec.chick).max().unwrap_or_default(),
                weight_mean: compute_mean(&weights),
                weight_std: compute_var(&weights).sqrt(),
                weight_median: compute_median(&weights),
            }
        })
        .collect()
}

/// Record with group statistics broadcast onto it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotated {
    #[serde(flatten)]
    pub record: Record,
    pub mean_weight_diet: f64,
    pub mean_weight_diet_time: f64,
    pub n_chicks_diet: usize,
}

pub fn annotate(table: &Table) -> Vec<Annotated> {
    let mut diet_accs: HashMap<u32, Accumulator> = HashMap::new();
    let mut diet_time_accs: HashMap<(u32, u32), Accumulator> = HashMap::new();
    let mut diet_chicks: HashMap<u32, BTreeSet<u32>> = HashMap::new();
    for rec in table.records() {
        diet_accs.entry(rec.diet).or_default().add(rec.weight);
        diet_time_accs
            .entry((rec.diet, rec.time))
            .or_default()
            .add(rec.weight);
        diet_chicks.entry(rec.diet).or_default().insert(rec.chick);
    }

    let mean_of = |acc: Option<&Accumulator>| acc.map_or(f64::NAN, |acc| acc.report().mean);

    table
        .records()
        .iter()
        .map(|rec| Annotated {
            record: *rec,
            mean_weight_diet: mean_of(diet_accs.get(&rec.diet)),
            mean_weight_diet_time: mean_of(diet_time_accs.get(&(rec.diet, rec.time))),
            n_chicks_diet: diet_chicks.get(&rec.diet).map_or(0, BTreeSet::len),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Joined {
    #[serde(flatten)]
    pub record: Record,
    pub summary: Option<GroupSummary>,
}

/// Left join of group summaries onto records by (diet, time).
pub fn join_summaries(table: &Table, summaries: &[GroupSummary]) -> Vec<Joined> {
    let by_key: HashMap<(u32, u32), &GroupSummary> = summaries
        .iter()
        .map(|summary| ((summary.diet, summary.time), summary))
        .collect();

    table
        .records()
        .iter()
        .map(|rec| Joined {
            record: *rec,
            summary: by_key.get(&(rec.diet, rec.time)).map(|&summary| *summary),
        })
        .collect()
}
