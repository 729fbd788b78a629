use crate::data::Table;
use crate::stats::Accumulator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Treatment of the first observation of each subject, which has no
/// previous weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstIncrease {
    /// Its increase is zero.
    #[default]
    Zero,
    /// It is left out.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Increase {
    pub chick: u32,
    pub diet: u32,
    pub time: u32,
    pub weight: f64,
    pub increase: f64,
}

/// Weight increase of every record relative to the previous record of the
/// same subject, in table order.
pub fn weight_increases(table: &Table, policy: FirstIncrease) -> Vec<Increase> {
    let mut prev_weights: HashMap<u32, f64> = HashMap::new();
    table
        .records()
        .iter()
        .filter_map(|rec| {
            let increase = match (prev_weights.insert(rec.chick, rec.weight), policy) {
                (Some(prev_weight), _) => rec.weight - prev_weight,
                (None, FirstIncrease::Zero) => 0.0,
                (None, FirstIncrease::Drop) => return None,
            };
            Some(Increase {
                chick: rec.chick,
                diet: rec.diet,
                time: rec.time,
                weight: rec.weight,
                increase,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeGrowth {
    pub time: u32,
    pub n_records: usize,
    pub mean_increase: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DietTimeGrowth {
    pub time: u32,
    pub diet: u32,
    pub n_records: usize,
    pub mean_increase: f64,
    pub std_dev: f64,
}

/// Mean increase per time step.
pub fn growth_by_time(increases: &[Increase]) -> Vec<TimeGrowth> {
    let mut acc_map: BTreeMap<u32, Accumulator> = BTreeMap::new();
    for inc in increases {
        acc_map.entry(inc.time).or_default().add(inc.increase);
    }

    acc_map
        .into_iter()
        .map(|(time, acc)| {
            let report = acc.report();
            TimeGrowth {
                time,
                n_records: report.n_vals,
                mean_increase: report.mean,
                std_dev: report.std_dev,
            }
        })
        .collect()
}

/// Mean increase per time step and diet.
pub fn growth_by_time_and_diet(increases: &[Increase]) -> Vec<DietTimeGrowth> {
    let mut acc_map: BTreeMap<(u32, u32), Accumulator> = BTreeMap::new();
    for inc in increases {
        acc_map
            .entry((inc.time, inc.diet))
            .or_default()
            .add(inc.increase);
    }

    acc_map
        .into_iter()
        .map(|((time, diet), acc)| {
            let report = acc.report();
            log::debug!("time {time}, diet {diet}: {report:?}");
            DietTimeGrowth {
                time,
                diet,
                n_records: report.n_vals,
                mean_increase: report.mean,
                std_dev: report.std_dev,
            }
        })
        .collect()
}
