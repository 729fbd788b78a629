//! Mean weight gain over healthy time steps.

use crate::data::Table;
use crate::error::GrowthError;
use crate::model::Observation;
use crate::stats::compute_mean;
use serde::Serialize;

/// Mean period-over-period weight change of one subject, restricted to
/// healthy observations.
///
/// `observations` must belong to a single subject and be ordered by time.
/// The difference of each observation to its predecessor is kept when the
/// observation itself is healthy (see [`SickFlag::is_healthy`]); the first
/// observation never has a difference.
///
/// # Errors
/// Returns [`GrowthError::MissingField`] when a weight is not finite, and
/// [`GrowthError::NoHealthyObservations`] when no healthy difference exists,
/// which includes empty and single-observation input.
///
/// [`SickFlag::is_healthy`]: crate::model::SickFlag::is_healthy
pub fn weight_gain_when_healthy(observations: &[Observation]) -> Result<f64, GrowthError> {
    if let Some(row) = observations.iter().position(|obs| !obs.weight.is_finite()) {
        return Err(GrowthError::MissingField {
            row,
            field: "weight",
        });
    }

    let healthy_diffs: Vec<f64> = observations
        .windows(2)
        .filter(|pair| pair[1].sick.is_healthy())
        .map(|pair| pair[1].weight - pair[0].weight)
        .collect();

    if healthy_diffs.is_empty() {
        return Err(GrowthError::NoHealthyObservations);
    }
    Ok(compute_mean(&healthy_diffs))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectGain {
    pub chick: u32,
    pub diet: u32,
    pub n_observations: usize,
    /// `None` when the subject has no healthy weight difference.
    pub gain: Option<f64>,
}

/// Healthy weight gain of a single subject of the table.
///
/// # Errors
/// Fails with [`GrowthError::UnknownSubject`] when the table has no rows for
/// `chick`, and with the errors of [`weight_gain_when_healthy`] otherwise.
pub fn healthy_gain_of_subject(table: &Table, chick: u32) -> Result<SubjectGain, GrowthError> {
    let (subject_gain, result) = evaluate_subject(table, chick);
    result.map(|_| subject_gain)
}

/// Healthy weight gain of every subject, ascending by subject id.
pub fn healthy_gain_by_subject(table: &Table) -> Vec<SubjectGain> {
    table
        .subjects()
        .into_iter()
        .map(|chick| {
            let (subject_gain, result) = evaluate_subject(table, chick);
            if let Err(error) = result {
                log::warn!("subject {chick}: {error}");
            }
            subject_gain
        })
        .collect()
}

fn evaluate_subject(table: &Table, chick: u32) -> (SubjectGain, Result<f64, GrowthError>) {
    let observations = table.subject(chick);
    let result = if observations.is_empty() {
        Err(GrowthError::UnknownSubject(chick))
    } else {
        weight_gain_when_healthy(&observations)
    };

    let subject_gain = SubjectGain {
        chick,
        diet: table.subject_diet(chick).unwrap_or_default(),
        n_observations: observations.len(),
        gain: result.as_ref().ok().copied(),
    };
    (subject_gain, result)
}
