//! Respiratory case filtering
//!
//! Same contract as the heart engine: AND across specified criteria, OR
//! within a multi-valued criterion, pure over the loaded collection. The
//! sound criterion is evaluated over the case-level abnormality aggregate;
//! the abnormal-location criterion over per-track aggregates.

use super::types::{case_abnormalities, track_abnormalities, Case, Diagnosis, Location, SoundFilter};

/// Filter criteria for the breath collection; empty fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub location: Vec<Location>,
    pub abnormal_location: Vec<Location>,
    pub sound: Option<SoundFilter>,
    pub diagnosis: Vec<Diagnosis>,
}

/// Narrow `cases` to those matching every specified criterion
pub fn filter<'a>(cases: &'a [Case], params: &FilterParams) -> Vec<&'a Case> {
    cases.iter().filter(|c| matches(c, params)).collect()
}

fn matches(case: &Case, params: &FilterParams) -> bool {
    if !params.location.is_empty()
        && !case
            .tracks
            .iter()
            .any(|t| params.location.contains(&t.location))
    {
        return false;
    }

    if !params.abnormal_location.is_empty()
        && !case.tracks.iter().any(|t| {
            track_abnormalities(t).any() && params.abnormal_location.contains(&t.location)
        })
    {
        return false;
    }

    if let Some(sound) = params.sound {
        let abnormalities = case_abnormalities(case);
        let holds = match sound {
            SoundFilter::None => !abnormalities.any(),
            SoundFilter::Any => abnormalities.any(),
            SoundFilter::Crackles => abnormalities.crackles,
            SoundFilter::Wheezes => abnormalities.wheezes,
        };
        if !holds {
            return false;
        }
    }

    if !params.diagnosis.is_empty() && !params.diagnosis.contains(&case.diagnosis) {
        return false;
    }

    true
}
