//! Heart patient filtering
//!
//! A filter is a set of independent criteria, each optionally multi-valued.
//! A patient matches when every specified criterion holds (AND across
//! criteria); a multi-valued criterion holds when any of its values matches
//! (OR within the criterion). Filtering is a pure function of the loaded
//! collection and the criteria.

use super::types::{
    Location, Murmur, MurmurGrading, MurmurPitch, MurmurQuality, MurmurShape, MurmurStatus,
    MurmurTiming, Patient,
};

/// Murmur presence criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MurmurFilter {
    /// Murmur annotated as absent
    None,
    /// Murmur annotated as present, in either phase
    Any,
    /// A systolic murmur descriptor exists
    Systolic,
    /// A diastolic murmur descriptor exists
    Diastolic,
}

impl MurmurFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(MurmurFilter::None),
            "any" => Some(MurmurFilter::Any),
            "systolic" => Some(MurmurFilter::Systolic),
            "diastolic" => Some(MurmurFilter::Diastolic),
            _ => None,
        }
    }
}

/// Filter criteria for the heart collection; empty fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub location: Vec<Location>,
    pub murmur: Option<MurmurFilter>,
    pub murmur_location: Vec<Location>,
    pub most_audible: Vec<Location>,
    pub timing: Vec<MurmurTiming>,
    pub shape: Vec<MurmurShape>,
    pub grading: Vec<MurmurGrading>,
    pub pitch: Vec<MurmurPitch>,
    pub quality: Vec<MurmurQuality>,
}

/// Narrow `patients` to those matching every specified criterion
pub fn filter<'a>(patients: &'a [Patient], params: &FilterParams) -> Vec<&'a Patient> {
    patients.iter().filter(|p| matches(p, params)).collect()
}

fn matches(patient: &Patient, params: &FilterParams) -> bool {
    if !params.location.is_empty()
        && !patient
            .locations
            .iter()
            .any(|l| params.location.contains(l))
    {
        return false;
    }

    if let Some(murmur) = params.murmur {
        let holds = match murmur {
            MurmurFilter::None => patient.murmur == MurmurStatus::Absent,
            MurmurFilter::Any => patient.murmur == MurmurStatus::Present,
            MurmurFilter::Systolic => patient.systolic_murmur.is_some(),
            MurmurFilter::Diastolic => patient.diastolic_murmur.is_some(),
        };
        if !holds {
            return false;
        }
    }

    if !params.murmur_location.is_empty()
        && !patient
            .murmur_locations
            .iter()
            .any(|l| params.murmur_location.contains(l))
    {
        return false;
    }

    if !params.most_audible.is_empty()
        && !patient
            .most_audible
            .map_or(false, |l| params.most_audible.contains(&l))
    {
        return false;
    }

    let phases = descriptor_phases(patient, params);
    descriptor_matches(&params.timing, &phases, |m| m.timing)
        && descriptor_matches(&params.shape, &phases, |m| m.shape)
        && descriptor_matches(&params.grading, &phases, |m| m.grading)
        && descriptor_matches(&params.pitch, &phases, |m| m.pitch)
        && descriptor_matches(&params.quality, &phases, |m| m.quality)
}

/// Murmur phases a descriptor criterion is evaluated over.
///
/// A descriptor criterion (timing, shape, grading, pitch, quality) matches
/// against either phase, unless the murmur presence filter pins it to one.
fn descriptor_phases<'a>(patient: &'a Patient, params: &FilterParams) -> [Option<&'a Murmur>; 2] {
    match params.murmur {
        Some(MurmurFilter::Systolic) => [patient.systolic_murmur.as_ref(), None],
        Some(MurmurFilter::Diastolic) => [patient.diastolic_murmur.as_ref(), None],
        _ => [
            patient.systolic_murmur.as_ref(),
            patient.diastolic_murmur.as_ref(),
        ],
    }
}

fn descriptor_matches<T: PartialEq>(
    wanted: &[T],
    phases: &[Option<&Murmur>; 2],
    field: impl Fn(&Murmur) -> T,
) -> bool {
    wanted.is_empty()
        || phases
            .iter()
            .flatten()
            .any(|murmur| wanted.contains(&field(murmur)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heart::types::{Age, Campaign, Sex};

    fn murmur(timing: MurmurTiming, grading: MurmurGrading) -> Murmur {
        Murmur {
            timing,
            shape: MurmurShape::Diamond,
            grading,
            pitch: MurmurPitch::Medium,
            quality: MurmurQuality::Harsh,
        }
    }

    fn patient(id: u32, locations: Vec<Location>) -> Patient {
        Patient {
            patient_id: id,
            locations,
            age: Some(Age::Child),
            sex: Sex::Female,
            height: None,
            weight: None,
            is_pregnant: false,
            murmur: MurmurStatus::Absent,
            murmur_locations: vec![],
            most_audible: None,
            systolic_murmur: None,
            diastolic_murmur: None,
            campaign: Campaign::CC2015,
            additional_id: None,
            tracks: vec![],
        }
    }

    /// Three-patient fixture: only patient 2 has location PV and a systolic murmur
    fn fixture() -> Vec<Patient> {
        let mut one = patient(1, vec![Location::Aortic, Location::Mitral]);
        one.murmur = MurmurStatus::Present;
        one.murmur_locations = vec![Location::Aortic];
        one.most_audible = Some(Location::Aortic);
        one.systolic_murmur = Some(murmur(MurmurTiming::Early, MurmurGrading::Grade1));

        let mut two = patient(2, vec![Location::Pulmonary, Location::Tricuspid]);
        two.murmur = MurmurStatus::Present;
        two.murmur_locations = vec![Location::Pulmonary];
        two.most_audible = Some(Location::Pulmonary);
        two.systolic_murmur = Some(murmur(MurmurTiming::Holo, MurmurGrading::Grade2));
        two.diastolic_murmur = Some(murmur(MurmurTiming::Mid, MurmurGrading::Grade1));

        let three = patient(3, vec![Location::Mitral]);

        vec![one, two, three]
    }

    fn ids(selected: &[&Patient]) -> Vec<u32> {
        selected.iter().map(|p| p.patient_id).collect()
    }

    #[test]
    fn test_empty_filter_returns_full_collection() {
        let patients = fixture();
        let selected = filter(&patients, &FilterParams::default());
        assert_eq!(ids(&selected), vec![1, 2, 3]);
    }

    #[test]
    fn test_result_is_subset_and_filter_is_idempotent() {
        let patients = fixture();
        let params = FilterParams {
            murmur: Some(MurmurFilter::Any),
            ..Default::default()
        };
        let selected = filter(&patients, &params);
        assert!(selected.iter().all(|s| patients.iter().any(|p| p.patient_id == s.patient_id)));

        // Filtering the already-filtered subset changes nothing
        let owned: Vec<Patient> = selected.iter().map(|p| (*p).clone()).collect();
        let again = filter(&owned, &params);
        assert_eq!(ids(&again), ids(&selected));
    }

    #[test]
    fn test_multi_valued_location_behaves_as_or() {
        let patients = fixture();
        let both = filter(
            &patients,
            &FilterParams {
                location: vec![Location::Pulmonary, Location::Mitral],
                ..Default::default()
            },
        );

        let pv = filter(
            &patients,
            &FilterParams {
                location: vec![Location::Pulmonary],
                ..Default::default()
            },
        );
        let mv = filter(
            &patients,
            &FilterParams {
                location: vec![Location::Mitral],
                ..Default::default()
            },
        );

        let mut union = ids(&pv);
        for id in ids(&mv) {
            if !union.contains(&id) {
                union.push(id);
            }
        }
        union.sort_unstable();
        assert_eq!(ids(&both), union);
    }

    #[test]
    fn test_murmur_presence_filters() {
        let patients = fixture();

        let none = filter(
            &patients,
            &FilterParams {
                murmur: Some(MurmurFilter::None),
                ..Default::default()
            },
        );
        assert_eq!(ids(&none), vec![3]);

        let any = filter(
            &patients,
            &FilterParams {
                murmur: Some(MurmurFilter::Any),
                ..Default::default()
            },
        );
        assert_eq!(ids(&any), vec![1, 2]);

        let diastolic = filter(
            &patients,
            &FilterParams {
                murmur: Some(MurmurFilter::Diastolic),
                ..Default::default()
            },
        );
        assert_eq!(ids(&diastolic), vec![2]);
    }

    #[test]
    fn test_descriptor_matches_either_phase_by_default() {
        let patients = fixture();
        // Mid timing exists only in patient 2's diastolic murmur
        let selected = filter(
            &patients,
            &FilterParams {
                timing: vec![MurmurTiming::Mid],
                ..Default::default()
            },
        );
        assert_eq!(ids(&selected), vec![2]);
    }

    #[test]
    fn test_phase_filter_pins_descriptor_to_that_phase() {
        let patients = fixture();
        // With the systolic filter set, patient 2's diastolic Mid timing
        // no longer counts
        let selected = filter(
            &patients,
            &FilterParams {
                murmur: Some(MurmurFilter::Systolic),
                timing: vec![MurmurTiming::Mid],
                ..Default::default()
            },
        );
        assert!(selected.is_empty());

        let holo = filter(
            &patients,
            &FilterParams {
                murmur: Some(MurmurFilter::Systolic),
                timing: vec![MurmurTiming::Holo],
                ..Default::default()
            },
        );
        assert_eq!(ids(&holo), vec![2]);
    }

    #[test]
    fn test_grading_filter_spans_phases() {
        let patients = fixture();
        let selected = filter(
            &patients,
            &FilterParams {
                grading: vec![MurmurGrading::Grade1],
                ..Default::default()
            },
        );
        assert_eq!(ids(&selected), vec![1, 2]);
    }

    #[test]
    fn test_most_audible_and_murmur_location() {
        let patients = fixture();
        let selected = filter(
            &patients,
            &FilterParams {
                most_audible: vec![Location::Pulmonary, Location::Aortic],
                murmur_location: vec![Location::Pulmonary],
                ..Default::default()
            },
        );
        assert_eq!(ids(&selected), vec![2]);
    }

    #[test]
    fn test_pv_location_with_systolic_murmur_selects_single_patient() {
        let patients = fixture();
        let selected = filter(
            &patients,
            &FilterParams {
                location: vec![Location::Pulmonary],
                murmur: Some(MurmurFilter::Systolic),
                ..Default::default()
            },
        );
        assert_eq!(ids(&selected), vec![2]);
    }
}
