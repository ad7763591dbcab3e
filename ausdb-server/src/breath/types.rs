//! Domain types for the respiratory sound dataset
//!
//! Enumerations follow the ICBHI database vocabulary: location, acquisition
//! mode and equipment codes come from the annotation filenames, diagnoses
//! from `patient_diagnosis.csv`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Auscultation location on the chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Tc")]
    Trachea,
    #[serde(rename = "Al")]
    AnteriorLeft,
    #[serde(rename = "Ar")]
    AnteriorRight,
    #[serde(rename = "Pl")]
    PosteriorLeft,
    #[serde(rename = "Pr")]
    PosteriorRight,
    #[serde(rename = "Ll")]
    LateralLeft,
    #[serde(rename = "Lr")]
    LateralRight,
}

impl Location {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Tc" => Some(Location::Trachea),
            "Al" => Some(Location::AnteriorLeft),
            "Ar" => Some(Location::AnteriorRight),
            "Pl" => Some(Location::PosteriorLeft),
            "Pr" => Some(Location::PosteriorRight),
            "Ll" => Some(Location::LateralLeft),
            "Lr" => Some(Location::LateralRight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Trachea => "Tc",
            Location::AnteriorLeft => "Al",
            Location::AnteriorRight => "Ar",
            Location::PosteriorLeft => "Pl",
            Location::PosteriorRight => "Pr",
            Location::LateralLeft => "Ll",
            Location::LateralRight => "Lr",
        }
    }
}

/// Patient sex as recorded in `demographic_info.txt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Patient diagnosis from `patient_diagnosis.csv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Healthy,
    Asthma,
    COPD,
    URTI,
    LRTI,
    Bronchiectasis,
    Pneumonia,
    Bronchiolitis,
}

impl Diagnosis {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Healthy" => Some(Diagnosis::Healthy),
            "Asthma" => Some(Diagnosis::Asthma),
            "COPD" => Some(Diagnosis::COPD),
            "URTI" => Some(Diagnosis::URTI),
            "LRTI" => Some(Diagnosis::LRTI),
            "Bronchiectasis" => Some(Diagnosis::Bronchiectasis),
            "Pneumonia" => Some(Diagnosis::Pneumonia),
            "Bronchiolitis" => Some(Diagnosis::Bronchiolitis),
            _ => None,
        }
    }
}

/// How the recording channels were captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquisitionMode {
    #[serde(rename = "sc")]
    Sequential,
    #[serde(rename = "mc")]
    Simultaneous,
}

impl AcquisitionMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sc" => Some(AcquisitionMode::Sequential),
            "mc" => Some(AcquisitionMode::Simultaneous),
            _ => None,
        }
    }
}

/// Recording equipment code from the annotation filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingEquipment {
    #[serde(rename = "AKGC417L")]
    AkgC417l,
    #[serde(rename = "LittC2SE")]
    LittmannClassicIiSe,
    #[serde(rename = "Litt3200")]
    Littmann3200,
    #[serde(rename = "Meditron")]
    Meditron,
}

impl RecordingEquipment {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AKGC417L" => Some(RecordingEquipment::AkgC417l),
            "LittC2SE" => Some(RecordingEquipment::LittmannClassicIiSe),
            "Litt3200" => Some(RecordingEquipment::Littmann3200),
            "Meditron" => Some(RecordingEquipment::Meditron),
            _ => None,
        }
    }
}

/// Abnormal sound criterion for the random endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundFilter {
    /// Neither crackles nor wheezes anywhere in the case
    None,
    /// Crackles or wheezes somewhere in the case
    Any,
    Crackles,
    Wheezes,
}

impl SoundFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(SoundFilter::None),
            "any" => Some(SoundFilter::Any),
            "crackles" => Some(SoundFilter::Crackles),
            "wheezes" => Some(SoundFilter::Wheezes),
            _ => None,
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// One annotated respiratory cycle, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSegment {
    pub start: f64,
    pub end: f64,
    pub crackles: bool,
    pub wheezes: bool,
}

/// One audio recording at one auscultation location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuscultationTrack {
    pub recording_id: String,
    pub audio_file: String,
    pub location: Location,
    pub acquisition_mode: AcquisitionMode,
    pub recording_equipment: RecordingEquipment,
    pub segments: Vec<SoundSegment>,
}

/// One logical case: a patient's tracks sharing one recording id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub patient_id: u32,
    pub recording_id: String,
    pub age: Option<f64>,
    pub sex: Sex,
    pub bmi: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub diagnosis: Diagnosis,
    pub tracks: Vec<AuscultationTrack>,
}

/// Derived abnormality flags for a track or a whole case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abnormalities {
    pub crackles: bool,
    pub wheezes: bool,
}

impl Abnormalities {
    /// True when either flag is set
    pub fn any(&self) -> bool {
        self.crackles || self.wheezes
    }
}

/// OR-fold of the segment flags; an empty track has no abnormality
pub fn track_abnormalities(track: &AuscultationTrack) -> Abnormalities {
    track
        .segments
        .iter()
        .fold(Abnormalities::default(), |acc, segment| Abnormalities {
            crackles: acc.crackles || segment.crackles,
            wheezes: acc.wheezes || segment.wheezes,
        })
}

/// OR-fold of the per-track aggregates over all of the case's tracks
pub fn case_abnormalities(case: &Case) -> Abnormalities {
    case.tracks
        .iter()
        .fold(Abnormalities::default(), |acc, track| {
            let track = track_abnormalities(track);
            Abnormalities {
                crackles: acc.crackles || track.crackles,
                wheezes: acc.wheezes || track.wheezes,
            }
        })
}
