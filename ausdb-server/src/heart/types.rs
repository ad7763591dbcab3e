//! Domain types for the heart sound dataset
//!
//! Closed enumerations mirror the raw vocabulary of the demographics CSV;
//! parsing is strict and returns `None` for unrecognized raw values so the
//! loader can fail loudly instead of defaulting.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Auscultation location on the chest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "PV")]
    Pulmonary,
    #[serde(rename = "TV")]
    Tricuspid,
    #[serde(rename = "AV")]
    Aortic,
    #[serde(rename = "MV")]
    Mitral,
    #[serde(rename = "Phc")]
    Other,
}

impl Location {
    /// Parse a dataset/query code ("PV", "TV", "AV", "MV", "Phc")
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PV" => Some(Location::Pulmonary),
            "TV" => Some(Location::Tricuspid),
            "AV" => Some(Location::Aortic),
            "MV" => Some(Location::Mitral),
            "Phc" => Some(Location::Other),
            _ => None,
        }
    }

    /// Canonical dataset code
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Pulmonary => "PV",
            Location::Tricuspid => "TV",
            Location::Aortic => "AV",
            Location::Mitral => "MV",
            Location::Other => "Phc",
        }
    }
}

/// Patient age bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Age {
    Neonate,
    Infant,
    Child,
    Adolescent,
    #[serde(rename = "Young adult")]
    YoungAdult,
}

impl Age {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Neonate" => Some(Age::Neonate),
            "Infant" => Some(Age::Infant),
            "Child" => Some(Age::Child),
            "Adolescent" => Some(Age::Adolescent),
            "Young adult" => Some(Age::YoungAdult),
            _ => None,
        }
    }
}

/// Patient sex as recorded in the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Sex::Male),
            "Female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Annotator's overall murmur assessment for the patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MurmurStatus {
    Present,
    Absent,
    Unknown,
}

impl MurmurStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Present" => Some(MurmurStatus::Present),
            "Absent" => Some(MurmurStatus::Absent),
            "Unknown" => Some(MurmurStatus::Unknown),
            _ => None,
        }
    }
}

/// Murmur timing within its cardiac phase
///
/// The CSV qualifies the timing with the phase ("Early-systolic",
/// "Holodiastolic", ...); the phase is already carried by which murmur slot
/// the descriptor occupies, so only the bare timing is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MurmurTiming {
    Early,
    Holo,
    Mid,
    Late,
}

impl MurmurTiming {
    /// Parse a bare query value ("Early", "Holo", "Mid", "Late")
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Early" => Some(MurmurTiming::Early),
            "Holo" => Some(MurmurTiming::Holo),
            "Mid" => Some(MurmurTiming::Mid),
            "Late" => Some(MurmurTiming::Late),
            _ => None,
        }
    }

    /// Parse a phase-qualified CSV descriptor by timing prefix
    pub fn from_descriptor(desc: &str) -> Option<Self> {
        if desc.starts_with("Early") {
            Some(MurmurTiming::Early)
        } else if desc.starts_with("Holo") {
            Some(MurmurTiming::Holo)
        } else if desc.starts_with("Mid") {
            Some(MurmurTiming::Mid)
        } else if desc.starts_with("Late") {
            Some(MurmurTiming::Late)
        } else {
            None
        }
    }
}

/// Murmur intensity envelope shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MurmurShape {
    Crescendo,
    Decrescendo,
    Diamond,
    Plateau,
}

impl MurmurShape {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Crescendo" => Some(MurmurShape::Crescendo),
            "Decrescendo" => Some(MurmurShape::Decrescendo),
            "Diamond" => Some(MurmurShape::Diamond),
            "Plateau" => Some(MurmurShape::Plateau),
            _ => None,
        }
    }
}

/// Murmur loudness grade
///
/// The CSV writes systolic grades over VI ("II/VI") and diastolic grades
/// over IV ("II/IV"). The denominator is a display detail of the annotation
/// scale, so only the Roman grade is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MurmurGrading {
    #[serde(rename = "I")]
    Grade1,
    #[serde(rename = "II")]
    Grade2,
    #[serde(rename = "III")]
    Grade3,
}

impl MurmurGrading {
    /// Parse a bare query value ("I", "II", "III")
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "I" => Some(MurmurGrading::Grade1),
            "II" => Some(MurmurGrading::Grade2),
            "III" => Some(MurmurGrading::Grade3),
            _ => None,
        }
    }

    /// Parse a CSV descriptor ("II/VI", "II/IV"), ignoring the scale
    pub fn from_descriptor(desc: &str) -> Option<Self> {
        let grade = desc.split('/').next()?;
        Self::from_str(grade)
    }
}

/// Murmur pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MurmurPitch {
    Low,
    Medium,
    High,
}

impl MurmurPitch {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(MurmurPitch::Low),
            "Medium" => Some(MurmurPitch::Medium),
            "High" => Some(MurmurPitch::High),
            _ => None,
        }
    }
}

/// Murmur sound quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MurmurQuality {
    Blowing,
    Harsh,
    Musical,
}

impl MurmurQuality {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Blowing" => Some(MurmurQuality::Blowing),
            "Harsh" => Some(MurmurQuality::Harsh),
            "Musical" => Some(MurmurQuality::Musical),
            _ => None,
        }
    }
}

/// Data collection campaign the patient belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Campaign {
    CC2014,
    CC2015,
}

impl Campaign {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CC2014" => Some(Campaign::CC2014),
            "CC2015" => Some(Campaign::CC2015),
            _ => None,
        }
    }
}

/// Sound wave category of one annotated segment
///
/// Serialized as the dataset's numeric code (0 = unannotated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SoundWave {
    Unknown = 0,
    S1 = 1,
    Systolic = 2,
    S2 = 3,
    Diastolic = 4,
}

impl From<SoundWave> for u8 {
    fn from(wave: SoundWave) -> u8 {
        wave as u8
    }
}

impl TryFrom<u8> for SoundWave {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SoundWave::Unknown),
            1 => Ok(SoundWave::S1),
            2 => Ok(SoundWave::Systolic),
            3 => Ok(SoundWave::S2),
            4 => Ok(SoundWave::Diastolic),
            _ => Err(format!("unknown sound wave code: {}", code)),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// One murmur descriptor; present independently for each cardiac phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Murmur {
    pub timing: MurmurTiming,
    pub shape: MurmurShape,
    pub grading: MurmurGrading,
    pub pitch: MurmurPitch,
    pub quality: MurmurQuality,
}

/// One annotated time interval within a recording, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundSegment {
    pub start: f64,
    pub end: f64,
    #[serde(rename = "type")]
    pub wave: SoundWave,
}

/// One audio recording at one auscultation location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuscultationTrack {
    pub location: Location,
    pub header_file: String,
    pub audio_file: String,
    pub segments: Vec<SoundSegment>,
}

/// One patient record: demographics, murmur annotations, and sound tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: u32,
    pub locations: Vec<Location>,
    pub age: Option<Age>,
    pub sex: Sex,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub is_pregnant: bool,
    pub murmur: MurmurStatus,
    pub murmur_locations: Vec<Location>,
    pub most_audible: Option<Location>,
    pub systolic_murmur: Option<Murmur>,
    pub diastolic_murmur: Option<Murmur>,
    pub campaign: Campaign,
    pub additional_id: Option<u32>,
    pub tracks: Vec<AuscultationTrack>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_round_trip() {
        for code in ["PV", "TV", "AV", "MV", "Phc"] {
            let location = Location::from_str(code).unwrap();
            assert_eq!(location.as_str(), code);
        }
        assert_eq!(Location::from_str("XX"), None);
    }

    #[test]
    fn test_timing_from_phase_qualified_descriptor() {
        assert_eq!(
            MurmurTiming::from_descriptor("Early-systolic"),
            Some(MurmurTiming::Early)
        );
        assert_eq!(
            MurmurTiming::from_descriptor("Holosystolic"),
            Some(MurmurTiming::Holo)
        );
        assert_eq!(
            MurmurTiming::from_descriptor("Mid-diastolic"),
            Some(MurmurTiming::Mid)
        );
        assert_eq!(
            MurmurTiming::from_descriptor("Late-systolic"),
            Some(MurmurTiming::Late)
        );
        assert_eq!(MurmurTiming::from_descriptor("Pansystolic"), None);
    }

    #[test]
    fn test_grading_ignores_scale_denominator() {
        assert_eq!(
            MurmurGrading::from_descriptor("II/VI"),
            Some(MurmurGrading::Grade2)
        );
        assert_eq!(
            MurmurGrading::from_descriptor("II/IV"),
            Some(MurmurGrading::Grade2)
        );
        assert_eq!(MurmurGrading::from_descriptor("IV/VI"), None);
    }

    #[test]
    fn test_sound_wave_numeric_codes() {
        assert_eq!(SoundWave::try_from(1).unwrap(), SoundWave::S1);
        assert_eq!(SoundWave::try_from(4).unwrap(), SoundWave::Diastolic);
        assert!(SoundWave::try_from(5).is_err());
        assert_eq!(u8::from(SoundWave::Systolic), 2);
    }

    #[test]
    fn test_patient_json_is_camel_case() {
        let patient = Patient {
            patient_id: 1,
            locations: vec![Location::Aortic],
            age: Some(Age::YoungAdult),
            sex: Sex::Female,
            height: None,
            weight: Some(63.5),
            is_pregnant: false,
            murmur: MurmurStatus::Absent,
            murmur_locations: vec![],
            most_audible: None,
            systolic_murmur: None,
            diastolic_murmur: None,
            campaign: Campaign::CC2015,
            additional_id: None,
            tracks: vec![],
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["patientId"], 1);
        assert_eq!(json["age"], "Young adult");
        assert_eq!(json["isPregnant"], false);
        assert!(json["height"].is_null());
        assert_eq!(json["mostAudible"], serde_json::Value::Null);
    }
}
