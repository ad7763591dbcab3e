//! Respiratory dataset loading
//!
//! Joins three sources by patient id: `demographic_info.txt`,
//! `patient_diagnosis.csv`, and the per-track annotation files in
//! `audio_and_txt_files/`. Each physical patient is then split into one
//! logical case per distinct recording id, merging same-recording tracks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ausdb_common::{Error, Result};
use futures::future::try_join_all;
use tracing::info;

use super::types::{
    AcquisitionMode, AuscultationTrack, Case, Diagnosis, Location, RecordingEquipment, Sex,
    SoundSegment,
};

/// Dataset subdirectory holding the annotation and audio files
const TRACKS_DIR: &str = "Respiratory_Sound_Database/Respiratory_Sound_Database/audio_and_txt_files";

/// Diagnosis table path inside the dataset
const DIAGNOSIS_CSV: &str = "Respiratory_Sound_Database/Respiratory_Sound_Database/patient_diagnosis.csv";

/// Read-only collection of respiratory cases, built once at startup
#[derive(Debug)]
pub struct BreathRepository {
    cases: Vec<Case>,
}

impl BreathRepository {
    pub fn new(cases: Vec<Case>) -> Self {
        Self { cases }
    }

    /// The full collection, in first-appearance order
    pub fn all(&self) -> &[Case] {
        &self.cases
    }

    /// Exact lookup by (patient id, recording id)
    pub fn find(&self, patient_id: u32, recording_id: &str) -> Option<&Case> {
        self.cases
            .iter()
            .find(|c| c.patient_id == patient_id && c.recording_id == recording_id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Load the respiratory dataset from `dir` (the `breath-data` folder)
pub async fn load(dir: &Path) -> Result<BreathRepository> {
    info!("Breath sounds: reading patient index");
    let demographics = parse_demographics(
        &tokio::fs::read_to_string(dir.join("demographic_info.txt")).await?,
    )?;
    let diagnoses = parse_diagnoses(&dir.join(DIAGNOSIS_CSV))?;

    info!("Breath sounds: populating sound tracks");
    let tracks_dir = dir.join(TRACKS_DIR);
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(&tracks_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".txt") {
            names.push(name);
        }
    }
    // Directory order is platform-dependent; sort for a stable collection
    names.sort();

    let parsed = try_join_all(
        names
            .into_iter()
            .map(|name| load_track(tracks_dir.clone(), name)),
    )
    .await?;

    let mut tracks_by_patient: HashMap<u32, Vec<AuscultationTrack>> = HashMap::new();
    for (patient_id, track) in parsed {
        tracks_by_patient.entry(patient_id).or_default().push(track);
    }

    info!("Breath sounds: splitting patients into cases");
    let mut cases: Vec<Case> = Vec::new();
    let mut case_index: HashMap<(u32, String), usize> = HashMap::new();
    for row in demographics {
        let diagnosis = *diagnoses.get(&row.patient_id).ok_or_else(|| {
            Error::Parse(format!(
                "patient_diagnosis.csv: no diagnosis for patient {}",
                row.patient_id
            ))
        })?;
        for track in tracks_by_patient.remove(&row.patient_id).unwrap_or_default() {
            let key = (row.patient_id, track.recording_id.clone());
            match case_index.get(&key).copied() {
                Some(index) => cases[index].tracks.push(track),
                None => {
                    case_index.insert(key, cases.len());
                    cases.push(Case {
                        patient_id: row.patient_id,
                        recording_id: track.recording_id.clone(),
                        age: row.age,
                        sex: row.sex,
                        bmi: row.bmi,
                        weight: row.weight,
                        height: row.height,
                        diagnosis,
                        tracks: vec![track],
                    });
                }
            }
        }
    }

    info!("Breath sounds: {} cases loaded", cases.len());
    Ok(BreathRepository::new(cases))
}

// ============================================================================
// Demographics and diagnosis tables
// ============================================================================

struct DemographicRow {
    patient_id: u32,
    age: Option<f64>,
    sex: Sex,
    bmi: Option<f64>,
    weight: Option<f64>,
    height: Option<f64>,
}

fn parse_demographics(data: &str) -> Result<Vec<DemographicRow>> {
    data.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            let field = |index: usize| -> Result<&str> {
                cols.get(index).copied().ok_or_else(|| {
                    Error::Parse(format!(
                        "demographic_info.txt: missing column {} in {:?}",
                        index + 1,
                        line
                    ))
                })
            };
            Ok(DemographicRow {
                patient_id: field(0)?.parse::<u32>().map_err(|_| {
                    Error::Parse(format!(
                        "demographic_info.txt: bad patient id in {:?}",
                        line
                    ))
                })?,
                age: parse_optional_f64(field(1)?, line)?,
                sex: Sex::from_str(field(2)?).ok_or_else(|| {
                    Error::Parse(format!("demographic_info.txt: unknown sex in {:?}", line))
                })?,
                bmi: parse_optional_f64(field(3)?, line)?,
                weight: parse_optional_f64(field(4)?, line)?,
                height: parse_optional_f64(field(5)?, line)?,
            })
        })
        .collect()
}

/// `NA` marks an absent measurement
fn parse_optional_f64(field: &str, line: &str) -> Result<Option<f64>> {
    if field == "NA" {
        return Ok(None);
    }
    field
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::Parse(format!("demographic_info.txt: bad number in {:?}", line)))
}

fn parse_diagnoses(path: &Path) -> Result<HashMap<u32, Diagnosis>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;

    let mut diagnoses = HashMap::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::Parse(format!("patient_diagnosis.csv row {}: {}", index + 1, e))
        })?;
        let bad_row = || {
            Error::Parse(format!(
                "patient_diagnosis.csv row {}: {:?}",
                index + 1,
                record
            ))
        };
        let patient_id = record
            .get(0)
            .and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(bad_row)?;
        let diagnosis = record
            .get(1)
            .and_then(Diagnosis::from_str)
            .ok_or_else(bad_row)?;
        diagnoses.insert(patient_id, diagnosis);
    }
    Ok(diagnoses)
}

// ============================================================================
// Annotation files
// ============================================================================

/// Filename fields parsed out of `{patient}_{recording}_{location}_{mode}_{equipment}.txt`
struct TrackName {
    patient_id: u32,
    recording_id: String,
    audio_file: String,
    location: Location,
    acquisition_mode: AcquisitionMode,
    recording_equipment: RecordingEquipment,
}

fn parse_track_name(name: &str) -> Result<TrackName> {
    let bad_name = || Error::Parse(format!("unexpected annotation filename {:?}", name));

    let stem = name.strip_suffix(".txt").ok_or_else(bad_name)?;
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() != 5 {
        return Err(bad_name());
    }

    Ok(TrackName {
        patient_id: parts[0].parse::<u32>().map_err(|_| bad_name())?,
        recording_id: parts[1].to_string(),
        audio_file: format!("{}.wav", stem),
        location: Location::from_str(parts[2]).ok_or_else(bad_name)?,
        acquisition_mode: AcquisitionMode::from_str(parts[3]).ok_or_else(bad_name)?,
        recording_equipment: RecordingEquipment::from_str(parts[4]).ok_or_else(bad_name)?,
    })
}

async fn load_track(tracks_dir: PathBuf, name: String) -> Result<(u32, AuscultationTrack)> {
    let props = parse_track_name(&name)?;
    let data = tokio::fs::read_to_string(tracks_dir.join(&name)).await?;

    let segments = data
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_segment_line(line, &name))
        .collect::<Result<Vec<SoundSegment>>>()?;

    Ok((
        props.patient_id,
        AuscultationTrack {
            recording_id: props.recording_id,
            audio_file: props.audio_file,
            location: props.location,
            acquisition_mode: props.acquisition_mode,
            recording_equipment: props.recording_equipment,
            segments,
        },
    ))
}

fn parse_segment_line(line: &str, name: &str) -> Result<SoundSegment> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 4 {
        return Err(Error::Parse(format!(
            "{}: short annotation line {:?}",
            name, line
        )));
    }
    let number = |field: &str| {
        field
            .parse::<f64>()
            .map_err(|_| Error::Parse(format!("{}: bad number {:?}", name, field)))
    };
    Ok(SoundSegment {
        start: number(cols[0])?,
        end: number(cols[1])?,
        crackles: cols[2] != "0",
        wheezes: cols[3] != "0",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_dataset(
        demographics: &str,
        diagnoses: &str,
        tracks: &[(&str, &str)],
    ) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let tracks_dir = dir.path().join(TRACKS_DIR);
        fs::create_dir_all(&tracks_dir).unwrap();

        fs::write(dir.path().join("demographic_info.txt"), demographics).unwrap();
        fs::write(dir.path().join(DIAGNOSIS_CSV), diagnoses).unwrap();
        for (name, contents) in tracks {
            fs::write(tracks_dir.join(name), contents).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_load_joins_and_splits_into_cases() {
        let dir = write_dataset(
            "101 3.0 M NA 19.0 99.0\n102 NA F 28.47 NA NA\n",
            "101,URTI\n102,Healthy\n",
            &[
                ("101_1b1_Al_sc_Meditron.txt", "0.0 1.2 0 0\n1.2 2.4 1 0\n"),
                ("101_1b1_Pr_sc_Meditron.txt", "0.0 1.0 0 1\n"),
                ("101_2b2_Ar_mc_AKGC417L.txt", "0.0 0.9 0 0\n"),
                ("102_1b1_Tc_sc_LittC2SE.txt", ""),
            ],
        );

        let repo = load(dir.path()).await.unwrap();
        assert_eq!(repo.len(), 3);

        // Tracks with the same recording id merge into one case
        let merged = repo.find(101, "1b1").unwrap();
        assert_eq!(merged.tracks.len(), 2);
        assert_eq!(merged.diagnosis, Diagnosis::URTI);
        assert_eq!(merged.age, Some(3.0));
        assert_eq!(merged.bmi, None);
        assert_eq!(
            merged.tracks[0].audio_file,
            "101_1b1_Al_sc_Meditron.wav"
        );
        assert_eq!(merged.tracks[0].segments.len(), 2);
        assert!(merged.tracks[0].segments[1].crackles);
        assert!(merged.tracks[1].segments[0].wheezes);

        let second = repo.find(101, "2b2").unwrap();
        assert_eq!(second.tracks.len(), 1);
        assert_eq!(
            second.tracks[0].recording_equipment,
            RecordingEquipment::AkgC417l
        );
        assert_eq!(second.tracks[0].acquisition_mode, AcquisitionMode::Simultaneous);

        // NA numerics load as absent, and empty annotation files as no segments
        let healthy = repo.find(102, "1b1").unwrap();
        assert_eq!(healthy.age, None);
        assert_eq!(healthy.bmi, Some(28.47));
        assert!(healthy.tracks[0].segments.is_empty());
    }

    #[tokio::test]
    async fn test_patient_without_tracks_yields_no_case() {
        let dir = write_dataset(
            "101 3.0 M NA 19.0 99.0\n",
            "101,URTI\n",
            &[],
        );
        let repo = load(dir.path()).await.unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_missing_diagnosis_is_fatal() {
        let dir = write_dataset(
            "101 3.0 M NA 19.0 99.0\n",
            "102,Healthy\n",
            &[("101_1b1_Al_sc_Meditron.txt", "")],
        );
        let err = load(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_unparseable_filename_is_fatal() {
        let dir = write_dataset(
            "101 3.0 M NA 19.0 99.0\n",
            "101,URTI\n",
            &[("101_1b1_Al_sc.txt", "")],
        );
        let err = load(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_unknown_location_code_is_fatal() {
        let dir = write_dataset(
            "101 3.0 M NA 19.0 99.0\n",
            "101,URTI\n",
            &[("101_1b1_Xx_sc_Meditron.txt", "")],
        );
        let err = load(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }
}
