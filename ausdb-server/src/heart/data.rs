//! Heart dataset loading
//!
//! Builds the in-memory patient collection from `training_data.csv` plus the
//! per-recording `.tsv` segment annotations. Loading runs once at startup;
//! any missing or malformed file aborts the whole sequence.

use std::path::{Path, PathBuf};

use ausdb_common::{Error, Result};
use futures::future::try_join_all;
use tracing::info;

use super::types::{
    Age, AuscultationTrack, Campaign, Location, Murmur, MurmurGrading, MurmurPitch, MurmurQuality,
    MurmurShape, MurmurStatus, MurmurTiming, Patient, Sex, SoundSegment, SoundWave,
};

/// Subdirectory holding the `.wav`/`.hea`/`.tsv` recording files
const RECORDINGS_DIR: &str = "training_data/training_data";

/// Read-only collection of heart patients, built once at startup
#[derive(Debug)]
pub struct HeartRepository {
    patients: Vec<Patient>,
}

impl HeartRepository {
    pub fn new(patients: Vec<Patient>) -> Self {
        Self { patients }
    }

    /// The full collection, in CSV row order
    pub fn all(&self) -> &[Patient] {
        &self.patients
    }

    /// Exact lookup by patient id
    pub fn find(&self, patient_id: u32) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

/// Load the heart dataset from `dir` (the `heart-data` folder)
pub async fn load(dir: &Path) -> Result<HeartRepository> {
    let csv_path = dir.join("training_data.csv");
    let recordings_dir = dir.join(RECORDINGS_DIR);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&csv_path)
        .map_err(|e| Error::Parse(format!("{}: {}", csv_path.display(), e)))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::Parse(format!("training_data.csv row {}: {}", index + 1, e))
        })?;
        rows.push(parse_patient_row(&record, index + 1)?);
    }

    // Segment annotations are one file per (patient, location); read them
    // all concurrently and join before the collection is published.
    let patients = try_join_all(
        rows.into_iter()
            .map(|patient| attach_tracks(patient, recordings_dir.clone())),
    )
    .await?;

    info!("Heart sounds: {} patients loaded", patients.len());
    Ok(HeartRepository::new(patients))
}

async fn attach_tracks(mut patient: Patient, recordings_dir: PathBuf) -> Result<Patient> {
    let tracks = try_join_all(
        patient
            .locations
            .iter()
            .map(|&location| load_track(patient.patient_id, location, recordings_dir.clone())),
    )
    .await?;
    patient.tracks = tracks;
    Ok(patient)
}

async fn load_track(
    patient_id: u32,
    location: Location,
    recordings_dir: PathBuf,
) -> Result<AuscultationTrack> {
    let stem = format!("{}_{}", patient_id, location.as_str());
    let segment_path = recordings_dir.join(format!("{}.tsv", stem));
    let data = tokio::fs::read_to_string(&segment_path).await.map_err(|e| {
        Error::Parse(format!(
            "segment file {}: {}",
            segment_path.display(),
            e
        ))
    })?;

    Ok(AuscultationTrack {
        location,
        header_file: format!("{}.hea", stem),
        audio_file: format!("{}.wav", stem),
        segments: parse_segments(&data, &stem)?,
    })
}

fn parse_segments(data: &str, stem: &str) -> Result<Vec<SoundSegment>> {
    data.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut cols = line.split_whitespace();
            let mut field = |name: &str| {
                cols.next().ok_or_else(|| {
                    Error::Parse(format!("{}.tsv: missing {} in line {:?}", stem, name, line))
                })
            };
            let start = field("start")?;
            let end = field("end")?;
            let wave = field("wave")?;
            Ok(SoundSegment {
                start: parse_f64(start, stem)?,
                end: parse_f64(end, stem)?,
                wave: wave
                    .parse::<u8>()
                    .ok()
                    .and_then(|code| SoundWave::try_from(code).ok())
                    .ok_or_else(|| {
                        Error::Parse(format!("{}.tsv: bad sound wave code {:?}", stem, wave))
                    })?,
            })
        })
        .collect()
}

fn parse_f64(field: &str, context: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| Error::Parse(format!("{}: bad number {:?}", context, field)))
}

// ============================================================================
// CSV row parsing
// ============================================================================

/// `nan` marks an absent value throughout the CSV
fn non_nan(field: &str) -> Option<&str> {
    if field == "nan" {
        None
    } else {
        Some(field)
    }
}

fn parse_locations(field: &str, row: usize) -> Result<Vec<Location>> {
    let mut locations = Vec::new();
    for code in field.split('+') {
        let location = Location::from_str(code).ok_or_else(|| {
            Error::Parse(format!(
                "training_data.csv row {}: unknown location {:?}",
                row, code
            ))
        })?;
        // The dataset can list a location twice; keep one track per location
        if !locations.contains(&location) {
            locations.push(location);
        }
    }
    Ok(locations)
}

fn parse_optional_f64(field: &str, row: usize) -> Result<Option<f64>> {
    non_nan(field)
        .map(|s| {
            s.parse::<f64>().map_err(|_| {
                Error::Parse(format!(
                    "training_data.csv row {}: bad number {:?}",
                    row, s
                ))
            })
        })
        .transpose()
}

/// Parse the five murmur descriptor columns starting at `first`.
///
/// A `nan` timing means the phase has no murmur; otherwise all five columns
/// must carry recognized values.
fn parse_murmur(record: &csv::StringRecord, first: usize, row: usize) -> Result<Option<Murmur>> {
    let col = |offset: usize| column(record, first + offset, row);

    let timing = match non_nan(col(0)?) {
        None => return Ok(None),
        Some(desc) => MurmurTiming::from_descriptor(desc).ok_or_else(|| {
            Error::Parse(format!(
                "training_data.csv row {}: unknown murmur timing {:?}",
                row, desc
            ))
        })?,
    };

    fn required<T>(value: Option<T>, what: &str, raw: &str, row: usize) -> Result<T> {
        value.ok_or_else(|| {
            Error::Parse(format!(
                "training_data.csv row {}: unknown murmur {} {:?}",
                row, what, raw
            ))
        })
    }

    Ok(Some(Murmur {
        timing,
        shape: required(MurmurShape::from_str(col(1)?), "shape", col(1)?, row)?,
        grading: required(
            MurmurGrading::from_descriptor(col(2)?),
            "grading",
            col(2)?,
            row,
        )?,
        pitch: required(MurmurPitch::from_str(col(3)?), "pitch", col(3)?, row)?,
        quality: required(MurmurQuality::from_str(col(4)?), "quality", col(4)?, row)?,
    }))
}

fn column<'a>(record: &'a csv::StringRecord, index: usize, row: usize) -> Result<&'a str> {
    record.get(index).ok_or_else(|| {
        Error::Parse(format!(
            "training_data.csv row {}: missing column {}",
            row,
            index + 1
        ))
    })
}

fn parse_patient_row(record: &csv::StringRecord, row: usize) -> Result<Patient> {
    let col = |index: usize| column(record, index, row);
    let bad_value = |what: &str, value: &str| {
        Error::Parse(format!(
            "training_data.csv row {}: unknown {} {:?}",
            row, what, value
        ))
    };

    let raw_id = col(0)?;
    let patient_id = raw_id
        .parse::<u32>()
        .map_err(|_| bad_value("patient id", raw_id))?;

    let raw_sex = col(3)?;
    let raw_murmur = col(7)?;
    let raw_campaign = col(20)?;

    Ok(Patient {
        patient_id,
        locations: parse_locations(col(1)?, row)?,
        age: non_nan(col(2)?)
            .map(|s| Age::from_str(s).ok_or_else(|| bad_value("age", s)))
            .transpose()?,
        sex: Sex::from_str(raw_sex).ok_or_else(|| bad_value("sex", raw_sex))?,
        height: parse_optional_f64(col(4)?, row)?,
        weight: parse_optional_f64(col(5)?, row)?,
        is_pregnant: col(6)? == "True",
        murmur: MurmurStatus::from_str(raw_murmur)
            .ok_or_else(|| bad_value("murmur status", raw_murmur))?,
        murmur_locations: match non_nan(col(8)?) {
            None => Vec::new(),
            Some(field) => parse_locations(field, row)?,
        },
        most_audible: non_nan(col(9)?)
            .map(|s| Location::from_str(s).ok_or_else(|| bad_value("location", s)))
            .transpose()?,
        systolic_murmur: parse_murmur(record, 10, row)?,
        diastolic_murmur: parse_murmur(record, 15, row)?,
        campaign: Campaign::from_str(raw_campaign)
            .ok_or_else(|| bad_value("campaign", raw_campaign))?,
        additional_id: non_nan(col(21)?)
            .map(|s| s.parse::<u32>().map_err(|_| bad_value("additional id", s)))
            .transpose()?,
        tracks: Vec::new(),
    })
}
