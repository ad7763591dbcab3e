//! Breath endpoint handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use super::params::{parse_value, set_single, unknown_param};
use super::AppState;
use crate::breath::filter::{filter, FilterParams};
use crate::breath::types::{Case, Diagnosis, Location, SoundFilter};
use crate::error::{ApiError, ApiResult};
use ausdb_common::select::pick_random;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomResponse {
    pub patient_id: u32,
    pub recording_id: String,
    pub count: usize,
}

/// GET /api/breath/case?patientId=N&recordingId=S - full case record
pub async fn get_case(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Case>> {
    let mut patient_id: Option<u32> = None;
    let mut recording_id: Option<String> = None;
    for (key, value) in &pairs {
        match key.as_str() {
            "patientId" => {
                set_single(&mut patient_id, "patientId", value, |s| s.parse::<u32>().ok())?
            }
            "recordingId" => {
                set_single(&mut recording_id, "recordingId", value, |s| {
                    Some(s.to_string())
                })?
            }
            other => return Err(unknown_param(other)),
        }
    }
    let patient_id = patient_id
        .ok_or_else(|| ApiError::BadRequest("missing parameter \"patientId\"".to_string()))?;
    let recording_id = recording_id
        .ok_or_else(|| ApiError::BadRequest("missing parameter \"recordingId\"".to_string()))?;

    let case = state.breath.find(patient_id, &recording_id).ok_or_else(|| {
        ApiError::NotFound(format!("Case {}_{} not found", patient_id, recording_id))
    })?;
    Ok(Json(case.clone()))
}

/// GET /api/breath/case/random - random case matching the criteria
pub async fn get_random_case(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<RandomResponse>> {
    let params = parse_filter(&pairs)?;
    let filtered = filter(state.breath.all(), &params);
    let (case, count) = pick_random(&filtered, &mut rand::thread_rng())
        .map_err(|_| ApiError::NotFound("No cases found with the given criteria".to_string()))?;
    Ok(Json(RandomResponse {
        patient_id: case.patient_id,
        recording_id: case.recording_id.clone(),
        count,
    }))
}

fn parse_filter(pairs: &[(String, String)]) -> ApiResult<FilterParams> {
    let mut params = FilterParams::default();
    for (key, value) in pairs {
        match key.as_str() {
            "location" => params
                .location
                .push(parse_value("location", value, Location::from_str)?),
            "abnormalLocation" => params
                .abnormal_location
                .push(parse_value("abnormalLocation", value, Location::from_str)?),
            "sound" => set_single(&mut params.sound, "sound", value, SoundFilter::from_str)?,
            "diagnosis" => params
                .diagnosis
                .push(parse_value("diagnosis", value, Diagnosis::from_str)?),
            other => return Err(unknown_param(other)),
        }
    }
    Ok(params)
}
