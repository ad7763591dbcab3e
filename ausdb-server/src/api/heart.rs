//! Heart endpoint handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use super::params::{parse_value, set_single, unknown_param};
use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::heart::filter::{filter, FilterParams, MurmurFilter};
use crate::heart::types::{
    Location, MurmurGrading, MurmurPitch, MurmurQuality, MurmurShape, MurmurTiming, Patient,
};
use ausdb_common::select::pick_random;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomResponse {
    pub patient_id: u32,
    pub count: usize,
}

/// GET /api/heart/patient?id=N - full patient record
pub async fn get_patient(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Patient>> {
    let mut id: Option<u32> = None;
    for (key, value) in &pairs {
        match key.as_str() {
            "id" => set_single(&mut id, "id", value, |s| s.parse::<u32>().ok())?,
            other => return Err(unknown_param(other)),
        }
    }
    let id = id.ok_or_else(|| ApiError::BadRequest("missing parameter \"id\"".to_string()))?;

    let patient = state
        .heart
        .find(id)
        .ok_or_else(|| ApiError::NotFound(format!("Patient {} not found", id)))?;
    Ok(Json(patient.clone()))
}

/// GET /api/heart/patient/random - random patient matching the criteria
pub async fn get_random_patient(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<RandomResponse>> {
    let params = parse_filter(&pairs)?;
    let filtered = filter(state.heart.all(), &params);
    let (patient, count) = pick_random(&filtered, &mut rand::thread_rng())
        .map_err(|_| ApiError::NotFound("No patients found with the given criteria".to_string()))?;
    Ok(Json(RandomResponse {
        patient_id: patient.patient_id,
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
            "murmur" => set_single(&mut params.murmur, "murmur", value, MurmurFilter::from_str)?,
            "murmurLocation" => params
                .murmur_location
                .push(parse_value("murmurLocation", value, Location::from_str)?),
            "mostAudible" => params
                .most_audible
                .push(parse_value("mostAudible", value, Location::from_str)?),
            "timing" => params
                .timing
                .push(parse_value("timing", value, MurmurTiming::from_str)?),
            "shape" => params
                .shape
                .push(parse_value("shape", value, MurmurShape::from_str)?),
            "grading" => params
                .grading
                .push(parse_value("grading", value, MurmurGrading::from_str)?),
            "pitch" => params
                .pitch
                .push(parse_value("pitch", value, MurmurPitch::from_str)?),
            "quality" => params
                .quality
                .push(parse_value("quality", value, MurmurQuality::from_str)?),
            other => return Err(unknown_param(other)),
        }
    }
    Ok(params)
}
