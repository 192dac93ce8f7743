// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::Json;
use teap_directory::{DirectoryRecord, Division, Franchise, OrgUnit, Team};

use crate::api::AppState;
use crate::error::ApiError;

async fn load<R: DirectoryRecord>(state: &AppState, unit: OrgUnit) -> Result<Vec<R>, ApiError> {
	let entries = state.directory()?.get_org_units(unit).await?;
	Ok(R::load_many(&entries)?)
}

/// GET /api/divisions
pub async fn list_divisions(State(state): State<AppState>) -> Result<Json<Vec<Division>>, ApiError> {
	load(&state, OrgUnit::Divisions).await.map(Json)
}

/// GET /api/franchises
pub async fn list_franchises(
	State(state): State<AppState>,
) -> Result<Json<Vec<Franchise>>, ApiError> {
	load(&state, OrgUnit::Franchises).await.map(Json)
}

/// GET /api/teams
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
	load(&state, OrgUnit::Teams).await.map(Json)
}
