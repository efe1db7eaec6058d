//! File endpoints.

use crate::auth::{get_auth, require_auth};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use cabinet_metadata::FileRow;
use cabinet_service::UploadRequest;
use serde::{Deserialize, Serialize};

/// Maximum request body size for uploads (16 MiB).
///
/// Content arrives base64-encoded inside the JSON envelope, so the decoded
/// payload tops out around 12 MiB.
///
/// **Note**: If running behind a reverse proxy (nginx, haproxy, etc.), ensure the
/// proxy's `client_max_body_size` (nginx) or equivalent setting is >= this value
/// to avoid inconsistent 413 responses where the proxy rejects before we can.
const MAX_UPLOAD_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Response describing a stored record.
///
/// Blob references are a storage detail and never leave the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_public: bool,
    pub parent_id: i64,
}

impl From<FileRow> for FileResponse {
    fn from(row: FileRow) -> Self {
        Self {
            id: row.file_id,
            owner_id: row.owner_id,
            name: row.name,
            kind: row.kind,
            is_public: row.is_public,
            parent_id: row.parent_id,
        }
    }
}

/// Query parameters for listings. Both default to 0, the root folder and
/// the first page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub parent_id: i64,
    pub page: i64,
}

/// POST /files - Create a folder or upload content.
pub async fn upload_file(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<FileResponse>)> {
    let auth = require_auth(&req)?.clone();

    let body: UploadRequest = {
        let bytes = axum::body::to_bytes(req.into_body(), MAX_UPLOAD_BODY_SIZE)
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))?
    };

    let record = state.files.upload(&auth.user, body).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /files/{file_id} - Return one of the caller's records.
pub async fn show_file(
    State(state): State<AppState>,
    Path(file_id): Path<i64>,
    req: Request,
) -> ApiResult<Json<FileResponse>> {
    let auth = require_auth(&req)?;

    let record = state.files.show(&auth.user, file_id).await?;
    Ok(Json(record.into()))
}

/// GET /files - List one page of the caller's records under a parent.
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    req: Request,
) -> ApiResult<Json<Vec<FileResponse>>> {
    let auth = require_auth(&req)?;

    let rows = state
        .files
        .list(&auth.user, query.parent_id, query.page)
        .await?;
    Ok(Json(rows.into_iter().map(FileResponse::from).collect()))
}

/// GET /files/{file_id}/data - Stream a record's content.
///
/// The only endpoint where anonymous requests are meaningful: public
/// records are readable without a session. The content type is guessed
/// from the stored file name.
pub async fn read_file_data(
    State(state): State<AppState>,
    Path(file_id): Path<i64>,
    req: Request,
) -> ApiResult<Response> {
    let viewer = get_auth(&req).map(|auth| &auth.user);

    let (record, bytes) = state.files.read_content(viewer, file_id).await?;
    let content_type = mime_guess::from_path(&record.name).first_or_octet_stream();

    Ok(([(CONTENT_TYPE, content_type.to_string())], bytes).into_response())
}
