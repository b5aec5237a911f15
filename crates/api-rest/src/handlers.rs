//! API endpoint handlers.

use crate::{ApiError, AppState};
use axum::{
    extract::{Multipart, Path as AxumPath, State},
    response::Json,
};
use stickerbox_core::{RegistryError, StoredFile};

#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct TagReq {
    /// Sticker filename the tag applies to
    pub filename: String,
    /// Free-text tag
    pub tag: String,
}

#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct PinReq {
    /// Sticker filename to toggle
    pub filename: String,
}

#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct DeleteReq {
    /// Shared delete password
    pub password: String,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct PinRes {
    pub message: String,
    /// The pinned state after the toggle
    pub pinned: bool,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct UploadedFile {
    pub filename: String,
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct UploadRes {
    pub message: String,
    pub files: Vec<UploadedFile>,
}

#[utoipa::path(
    get,
    path = "/api/files",
    responses(
        (status = 200, description = "Stickers with tags and pin state, pinned first then newest", body = [StoredFile]),
        (status = 500, description = "Storage directory could not be read")
    )
)]
pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<StoredFile>>, ApiError> {
    Ok(Json(state.service.list_files()?))
}

#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "Every tag in use, sorted and deduplicated", body = [String])
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.service.list_all_tags())
}

#[utoipa::path(
    post,
    path = "/api/files/tag",
    request_body = TagReq,
    responses(
        (status = 200, description = "Tag attached", body = MessageRes),
        (status = 400, description = "Empty filename or tag"),
        (status = 404, description = "No such sticker"),
        (status = 500, description = "Tag store could not be persisted")
    )
)]
pub async fn add_tag(
    State(state): State<AppState>,
    Json(req): Json<TagReq>,
) -> Result<Json<MessageRes>, ApiError> {
    state.service.add_tag(&req.filename, &req.tag)?;
    Ok(Json(MessageRes {
        message: "tag added".into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/files/tag",
    request_body = TagReq,
    responses(
        (status = 200, description = "Tag removed", body = MessageRes),
        (status = 400, description = "Empty filename or tag"),
        (status = 404, description = "No such sticker"),
        (status = 500, description = "Tag store could not be persisted")
    )
)]
pub async fn remove_tag(
    State(state): State<AppState>,
    Json(req): Json<TagReq>,
) -> Result<Json<MessageRes>, ApiError> {
    state.service.remove_tag(&req.filename, &req.tag)?;
    Ok(Json(MessageRes {
        message: "tag removed".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/files/pin",
    request_body = PinReq,
    responses(
        (status = 200, description = "Pin state toggled", body = PinRes),
        (status = 400, description = "Empty filename"),
        (status = 404, description = "No such sticker"),
        (status = 500, description = "Tag store could not be persisted")
    )
)]
pub async fn toggle_pin(
    State(state): State<AppState>,
    Json(req): Json<PinReq>,
) -> Result<Json<PinRes>, ApiError> {
    let pinned = state.service.toggle_pin(&req.filename)?;
    Ok(Json(PinRes {
        message: if pinned {
            "pinned".into()
        } else {
            "unpinned".into()
        },
        pinned,
    }))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Accepted files stored; failed files omitted from the list", body = UploadRes),
        (status = 400, description = "Malformed multipart payload"),
        (status = 500, description = "No file in the batch could be stored")
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadRes>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        RegistryError::InvalidInput(format!("invalid multipart payload: {e}"))
    })? {
        // Only parts carrying a filename are file uploads; other form
        // fields are ignored.
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RegistryError::InvalidInput(format!("failed to read upload: {e}")))?;
        files.push((filename, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(RegistryError::InvalidInput("no files in upload".into()).into());
    }

    let accepted = state.service.upload_files(files)?;
    Ok(Json(UploadRes {
        message: "upload complete".into(),
        files: accepted
            .into_iter()
            .map(|filename| UploadedFile { filename })
            .collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/delete/{filename}",
    request_body = DeleteReq,
    params(("filename" = String, Path, description = "Sticker filename")),
    responses(
        (status = 200, description = "Sticker deleted and its metadata forgotten", body = MessageRes),
        (status = 401, description = "Wrong delete password"),
        (status = 404, description = "No such sticker"),
        (status = 500, description = "Deletion failed")
    )
)]
pub async fn delete_file(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
    Json(req): Json<DeleteReq>,
) -> Result<Json<MessageRes>, ApiError> {
    state.service.delete_file(&filename, &req.password)?;
    Ok(Json(MessageRes {
        message: "file deleted".into(),
    }))
}
