use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::search::SearchError;

/// User-facing errors of the HTTP surface. Details stay in the server log.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("検索キーワードを入力してください")]
    MissingQuery,

    #[error("食品データベースの認証情報が設定されていません")]
    MissingCredentials,

    #[error("食品の検索に失敗しました")]
    SearchFailed,
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingQuery => AppError::MissingQuery,
            SearchError::MissingCredentials => AppError::MissingCredentials,
            SearchError::Lookup(_) => AppError::SearchFailed,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingQuery => StatusCode::BAD_REQUEST,
            AppError::MissingCredentials | AppError::SearchFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
