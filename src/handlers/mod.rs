pub mod auth;
pub mod catering;
pub mod history;
pub mod kost;
pub mod laundry;
pub mod master;
pub mod reservations;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Shared pagination query parameters for list endpoints.
/// Defaults: page=1, limit=10. Max limit=100.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_limit")]
    pub limit: i64,
}

impl PaginationQuery {
    /// Clamp page to >= 1 and limit to [1, 100]; returns (page, limit, offset)
    pub fn sanitize(&self) -> (i64, i64, i64) {
        let page = self.page.max(1);
        let limit = self.limit.clamp(1, 100);
        (page, limit, (page - 1) * limit)
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_limit() -> i64 {
    10
}

/// Response envelope returned by every endpoint
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Response helper: 200 OK with data
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    })
}

/// Response helper: 200 OK with no data payload
pub fn ok_message(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: None,
    })
}

/// Response helper: 201 Created with data
pub fn created<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }),
    )
}

/// Pagination block on paginated list responses
#[derive(Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

/// Envelope for paginated list endpoints
#[derive(Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Response helper: 200 OK with a page of results
pub fn paged<T: Serialize>(
    message: impl Into<String>,
    data: Vec<T>,
    page: i64,
    limit: i64,
    total: i64,
) -> Json<PagedResponse<T>> {
    Json(PagedResponse {
        success: true,
        message: message.into(),
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        },
    })
}

/// Field-level validation message
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error envelope
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }
}

/// API error type
pub struct ApiError {
    status: StatusCode,
    message: String,
    errors: Vec<FieldError>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            errors: Vec::new(),
        }
    }

    /// 400 with field-level messages
    pub fn validation(msg: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
            errors,
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
            errors: Vec::new(),
        }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: msg.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", resource),
            errors: Vec::new(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
            errors: Vec::new(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
            errors: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            message: self.message,
            errors: if self.errors.is_empty() {
                None
            } else {
                Some(self.errors)
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Typed domain errors raised deep in the db layer — no fragile
        // string matching.
        if let Some(nf) = err.downcast_ref::<crate::db::NotFoundError>() {
            return Self {
                status: StatusCode::NOT_FOUND,
                message: nf.to_string(),
                errors: Vec::new(),
            };
        }
        if let Some(c) = err.downcast_ref::<crate::db::ConflictError>() {
            return Self::conflict(c.to_string());
        }
        if let Some(f) = err.downcast_ref::<crate::db::ForbiddenError>() {
            return Self::forbidden(f.to_string());
        }
        if let Some(v) = err.downcast_ref::<crate::db::ValidationError>() {
            return Self::bad_request(v.to_string());
        }
        tracing::error!("unhandled error: {:#}", err);
        Self::internal("internal server error")
    }
}

impl From<crate::access::AccessDenied> for ApiError {
    fn from(denied: crate::access::AccessDenied) -> Self {
        Self::forbidden(denied.0)
    }
}

/// Map a multipart decoding failure to a 400
pub fn multipart_err(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::bad_request(format!("invalid multipart payload: {}", e))
}

/// Healthcheck endpoint — returns 200 OK with status
pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "kost-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_sanitize() {
        let q = PaginationQuery { page: 0, limit: 0 };
        assert_eq!(q.sanitize(), (1, 1, 0));

        let q = PaginationQuery { page: 3, limit: 500 };
        assert_eq!(q.sanitize(), (3, 100, 200));

        let q = PaginationQuery { page: 2, limit: 10 };
        assert_eq!(q.sanitize(), (2, 10, 10));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let resp = paged("ok", vec![1, 2, 3], 1, 10, 31);
        assert_eq!(resp.pagination.total_pages, 4);
        let resp = paged("ok", Vec::<i32>::new(), 1, 10, 30);
        assert_eq!(resp.pagination.total_pages, 3);
    }
}
