use serde::Serialize;
use utoipa::ToSchema;

/// Collection metadata. Lists are returned whole, so only a count is carried.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
}

impl Meta {
    pub fn total(total: usize) -> Self {
        Self {
            total: Some(i64::try_from(total).unwrap_or(i64::MAX)),
        }
    }

    pub fn empty() -> Self {
        Self { total: None }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn meta_serializes_only_the_total() {
        let body = ApiResponse::success("ok", vec![1, 2], Some(Meta::total(2)));
        let value = serde_json::to_value(&body).expect("serialize");

        assert_eq!(value["meta"], json!({ "total": 2 }));
        assert_eq!(serde_json::to_value(Meta::empty()).expect("serialize"), json!({ "total": null }));
    }
}
