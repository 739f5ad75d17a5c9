use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use userdesk_common::types::{PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use utoipa::IntoParams;

/// Query string of `GET /api/users`.
///
/// Every field is optional and malformed numbers fall back to the default
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// 页码（默认 1，最小 1）
    #[param(required = false, value_type = Option<i64>)]
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page: Option<i64>,
    /// 每页条数（默认 20，范围 1-100）
    #[param(required = false, value_type = Option<i64>)]
    #[serde(default, rename = "pageSize", deserialize_with = "deserialize_lenient_i64")]
    pub page_size: Option<i64>,
    /// 模糊搜索 name / email / role
    #[param(required = false)]
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum I64Input {
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<I64Input>::deserialize(deserializer)?;
    Ok(match value {
        Some(I64Input::Number(number)) => Some(number),
        Some(I64Input::Text(text)) => text.trim().parse::<i64>().ok(),
        Some(I64Input::Other(_)) | None => None,
    })
}

impl ListUsersParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE as i64),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE as i64),
        )
    }

    /// The trimmed search text, or `None` when absent or blank.
    pub fn filter(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
