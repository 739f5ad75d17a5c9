use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned when a create request omits `role` or sends it empty.
pub const DEFAULT_ROLE: &str = "user";

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// 用户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 自增主键
    pub id: i32,
    /// 姓名（最长 120 字符）
    pub name: String,
    /// 邮箱（最长 160 字符，全局唯一）
    pub email: String,
    /// 角色（最长 40 字符，默认 user）
    pub role: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 创建用户请求
///
/// `name` and `email` are optional at the wire level so that a body missing
/// them is answered with a 400 message instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    /// 姓名（必填）
    pub name: Option<String>,
    /// 邮箱（必填）
    pub email: Option<String>,
    /// 角色（可选，默认 user）
    pub role: Option<String>,
}

impl CreateUserRequest {
    /// Returns the insertable user when both `name` and `email` are present
    /// and non-empty.
    pub fn into_new_user(self) -> Option<NewUser> {
        let name = self.name.filter(|v| !v.is_empty())?;
        let email = self.email.filter(|v| !v.is_empty())?;
        Some(NewUser {
            name,
            email,
            role: self.role,
        })
    }
}

/// 更新用户请求（未提供的字段保持原值）
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    /// 新姓名
    pub name: Option<String>,
    /// 新邮箱
    pub email: Option<String>,
    /// 新角色
    pub role: Option<String>,
}

/// A user about to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

/// Offset pagination with the bounds already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Clamps `page` to at least 1 and `page_size` to `1..=MAX_PAGE_SIZE`.
    ///
    /// ```
    /// use userdesk_common::types::PageRequest;
    ///
    /// let req = PageRequest::new(0, 500);
    /// assert_eq!(req.page(), 1);
    /// assert_eq!(req.page_size(), 100);
    /// ```
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows skipped before this page, or `None` when the offset does not fit
    /// a signed 64-bit SQL integer. Such a page lies past every result.
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1)
            .checked_mul(self.page_size)
            .filter(|offset| *offset <= i64::MAX as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_bounds() {
        let req = PageRequest::new(-3, 0);
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), 1);
        assert_eq!(req.offset(), Some(0));

        let req = PageRequest::new(3, 25);
        assert_eq!(req.offset(), Some(50));
    }

    #[test]
    fn offset_beyond_sql_integer_range_is_none() {
        let req = PageRequest::new(i64::MAX, 20);
        assert_eq!(req.page(), i64::MAX as u64);
        assert_eq!(req.offset(), None);

        let req = PageRequest::new(922_337_203_685_477_581, 20);
        assert_eq!(req.offset(), None);

        let req = PageRequest::new(i64::MAX, 1);
        assert_eq!(req.offset(), Some(i64::MAX as u64 - 1));
    }

    #[test]
    fn create_request_requires_name_and_email() {
        let missing_name = CreateUserRequest {
            name: None,
            email: Some("a@example.com".into()),
            role: None,
        };
        assert!(missing_name.into_new_user().is_none());

        let empty_email = CreateUserRequest {
            name: Some("Ada".into()),
            email: Some(String::new()),
            role: None,
        };
        assert!(empty_email.into_new_user().is_none());

        let ok = CreateUserRequest {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            role: Some("admin".into()),
        }
        .into_new_user()
        .expect("complete request should convert");
        assert_eq!(ok.role.as_deref(), Some("admin"));
    }

    #[test]
    fn user_serializes_with_camel_case_timestamps() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: DEFAULT_ROLE.into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).expect("user should serialize");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
