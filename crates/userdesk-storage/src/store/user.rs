use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use userdesk_common::types::{NewUser, PageRequest, UpdateUserRequest, User, DEFAULT_ROLE};
use userdesk_common::validation::UserFields;

use crate::entities::user::{self, Column, Entity};
use crate::error::{Result, StorageError};
use crate::store::UserStore;
use crate::{UserPage, UserRepository};

fn to_user(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        role: m.role,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

/// `%q%` over the lowercased `q`, with LIKE metacharacters escaped by `\`.
fn contains_pattern(q: &str) -> LikeExpr {
    let escaped = q
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

fn checked(fields: UserFields) -> Result<UserFields> {
    fields.check().map_err(StorageError::Validation)?;
    Ok(fields)
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let role = new_user
            .role
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ROLE);
        let fields = checked(UserFields {
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: role.to_owned(),
        })?;

        let now = Utc::now().fixed_offset();
        let am = user::ActiveModel {
            id: NotSet,
            name_lc: Set(fields.name.to_lowercase()),
            email_lc: Set(fields.email.to_lowercase()),
            role_lc: Set(fields.role.to_lowercase()),
            name: Set(fields.name),
            email: Set(fields.email),
            role: Set(fields.role),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = am.insert(self.db()).await?;
        tracing::debug!(id = model.id, "Created user");
        Ok(to_user(model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let model = Entity::find_by_id(id).one(self.db()).await?;
        Ok(model.map(to_user))
    }

    async fn find_page(&self, filter: Option<&str>, page: PageRequest) -> Result<UserPage> {
        let mut q = Entity::find();
        if let Some(text) = filter.filter(|t| !t.is_empty()) {
            q = q.filter(
                Condition::any()
                    .add(Column::NameLc.like(contains_pattern(text)))
                    .add(Column::EmailLc.like(contains_pattern(text)))
                    .add(Column::RoleLc.like(contains_pattern(text))),
            );
        }

        let total = q.clone().count(self.db()).await?;
        let Some(offset) = page.offset() else {
            return Ok(UserPage {
                items: Vec::new(),
                total,
            });
        };
        let rows = q
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(page.page_size())
            .offset(offset)
            .all(self.db())
            .await?;

        Ok(UserPage {
            items: rows.into_iter().map(to_user).collect(),
            total,
        })
    }

    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> Result<User> {
        let model = Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| StorageError::NotFound {
                entity: "user",
                id: id.to_string(),
            })?;

        let fields = checked(UserFields {
            name: changes.name.clone().unwrap_or_else(|| model.name.clone()),
            email: changes.email.clone().unwrap_or_else(|| model.email.clone()),
            role: changes.role.clone().unwrap_or_else(|| model.role.clone()),
        })?;

        let mut active: user::ActiveModel = model.into();
        active.name_lc = Set(fields.name.to_lowercase());
        active.email_lc = Set(fields.email.to_lowercase());
        active.role_lc = Set(fields.role.to_lowercase());
        active.name = Set(fields.name);
        active.email = Set(fields.email);
        active.role = Set(fields.role);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(self.db()).await?;
        tracing::debug!(id, "Updated user");
        Ok(to_user(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = Entity::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected > 0)
    }
}
