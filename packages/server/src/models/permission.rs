use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{double_option, normalize_optional};
use crate::error::AppError;
use crate::routes::{PERMISSIONS_PATH, permission_path};
use crate::utils::flash::Flash;
use crate::utils::listing::Paginated;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 80;

/// Submitted create/update form. Accepted as JSON or urlencoded form data.
///
/// An omitted `slug` or `description` is left untouched on update; an empty
/// or null one clears it.
#[derive(Deserialize, Default, Debug, Clone, utoipa::ToSchema)]
pub struct PermissionRequest {
    #[schema(example = "Edit users")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "users.edit")]
    pub slug: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Verb override sent by HTML forms posting to `/permissions/{id}`.
    #[serde(default, rename = "_method")]
    #[schema(example = "PUT")]
    pub method: Option<String>,
}

/// Validated and normalised permission fields handed to a repository.
///
/// `None` on an optional field means "not submitted".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionInput {
    pub name: String,
    pub slug: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct PermissionResponse {
    pub id: i32,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct RoleSummary {
    pub id: i32,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct GroupSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PermissionListQuery {
    /// 1-based page number. Default: 1.
    pub page: Option<u64>,
    /// Page size. Default and maximum come from the `listing` config.
    pub per_page: Option<u64>,
    /// Case-insensitive substring matched against name, slug and description.
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileQuery {
    /// Page of the users list.
    pub page_a: Option<u64>,
    /// Page of the roles list.
    pub page_b: Option<u64>,
    /// Page of the groups list.
    pub page_c: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PermissionListView {
    pub permissions: Paginated<PermissionResponse>,
    pub search: Option<String>,
    pub flash: Option<Flash>,
}

/// Field values pre-filled into the create/edit form.
#[derive(Serialize, Default, Debug, PartialEq, Eq, utoipa::ToSchema)]
pub struct PermissionForm {
    /// Absent on the create form.
    pub id: Option<i32>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Where the form submits to.
///
/// `method` is the verb of the target route. Browser forms cannot send `PUT`,
/// so they POST to `url` with `method` in a hidden `_method` field instead.
#[derive(Serialize, Debug, PartialEq, Eq, utoipa::ToSchema)]
pub struct FormAction {
    #[schema(example = "POST")]
    pub method: &'static str,
    #[schema(example = "/permissions")]
    pub url: String,
}

impl FormAction {
    pub fn store() -> Self {
        Self {
            method: "POST",
            url: PERMISSIONS_PATH.to_string(),
        }
    }

    pub fn update(id: i32) -> Self {
        Self {
            method: "PUT",
            url: permission_path(id),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PermissionFormView {
    pub permission: PermissionForm,
    pub action: FormAction,
    pub flash: Option<Flash>,
}

/// Neighbouring permission ids for profile navigation.
#[derive(Serialize, Debug, PartialEq, Eq, utoipa::ToSchema)]
pub struct SiblingIds {
    pub next_id: Option<i32>,
    pub prev_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PermissionProfileView {
    pub permission: PermissionResponse,
    pub pagination: SiblingIds,
    pub users: Paginated<UserSummary>,
    pub roles: Paginated<RoleSummary>,
    pub groups: Paginated<GroupSummary>,
    pub flash: Option<Flash>,
}

impl From<PermissionResponse> for PermissionForm {
    fn from(p: PermissionResponse) -> Self {
        Self {
            id: Some(p.id),
            name: p.name,
            slug: p.slug,
            description: p.description,
        }
    }
}

impl From<crate::entity::permission::Model> for PermissionResponse {
    fn from(m: crate::entity::permission::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<crate::entity::role::Model> for RoleSummary {
    fn from(m: crate::entity::role::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
        }
    }
}

impl From<crate::entity::group::Model> for GroupSummary {
    fn from(m: crate::entity::group::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

impl From<crate::entity::user::Model> for UserSummary {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
        }
    }
}

/// Validate a submitted permission and normalise it for storage.
///
/// `name` is required and must be 2-80 characters after trimming. Names and
/// slugs are not checked for uniqueness, neither on create nor on update.
pub fn validate_permission(req: PermissionRequest) -> Result<PermissionInput, AppError> {
    let name = normalize_optional(req.name);
    let name = match name {
        None => return Err(AppError::field("name", "The name field is required.")),
        Some(n) if n.chars().count() < NAME_MIN_CHARS => {
            return Err(AppError::field(
                "name",
                format!("The name must be at least {NAME_MIN_CHARS} characters."),
            ));
        }
        Some(n) if n.chars().count() > NAME_MAX_CHARS => {
            return Err(AppError::field(
                "name",
                format!("The name may not be greater than {NAME_MAX_CHARS} characters."),
            ));
        }
        Some(n) => n,
    };

    Ok(PermissionInput {
        name,
        slug: req.slug.map(normalize_optional),
        description: req.description.map(normalize_optional),
    })
}
