use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use tracing::{instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::input::AppInput;
use crate::models::permission::*;
use crate::repository::{PermissionRepository, Repository};
use crate::routes::PERMISSIONS_PATH;
use crate::state::AppState;
use crate::utils::flash::{self, Flash};
use crate::utils::listing::{ListParams, paginate_items};

pub const STORE_SUCCESS: &str = "Permesso creato correttamente.";
pub const UPDATE_SUCCESS: &str = "Permesso aggiornato correttamente";
pub const UPDATE_FAILURE: &str = "Si è verificato un errore";
pub const DESTROY_SUCCESS: &str = "Permesso cancellato correttamente";

const USERS_PAGE_PARAM: &str = "page_a";
const ROLES_PAGE_PARAM: &str = "page_b";
const GROUPS_PAGE_PARAM: &str = "page_c";

#[utoipa::path(
    get,
    path = "/permissions",
    tag = "Permissions",
    operation_id = "listPermissions",
    summary = "List permissions with pagination and search",
    description = "Returns one page of permissions ordered by id. `search` is matched case-insensitively against name, slug and description. Consumes any pending flash message.",
    params(PermissionListQuery),
    responses(
        (status = 200, description = "Permission list view", body = PermissionListView),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, query))]
pub async fn index(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PermissionListQuery>,
) -> Result<(CookieJar, Json<PermissionListView>), AppError> {
    let params = ListParams::resolve(
        query.page,
        query.per_page,
        query.search,
        &state.config.listing,
    );

    let permissions = state.permissions.paginate(&params).await?;
    let (jar, flash) = flash::take(jar);

    Ok((
        jar,
        Json(PermissionListView {
            permissions,
            search: params.search,
            flash,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/permissions/create",
    tag = "Permissions",
    operation_id = "createPermissionForm",
    summary = "Empty permission form",
    description = "Returns a blank permission and the action the form submits to (`POST /permissions`).",
    responses(
        (status = 200, description = "Creation form view", body = PermissionFormView),
    ),
)]
#[instrument(skip(jar))]
pub async fn create(jar: CookieJar) -> (CookieJar, Json<PermissionFormView>) {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        Json(PermissionFormView {
            permission: PermissionForm::default(),
            action: FormAction::store(),
            flash,
        }),
    )
}

#[utoipa::path(
    post,
    path = "/permissions",
    tag = "Permissions",
    operation_id = "storePermission",
    summary = "Create a permission",
    description = "Validates and stores a new permission, then redirects to the list with a success flash. The body may be JSON or urlencoded form data. `name` is required (2-80 characters); names and slugs need not be unique.",
    request_body = PermissionRequest,
    responses(
        (status = 303, description = "Created; redirects to /permissions"),
        (status = 400, description = "Malformed body (BAD_REQUEST)", body = ErrorBody),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn store(
    State(state): State<AppState>,
    jar: CookieJar,
    AppInput(payload): AppInput<PermissionRequest>,
) -> Result<(CookieJar, Redirect), AppError> {
    let input = validate_permission(payload)?;
    state.permissions.create(input).await?;

    Ok((
        flash::put(jar, Flash::success(STORE_SUCCESS)),
        Redirect::to(PERMISSIONS_PATH),
    ))
}

#[utoipa::path(
    get,
    path = "/permissions/{id}/edit",
    tag = "Permissions",
    operation_id = "editPermissionForm",
    summary = "Permission edit form",
    description = "Returns the current permission values and the update action bound to its id.",
    params(("id" = i32, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Edit form view", body = PermissionFormView),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar))]
pub async fn edit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
) -> Result<(CookieJar, Json<PermissionFormView>), AppError> {
    let permission = state.permissions.find(id).await?;
    let (jar, flash) = flash::take(jar);

    Ok((
        jar,
        Json(PermissionFormView {
            permission: permission.into(),
            action: FormAction::update(id),
            flash,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/permissions/{id}",
    tag = "Permissions",
    operation_id = "updatePermission",
    summary = "Update a permission",
    description = "Validates and applies the submitted fields. Also accepted as PATCH. On success redirects to the list with a success flash; if the permission cannot be updated, redirects back with an error flash. Omitted `slug`/`description` are left unchanged. Duplicate names are accepted.",
    params(("id" = i32, Path, description = "Permission ID")),
    request_body = PermissionRequest,
    responses(
        (status = 303, description = "Redirect to /permissions, or back on failure"),
        (status = 400, description = "Malformed body (BAD_REQUEST)", body = ErrorBody),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, headers, payload))]
pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i32>,
    AppInput(payload): AppInput<PermissionRequest>,
) -> Result<(CookieJar, Redirect), AppError> {
    apply_update(&state, jar, &headers, id, payload).await
}

async fn apply_update(
    state: &AppState,
    jar: CookieJar,
    headers: &HeaderMap,
    id: i32,
    payload: PermissionRequest,
) -> Result<(CookieJar, Redirect), AppError> {
    let input = validate_permission(payload)?;

    if state.permissions.update(id, input).await? {
        return Ok((
            flash::put(jar, Flash::success(UPDATE_SUCCESS)),
            Redirect::to(PERMISSIONS_PATH),
        ));
    }

    warn!(id, "Permission update failed");
    Ok((
        flash::put(jar, Flash::error(UPDATE_FAILURE)),
        flash::back(headers),
    ))
}

#[utoipa::path(
    delete,
    path = "/permissions/{id}",
    tag = "Permissions",
    operation_id = "destroyPermission",
    summary = "Delete a permission",
    description = "Deletes the permission and its role, group and user assignments, then redirects back with a success flash. If nothing was deleted the redirect carries no message.",
    params(("id" = i32, Path, description = "Permission ID")),
    responses(
        (status = 303, description = "Redirect back to the referring page"),
    ),
)]
#[instrument(skip(state, jar, headers))]
pub async fn destroy(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<(CookieJar, Redirect), AppError> {
    apply_destroy(&state, jar, &headers, id).await
}

async fn apply_destroy(
    state: &AppState,
    jar: CookieJar,
    headers: &HeaderMap,
    id: i32,
) -> Result<(CookieJar, Redirect), AppError> {
    if state.permissions.delete(id).await? {
        return Ok((
            flash::put(jar, Flash::success(DESTROY_SUCCESS)),
            flash::back(headers),
        ));
    }

    warn!(id, "Permission delete had no effect");
    Ok((jar, flash::back(headers)))
}

#[utoipa::path(
    post,
    path = "/permissions/{id}",
    tag = "Permissions",
    operation_id = "submitPermissionForm",
    summary = "HTML form submission with method override",
    description = "Browsers can only submit GET and POST forms. A form posting here carries the intended verb in its `_method` field: `PUT` or `PATCH` behaves like the update route, `DELETE` like the destroy route.",
    params(("id" = i32, Path, description = "Permission ID")),
    request_body = PermissionRequest,
    responses(
        (status = 303, description = "Same redirects as update or destroy"),
        (status = 400, description = "Missing or unsupported `_method` (BAD_REQUEST)", body = ErrorBody),
        (status = 422, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, headers, payload))]
pub async fn submit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<i32>,
    AppInput(payload): AppInput<PermissionRequest>,
) -> Result<(CookieJar, Redirect), AppError> {
    let method = payload.method.as_deref().map(str::to_ascii_uppercase);
    match method.as_deref() {
        Some("PUT" | "PATCH") => apply_update(&state, jar, &headers, id, payload).await,
        Some("DELETE") => apply_destroy(&state, jar, &headers, id).await,
        _ => Err(AppError::BadRequest(
            "The _method field must be PUT, PATCH or DELETE".into(),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/permissions/{id}/roles",
    tag = "Permission Relations",
    operation_id = "listPermissionRoles",
    summary = "Roles holding a permission",
    params(("id" = i32, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Roles ordered by id", body = Vec<RoleSummary>),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_roles(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<RoleSummary>>, AppError> {
    Ok(Json(state.permissions.roles(id).await?))
}

#[utoipa::path(
    get,
    path = "/permissions/{id}/groups",
    tag = "Permission Relations",
    operation_id = "listPermissionGroups",
    summary = "Groups holding a permission",
    params(("id" = i32, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Groups ordered by id", body = Vec<GroupSummary>),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<GroupSummary>>, AppError> {
    Ok(Json(state.permissions.groups(id).await?))
}

#[utoipa::path(
    get,
    path = "/permissions/{id}/users",
    tag = "Permission Relations",
    operation_id = "listPermissionUsers",
    summary = "Users granted a permission directly",
    params(("id" = i32, Path, description = "Permission ID")),
    responses(
        (status = 200, description = "Users ordered by id", body = Vec<UserSummary>),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(state.permissions.users(id).await?))
}

#[utoipa::path(
    get,
    path = "/permissions/{id}",
    tag = "Permissions",
    operation_id = "permissionProfile",
    summary = "Permission profile",
    description = "Returns the permission, the ids of its neighbours in id order, and its users, roles and groups. Each of the three lists is paginated on its own query parameter (`page_a`, `page_b`, `page_c`).",
    params(("id" = i32, Path, description = "Permission ID"), ProfileQuery),
    responses(
        (status = 200, description = "Profile view", body = PermissionProfileView),
        (status = 404, description = "Permission not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, query))]
pub async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i32>,
    Query(query): Query<ProfileQuery>,
) -> Result<(CookieJar, Json<PermissionProfileView>), AppError> {
    let repo = &state.permissions;
    let permission = repo.find(id).await?;
    let siblings = SiblingIds {
        next_id: repo.next(id).await?,
        prev_id: repo.prev(id).await?,
    };

    let page_size = state.config.listing.profile_page_size;
    let users = paginate_items(repo.users(id).await?, page_size, query.page_a, USERS_PAGE_PARAM);
    let roles = paginate_items(repo.roles(id).await?, page_size, query.page_b, ROLES_PAGE_PARAM);
    let groups = paginate_items(
        repo.groups(id).await?,
        page_size,
        query.page_c,
        GROUPS_PAGE_PARAM,
    );

    let (jar, flash) = flash::take(jar);

    Ok((
        jar,
        Json(PermissionProfileView {
            permission,
            pagination: siblings,
            users,
            roles,
            groups,
            flash,
        }),
    ))
}
