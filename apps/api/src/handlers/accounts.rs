use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crawlpool_application::CreateAccountInput;
use crawlpool_domain::{AccountId, CredentialSet};

use crate::dto::{
    AccountResponse, CreateAccountRequest, DeleteAccountResponse, ListAccountsParams,
    ListAccountsResponse, LockAccountsRequest, LockAccountsResponse, UnlockAccountsRequest,
    UnlockAccountsResponse, UpdateAccountRequest, parse_optional_status,
};
use crate::error::ApiResult;
use crate::state::PlatformState;

/// Builds the account routes for one platform.
pub fn account_routes<C: CredentialSet>(state: PlatformState<C>) -> Router {
    Router::new()
        .route(
            "/",
            get(list_accounts_handler::<C>).post(create_account_handler::<C>),
        )
        .route(
            "/{id}",
            get(get_account_handler::<C>)
                .put(update_account_handler::<C>)
                .delete(delete_account_handler::<C>),
        )
        .route("/lock", post(lock_accounts_handler::<C>))
        .route("/unlock", post(unlock_accounts_handler::<C>))
        .with_state(state)
}

async fn create_account_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Json(payload): Json<CreateAccountRequest<C>>,
) -> ApiResult<(StatusCode, Json<AccountResponse<C>>)> {
    let status = parse_optional_status(payload.status)?;
    let account = platform
        .accounts
        .create(CreateAccountInput {
            username: payload.username.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            phone: payload.phone.unwrap_or_default(),
            password: payload.password.unwrap_or_default(),
            credentials: payload.credentials.unwrap_or_default(),
            status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

async fn update_account_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAccountRequest<C>>,
) -> ApiResult<Json<AccountResponse<C>>> {
    let account = platform
        .accounts
        .update(AccountId::from_i64(id), payload.into_patch()?)
        .await?;

    Ok(Json(AccountResponse::from(account)))
}

async fn delete_account_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteAccountResponse>> {
    platform.accounts.delete(AccountId::from_i64(id)).await?;

    Ok(Json(DeleteAccountResponse { success: true }))
}

async fn get_account_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<AccountResponse<C>>> {
    let account = platform.accounts.get(AccountId::from_i64(id)).await?;

    Ok(Json(AccountResponse::from(account)))
}

async fn list_accounts_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Query(params): Query<ListAccountsParams>,
) -> ApiResult<Json<ListAccountsResponse<C>>> {
    let page = platform.accounts.list(params.into_query()?).await?;

    Ok(Json(ListAccountsResponse {
        total: page.total,
        accounts: page.accounts.into_iter().map(AccountResponse::from).collect(),
    }))
}

async fn lock_accounts_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Json(payload): Json<LockAccountsRequest>,
) -> ApiResult<Json<LockAccountsResponse<C>>> {
    let (accounts, lock_seconds) = platform
        .leases
        .acquire(
            payload.count.unwrap_or_default(),
            payload.lock_seconds.unwrap_or_default(),
            payload.account_type.as_deref(),
        )
        .await?;

    Ok(Json(LockAccountsResponse {
        lock_seconds,
        accounts: accounts.into_iter().map(AccountResponse::from).collect(),
    }))
}

async fn unlock_accounts_handler<C: CredentialSet>(
    State(platform): State<PlatformState<C>>,
    Json(payload): Json<UnlockAccountsRequest>,
) -> ApiResult<Json<UnlockAccountsResponse>> {
    let ids: Vec<AccountId> = payload.ids.iter().copied().map(AccountId::from_i64).collect();

    platform
        .leases
        .release(ids.as_slice(), payload.delay.unwrap_or_default())
        .await?;

    Ok(Json(UnlockAccountsResponse {
        success: true,
        unlocked_count: ids.len() as i64,
    }))
}
