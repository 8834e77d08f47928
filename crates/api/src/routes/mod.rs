//! API route definitions.

use axum::{Router, middleware};

use aerodesk_shared::types::{PageRequest, PageResponse};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod airports;
pub mod auth;
pub mod cash_desks;
pub mod exchange_rates;
pub mod flights;
pub mod health;
pub mod shifts;
pub mod tickets;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(users::routes())
        .merge(airports::routes())
        .merge(cash_desks::routes())
        .merge(accounts::routes())
        .merge(shifts::routes())
        .merge(flights::routes())
        .merge(tickets::routes())
        .merge(exchange_rates::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Wraps one page of rows, reporting the effective page size.
pub(crate) fn page_of<T>(data: Vec<T>, page: &PageRequest, total: u64) -> PageResponse<T> {
    let per_page = u32::try_from(page.limit()).unwrap_or(page.per_page);
    PageResponse::new(data, page.page.max(1), per_page, total)
}
