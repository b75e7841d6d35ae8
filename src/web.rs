//! HTTP routes for the wish list.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tower_http::trace::TraceLayer;

use crate::db::Store;
use crate::error::AppError;
use crate::item::Item;
use crate::model::ItemForm;
use crate::notice::{clear_cookie, redirect_with, Notice};
use crate::view::{render_home, render_list, ListPage, LIST_TITLE};

const ITEMS_PATH: &str = "/items";
const EMPTY_TITLE_MESSAGE: &str = "Title cannot be empty.";

/// Shared application state
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route(ITEMS_PATH, get(list_items).post(create_item))
        .route("/delete/{id}", get(delete_item))
        .route("/edit/{id}", get(edit_form).post(update_item))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), AppError> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("wishlist listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// HTML response that also expires the notice cookie once it was shown.
fn page(html: String, notice: Option<&Notice>) -> Response {
    match notice {
        Some(_) => ([(SET_COOKIE, clear_cookie())], Html(html)).into_response(),
        None => Html(html).into_response(),
    }
}

async fn home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let notice = Notice::from_headers(&headers);
    let total = Item::count(&state.store).await?;
    Ok(page(render_home(total, notice.as_ref()), notice.as_ref()))
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let notice = Notice::from_headers(&headers);
    let items = Item::list_all(&state.store).await?;
    let html = render_list(&ListPage {
        title: LIST_TITLE,
        items: &items,
        selected: None,
        notice: notice.as_ref(),
    });
    Ok(page(html, notice.as_ref()))
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let mut item = form.into_item(None)?;
    if let Err(err) = item.validate() {
        tracing::debug!(error = %err, "rejected new item");
        return Ok(redirect_with(Notice::error(EMPTY_TITLE_MESSAGE), ITEMS_PATH));
    }

    item.save(&state.store).await?;
    let message = format!("\"{}\" added to the list!", item.title);
    Ok(redirect_with(Notice::success(message), ITEMS_PATH))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let item = Item::find_by_id(&state.store, id).await?;
    item.delete(&state.store).await?;
    let message = format!("\"{}\" removed from the list.", item.title);
    Ok(redirect_with(Notice::info(message), ITEMS_PATH))
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let notice = Notice::from_headers(&headers);
    let items = Item::list_all(&state.store).await?;
    let selected = Item::find_by_id(&state.store, id).await?;
    let title = format!("Editing: {}", selected.title);
    let html = render_list(&ListPage {
        title: &title,
        items: &items,
        selected: Some(&selected),
        notice: notice.as_ref(),
    });
    Ok(page(html, notice.as_ref()))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let item = form.into_item(Some(id))?;
    if let Err(err) = item.validate() {
        tracing::debug!(id, error = %err, "rejected item edit");
        return Ok(redirect_with(Notice::error(EMPTY_TITLE_MESSAGE), ITEMS_PATH));
    }

    let updated = item.update(&state.store).await?;
    if updated == 0 {
        tracing::debug!(id, "edit matched no item");
    }
    let message = format!("\"{}\" updated successfully!", item.title);
    Ok(redirect_with(Notice::success(message), ITEMS_PATH))
}
