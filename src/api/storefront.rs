use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use leptos::*;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::{html, receive, AppState};
use crate::components::{
    render_document, AllProductsPage, CatalogPage, FeaturedPage, ProductPage,
};
use crate::db::reviews::parse_rating;
use crate::db::{CatalogQuery, StoreError};
use crate::error::{json_error, AppError};
use crate::flash::Flash;
use crate::models::NewReview;

/// Products shown on the landing page.
pub const FEATURED_LIMIT: usize = 5;

const NO_DATABASE: &str = "No hay BD";

/// Listings render empty rather than failing when their database is missing.
fn or_empty<T>(listed: Result<Vec<T>, StoreError>) -> Result<Vec<T>, AppError> {
    match listed {
        Ok(items) => Ok(items),
        Err(StoreError::Unavailable(path)) => {
            warn!("[API] No database at {}, showing an empty list", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(featured))
        .route("/index", web::get().to(catalog))
        .route("/filtros", web::get().to(filter_options))
        .route("/producto/{id}", web::get().to(product_detail))
        .route("/producto/{id}", web::post().to(submit_review))
        .route("/todos", web::get().to(all_products))
        .route("/click/{id}", web::post().to(register_click))
        .route("/receive", web::post().to(receive::receive));
}

pub async fn featured(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = or_empty(state.products.featured(FEATURED_LIMIT).await)?;
    let page = render_document("Inicio", move || {
        view! { <FeaturedPage products=products/> }
    });
    Ok(html(StatusCode::OK, page, false))
}

/// Activates a pending upload before reading, so a database received through
/// `/receive` goes live on the next catalog visit.
pub async fn catalog(
    state: web::Data<AppState>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, AppError> {
    if state.products.activate_staged().await? {
        info!("[API] Serving the newly received database");
    }

    let query = query.into_inner().trimmed();
    let products = state.products.search(&query).await?;
    let options = state.products.filter_options(&query).await?;
    debug!("[API] Catalog {:?} -> {} products", query, products.len());

    let page = render_document("Catálogo", move || {
        view! { <CatalogPage products=products options=options query=query/> }
    });
    Ok(html(StatusCode::OK, page, false))
}

pub async fn filter_options(
    state: web::Data<AppState>,
    query: web::Query<CatalogQuery>,
) -> HttpResponse {
    let query = query.into_inner().trimmed();
    match state.products.filter_options(&query).await {
        Ok(options) => HttpResponse::Ok().json(options),
        Err(StoreError::Unavailable(_)) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, NO_DATABASE)
        }
        Err(e) => {
            error!("[API] Filter options failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub nombre: String,
    #[serde(rename = "reseña")]
    pub resena: String,
    pub valoracion: String,
}

pub async fn product_detail(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    render_product(&state, path.into_inner(), None).await
}

/// Stores the review when every field is filled in, then shows the page
/// again either way.
pub async fn submit_review(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<ReviewForm>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let form = form.into_inner();
    let nombre = form.nombre.trim();
    let resena = form.resena.trim();
    let valoracion = form.valoracion.trim();

    let notice = if nombre.is_empty() || resena.is_empty() || valoracion.is_empty() {
        warn!("[API] Incomplete review for product {}", id);
        Flash::error("Completa nombre, reseña y valoración")
    } else {
        if state.products.get(id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        let review = NewReview {
            id_pagina: id,
            nombre: nombre.to_string(),
            resena: resena.to_string(),
            valoracion: parse_rating(valoracion),
        };
        let review_id = state.reviews.insert(&review).await?;
        info!(
            "[API] Review {} stored for product {} ({})",
            review_id, id, review.valoracion
        );
        Flash::success("Gracias por tu reseña")
    };

    render_product(&state, id, Some(notice)).await
}

async fn render_product(
    state: &AppState,
    id: i64,
    notice: Option<Flash>,
) -> Result<HttpResponse, AppError> {
    let product = state.products.get(id).await?.ok_or(AppError::NotFound)?;
    let reviews = or_empty(state.reviews.list_for(id).await)?;

    let title = product.name.clone();
    let page = render_document(title, move || {
        view! { <ProductPage product=product reviews=reviews notice=notice/> }
    });
    Ok(html(StatusCode::OK, page, false))
}

pub async fn all_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = or_empty(state.products.all_by_clicks().await)?;
    let page = render_document("Todos los productos", move || {
        view! { <AllProductsPage products=products/> }
    });
    Ok(html(StatusCode::OK, page, false))
}

pub async fn register_click(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let Ok(id) = path.trim().parse::<i64>() else {
        return json_error(StatusCode::NOT_FOUND, AppError::NotFound.to_string());
    };
    match state.products.increment_clicks(id).await {
        Ok(0) => {
            debug!("[API] Click on unknown product {}", id);
            json_error(StatusCode::NOT_FOUND, AppError::NotFound.to_string())
        }
        Ok(_) => HttpResponse::Ok().json(json!({ "ok": true })),
        Err(StoreError::Unavailable(_)) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, NO_DATABASE)
        }
        Err(e) => {
            error!("[API] Click on product {} failed: {}", id, e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
