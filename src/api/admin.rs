use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use leptos::*;
use tracing::{info, warn};

use super::{html, AppState};
use crate::components::{render_document, ProductForm, ProductsTable};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::models::NewProduct;
use crate::multipart::{read_form, UploadedFile};
use crate::uploads::{parse_image_urls, save_images, UploadError};

const NEW_PRODUCT_PATH: &str = "/admin/new";
const LIST_PATH: &str = "/admin/list";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route(NEW_PRODUCT_PATH, web::get().to(new_product_form))
        .route(NEW_PRODUCT_PATH, web::post().to(create_product))
        .route(LIST_PATH, web::get().to(list_products))
        .route("/admin/delete/{id}", web::post().to(delete_product));
}

async fn home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, NEW_PRODUCT_PATH))
        .finish()
}

async fn new_product_form(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let flash = flash::take(&req, &state.flash_key);
    let shown = flash.is_some();
    let page = render_document("Nuevo producto", move || view! { <ProductForm flash=flash/> });
    html(StatusCode::OK, page, shown)
}

pub async fn create_product(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = read_form(payload).await?;
    let key = &state.flash_key;

    let category = form.text("category").trim();
    let name = form.text("name").trim();
    let url = form.text("url").trim();
    if category.is_empty() || name.is_empty() || url.is_empty() {
        warn!("[API] Product rejected: missing required fields");
        return Ok(flash::redirect_with(
            key,
            NEW_PRODUCT_PATH,
            Flash::error("Categoría, Nombre y URL son obligatorios"),
        ));
    }

    let files: Vec<&UploadedFile> = form
        .files("image_files")
        .filter(|f| !f.file_name.is_empty())
        .collect();
    let image_path = if files.is_empty() {
        let urls = parse_image_urls(form.text("image_urls"));
        (!urls.is_empty()).then(|| urls.join(","))
    } else {
        match save_images(&state.config.uploads_dir(), files) {
            Ok(paths) => Some(paths.join(",")),
            Err(e @ UploadError::Disallowed(_)) => {
                warn!("[API] Product rejected: {}", e);
                return Ok(flash::redirect_with(key, NEW_PRODUCT_PATH, Flash::error(e.to_string())));
            }
            Err(e) => return Err(AppError::Internal(e.to_string())),
        }
    };

    let product = NewProduct {
        category: category.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        description: form.text("description").trim().to_string(),
        image_path,
        afiliado: form.text("afiliado").trim().to_string(),
        tallas: form.text("tallas").trim().to_string(),
        sexo: form.text("sexo").trim().to_string(),
        precio: form.text("precio").trim().to_string(),
    };
    let id = state.products.insert(&product).await?;
    info!("[API] Product {} created: {}", id, product.name);

    Ok(flash::redirect_with(
        key,
        NEW_PRODUCT_PATH,
        Flash::success("Producto añadido correctamente"),
    ))
}

pub async fn list_products(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let products = state.products.list_recent().await?;
    let flash = flash::take(&req, &state.flash_key);
    let shown = flash.is_some();
    let page = render_document("Productos", move || {
        view! { <ProductsTable products=products flash=flash/> }
    });
    Ok(html(StatusCode::OK, page, shown))
}

pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !state.products.delete(id).await? {
        warn!("[API] Delete requested for unknown product {}", id);
    }
    Ok(flash::redirect_with(
        &state.flash_key,
        LIST_PATH,
        Flash::success("Producto eliminado"),
    ))
}
