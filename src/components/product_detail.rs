use leptos::*;

use super::layout::{FlashBanner, SiteNav};
use super::review_form::ReviewForm;
use super::reviews_list::ReviewsList;
use crate::flash::Flash;
use crate::models::{Product, Review};

#[component]
pub fn ProductPage(product: Product, reviews: Vec<Review>, notice: Option<Flash>) -> impl IntoView {
    let gallery = product
        .images()
        .into_iter()
        .map(|src| view! { <img src=src.to_string() alt=product.name.clone()/> })
        .collect_view();
    let outbound = product.outbound_link().to_string();
    let details = [
        ("Categoría", Some(product.category.clone())),
        ("Precio", product.precio.clone()),
        ("Tallas", product.tallas.clone()),
        ("Sexo", product.sexo.clone()),
    ];

    view! {
        <SiteNav/>
        <main class="product-detail">
            <div class="gallery">{gallery}</div>
            <div class="info">
                <h1>{product.name.clone()}</h1>
                <dl>
                    {details
                        .into_iter()
                        .filter_map(|(label, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (label, v)))
                        .map(|(label, value)| view! { <dt>{label}</dt><dd>{value}</dd> })
                        .collect_view()}
                </dl>
                <p class="description">{product.description.clone().unwrap_or_default()}</p>
                <a class="buy" href=outbound target="_blank" rel="noopener" data-click=product.id.to_string()>
                    "Ver en la tienda"
                </a>
            </div>
            <FlashBanner flash=notice/>
            <ReviewForm product_id=product.id/>
            <ReviewsList reviews=reviews/>
        </main>
    }
}
