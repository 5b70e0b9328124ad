use leptos::*;

use crate::models::Product;

/// Grid entry linking to the product page. `data-click` lets the page
/// script count the visit.
#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let href = format!("/producto/{}", product.id);
    let image = product.first_image().map(|src| {
        view! { <img src=src.to_string() alt=product.name.clone() loading="lazy"/> }
    });
    let price = product
        .precio
        .clone()
        .filter(|p| !p.trim().is_empty())
        .map(|p| view! { <span class="price">{p}" €"</span> });

    view! {
        <article class="product-card">
            <a href=href data-click=product.id.to_string()>
                <div class="product-image">{image}</div>
                <h3>{product.name.clone()}</h3>
            </a>
            <p class="meta">
                <span class="category">{product.category.clone()}</span>
                {price}
            </p>
        </article>
    }
}

#[component]
pub fn ProductGrid(products: Vec<Product>) -> impl IntoView {
    if products.is_empty() {
        return view! { <p class="empty">"No hay productos que mostrar."</p> }.into_view();
    }
    view! {
        <section class="product-grid">
            {products.into_iter().map(|product| view! { <ProductCard product=product/> }).collect_view()}
        </section>
    }
    .into_view()
}
