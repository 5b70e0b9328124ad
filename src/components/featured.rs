use leptos::*;

use super::layout::SiteNav;
use super::product_card::ProductGrid;
use crate::models::Product;

#[component]
pub fn FeaturedPage(products: Vec<Product>) -> impl IntoView {
    view! {
        <SiteNav/>
        <main>
            <h1>"Lo más visto"</h1>
            <ProductGrid products=products/>
            <p class="more"><a href="/index">"Ver el catálogo completo"</a></p>
        </main>
    }
}
