use leptos::*;

use super::layout::SiteNav;
use crate::models::Product;

/// Every product as a plain list, most clicked first.
#[component]
pub fn AllProductsPage(products: Vec<Product>) -> impl IntoView {
    view! {
        <SiteNav/>
        <main>
            <h1>"Todos los productos"</h1>
            <ol class="all-products">
                {products
                    .into_iter()
                    .map(|product| {
                        view! {
                            <li>
                                <a href=format!("/producto/{}", product.id) data-click=product.id.to_string()>
                                    {product.name}
                                </a>
                                " "
                                <span class="category">{product.category}</span>
                                " "
                                <span class="clicks">{product.entradas}" visitas"</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>
        </main>
    }
}
