use leptos::*;

use super::layout::{AdminNav, FlashBanner};
use crate::flash::Flash;
use crate::models::Product;

#[component]
pub fn ProductsTable(products: Vec<Product>, flash: Option<Flash>) -> impl IntoView {
    let empty = products.is_empty();
    view! {
        <AdminNav/>
        <main class="admin">
            <h1>"Productos"</h1>
            <FlashBanner flash=flash/>
            {if empty {
                view! { <p class="empty">"Todavía no hay productos."</p> }.into_view()
            } else {
                view! {
                    <table class="products-table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Imagen"</th>
                                <th>"Nombre"</th>
                                <th>"Categoría"</th>
                                <th>"Precio"</th>
                                <th>"Clics"</th>
                                <th>"Creado"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {products.into_iter().map(|product| view! { <ProductRow product=product/> }).collect_view()}
                        </tbody>
                    </table>
                }
                .into_view()
            }}
        </main>
    }
}

#[component]
fn ProductRow(product: Product) -> impl IntoView {
    let thumb = product
        .first_image()
        .map(|src| view! { <img class="thumb" src=src.to_string() alt=""/> });
    let created = product.created_display();
    view! {
        <tr>
            <td>{product.id}</td>
            <td>{thumb}</td>
            <td><a href=product.url.clone() target="_blank">{product.name.clone()}</a></td>
            <td>{product.category.clone()}</td>
            <td>{product.precio.clone().unwrap_or_default()}</td>
            <td>{product.entradas}</td>
            <td>{created}</td>
            <td>
                <form method="post" action=format!("/admin/delete/{}", product.id)>
                    <button type="submit" class="danger">"Eliminar"</button>
                </form>
            </td>
        </tr>
    }
}
