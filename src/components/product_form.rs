use leptos::*;

use super::layout::{AdminNav, FlashBanner};
use crate::flash::Flash;

/// Admin entry form. Files in `image_files` win over `image_urls`.
#[component]
pub fn ProductForm(flash: Option<Flash>) -> impl IntoView {
    view! {
        <AdminNav/>
        <main class="admin">
            <h1>"Nuevo producto"</h1>
            <FlashBanner flash=flash/>
            <form method="post" action="/admin/new" enctype="multipart/form-data" class="product-form">
                <label>"Categoría *" <input type="text" name="category" required=true/></label>
                <label>"Nombre *" <input type="text" name="name" required=true/></label>
                <label>"URL *" <input type="url" name="url" required=true/></label>
                <label>"Descripción" <textarea name="description" rows="4"></textarea></label>
                <label>
                    "Imágenes"
                    <input type="file" name="image_files" multiple=true accept=".png,.jpg,.jpeg,.webp,.gif"/>
                </label>
                <label>
                    "o URLs de imagen (separadas por comas)"
                    <input type="text" name="image_urls"/>
                </label>
                <label>"Enlace de afiliado" <input type="url" name="afiliado"/></label>
                <label>"Tallas" <input type="text" name="tallas" placeholder="S-M-L"/></label>
                <label>"Sexo" <input type="text" name="sexo"/></label>
                <label>"Precio" <input type="text" name="precio" inputmode="decimal"/></label>
                <button type="submit">"Guardar"</button>
            </form>
        </main>
    }
}
