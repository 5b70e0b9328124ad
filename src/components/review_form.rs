use leptos::*;

#[component]
pub fn ReviewForm(product_id: i64) -> impl IntoView {
    view! {
        <form method="post" action=format!("/producto/{product_id}") class="review-form">
            <h3>"Escribe una reseña"</h3>
            <label>"Nombre" <input type="text" name="nombre" required=true/></label>
            <label>"Reseña" <textarea name="reseña" rows="3" required=true></textarea></label>
            <label>
                "Valoración (0-5)"
                <input type="number" name="valoracion" min="0" max="5" step="0.5" value="5" required=true/>
            </label>
            <button type="submit">"Enviar"</button>
        </form>
    }
}
