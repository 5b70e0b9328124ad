use leptos::*;

use crate::models::Review;

#[component]
pub fn ReviewsList(reviews: Vec<Review>) -> impl IntoView {
    view! {
        <section class="reviews">
            <h3>"Reseñas"</h3>
            {if reviews.is_empty() {
                view! { <p class="empty">"Aún no hay reseñas."</p> }.into_view()
            } else {
                view! {
                    <ul>
                        {reviews
                            .into_iter()
                            .map(|review| {
                                view! {
                                    <li class="review">
                                        <strong>{review.nombre}</strong>
                                        " "
                                        <span class="rating">{stars(review.valoracion)}</span>
                                        <p>{review.resena}</p>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_view()
            }}
        </section>
    }
}

/// Rating rounded to whole stars, e.g. `★★★☆☆ (3.0)`.
fn stars(rating: Option<f64>) -> String {
    let rating = rating.unwrap_or(0.0).clamp(0.0, 5.0);
    let full = rating.round() as usize;
    format!("{}{} ({:.1})", "★".repeat(full), "☆".repeat(5 - full), rating)
}
