use leptos::*;

use super::layout::SiteNav;
use super::product_card::ProductGrid;
use crate::db::{CatalogQuery, FilterOptions};
use crate::models::Product;

/// Filtered catalog. Choices in the selects only cover products that match
/// the filters already applied; the page script refreshes them from
/// `/filtros` as the form changes.
#[component]
pub fn CatalogPage(
    products: Vec<Product>,
    options: FilterOptions,
    query: CatalogQuery,
) -> impl IntoView {
    let count = products.len();
    let min_placeholder = format_price(options.precio_min_auto);
    let max_placeholder = format_price(options.precio_max_auto);

    view! {
        <SiteNav/>
        <main>
            <h1>"Catálogo"</h1>
            <form method="get" action="/index" class="filters" id="catalog-filters">
                <input type="search" name="q" value=query.q placeholder="Buscar..."/>
                <FilterSelect name="category" label="Todas las categorías" choices=options.categories selected=query.category/>
                <FilterSelect name="sexo" label="Todos" choices=options.sexos selected=query.sexo/>
                <FilterSelect name="tallas" label="Todas las tallas" choices=options.tallas selected=query.tallas/>
                <input type="number" step="any" name="precio_min" value=query.precio_min placeholder=min_placeholder/>
                <input type="number" step="any" name="precio_max" value=query.precio_max placeholder=max_placeholder/>
                <button type="submit">"Filtrar"</button>
                <a href="/index" class="reset">"Limpiar"</a>
            </form>
            <p class="result-count">{count}" resultados"</p>
            <ProductGrid products=products/>
        </main>
    }
}

#[component]
fn FilterSelect(
    name: &'static str,
    label: &'static str,
    choices: Vec<String>,
    selected: String,
) -> impl IntoView {
    view! {
        <select name=name data-filter=name>
            <option value="">{label}</option>
            {choices
                .into_iter()
                .map(|choice| {
                    let is_selected = choice == selected;
                    view! { <option value=choice.clone() selected=is_selected>{choice}</option> }
                })
                .collect_view()}
        </select>
    }
}

fn format_price(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_choice_is_marked() {
        let html = leptos::ssr::render_to_string(|| {
            view! {
                <FilterSelect
                    name="sexo"
                    label="Todos"
                    choices=vec!["hombre".to_string(), "mujer".to_string()]
                    selected="mujer".to_string()
                />
            }
        });
        let mujer = html.find("value=\"mujer\"").unwrap();
        let hombre = html.find("value=\"hombre\"").unwrap();
        assert!(html[mujer..].contains("selected"));
        assert!(!html[hombre..mujer].contains("selected"));
    }

    #[test]
    fn price_placeholders_drop_trailing_zeros() {
        assert_eq!(format_price(25.0), "25");
        assert_eq!(format_price(19.9), "19.90");
    }
}
