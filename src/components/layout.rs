use leptos::*;

use crate::flash::Flash;

/// Renders `body` into a complete HTML document.
pub fn render_document<F, N>(title: impl Into<String>, body: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    let title = title.into();
    let head = leptos::ssr::render_to_string(move || {
        view! {
            <meta charset="utf-8"/>
            <meta name="viewport" content="width=device-width, initial-scale=1"/>
            <title>{title}</title>
            <link rel="stylesheet" href="/static/style.css"/>
        }
    });
    let body = leptos::ssr::render_to_string(body);
    format!(
        "<!DOCTYPE html><html lang=\"es\"><head>{head}</head><body>{body}\
         <script src=\"/static/catalog.js\" defer></script></body></html>"
    )
}

#[component]
pub fn FlashBanner(flash: Option<Flash>) -> impl IntoView {
    flash.map(|flash| {
        view! {
            <div class=format!("flash flash-{}", flash.level.as_str()) role="status">
                {flash.message}
            </div>
        }
    })
}

#[component]
pub fn SiteNav() -> impl IntoView {
    view! {
        <nav class="site-nav">
            <a href="/">"Inicio"</a>
            <a href="/index">"Catálogo"</a>
            <a href="/todos">"Todos los productos"</a>
        </nav>
    }
}

#[component]
pub fn AdminNav() -> impl IntoView {
    view! {
        <nav class="site-nav admin-nav">
            <a href="/admin/new">"Nuevo producto"</a>
            <a href="/admin/list">"Listado"</a>
        </nav>
    }
}
