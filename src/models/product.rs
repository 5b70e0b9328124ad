use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub category: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub image_path: Option<String>, // comma-joined upload paths or absolute URLs
    pub afiliado: Option<String>,   // affiliate link
    pub entradas: i64,              // click counter
    pub tallas: Option<String>,     // e.g. "S-M-L" or "S,M,L"
    pub sexo: Option<String>,
    pub precio: Option<String>,     // whatever was typed in the admin form
    pub created_at: Option<String>,
}

impl Product {
    /// Image paths or URLs in the order they were entered.
    pub fn images(&self) -> Vec<&str> {
        self.image_path
            .as_deref()
            .map(|paths| {
                paths
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images().into_iter().next()
    }

    /// Affiliate link when present, product URL otherwise.
    pub fn outbound_link(&self) -> &str {
        match self.afiliado.as_deref().map(str::trim) {
            Some(link) if !link.is_empty() => link,
            _ => &self.url,
        }
    }

    pub fn created_display(&self) -> String {
        let Some(raw) = self.created_at.as_deref() else {
            return String::new();
        };
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
            .unwrap_or_else(|_| raw.to_string())
    }
}

/// Fields collected by the admin form.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub category: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub image_path: Option<String>,
    pub afiliado: String,
    pub tallas: String,
    pub sexo: String,
    pub precio: String,
}
