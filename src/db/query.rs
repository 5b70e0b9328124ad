//! Catalog filters shared by the product listing and the filter-options
//! queries, so both always narrow the same way.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Query-string parameters of `/index` and `/filtros`. Empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub q: String,
    pub category: String,
    pub sexo: String,
    pub tallas: String,
    pub precio_min: String,
    pub precio_max: String,
}

/// SQL predicate (starting with `WHERE`) and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Choices still available under the current filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub sexos: Vec<String>,
    pub tallas: Vec<String>,
    pub precio_min_auto: f64,
    pub precio_max_auto: f64,
}

impl CatalogQuery {
    pub fn trimmed(self) -> Self {
        Self {
            q: self.q.trim().to_string(),
            category: self.category.trim().to_string(),
            sexo: self.sexo.trim().to_string(),
            tallas: self.tallas.trim().to_string(),
            precio_min: self.precio_min.trim().to_string(),
            precio_max: self.precio_max.trim().to_string(),
        }
    }

    pub fn where_clause(&self) -> WhereClause {
        let mut sql = String::from("WHERE 1=1");
        let mut params = Vec::new();

        let q = self.q.trim();
        if !q.is_empty() {
            let pattern = format!("%{q}%");
            sql.push_str(" AND (name LIKE ? OR description LIKE ?)");
            params.push(Value::Text(pattern.clone()));
            params.push(Value::Text(pattern));
        }
        let category = self.category.trim();
        if !category.is_empty() {
            sql.push_str(" AND category = ?");
            params.push(Value::Text(category.to_string()));
        }
        let sexo = self.sexo.trim();
        if !sexo.is_empty() {
            sql.push_str(" AND sexo = ?");
            params.push(Value::Text(sexo.to_string()));
        }
        let tallas = self.tallas.trim();
        if !tallas.is_empty() {
            sql.push_str(" AND tallas LIKE ?");
            params.push(Value::Text(format!("%{tallas}%")));
        }
        if let Some(min) = parse_price(&self.precio_min) {
            sql.push_str(" AND precio >= ?");
            params.push(Value::Real(min));
        }
        if let Some(max) = parse_price(&self.precio_max) {
            sql.push_str(" AND precio <= ?");
            params.push(Value::Real(max));
        }

        WhereClause { sql, params }
    }
}

/// Unparseable bounds are ignored rather than rejected.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Individual sizes of a free-text size list ("S-M-L", "38, 39").
pub fn split_sizes(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c| c == '-' || c == ',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        let clause = CatalogQuery::default().where_clause();
        assert_eq!(clause.sql, "WHERE 1=1");
        assert!(clause.params.is_empty());
    }

    #[test]
    fn all_filters_are_appended_in_order() {
        let query = CatalogQuery {
            q: "lino".into(),
            category: "camisas".into(),
            sexo: "mujer".into(),
            tallas: "M".into(),
            precio_min: "10".into(),
            precio_max: "49.90".into(),
        };
        let clause = query.where_clause();
        assert_eq!(
            clause.sql,
            "WHERE 1=1 AND (name LIKE ? OR description LIKE ?) AND category = ? \
             AND sexo = ? AND tallas LIKE ? AND precio >= ? AND precio <= ?"
        );
        assert_eq!(clause.params.len(), 7);
        assert_eq!(clause.params[0], Value::Text("%lino%".into()));
        assert_eq!(clause.params[4], Value::Text("%M%".into()));
        assert_eq!(clause.params[6], Value::Real(49.9));
    }

    #[test]
    fn bad_price_bounds_are_skipped() {
        let query = CatalogQuery {
            precio_min: "barato".into(),
            precio_max: "NaN".into(),
            ..Default::default()
        };
        assert_eq!(query.where_clause().sql, "WHERE 1=1");
    }

    #[test]
    fn whitespace_only_filters_are_unset() {
        let query = CatalogQuery {
            q: "   ".into(),
            category: " zapatos ".into(),
            ..Default::default()
        }
        .trimmed();
        assert_eq!(query.category, "zapatos");
        assert_eq!(query.where_clause().sql, "WHERE 1=1 AND category = ?");
    }

    #[test]
    fn sizes_split_on_hyphen_and_comma() {
        let sizes: Vec<_> = split_sizes("S-M, L,,XL -").collect();
        assert_eq!(sizes, vec!["S", "M", "L", "XL"]);
    }
}
