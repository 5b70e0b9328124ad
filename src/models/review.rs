use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i64,
    pub id_pagina: i64, // product id, not enforced
    pub nombre: String,
    #[serde(rename = "reseña")]
    pub resena: String,
    pub valoracion: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub id_pagina: i64,
    pub nombre: String,
    pub resena: String,
    pub valoracion: f64,
}
