//! Modelo de Product
//!
//! Un producto pertenece a una categoría, pero la integridad referencial no
//! se fuerza al desactivar categorías: `category_name` puede quedar en `None`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stock del producto: siempre presente, con valores por defecto al crear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub quantity: i32,
    pub available: bool,
}

impl Default for Stock {
    fn default() -> Self {
        Self {
            quantity: 0,
            available: true,
        }
    }
}

/// Imagen asociada a un producto (solo metadatos)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

/// Especificaciones semi-estructuradas: claves conocidas + extras libres
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSpecifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Product principal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    /// Nombre de la categoría resuelto al leer; `None` si la referencia quedó colgada
    pub category_name: Option<String>,
    pub brand: String,
    pub model: String,
    pub base_price: Decimal,
    pub description: Option<String>,
    pub specifications: ProductSpecifications,
    pub stock: Stock,
    pub tags: Vec<String>,
    pub active: bool,
    pub images: Vec<ProductImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar un producto nuevo
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub brand: String,
    pub model: String,
    pub base_price: Decimal,
    pub description: Option<String>,
    pub specifications: ProductSpecifications,
    pub stock: Stock,
    pub tags: Vec<String>,
    pub images: Vec<ProductImage>,
}

/// Cambios parciales sobre un producto
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub category_id: Option<Uuid>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub base_price: Option<Decimal>,
    pub description: Option<String>,
    pub specifications: Option<ProductSpecifications>,
    pub stock: Option<Stock>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<ProductImage>>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_specifications_keep_unknown_keys() {
        let specs: ProductSpecifications = serde_json::from_value(json!({
            "color": "Inox",
            "capacity_liters": 382,
            "energy": "A+"
        }))
        .unwrap();

        assert_eq!(specs.color.as_deref(), Some("Inox"));
        assert_eq!(specs.extra.get("capacity_liters"), Some(&json!(382)));

        let back = serde_json::to_value(&specs).unwrap();
        assert_eq!(back["energy"], "A+");
        assert!(back.get("kind").is_none());
    }

    #[test]
    fn test_stock_defaults() {
        let stock = Stock::default();
        assert_eq!(stock.quantity, 0);
        assert!(stock.available);
    }
}
