// src/services/product_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::{AppError, validation_error},
    models::product::{Product, UpdateProduct},
    storage::Collection,
};

#[derive(Clone)]
pub struct ProductService {
    products: Collection<Product>,
}

impl ProductService {
    pub fn new(products: Collection<Product>) -> Self {
        Self { products }
    }

    pub fn create(
        &self,
        name: &str,
        price: Decimal,
        description: Option<String>,
        features: Option<Vec<String>>,
    ) -> Result<Product, AppError> {
        if name.trim().is_empty() {
            return Err(validation_error("name", "required", "O nome do produto é obrigatório."));
        }

        let product = Product {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            price,
            description,
            features,
            created_at: Utc::now(),
        };

        self.products.create(product)
    }

    pub fn list(&self) -> Result<Vec<Product>, AppError> {
        self.products.get_all()
    }

    pub fn get(&self, product_id: Uuid) -> Result<Product, AppError> {
        self.products.get_by_id(product_id)
    }

    /// Edita o catálogo. Leads existentes não são tocados: eles carregam a
    /// fotografia de nome/preço tirada quando foram criados.
    pub fn update(&self, product_id: Uuid, update: UpdateProduct) -> Result<Product, AppError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(validation_error("name", "required", "O nome do produto é obrigatório."));
            }
        }

        self.products.update_with(product_id, |product| {
            if let Some(name) = update.name {
                product.name = name.trim().to_string();
            }
            if let Some(price) = update.price {
                product.price = price;
            }
            if let Some(description) = update.description {
                product.description = Some(description);
            }
            if let Some(features) = update.features {
                product.features = Some(features);
            }
        })
    }

    pub fn delete(&self, product_id: Uuid) -> Result<(), AppError> {
        self.products.delete(product_id)
    }
}
