//! Store en memoria
//!
//! Implementa los tres stores sobre mapas protegidos por un `RwLock` de tokio.
//! Se usa en los tests y cuando el servicio arranca sin `DATABASE_URL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryStore, ProductStore, QuotationStore};
use crate::models::category::{Category, CategoryChanges, NewCategory};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::query::{ProductFilter, ProductOrder, ProductQuery, QuotationFilter, QuotationQuery};
use crate::models::quotation::{Quotation, QuotationStatus};
use crate::utils::clock::Clock;
use crate::utils::errors::{conflict_error, AppResult};

#[derive(Default)]
struct MemoryState {
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
    quotations: HashMap<Uuid, Quotation>,
}

impl MemoryState {
    fn resolve_category(&self, mut product: Product) -> Product {
        product.category_name = self
            .categories
            .get(&product.category_id)
            .map(|c| c.name.clone());
        product
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            clock,
        }
    }
}

/// Términos de búsqueda en minúsculas
fn search_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Puntaje de relevancia: marca y modelo pesan doble que descripción y tags
fn relevance(product: &Product, terms: &[String]) -> u32 {
    let brand = product.brand.to_lowercase();
    let model = product.model.to_lowercase();
    let description = product.description.as_deref().unwrap_or_default().to_lowercase();
    let tags: Vec<String> = product.tags.iter().map(|t| t.to_lowercase()).collect();

    terms
        .iter()
        .map(|term| {
            let mut score = 0;
            if brand.contains(term.as_str()) {
                score += 2;
            }
            if model.contains(term.as_str()) {
                score += 2;
            }
            if description.contains(term.as_str()) {
                score += 1;
            }
            score += tags.iter().filter(|t| t.contains(term.as_str())).count() as u32;
            score
        })
        .sum()
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    if !product.active {
        return false;
    }
    if let Some(category_id) = filter.category_id {
        if product.category_id != category_id {
            return false;
        }
    }
    if let Some(brand) = &filter.brand_contains {
        if !product.brand.to_lowercase().contains(&brand.to_lowercase()) {
            return false;
        }
    }
    if let Some(available) = filter.available {
        if product.stock.available != available {
            return false;
        }
    }
    if let Some(text) = &filter.text {
        if relevance(product, &search_terms(text)) == 0 {
            return false;
        }
    }
    true
}

fn compare_products(a: &Product, b: &Product, order: ProductOrder, terms: &[String]) -> Ordering {
    let primary = match order {
        ProductOrder::Recent => b.created_at.cmp(&a.created_at),
        ProductOrder::Alphabetical => a
            .brand
            .to_lowercase()
            .cmp(&b.brand.to_lowercase())
            .then_with(|| a.model.to_lowercase().cmp(&b.model.to_lowercase())),
        ProductOrder::PriceAsc => a.base_price.cmp(&b.base_price),
        ProductOrder::PriceDesc => b.base_price.cmp(&a.base_price),
        // Las referencias colgadas van al final
        ProductOrder::CategoryName => match (&a.category_name, &b.category_name) {
            (Some(x), Some(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        ProductOrder::Relevance => relevance(b, terms)
            .cmp(&relevance(a, terms))
            .then_with(|| b.created_at.cmp(&a.created_at)),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn matches_quotation(quotation: &Quotation, filter: &QuotationFilter) -> bool {
    if let Some(status) = filter.status {
        if quotation.status != status {
            return false;
        }
    }
    if let Some(from) = filter.created_from {
        if quotation.created_at < from {
            return false;
        }
    }
    if let Some(to) = filter.created_to {
        if quotation.created_at > to {
            return false;
        }
    }
    if let Some(search) = &filter.contact_search {
        let search = search.to_lowercase();
        if !quotation.contact.name.to_lowercase().contains(&search)
            && !quotation.contact.phone.to_lowercase().contains(&search)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn find_active_sorted_by_name(&self) -> AppResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let state = self.state.read().await;
        Ok(state.categories.values().find(|c| c.name == name).cloned())
    }

    async fn create(&self, category: NewCategory) -> AppResult<Category> {
        let mut state = self.state.write().await;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(conflict_error("Category", "name", &category.name));
        }

        let now = self.clock.now();
        let created = Category {
            id: Uuid::new_v4(),
            name: category.name,
            description: category.description,
            active: true,
            icon: category.icon,
            created_at: now,
            updated_at: now,
        };
        state.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Option<Category>> {
        let mut state = self.state.write().await;

        if let Some(name) = &changes.name {
            if state.categories.values().any(|c| c.id != id && &c.name == name) {
                return Err(conflict_error("Category", "name", name));
            }
        }

        let now = self.clock.now();
        let Some(category) = state.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }
        if let Some(icon) = changes.icon {
            category.icon = icon;
        }
        if let Some(active) = changes.active {
            category.active = active;
        }
        category.updated_at = now;
        Ok(Some(category.clone()))
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let state = self.state.read().await;
        let terms = query
            .filter
            .text
            .as_deref()
            .map(search_terms)
            .unwrap_or_default();

        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| matches_filter(p, &query.filter))
            .cloned()
            .map(|p| state.resolve_category(p))
            .collect();
        products.sort_by(|a, b| compare_products(a, b, query.order, &terms));

        Ok(products
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|p| matches_filter(p, filter))
            .count() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned().map(|p| state.resolve_category(p)))
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Product>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id))
            .filter(|p| p.active)
            .cloned()
            .map(|p| state.resolve_category(p))
            .collect())
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let mut state = self.state.write().await;
        let now = self.clock.now();
        let created = Product {
            id: Uuid::new_v4(),
            category_id: product.category_id,
            category_name: None,
            brand: product.brand,
            model: product.model,
            base_price: product.base_price,
            description: product.description,
            specifications: product.specifications,
            stock: product.stock,
            tags: product.tags,
            active: true,
            images: product.images,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(created.id, created.clone());
        Ok(state.resolve_category(created))
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Option<Product>> {
        let mut state = self.state.write().await;
        let now = self.clock.now();
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        if let Some(brand) = changes.brand {
            product.brand = brand;
        }
        if let Some(model) = changes.model {
            product.model = model;
        }
        if let Some(base_price) = changes.base_price {
            product.base_price = base_price;
        }
        if let Some(description) = changes.description {
            product.description = Some(description);
        }
        if let Some(specifications) = changes.specifications {
            product.specifications = specifications;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(tags) = changes.tags {
            product.tags = tags;
        }
        if let Some(images) = changes.images {
            product.images = images;
        }
        if let Some(active) = changes.active {
            product.active = active;
        }
        product.updated_at = now;

        let updated = product.clone();
        Ok(Some(state.resolve_category(updated)))
    }
}

#[async_trait]
impl QuotationStore for MemoryStore {
    async fn create(&self, quotation: &Quotation) -> AppResult<Quotation> {
        let mut state = self.state.write().await;
        state.quotations.insert(quotation.id, quotation.clone());
        Ok(quotation.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Quotation>> {
        Ok(self.state.read().await.quotations.get(&id).cloned())
    }

    async fn find(&self, query: &QuotationQuery) -> AppResult<Vec<Quotation>> {
        let state = self.state.read().await;
        let mut quotations: Vec<Quotation> = state
            .quotations
            .values()
            .filter(|q| matches_quotation(q, &query.filter))
            .cloned()
            .collect();
        quotations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(quotations
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count(&self, filter: &QuotationFilter) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .quotations
            .values()
            .filter(|q| matches_quotation(q, filter))
            .count() as u64)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: QuotationStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Quotation>> {
        let mut state = self.state.write().await;
        Ok(state.quotations.get_mut(&id).map(|quotation| {
            quotation.status = status;
            quotation.updated_at = updated_at;
            quotation.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.quotations.remove(&id).is_some())
    }

    async fn count_by_status(&self) -> AppResult<HashMap<QuotationStatus, u64>> {
        let state = self.state.read().await;
        let mut counts = HashMap::new();
        for quotation in state.quotations.values() {
            *counts.entry(quotation.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
