//! Catalog management: create, edit, delete, restock and search products.
//!
//! Every write saves the durable view first and only then mutates the
//! ledger, so a failed save leaves memory untouched.

use tracing::{debug, info};

use tienda_core::validation::{
    normalize_sku, validate_restock_quantity, validate_search_query, validate_stock, MAX_STOCK,
};
use tienda_core::{CoreError, Product, ProductDraft, ValidationError};

use super::Register;
use crate::error::PosResult;
use crate::store::{RecordStore, RecordStoreExt};

impl<S: RecordStore> Register<S> {
    /// Adds a product. The price is derived from cost and margin.
    ///
    /// ## Errors
    /// - `Validation` for a bad SKU, name or cost
    /// - `DuplicateSku` if the SKU is taken
    /// - `Store` if the catalog cannot be saved
    pub fn add_product(&mut self, draft: ProductDraft) -> PosResult<Product> {
        let product = draft.build()?;
        if self.ledger.find_by_sku(&product.sku).is_some() {
            return Err(CoreError::DuplicateSku(product.sku).into());
        }

        let mut durable = self.durable_products()?;
        durable.push(product.clone());
        self.store.save(&durable)?;

        self.ledger.insert(product.clone())?;
        info!(sku = %product.sku, price = %product.price, "Product created");
        Ok(product)
    }

    /// Edits a product. The SKU is immutable; the draft's SKU is ignored.
    ///
    /// `draft.stock` is the durable (unreserved) stock. Units the cart holds
    /// stay reserved, so live stock becomes `draft.stock - reserved`.
    ///
    /// ## Errors
    /// - `ProductNotFound` for an unknown SKU
    /// - `InsufficientStock` if the new stock is below what the cart holds
    pub fn update_product(&mut self, sku: &str, mut draft: ProductDraft) -> PosResult<Product> {
        let sku = normalize_sku(sku);
        if self.ledger.find_by_sku(&sku).is_none() {
            return Err(CoreError::ProductNotFound(sku).into());
        }

        draft.sku = sku.clone();
        let durable_product = draft.build()?;
        let reserved = self.cart.reserved(&sku);
        let live_stock = durable_product
            .stock
            .checked_sub(reserved)
            .ok_or_else(|| CoreError::InsufficientStock {
                sku: sku.clone(),
                available: durable_product.stock,
                requested: reserved,
            })?;

        let mut durable = self.durable_products()?;
        if let Some(slot) = durable.iter_mut().find(|p| p.sku == sku) {
            *slot = durable_product.clone();
        }
        self.store.save(&durable)?;

        let live = Product {
            stock: live_stock,
            ..durable_product
        };
        let updated = self.ledger.replace(&sku, live)?.clone();
        info!(sku = %sku, price = %updated.price, stock = updated.stock, "Product updated");
        Ok(updated)
    }

    /// Removes a product from the catalog.
    ///
    /// ## Errors
    /// `ProductReserved` while the cart holds units of it.
    pub fn delete_product(&mut self, sku: &str) -> PosResult<Product> {
        let sku = normalize_sku(sku);
        let reserved = self.cart.reserved(&sku);
        if reserved > 0 {
            return Err(CoreError::ProductReserved { sku, reserved }.into());
        }
        if self.ledger.find_by_sku(&sku).is_none() {
            return Err(CoreError::ProductNotFound(sku).into());
        }

        let durable: Vec<Product> = self
            .durable_products()?
            .into_iter()
            .filter(|p| p.sku != sku)
            .collect();
        self.store.save(&durable)?;

        let removed = self.ledger.remove(&sku)?;
        info!(sku = %sku, "Product deleted");
        Ok(removed)
    }

    /// Receives `qty` new units. Returns the new live stock.
    ///
    /// ## Errors
    /// `Validation` if the durable stock (live plus reserved) would exceed
    /// `MAX_STOCK`. Nothing is saved in that case.
    pub fn restock(&mut self, sku: &str, qty: u32) -> PosResult<u32> {
        validate_restock_quantity(qty)?;
        let sku = normalize_sku(sku);
        if self.ledger.find_by_sku(&sku).is_none() {
            return Err(CoreError::ProductNotFound(sku).into());
        }

        let mut durable = self.durable_products()?;
        if let Some(product) = durable.iter_mut().find(|p| p.sku == sku) {
            let stock = product.stock.checked_add(qty).ok_or_else(|| ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: MAX_STOCK as i64,
            })?;
            validate_stock("stock", stock)?;
            product.stock = stock;
        }
        self.store.save(&durable)?;

        Ok(self.ledger.restock(&sku, qty)?)
    }

    /// Case-insensitive match on name or SKU; blank returns everything.
    pub fn search_products(&self, query: &str) -> PosResult<Vec<&Product>> {
        let query = validate_search_query(query)?;
        let results = self.ledger.search(&query);
        debug!(query = %query, count = results.len(), "Searched products");
        Ok(results)
    }

    /// Products at or below their minimum (live stock).
    pub fn low_stock(&self) -> Vec<&Product> {
        self.ledger.low_stock()
    }
}
