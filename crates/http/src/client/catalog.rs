//! Reference data (products and customers)
//!
//! The catalog is served from its own base URL and needs no credentials.

use super::{ClientError, TrackClient};
use calltrack_core::{Customer, Product};
use reqwest::Method;

impl TrackClient {
    /// Get a product by id
    pub async fn product(&self, id: u64) -> Result<Product, ClientError> {
        let request = self.request(Method::GET, &format!("/products/{id}"));
        self.execute(request).await
    }

    /// Get a customer by id
    pub async fn customer(&self, id: u64) -> Result<Customer, ClientError> {
        let request = self.request(Method::GET, &format!("/users/{id}"));
        self.execute(request).await
    }
}
