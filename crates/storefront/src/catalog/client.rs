//! Catalog REST client implementation.
//!
//! Uses `reqwest` for HTTP and `url` for endpoint construction so that path
//! segments and query values are always percent-encoded.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tinycart_core::{Product, ProductId};
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::CatalogError;
use super::types::{CategoryEntry, ProductPage};
use crate::config::CatalogConfig;

/// Longest body excerpt kept in errors and logs.
const BODY_EXCERPT_CHARS: usize = 200;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog service.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The configured service root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL by appending encoded `segments` to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CatalogError::InvalidUrl(format!(
                    "{} cannot be used as a base URL",
                    self.inner.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a `GET` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(url = %url, "Catalog request");

        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %body.chars().take(BODY_EXCERPT_CHARS).collect::<String>(),
                "Catalog response did not match the expected shape"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of products, with pagination metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn fetch_product_page(
        &self,
        limit: u32,
        skip: u32,
    ) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());

        self.get_json(url)
            .await
            .inspect_err(|e| error!(error = %e, "Error fetching products"))
    }

    /// Get one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn fetch_products(
        &self,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<Product>, CatalogError> {
        Ok(self.fetch_product_page(limit, skip).await?.products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()])?;

        self.get_json(url)
            .await
            .inspect_err(|e| error!(error = %e, "Error fetching product {id}"))
    }

    /// Full-text search over products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.endpoint(&["products", "search"])?;
        url.query_pairs_mut().append_pair("q", query);

        self.get_json::<ProductPage>(url)
            .await
            .map(|page| page.products)
            .inspect_err(|e| error!(error = %e, "Error searching products"))
    }

    /// Get the products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn fetch_products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint(&["products", "category", category])?;

        self.get_json::<ProductPage>(url)
            .await
            .map(|page| page.products)
            .inspect_err(|e| error!(error = %e, "Error fetching category products"))
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// List category identifiers.
    ///
    /// Tries the slug listing first. If that fails for any reason (transport,
    /// status, or a body that is not a list of strings), tries the object
    /// listing once and reduces each object to its slug or name.
    ///
    /// # Errors
    ///
    /// Returns the fallback's error if both attempts fail.
    #[instrument(skip(self))]
    pub async fn try_fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        let primary = self.endpoint(&["products", "category-list"])?;
        match self.get_json::<Vec<String>>(primary).await {
            Ok(categories) => return Ok(categories),
            Err(e) => warn!(error = %e, "Category list failed, trying category objects"),
        }

        let fallback = self.endpoint(&["products", "categories"])?;
        self.get_json::<Vec<CategoryEntry>>(fallback)
            .await?
            .into_iter()
            .map(CategoryEntry::into_slug)
            .collect()
    }

    /// List category identifiers, or an empty list if the service cannot
    /// provide them.
    ///
    /// See [`Self::try_fetch_categories`] for the fallback behavior.
    pub async fn fetch_categories(&self) -> Vec<String> {
        self.try_fetch_categories().await.unwrap_or_else(|e| {
            error!(error = %e, "Error fetching categories");
            Vec::new()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use tinycart_core::Price;

    use super::*;

    fn client_for(base_url: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::with_base_url(base_url).unwrap()).unwrap()
    }

    fn product_json(id: i64, price: f64) -> Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "description": "Test product",
            "category": "smartphones",
            "price": price,
            "discountPercentage": 10.0,
            "rating": 4.5,
            "stock": 12,
            "brand": "Apple",
            "thumbnail": "https://cdn.dummyjson.com/thumb.png",
            "images": []
        })
    }

    fn page_json(products: Vec<Value>) -> Value {
        let total = products.len();
        json!({"products": products, "total": total, "skip": 0, "limit": total})
    }

    // =========================================================================
    // URL Building
    // =========================================================================

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client_for("https://dummyjson.com");
        let url = client
            .endpoint(&["products", "category", "mens shirts"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dummyjson.com/products/category/mens%20shirts"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client_for("http://localhost:8080/catalog/");
        let url = client.endpoint(&["products", "1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/catalog/products/1");
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[tokio::test]
    async fn test_fetch_products_sends_pagination() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/products")
                    .query_param("limit", "2")
                    .query_param("skip", "10");
                then.status(200).json_body(json!({
                    "products": [product_json(11, 9.99), product_json(12, 10.0)],
                    "total": 194,
                    "skip": 10,
                    "limit": 2
                }));
            })
            .await;

        let client = client_for(&server.base_url());
        let page = client.fetch_product_page(2, 10).await.unwrap();
        mock.assert_async().await;

        assert_eq!(page.total, 194);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].price, Price::from_cents(999));
        assert!(page.has_more());

        let products = client.fetch_products(2, 10).await.unwrap();
        assert_eq!(products[1].id, ProductId::new(12));
    }

    #[tokio::test]
    async fn test_fetch_products_propagates_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products");
                then.status(500).body("boom");
            })
            .await;

        let err = client_for(&server.base_url())
            .fetch_products(20, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn test_fetch_product_by_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/products/7");
                then.status(200).json_body(product_json(7, 49.99));
            })
            .await;

        let product = client_for(&server.base_url())
            .fetch_product_by_id(ProductId::new(7))
            .await
            .unwrap();
        mock.assert_async().await;

        assert_eq!(product.id, ProductId::new(7));
        assert_eq!(product.brand.as_deref(), Some("Apple"));
    }

    #[tokio::test]
    async fn test_fetch_product_by_id_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/9999");
                then.status(404)
                    .json_body(json!({"message": "Product with id '9999' not found"}));
            })
            .await;

        let err = client_for(&server.base_url())
            .fetch_product_by_id(ProductId::new(9999))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_product_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/1");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let err = client_for(&server.base_url())
            .fetch_product_by_id(ProductId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_search_products() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/products/search")
                    .query_param("q", "phone");
                then.status(200)
                    .json_body(page_json(vec![product_json(121, 299.99)]));
            })
            .await;

        let products = client_for(&server.base_url())
            .search_products("phone")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new(121));
    }

    #[tokio::test]
    async fn test_fetch_products_by_category() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/products/category/smartphones");
                then.status(200).json_body(page_json(vec![
                    product_json(121, 299.99),
                    product_json(122, 999.99),
                ]));
            })
            .await;

        let products = client_for(&server.base_url())
            .fetch_products_by_category("smartphones")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 1
        let err = client_for("http://127.0.0.1:1")
            .fetch_products(20, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }

    // =========================================================================
    // Categories
    // =========================================================================

    #[tokio::test]
    async fn test_categories_primary() {
        let server = MockServer::start_async().await;
        let primary = server
            .mock_async(|when, then| {
                when.method(GET).path("/products/category-list");
                then.status(200).json_body(json!(["beauty", "fragrances"]));
            })
            .await;
        let fallback = server
            .mock_async(|when, then| {
                when.method(GET).path("/products/categories");
                then.status(200).json_body(json!([]));
            })
            .await;

        let categories = client_for(&server.base_url()).fetch_categories().await;
        assert_eq!(categories, vec!["beauty", "fragrances"]);
        primary.assert_async().await;
        fallback.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_categories_fall_back_to_objects() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/category-list");
                then.status(500);
            })
            .await;
        let fallback = server
            .mock_async(|when, then| {
                when.method(GET).path("/products/categories");
                then.status(200).json_body(json!([
                    {"slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty"},
                    {"name": "Fragrances"}
                ]));
            })
            .await;

        let categories = client_for(&server.base_url()).fetch_categories().await;
        fallback.assert_async().await;
        assert_eq!(categories, vec!["beauty", "Fragrances"]);
    }

    #[tokio::test]
    async fn test_categories_fall_back_on_unexpected_shape() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/category-list");
                then.status(200).json_body(json!([{"slug": "beauty"}]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/categories");
                then.status(200).json_body(json!([{"slug": "beauty"}]));
            })
            .await;

        let categories = client_for(&server.base_url()).fetch_categories().await;
        assert_eq!(categories, vec!["beauty"]);
    }

    #[tokio::test]
    async fn test_categories_both_fail_yields_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/category-list");
                then.status(503);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/categories");
                then.status(503);
            })
            .await;

        let client = client_for(&server.base_url());
        assert!(client.fetch_categories().await.is_empty());
        assert!(matches!(
            client.try_fetch_categories().await,
            Err(CatalogError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_categories_unrecognized_object() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/category-list");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/categories");
                then.status(200)
                    .json_body(json!([{"slug": "beauty"}, {"url": "https://x"}]));
            })
            .await;

        let client = client_for(&server.base_url());
        assert!(matches!(
            client.try_fetch_categories().await,
            Err(CatalogError::UnrecognizedCategory(_))
        ));
        assert!(client.fetch_categories().await.is_empty());
    }
}
