//! Client state shared across commands.
//!
//! [`Storefront`] owns the configuration, the backend client and both
//! persisted stores, and exposes each user action as one method. Front ends
//! only translate input into these calls and render the returned notices.

use secrecy::SecretString;

use francine_core::ProductId;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{Product, UiMode};
use crate::notice::Notice;
use crate::services::{
    AdminService, AuthService, Catalog, CheckoutForm, CheckoutService, Receipt, load_catalog,
};
use crate::storage::{FileStorage, Storage};
use crate::stores::{AuthStore, CartStore};

/// Storefront client state.
///
/// Mutating actions take `&mut self`, so only one of them can be in flight
/// per instance; a second checkout cannot start while one is pending.
pub struct Storefront<S> {
    config: ClientConfig,
    api: ApiClient,
    cart: CartStore<S>,
    auth: AuthStore<S>,
    catalog: Option<Catalog>,
}

impl Storefront<FileStorage> {
    /// Open the client with state persisted under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client cannot be built.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir)?;
        Self::new(config, storage)
    }
}

impl<S: Storage + Clone> Storefront<S> {
    /// Create the client over the given storage, restoring cart and session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, storage: S) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let cart = CartStore::load(storage.clone());
        let auth = AuthStore::load(storage);

        if let Some(user) = auth.user() {
            set_sentry_user(&user.name, user.email());
        }

        Ok(Self {
            config,
            api,
            cart,
            auth,
            catalog: None,
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// Get a reference to the session store.
    #[must_use]
    pub const fn auth(&self) -> &AuthStore<S> {
        &self.auth
    }

    /// Surface to present for the current session.
    #[must_use]
    pub fn mode(&self) -> UiMode {
        self.auth.mode()
    }

    /// Fetch the public catalog, falling back to the built-in list.
    pub async fn load_catalog(&mut self) -> &Catalog {
        let catalog = load_catalog(&self.api).await;
        self.catalog.insert(catalog)
    }

    /// The last loaded catalog, fetching it if none has been loaded yet.
    pub async fn catalog(&mut self) -> &Catalog {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => load_catalog(&self.api).await,
        };
        self.catalog.insert(catalog)
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<Notice> {
        self.cart
            .add(product.id.clone(), product.name.clone(), product.price)?;
        add_breadcrumb("cart", "Added to cart", Some(&[("id", product.id.as_str())]));
        tracing::info!(id = %product.id, count = self.cart.count(), "Added to cart");
        Ok(Notice::AddedToCart(product.name.clone()))
    }

    /// Add one unit of the catalog product with this ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the catalog has no such product, or an error if
    /// the cart cannot be persisted.
    pub async fn add_to_cart_by_id(&mut self, id: &ProductId) -> Result<Notice> {
        let product = self
            .catalog()
            .await
            .find(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
        self.add_to_cart(&product)
    }

    /// Remove a product's line from the cart.
    ///
    /// Returns `None` when the product was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<Option<Notice>> {
        let Some(name) = self.cart.cart().get(id).map(|line| line.name.clone()) else {
            return Ok(None);
        };
        self.cart.remove(id)?;
        tracing::info!(%id, "Removed from cart");
        Ok(Some(Notice::RemovedFromCart(name)))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<Notice> {
        self.cart.clear()?;
        Ok(Notice::CartCleared)
    }

    /// Place a guest order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a checkout error; the cart is only cleared on success.
    pub async fn checkout(&mut self, form: &CheckoutForm) -> Result<Receipt> {
        add_breadcrumb("checkout", "Checkout submitted", None);
        let receipt = CheckoutService::new(&self.api, &mut self.cart)
            .submit(form)
            .await?;
        Ok(receipt)
    }

    /// Log in and cache the session.
    ///
    /// # Errors
    ///
    /// Returns an auth error; the cached session is unchanged on failure.
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<Notice> {
        let session = AuthService::new(&self.api, &mut self.auth)
            .login(email, password)
            .await?;
        set_sentry_user(&session.user.name, session.user.email());
        Ok(Notice::logged_in(&session))
    }

    /// Register an account and cache the new session.
    ///
    /// # Errors
    ///
    /// Returns an auth error; the cached session is unchanged on failure.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<Notice> {
        let session = AuthService::new(&self.api, &mut self.auth)
            .register(name, email, password)
            .await?;
        set_sentry_user(&session.user.name, session.user.email());
        Ok(Notice::Registered(session.user.name))
    }

    /// Forget the cached session.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be removed.
    pub fn logout(&mut self) -> Result<Notice> {
        AuthService::new(&self.api, &mut self.auth).logout()?;
        clear_sentry_user();
        Ok(Notice::LoggedOut)
    }

    /// Catalog management bound to the cached session.
    #[must_use]
    pub const fn admin(&self) -> AdminService<'_, S> {
        AdminService::new(&self.api, &self.auth)
    }

    /// Remember a catalog refreshed by an admin write.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::fallback_products;
    use crate::storage::MemoryStorage;

    fn storefront(storage: MemoryStorage) -> Storefront<MemoryStorage> {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        Storefront::new(config, storage).unwrap()
    }

    #[test]
    fn test_cart_actions_return_notices() {
        let mut sf = storefront(MemoryStorage::new());
        let product = fallback_products().into_iter().next().unwrap();

        let notice = sf.add_to_cart(&product).unwrap();
        assert_eq!(notice.to_string(), "Neural AI Earbuds Pro added to cart");
        assert_eq!(sf.cart().count(), 1);

        let notice = sf.remove_from_cart(&product.id).unwrap().unwrap();
        assert_eq!(notice.to_string(), "Neural AI Earbuds Pro removed from cart");
        assert!(sf.remove_from_cart(&product.id).unwrap().is_none());
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage = MemoryStorage::new();
        let mut sf = storefront(storage.clone());
        for product in fallback_products().iter().take(3) {
            sf.add_to_cart(product).unwrap();
        }
        drop(sf);

        let sf = storefront(storage);
        assert_eq!(sf.cart().count(), 3);
        assert_eq!(sf.mode(), UiMode::Customer);
    }

    #[tokio::test]
    async fn test_admin_requires_session() {
        let sf = storefront(MemoryStorage::new());
        let err = sf.admin().delete(&ProductId::new("1")).await.unwrap_err();
        assert!(matches!(err, crate::services::AdminError::SessionExpired));
    }
}
