use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use store_api_client::StoreBackend;
use storefront_common::{Cart, LocaleSettings, Product};

/// Carts untouched for this long are dropped on the next insert.
pub const CART_IDLE_TTL: Duration = Duration::from_secs(24 * 3600);
/// Upper bound on live carts; the least recently touched goes first.
pub const MAX_CARTS: usize = 10_000;

pub struct AppState {
    pub backend: Arc<dyn StoreBackend>,
    pub locales: LocaleSettings,
    pub products_per_page: u32,
    pub carts: CartStore,
}

impl AppState {
    pub fn new(backend: Arc<dyn StoreBackend>, locales: LocaleSettings, products_per_page: u32) -> Self {
        Self {
            backend,
            locales,
            products_per_page: products_per_page.max(1),
            carts: CartStore::new(MAX_CARTS, CART_IDLE_TTL),
        }
    }

    /// Snapshot of a cart; unknown ids read as empty.
    pub async fn cart(&self, id: Option<Uuid>) -> Cart {
        match id {
            Some(id) => self.carts.get(id).await.unwrap_or_default(),
            None => Cart::default(),
        }
    }

    pub async fn cart_count(&self, id: Option<Uuid>) -> u32 {
        match id {
            Some(id) => self.carts.get(id).await.map(|c| c.item_count()).unwrap_or(0),
            None => 0,
        }
    }
}

struct StoredCart {
    cart: Cart,
    touched: Instant,
    /// Touch order, for eviction.
    seq: u64,
}

/// Shopper carts keyed by the `cart_id` cookie.
///
/// Only ids minted here are ever stored: a cookie naming an unknown cart
/// gets a fresh id instead of being adopted.
pub struct CartStore {
    carts: Mutex<HashMap<Uuid, StoredCart>>,
    capacity: usize,
    idle_ttl: Duration,
    seq: AtomicU64,
}

impl CartStore {
    pub fn new(capacity: usize, idle_ttl: Duration) -> Self {
        Self {
            carts: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            idle_ttl,
            seq: AtomicU64::new(0),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn is_live(&self, stored: &StoredCart, now: Instant) -> bool {
        now.duration_since(stored.touched) < self.idle_ttl
    }

    pub async fn get(&self, id: Uuid) -> Option<Cart> {
        let now = Instant::now();
        let carts = self.carts.lock().await;
        carts
            .get(&id)
            .filter(|stored| self.is_live(stored, now))
            .map(|stored| stored.cart.clone())
    }

    /// Add a product to the cart named by `id`, creating a cart when `id` is
    /// absent or unknown. Returns the id of a newly created cart.
    pub async fn add(&self, id: Option<Uuid>, product: &Product, quantity: u32) -> Option<Uuid> {
        let now = Instant::now();
        let mut carts = self.carts.lock().await;

        if let Some(stored) = id.and_then(|id| carts.get_mut(&id)) {
            if self.is_live(stored, now) {
                stored.cart.add(product, quantity);
                stored.touched = now;
                stored.seq = self.next_seq();
                return None;
            }
        }

        self.prune(&mut carts, now);
        let new_id = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(product, quantity);
        let seq = self.next_seq();
        carts.insert(new_id, StoredCart { cart, touched: now, seq });
        Some(new_id)
    }

    /// Apply `f` to an existing cart. Unknown or expired ids are ignored.
    pub async fn update(&self, id: Uuid, f: impl FnOnce(&mut Cart)) {
        let now = Instant::now();
        let mut carts = self.carts.lock().await;
        if let Some(stored) = carts.get_mut(&id) {
            if self.is_live(stored, now) {
                f(&mut stored.cart);
                stored.touched = now;
                stored.seq = self.next_seq();
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.carts.lock().await.len()
    }

    /// Drop idle carts, then evict the stalest until there is room for one more.
    fn prune(&self, carts: &mut HashMap<Uuid, StoredCart>, now: Instant) {
        carts.retain(|_, stored| self.is_live(stored, now));

        while carts.len() >= self.capacity {
            let Some(stalest) = carts
                .iter()
                .min_by_key(|(_, stored)| stored.seq)
                .map(|(id, _)| *id)
            else {
                break;
            };
            carts.remove(&stalest);
        }
    }
}
