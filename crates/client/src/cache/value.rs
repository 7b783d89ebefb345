//! Cached value types.

use std::sync::Arc;

use lunchdesk_core::{Customer, DashboardStats, Location, Meal, Order, Page};

/// A cached query result. Values are shared, so cache hits never clone
/// the underlying records.
#[derive(Debug, Clone)]
pub enum CacheValue {
    DashboardStats(Arc<DashboardStats>),
    Meals(Arc<Page<Meal>>),
    Locations(Arc<Page<Location>>),
    Users(Arc<Page<Customer>>),
    User(Arc<Customer>),
    Orders(Arc<Page<Order>>),
}

/// A query result type that can live in the cache.
pub trait Cached: Send + Sync + Sized + 'static {
    fn into_value(value: Arc<Self>) -> CacheValue;

    /// `None` if `value` holds another type.
    fn from_value(value: CacheValue) -> Option<Arc<Self>>;
}

macro_rules! cached {
    ($ty:ty => $variant:ident) => {
        impl Cached for $ty {
            fn into_value(value: Arc<Self>) -> CacheValue {
                CacheValue::$variant(value)
            }

            fn from_value(value: CacheValue) -> Option<Arc<Self>> {
                match value {
                    CacheValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

cached!(DashboardStats => DashboardStats);
cached!(Page<Meal> => Meals);
cached!(Page<Location> => Locations);
cached!(Page<Customer> => Users);
cached!(Customer => User);
cached!(Page<Order> => Orders);
