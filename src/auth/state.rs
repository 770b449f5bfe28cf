//! Authentication state trait and macro.

use crate::auth::IdentityProvider;
use crate::db::Database;

/// Trait for state types that provide identity verification and database access.
pub trait HasAuthBackend {
    fn identity(&self) -> &dyn IdentityProvider;
    fn db(&self) -> &Database;
}

/// Macro to implement `HasAuthBackend` for state structs with the standard fields.
///
/// The struct must have these fields:
/// - `identity: Arc<dyn IdentityProvider>`
/// - `db: Database`
///
/// # Example
/// ```ignore
/// use crate::impl_has_auth_backend;
///
/// #[derive(Clone)]
/// pub struct MyState {
///     pub db: Database,
///     pub identity: Arc<dyn IdentityProvider>,
/// }
///
/// impl_has_auth_backend!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn identity(&self) -> &dyn $crate::auth::IdentityProvider {
                &*self.identity
            }
            fn db(&self) -> &$crate::db::Database {
                &self.db
            }
        }
    };
}
