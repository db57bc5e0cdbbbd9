//! Calltrack core types and utilities

pub mod credential;
pub mod error;
pub mod icons;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "tests"))]
pub mod test_support;

pub use credential::{CredentialPair, TokenClaims, decode_claims};
pub use error::{CoreError, CoreResult, ErrorContext};
pub use icons::app_icon_path;
pub use store::{FileStore, MemoryStore, SessionStore, StoreKey};
pub use types::{
    CallLog, CallType, Customer, NotificationLog, NotificationMessage, Product, Session,
    UserProfile,
};
pub use validation::ValidateConfig;
