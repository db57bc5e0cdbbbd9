//! Fixtures shared by the workspace's tests

use crate::types::UserProfile;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};

/// Unsigned JWT whose `exp` is `now + offset`
pub fn token_expiring_in(offset: Duration) -> String {
    let exp = (Utc::now() + offset).timestamp();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

pub fn user() -> UserProfile {
    UserProfile {
        id: "u1".into(),
        username: "admin".into(),
        role: "admin".into(),
    }
}
