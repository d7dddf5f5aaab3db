use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bearer-token claims. `sub` carries the owner (tenant) id that every
/// query is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(owner_id: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: owner_id.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("owner-1", 24);

        assert_eq!(claims.sub, "owner-1");
        assert!(claims.exp > claims.iat);
    }
}
