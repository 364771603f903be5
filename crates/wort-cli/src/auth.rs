//! CLI principal persistence with secure keychain storage.
//!
//! The hosting platform issues the principal; the CLI keeps a copy per
//! profile so headless invocations can authenticate API requests.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

pub use wort_core::auth::{AuthError, ClientPrincipal};
use wort_core::auth::AuthResult;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "wort-cli";

#[derive(Clone)]
struct PrincipalStore {
    username: String,
}

impl PrincipalStore {
    fn new(profile_name: &str) -> Self {
        Self {
            username: format!("client_principal:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::Storage(error.to_string()))
    }

    #[cfg(not(test))]
    fn load(&self) -> AuthResult<Option<ClientPrincipal>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load(&self) -> AuthResult<Option<ClientPrincipal>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save(&self, principal: &ClientPrincipal) -> AuthResult<()> {
        let raw = serde_json::to_string(principal)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save(&self, principal: &ClientPrincipal) -> AuthResult<()> {
        let raw = serde_json::to_string(principal)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear(&self) -> AuthResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::Storage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub fn load_stored_principal(profile_name: &str) -> AuthResult<Option<ClientPrincipal>> {
    PrincipalStore::new(profile_name).load()
}

pub fn save_stored_principal(
    profile_name: &str,
    principal: &ClientPrincipal,
) -> AuthResult<()> {
    PrincipalStore::new(profile_name).save(principal)
}

pub fn clear_stored_principal(profile_name: &str) -> AuthResult<()> {
    PrincipalStore::new(profile_name).clear()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_principal() -> ClientPrincipal {
        ClientPrincipal {
            identity_provider: "github".to_string(),
            user_id: "user-42".to_string(),
            user_details: "user@example.com".to_string(),
            user_roles: vec!["anonymous".to_string(), "authenticated".to_string()],
        }
    }

    #[test]
    fn principal_store_round_trip() {
        let profile = "auth-test-roundtrip";
        assert!(load_stored_principal(profile).unwrap().is_none());

        save_stored_principal(profile, &sample_principal()).unwrap();
        assert_eq!(
            load_stored_principal(profile).unwrap(),
            Some(sample_principal())
        );

        clear_stored_principal(profile).unwrap();
        assert!(load_stored_principal(profile).unwrap().is_none());
    }

    #[test]
    fn profiles_are_isolated() {
        save_stored_principal("auth-test-a", &sample_principal()).unwrap();
        assert!(load_stored_principal("auth-test-b").unwrap().is_none());
        clear_stored_principal("auth-test-a").unwrap();
    }
}
