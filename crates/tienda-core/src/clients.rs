//! # Client Registry
//!
//! Registered customers, keyed by an immutable UUID and a unique DNI.

use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Client, ClientDraft};
use crate::validation::{validate_client_name, validate_dni, validate_email};

/// The in-memory client list.
#[derive(Debug, Default, Clone)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    pub fn new(clients: Vec<Client>) -> Self {
        ClientRegistry { clients }
    }

    /// All clients in registration order.
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Registers a new client with a fresh UUID.
    ///
    /// ## Errors
    /// - `Validation(Duplicate)` if another client has the same DNI
    /// - `Validation(..)` for a blank DNI or name, or a malformed email
    pub fn add(&mut self, draft: ClientDraft) -> CoreResult<&Client> {
        let client = Self::build(Uuid::new_v4().to_string(), draft)?;
        self.ensure_dni_free(&client.dni, None)?;

        debug!(id = %client.id, dni = %client.dni, "Registered client");
        self.clients.push(client);
        Ok(&self.clients[self.clients.len() - 1])
    }

    /// Replaces every editable field of a client.
    pub fn update(&mut self, id: &str, draft: ClientDraft) -> CoreResult<&Client> {
        let index = self.index_of(id)?;
        let client = Self::build(id.to_string(), draft)?;
        self.ensure_dni_free(&client.dni, Some(id))?;

        self.clients[index] = client;
        Ok(&self.clients[index])
    }

    pub fn remove(&mut self, id: &str) -> CoreResult<Client> {
        let index = self.index_of(id)?;
        Ok(self.clients.remove(index))
    }

    /// Case-insensitive match on name; substring match on DNI and phone.
    pub fn search(&self, term: &str) -> Vec<&Client> {
        let term = term.trim();
        let lowered = term.to_lowercase();
        self.clients
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&lowered)
                    || c.dni.contains(term)
                    || c.phone.as_deref().is_some_and(|phone| phone.contains(term))
            })
            .collect()
    }

    fn build(id: String, draft: ClientDraft) -> CoreResult<Client> {
        validate_dni(&draft.dni)?;
        validate_client_name(&draft.name)?;

        let email = non_blank(draft.email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        Ok(Client {
            id,
            dni: draft.dni.trim().to_string(),
            name: draft.name.trim().to_string(),
            phone: non_blank(draft.phone),
            email,
        })
    }

    fn ensure_dni_free(&self, dni: &str, except_id: Option<&str>) -> CoreResult<()> {
        let taken = self
            .clients
            .iter()
            .any(|c| c.dni == dni && Some(c.id.as_str()) != except_id);

        if taken {
            return Err(ValidationError::Duplicate {
                field: "dni".to_string(),
                value: dni.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::ClientNotFound(id.to_string()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(dni: &str, name: &str, phone: Option<&str>) -> ClientDraft {
        ClientDraft {
            dni: dni.to_string(),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            email: None,
        }
    }

    #[test]
    fn test_add_assigns_uuid() {
        let mut registry = ClientRegistry::default();
        let client = registry.add(draft("12345678", " Ana Torres ", Some("987654321"))).unwrap();
        assert!(crate::validation::validate_uuid(&client.id).is_ok());
        assert_eq!(client.name, "Ana Torres");
    }

    #[test]
    fn test_duplicate_dni_rejected() {
        let mut registry = ClientRegistry::default();
        registry.add(draft("12345678", "Ana", None)).unwrap();
        let err = registry.add(draft("12345678", "Otra", None)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_keeps_id_and_checks_dni() {
        let mut registry = ClientRegistry::default();
        let ana = registry.add(draft("111", "Ana", None)).unwrap().id.clone();
        registry.add(draft("222", "Luis", None)).unwrap();

        // Same DNI on the same client is fine.
        let updated = registry.update(&ana, draft("111", "Ana María", None)).unwrap();
        assert_eq!(updated.id, ana);
        assert_eq!(updated.name, "Ana María");

        assert!(registry.update(&ana, draft("222", "Ana", None)).is_err());
        assert!(matches!(
            registry.update("nope", draft("333", "X", None)),
            Err(CoreError::ClientNotFound(_))
        ));
    }

    #[test]
    fn test_remove() {
        let mut registry = ClientRegistry::default();
        let id = registry.add(draft("111", "Ana", None)).unwrap().id.clone();
        assert_eq!(registry.remove(&id).unwrap().dni, "111");
        assert!(registry.is_empty());
        assert!(registry.remove(&id).is_err());
    }

    #[test]
    fn test_search() {
        let mut registry = ClientRegistry::default();
        registry.add(draft("44556677", "Ana Torres", Some("987111222"))).unwrap();
        registry.add(draft("11223344", "Luis Pérez", None)).unwrap();

        assert_eq!(registry.search("ana").len(), 1);
        assert_eq!(registry.search("2233")[0].name, "Luis Pérez");
        assert_eq!(registry.search("2233").len(), 1);
        assert_eq!(registry.search("987").len(), 1);
        // Luis by DNI, Ana by phone
        assert_eq!(registry.search("1122").len(), 2);
        assert_eq!(registry.search("").len(), 2);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut registry = ClientRegistry::default();
        let mut input = draft("999", "Rosa", Some("  "));
        input.email = Some(String::new());
        let client = registry.add(input).unwrap();
        assert_eq!(client.phone, None);
        assert_eq!(client.email, None);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut registry = ClientRegistry::default();
        let mut input = draft("999", "Rosa", None);
        input.email = Some("rosa".to_string());
        assert!(registry.add(input).is_err());
    }
}
