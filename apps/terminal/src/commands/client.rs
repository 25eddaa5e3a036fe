//! # Client Commands

use clap::Args;
use serde::Serialize;
use tracing::debug;

use tienda_core::{Client, ClientDraft, StoreSettings};
use tienda_store::{RecordStore, Register};

use super::{fit, Render};
use crate::error::ApiError;

/// Fields of `client add` / `client edit`.
#[derive(Debug, Clone, Args)]
pub struct ClientForm {
    /// National identity document number (8 digits)
    pub dni: String,
    /// Full name (quote it if it has spaces)
    pub name: String,
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

impl From<ClientForm> for ClientDraft {
    fn from(form: ClientForm) -> Self {
        ClientDraft {
            dni: form.dni,
            name: form.name,
            phone: form.phone,
            email: form.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListResponse {
    pub clients: Vec<Client>,
}

impl Render for ClientListResponse {
    fn render(&self, _settings: &StoreSettings) -> String {
        if self.clients.is_empty() {
            return "No clients".to_string();
        }
        self.clients
            .iter()
            .map(|client| {
                format!(
                    "{:<10} {:<28} {:<12} {}  ({})",
                    client.dni,
                    fit(&client.name, 28),
                    client.phone.as_deref().unwrap_or("-"),
                    client.email.as_deref().unwrap_or("-"),
                    client.id
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub action: &'static str,
    pub client: Client,
}

impl Render for ClientResponse {
    fn render(&self, _settings: &StoreSettings) -> String {
        format!(
            "{} client {} {} (id {})",
            self.action, self.client.dni, self.client.name, self.client.id
        )
    }
}

/// Lists clients, filtered by name, DNI or phone when `term` is not blank.
pub fn list_clients<S: RecordStore>(register: &Register<S>, term: &str) -> ClientListResponse {
    debug!(term = %term, "list_clients command");
    let clients = if term.trim().is_empty() {
        register.clients().to_vec()
    } else {
        register.search_clients(term).into_iter().cloned().collect()
    };
    ClientListResponse { clients }
}

pub fn add_client<S: RecordStore>(
    register: &mut Register<S>,
    form: ClientForm,
) -> Result<ClientResponse, ApiError> {
    debug!(dni = %form.dni, "add_client command");
    let client = register.add_client(form.into())?;
    Ok(ClientResponse {
        action: "Added",
        client,
    })
}

pub fn update_client<S: RecordStore>(
    register: &mut Register<S>,
    id: &str,
    form: ClientForm,
) -> Result<ClientResponse, ApiError> {
    debug!(id = %id, "update_client command");
    let client = register.update_client(id, form.into())?;
    Ok(ClientResponse {
        action: "Updated",
        client,
    })
}

pub fn delete_client<S: RecordStore>(
    register: &mut Register<S>,
    id: &str,
) -> Result<ClientResponse, ApiError> {
    debug!(id = %id, "delete_client command");
    let client = register.delete_client(id)?;
    Ok(ClientResponse {
        action: "Deleted",
        client,
    })
}
