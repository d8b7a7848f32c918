//! Notes vault integration -- read/write markdown notes over the local
//! REST API.
//!
//! The vault API serves `https://127.0.0.1:27124/vault/<vault>/<note path>`
//! with a self-signed certificate, so certificate checks are disabled for
//! this client only.

use reqwest::Client;
use url::Url;

use crate::integrations::keyring_store;
use crate::integrations::traits::{Integration, NoteStore};

pub struct NotesClient {
    api_base: String,
    vault: String,
    api_key: String,
}

impl NotesClient {
    /// Load the stored API key from the OS keyring (empty string if absent).
    pub fn new(api_base: &str, vault: &str) -> Self {
        let api_key = keyring_store::get("notes_api_key")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self {
            api_base: api_base.to_string(),
            vault: vault.to_string(),
            api_key,
        }
    }

    /// Build a client with an explicit API key.
    pub fn with_key(api_base: &str, vault: &str, api_key: &str) -> Self {
        Self {
            api_base: api_base.to_string(),
            vault: vault.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Persist a user-provided API key to the OS keyring and update
    /// in-memory state.
    pub fn set_credentials(&mut self, api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("notes_api_key", api_key)?;
        self.api_key = api_key.to_string();
        Ok(())
    }

    fn http_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        // Local API only: the vault server uses a self-signed certificate.
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(client)
    }

    /// Build a note URL like
    /// `https://127.0.0.1:27124/vault/My%20Vault/path/to/file.md`.
    /// Path segments are percent-encoded individually so slashes survive.
    fn build_note_url(&self, path: &str) -> Result<Url, Box<dyn std::error::Error>> {
        let base = Url::parse(&self.api_base)?;
        let encoded_path = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let url = base.join(&format!(
            "vault/{}/{}",
            urlencoding::encode(&self.vault),
            encoded_path
        ))?;
        Ok(url)
    }
}

impl NoteStore for NotesClient {
    fn read_note(&self, path: &str) -> Result<String, Box<dyn std::error::Error>> {
        let url = self.build_note_url(path)?;

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            self.http_client()?
                .get(url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .send(),
        )?;

        if !resp.status().is_success() {
            return Err(format!("Failed to read note {path}: HTTP {}", resp.status()).into());
        }

        Ok(rt.block_on(resp.text())?)
    }

    fn write_note(&self, path: &str, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let url = self.build_note_url(path)?;

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            self.http_client()?
                .put(url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "text/plain; charset=utf-8")
                .body(content.as_bytes().to_vec())
                .send(),
        )?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = rt.block_on(resp.text()).unwrap_or_default();
            return Err(format!("Failed to write note {path}: {status} {text}").into());
        }

        Ok(())
    }
}

impl Integration for NotesClient {
    fn name(&self) -> &str {
        "notes"
    }

    fn display_name(&self) -> &str {
        "Notes Vault"
    }

    fn is_authenticated(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn authenticate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.api_key.is_empty() {
            return Err("No notes API key stored. Call set_credentials first.".into());
        }

        let rt = tokio::runtime::Runtime::new()?;
        let resp = rt.block_on(
            self.http_client()?
                .get(&self.api_base)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .send(),
        )?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(format!("Notes auth check failed: HTTP {}", resp.status()).into())
        }
    }

    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::delete("notes_api_key")?;
        self.api_key.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_url_percent_encodes_vault_and_segments() {
        let client = NotesClient::with_key("https://127.0.0.1:27124", "My Vault", "k");
        let url = client
            .build_note_url("Projects/demo proj/00_brainstorm.md")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://127.0.0.1:27124/vault/My%20Vault/Projects/demo%20proj/00_brainstorm.md"
        );
    }

    #[test]
    fn read_note_returns_body() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/vault/v/note.md")
            .with_status(200)
            .with_body("---\nproject: x\n---\n")
            .create();

        let client = NotesClient::with_key(&server.url(), "v", "k");
        let text = client.read_note("note.md").unwrap();
        assert!(text.starts_with("---"));
    }

    #[test]
    fn write_note_surfaces_failures() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("PUT", "/vault/v/note.md")
            .with_status(403)
            .with_body("locked")
            .create();

        let client = NotesClient::with_key(&server.url(), "v", "k");
        let err = client.write_note("note.md", "body").unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn write_note_puts_plain_text() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("PUT", "/vault/v/out.md")
            .match_header("content-type", "text/plain; charset=utf-8")
            .match_body("# generated")
            .with_status(204)
            .create();

        let client = NotesClient::with_key(&server.url(), "v", "k");
        client.write_note("out.md", "# generated").unwrap();
        m.assert();
    }
}
