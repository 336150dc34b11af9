use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use std::path::Path;
use tokio::io::AsyncWriteExt;

use crate::api::models::*;
use crate::cache::tree::NodeFetcher;
use crate::config::settings::Config;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("name conflict: {0}")]
    Conflict(String),

    #[error("server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Typed client for the HaNas REST backend.
///
/// Authentication is a session cookie set by `/login`; the underlying
/// reqwest cookie store carries it on every subsequent request. Clones
/// share the same connection pool and cookie jar.
#[derive(Clone)]
pub struct HaNasClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HaNasClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(map_http_error(status.as_u16(), message))
        }
    }

    // Session ---------------------------------------------------------

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let url = format!("{}/login", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&AuthRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let url = format!("{}/register", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&AuthRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = format!("{}/logout", self.base_url);
        debug!("POST {}", url);

        let response = self.http_client.post(&url).send().await?;
        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<UserInfo, ClientError> {
        let url = format!("{}/me", self.base_url);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        self.handle_response(response).await
    }

    pub async fn delete_account(&self, password: &str) -> Result<(), ClientError> {
        let url = format!("{}/delete-account", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&DeleteAccountRequest {
                password: password.to_string(),
            })
            .send()
            .await?;

        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    // Tree ------------------------------------------------------------

    /// Fetch one node with its immediate children. `None` asks for the
    /// virtual root.
    pub async fn get_node(&self, id: Option<NodeId>) -> Result<Node, ClientError> {
        let url = match id {
            Some(id) => format!("{}/node/{}", self.base_url, id),
            None => format!("{}/node/", self.base_url),
        };
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            // Give NotFound the id the caller asked about.
            return Err(match map_http_error(status.as_u16(), message) {
                ClientError::NotFound(_) => {
                    ClientError::NotFound(format!("node {}", id.unwrap_or(ROOT_ID)))
                }
                other => other,
            });
        }

        Ok(response.json().await?)
    }

    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<NodeId>,
    ) -> Result<UploadResponse, ClientError> {
        let url = format!("{}/upload", self.base_url);
        debug!("POST {} (folder {})", url, name);

        let response = self
            .http_client
            .post(&url)
            .json(&CreateFolderRequest {
                filename: name.to_string(),
                is_dir: true,
                parent_id,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Upload file contents as multipart form data, matching the
    /// server's `UpFile` handler (`file` part plus `filename`/`oya_id`
    /// form fields).
    pub async fn upload_file(
        &self,
        filename: &str,
        data: Vec<u8>,
        parent_id: Option<NodeId>,
    ) -> Result<UploadResponse, ClientError> {
        let url = format!("{}/upload", self.base_url);
        debug!("POST {} (file {}, {} bytes)", url, filename, data.len());

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data)
                    .file_name(filename.to_string())
                    .mime_str("application/octet-stream")?,
            )
            .text("filename", filename.to_string());

        if let Some(parent_id) = parent_id {
            form = form.text("oya_id", parent_id.to_string());
        }

        let response = self.http_client.post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Download file contents into memory.
    pub async fn download(&self, id: NodeId) -> Result<Vec<u8>, ClientError> {
        let url = self.download_url(id);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(map_http_error(status.as_u16(), message))
        }
    }

    /// Stream a download straight to disk; returns the byte count.
    pub async fn download_to_file(&self, id: NodeId, dest: &Path) -> Result<u64, ClientError> {
        let url = self.download_url(id);
        debug!("GET {} -> {}", url, dest.display());

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(map_http_error(status.as_u16(), message));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    pub async fn delete_node(&self, id: NodeId) -> Result<(), ClientError> {
        let url = format!("{}/delete", self.base_url);
        debug!("POST {} (node {})", url, id);

        let response = self
            .http_client
            .post(&url)
            .json(&DeleteRequest { src_id: id })
            .send()
            .await?;

        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    pub async fn rename_node(&self, id: NodeId, new_name: &str) -> Result<(), ClientError> {
        let url = format!("{}/rename", self.base_url);
        debug!("POST {} (node {} -> {})", url, id, new_name);

        let response = self
            .http_client
            .post(&url)
            .json(&RenameRequest {
                src_id: id,
                new_name: new_name.to_string(),
            })
            .send()
            .await?;

        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    pub async fn move_node(
        &self,
        id: NodeId,
        dst_id: NodeId,
        overwrite: bool,
    ) -> Result<(), ClientError> {
        let url = format!("{}/move", self.base_url);
        debug!("POST {} ({} -> {})", url, id, dst_id);

        let response = self
            .http_client
            .post(&url)
            .json(&TransferRequest {
                src_id: id,
                dst_id,
                overwrite,
            })
            .send()
            .await?;

        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    pub async fn copy_node(
        &self,
        id: NodeId,
        dst_id: NodeId,
        overwrite: bool,
    ) -> Result<(), ClientError> {
        let url = format!("{}/copy", self.base_url);
        debug!("POST {} ({} -> {})", url, id, dst_id);

        let response = self
            .http_client
            .post(&url)
            .json(&TransferRequest {
                src_id: id,
                dst_id,
                overwrite,
            })
            .send()
            .await?;

        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    // Sharing ---------------------------------------------------------

    /// Create (or return the existing) public share token for a node.
    pub async fn create_share(&self, id: NodeId) -> Result<String, ClientError> {
        let url = format!("{}/share/create", self.base_url);
        debug!("POST {} (node {})", url, id);

        let response = self
            .http_client
            .post(&url)
            .json(&ShareRequest { node_id: id })
            .send()
            .await?;

        let share: ShareResponse = self.handle_response(response).await?;
        share.token.ok_or_else(|| ClientError::Server {
            status: 200,
            message: "share response missing token".to_string(),
        })
    }

    pub async fn delete_share(&self, id: NodeId) -> Result<(), ClientError> {
        let url = format!("{}/share/delete", self.base_url);
        debug!("POST {} (node {})", url, id);

        let response = self
            .http_client
            .post(&url)
            .json(&ShareRequest { node_id: id })
            .send()
            .await?;

        let _: Ack = self.handle_response(response).await?;
        Ok(())
    }

    // URL builders ----------------------------------------------------

    pub fn download_url(&self, id: NodeId) -> String {
        format!("{}/file/{}", self.base_url, id)
    }

    pub fn view_url(&self, id: NodeId) -> String {
        format!("{}/file/{}?inline=1", self.base_url, id)
    }

    pub fn thumbnail_url(&self, id: NodeId) -> String {
        format!("{}/thumbnail/{}", self.base_url, id)
    }

    pub fn share_url(&self, token: &str) -> String {
        format!("{}/s/{}", self.base_url, token)
    }
}

// Maps HTTP statuses to the error taxonomy the cache and callers
// dispatch on.
fn map_http_error(status: u16, message: String) -> ClientError {
    match status {
        401 | 403 => ClientError::Auth(message),
        404 | 410 => ClientError::NotFound(message),
        409 => ClientError::Conflict(message),
        _ => ClientError::Server { status, message },
    }
}

#[async_trait]
impl NodeFetcher for HaNasClient {
    async fn fetch_node(&self, id: Option<NodeId>) -> Result<Node, ClientError> {
        self.get_node(id).await
    }
}
