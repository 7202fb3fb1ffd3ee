//! Embedding client for communicating with the model service.
//!
//! This crate provides a Rust client to call the embedding model service
//! (CLIP or compatible) over gRPC. It handles:
//! - Connection management to the model service
//! - Batching image bytes / text prompts into protobuf messages
//! - Receiving fixed-length vectors back
//! - Zero-shot style tagging against per-style text prompts

use anyhow::{Context, Result};
use thiserror::Error;
use tonic::transport::Channel;
use tracing::{debug, error, info};

pub mod style;
pub mod vector;

// Include the generated protobuf code
pub mod embeddings {
    tonic::include_proto!("embeddings");
}

use embeddings::{
    embedder_client::EmbedderClient as GrpcEmbedderClient, EmbedImagesRequest, EmbedTextsRequest,
};

pub use style::StyleTagger;

/// Errors that can occur when interacting with the embedding service
#[derive(Error, Debug)]
pub enum EmbedderError {
    #[error("Failed to connect to embedding service: {0}")]
    ConnectionError(String),

    #[error("Failed to embed batch: {0}")]
    EmbeddingError(String),

    #[error("Invalid response from embedding service: {0}")]
    InvalidResponse(String),
}

/// Client for the embedding model service.
///
/// This wraps the auto-generated gRPC client and provides a higher-level
/// interface returning plain `Vec<f32>` vectors.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: GrpcEmbedderClient<Channel>,
    service_addr: String,
}

impl EmbeddingClient {
    /// Connect to the embedding service.
    ///
    /// # Arguments
    /// * `addr` - Address of the gRPC service (e.g., "http://localhost:50051")
    pub async fn connect(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        info!("Connecting to embedding service at {}", addr);

        let channel = Channel::from_shared(addr.clone())
            .context("Creating channel from address")?
            .connect()
            .await
            .context("Connecting to embedding service")?;

        let client = GrpcEmbedderClient::new(channel);
        Ok(EmbeddingClient {
            client,
            service_addr: addr,
        })
    }

    /// Embed a batch of encoded images.
    ///
    /// Returns one vector per input image, in request order. The response
    /// cardinality is validated against the request.
    pub async fn embed_images(
        &mut self,
        images: Vec<Vec<u8>>,
    ) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let expected_len = images.len();
        debug!("Embedding {} images", expected_len);
        let request = tonic::Request::new(EmbedImagesRequest { images });

        let response = self.client.embed_images(request).await.map_err(|e| {
            error!("gRPC error while embedding images: {}", e);
            EmbedderError::EmbeddingError(e.to_string())
        })?;

        Self::unpack_vectors(response.into_inner(), expected_len)
    }

    /// Embed a batch of text prompts.
    pub async fn embed_texts(
        &mut self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbedderError> {
        let expected_len = texts.len();
        debug!("Embedding {} texts", expected_len);
        let request = tonic::Request::new(EmbedTextsRequest { texts });

        let response = self.client.embed_texts(request).await.map_err(|e| {
            error!("gRPC error while embedding texts: {}", e);
            EmbedderError::EmbeddingError(e.to_string())
        })?;

        Self::unpack_vectors(response.into_inner(), expected_len)
    }

    fn unpack_vectors(
        response: embeddings::EmbedResponse,
        expected_len: usize,
    ) -> Result<Vec<Vec<f32>>, EmbedderError> {
        if response.vectors.len() != expected_len {
            error!(
                "Mismatch in number of vectors returned: expected {}, got {}",
                expected_len,
                response.vectors.len()
            );
            return Err(EmbedderError::InvalidResponse(
                "Number of vectors does not match number of inputs".into(),
            ));
        }
        Ok(response.vectors.into_iter().map(|v| v.values).collect())
    }

    /// Get the address of the embedding service this client is connected to.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}
