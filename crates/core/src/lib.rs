//! drivelink-core - Drive upload and sharing client
//!
//! This library uploads binary payloads to a personal or shared-site drive,
//! using a single-shot transfer for small payloads and a resumable byte-range
//! session for large ones, then produces a shareable link under a requested
//! visibility scope. The HTTP transport and the bearer-token source are
//! injected collaborators.

pub mod chat;
pub mod client;
pub mod config;
pub mod drive_item;
pub mod error;
pub mod http;
pub mod publish;
pub mod sharing;
pub mod upload;

// Re-export commonly used types
pub use chat::ChatMember;
pub use client::{
    GraphClient, TokenProvider, UploadTarget, DEFAULT_BASE_URL, DEFAULT_PREVIEW_BASE_URL,
    DEFAULT_TOKEN_AUDIENCE,
};
pub use config::{config_exists, get_config_path, load_config, save_config, validate_config};
pub use config::{Config, ConfigFile, GraphConfig, LoggingConfig, UploadConfig};
pub use drive_item::DriveItemProperties;
pub use error::{Error, Result};
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody};
pub use publish::{ShareAudience, SharedUpload};
pub use sharing::{LinkScope, SharingLink};
pub use upload::{
    requires_resumable_upload, UploadProgress, UploadResult, UploadSession, SIMPLE_UPLOAD_LIMIT,
    UPLOAD_CHUNK_SIZE,
};
