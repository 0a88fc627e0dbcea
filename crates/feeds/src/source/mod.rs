//! Record source abstractions and implementations.
//!
//! This module contains:
//! - The `RecordSource` trait every endpoint implements
//! - Endpoint configuration (URL template, credentials, headers)
//! - `HttpJsonSource`, the generic HTTP JSON implementation
//!
//! Sources know nothing about vendor schemas: they return the JSON as-is and
//! leave interpretation to the normalizers downstream.

mod endpoint;
mod http_json;
mod traits;

pub use endpoint::{template_placeholders, EndpointAuth, EndpointConfig};
pub use http_json::{classify_response, HttpJsonSource, DEFAULT_REQUEST_TIMEOUT};
pub use traits::RecordSource;
