//! Cabinet Backend API
//!
//! Typed access to the cabinet REST backend through a common trait, so the
//! session store can run against the real HTTP client or a test double.
//!
//! # Usage
//!
//! ```ignore
//! use cabinet_core::api::{CabinetApi, HttpApiClient};
//! use cabinet_core::auth::AuthBridge;
//!
//! let client = HttpApiClient::new("http://localhost:8000", AuthBridge::anonymous())?;
//! let session = client.fetch_me().await?;
//! ```

mod http;
mod traits;

pub use http::HttpApiClient;
pub use traits::{ApiError, ApiResult, CabinetApi, INIT_DATA_HEADER};
