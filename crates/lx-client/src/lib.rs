//! Client-side plumbing shared by the storefront and the back-office:
//! the HTTP seam, the error taxonomy, notices, and typed endpoint calls.

pub mod calls;
pub mod config;
pub mod error;
pub mod notify;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use calls::paths;
pub use config::ClientConfig;
pub use error::{ApiError, GENERIC_FAILURE};
pub use notify::{LogNotifier, Notice, NoticeKind, Notifier};
pub use transport::{ApiRequest, ApiResponse, FormValue, MultipartForm, RequestBody, Transport};
