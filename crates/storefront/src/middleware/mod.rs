//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store swept for expired records)

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::{request_id_middleware, request_span};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_SWEEP_INTERVAL, VisitorSessionStore, create_session_layer};
