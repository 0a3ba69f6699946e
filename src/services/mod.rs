pub mod transport;
pub mod envelope;
pub mod session_store;
pub mod api_client;

pub use transport::{GlooTransport, HttpTransport, ImageUpload};
pub use envelope::Page;
pub use session_store::{LocalStorageBackend, MemoryBackend, SessionBackend, SessionStore};
pub use api_client::{ApiClient, ListQuery};
