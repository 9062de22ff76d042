pub mod credentials;

pub use credentials::{authenticate, ServiceIdentity};
