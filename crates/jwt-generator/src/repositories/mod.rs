pub mod key_store;

pub use key_store::{FsKeyStore, KeyStore, KeyStoreError, KeyVisibility};
