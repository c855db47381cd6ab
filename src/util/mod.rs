// Utility Module
// Key persistence helpers

pub mod key_file;

pub use key_file::{
    load_key, load_private_key, load_public_key, save_private_key, save_public_key,
    KeyFileError, KeyFileResult, StoredKey,
};
