//! Integration tests for JSON key files.

use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use reesa::rsa::{decrypt_block, encrypt_block, generate_keypair, parse_private_key};
use reesa::util::{
    load_key, load_private_key, load_public_key, save_private_key, save_public_key, KeyFileError,
    StoredKey,
};
use reesa::RsaError;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn valid_json() -> &'static str {
    r#"{
        "p": "123",
        "q": "234",
        "private_exponent": "345",
        "public_exponent": "456",
        "modulus": "567",
        "totient_modulus": "678"
    }"#
}

#[test]
fn load_valid_private_key() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "valid.json", valid_json());

    let key = load_private_key(&path).unwrap();
    let expected = parse_private_key("123", "234", "456", "345", "567", "678").unwrap();
    assert_eq!(key, expected);
}

#[test]
fn incomplete_key_reports_missing_field() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "incomplete.json", r#"{"p": "123"}"#);

    match load_private_key(&path) {
        Err(KeyFileError::Incomplete { field }) => assert_eq!(field, "q"),
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn invalid_value_is_unacceptable() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "invalid.json",
        &valid_json().replace(r#""p": "123""#, r#""p": "not a number""#),
    );

    match load_private_key(&path) {
        Err(KeyFileError::Unacceptable(RsaError::InvalidEncoding { field, .. })) => {
            assert_eq!(field, "p")
        }
        other => panic!("expected Unacceptable, got {other:?}"),
    }
}

#[test]
fn non_string_value_is_unacceptable() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "number.json",
        &valid_json().replace(r#""q": "234""#, r#""q": 234"#),
    );

    assert!(matches!(
        load_private_key(&path),
        Err(KeyFileError::Unacceptable(RsaError::InvalidEncoding { field: "q", .. }))
    ));
}

#[test]
fn invalid_json_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "garbage.json", "a");

    assert!(matches!(load_private_key(&path), Err(KeyFileError::NotJson(_))));
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    assert!(matches!(load_key(&path), Err(KeyFileError::Io(_))));
}

#[test]
fn save_and_reload_generated_key() {
    let dir = TempDir::new().unwrap();
    let private_path = dir.path().join("private.json");
    let public_path = dir.path().join("public.json");

    let mut rng = StdRng::seed_from_u64(77);
    let private = generate_keypair(128, &mut rng).unwrap();
    save_private_key(&private_path, &private).unwrap();
    save_public_key(&public_path, &private.to_public_key()).unwrap();

    assert_eq!(load_private_key(&private_path).unwrap(), private);
    assert_eq!(load_public_key(&public_path).unwrap(), private.to_public_key());

    // The reloaded halves still work together
    let public = load_public_key(&public_path).unwrap();
    let reloaded = load_private_key(&private_path).unwrap();
    let ciphertext = encrypt_block(&public, "5eed").unwrap();
    assert_eq!(decrypt_block(&reloaded, &ciphertext).unwrap(), "5eed");
}

#[test]
fn load_key_detects_kind() {
    let dir = TempDir::new().unwrap();
    let private_path = write(&dir, "private.json", valid_json());
    let public_path = write(
        &dir,
        "public.json",
        r#"{"public_exponent": "65537", "modulus": "3233"}"#,
    );

    assert!(matches!(load_key(&private_path).unwrap(), StoredKey::Private(_)));

    let stored = load_key(&public_path).unwrap();
    assert!(matches!(stored, StoredKey::Public(_)));
    assert_eq!(stored.public_key(), load_public_key(&public_path).unwrap());
}

#[test]
fn saved_private_key_uses_expected_field_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fields.json");

    let key = parse_private_key("61", "53", "17", "2753", "3233", "3120").unwrap();
    save_private_key(&path, &key).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["totient_modulus"], "3120");
    assert_eq!(json["private_exponent"], "2753");
    assert_eq!(json.as_object().unwrap().len(), 6);
}
