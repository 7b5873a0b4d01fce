use infrastructure::crypto::digest;

#[test]
fn test_sha256_hex_known_vectors() {
    assert_eq!(
        digest::sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        digest::sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_sha256_hex_is_deterministic_and_content_sensitive() {
    let a = digest::sha256_hex(b"deed of assignment v1");
    let b = digest::sha256_hex(b"deed of assignment v1");
    let c = digest::sha256_hex(b"deed of assignment v2");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
}

#[test]
fn test_normalize_hex_accepts_uppercase_and_whitespace() {
    let hash = digest::sha256_hex(b"abc");
    let shouted = format!("  {}\n", hash.to_ascii_uppercase());
    assert_eq!(digest::normalize_hex(&shouted), hash);
}
