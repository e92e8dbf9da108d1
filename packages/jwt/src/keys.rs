//! PEM key parsing for ES256
//!
//! Turns PEM text into typed P-256 key material. Accepted blocks:
//!
//! - `EC PRIVATE KEY` (SEC1), optionally preceded by an `EC PARAMETERS` block
//! - `PRIVATE KEY` (PKCS#8 wrapping an EC key)
//! - `PUBLIC KEY` (SubjectPublicKeyInfo)
//!
//! Every other shape (RSA keys, other curves, broken framing or DER) is a
//! [`JwtError::KeyParse`].

use crate::error::{JwtError, JwtResult};
use der::Decode;
use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use spki::ObjectIdentifier;
use std::fmt;
use std::io::Read;
use zeroize::Zeroizing;

const PEM_TAG_EC_PARAMETERS: &str = "EC PARAMETERS";
const PEM_TAG_SEC1_PRIVATE_KEY: &str = "EC PRIVATE KEY";
const PEM_TAG_PKCS8_PRIVATE_KEY: &str = "PRIVATE KEY";
const PEM_TAG_PUBLIC_KEY: &str = "PUBLIC KEY";

/// `id-ecPublicKey`
const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// `prime256v1` / `secp256r1`
const ID_PRIME256V1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const ID_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const ID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Elliptic curves supported for signing. ES256 fixes this to P-256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256 (`secp256r1`)
    P256,
}

impl Curve {
    /// Curve name as used by JOSE (`crv`)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
        }
    }

    /// Named-curve object identifier
    #[must_use]
    pub const fn oid(self) -> ObjectIdentifier {
        match self {
            Curve::P256 => ID_PRIME256V1,
        }
    }

    /// JWS algorithm bound to this curve
    #[must_use]
    pub const fn jws_algorithm(self) -> &'static str {
        match self {
            Curve::P256 => crate::types::ES256,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// P-256 private key used for signing
#[derive(Clone)]
pub struct PrivateKey {
    curve: Curve,
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Curve of the key (always P-256)
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Public half of this key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(VerifyingKey::from(&self.signing_key))
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl From<SigningKey> for PrivateKey {
    fn from(signing_key: SigningKey) -> Self {
        Self {
            curve: Curve::P256,
            signing_key,
        }
    }
}

impl From<p256::SecretKey> for PrivateKey {
    fn from(secret_key: p256::SecretKey) -> Self {
        Self::from(SigningKey::from(secret_key))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// P-256 public key used for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    curve: Curve,
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Curve of the key (always P-256)
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Uncompressed SEC1 encoding of the curve point (65 bytes)
    #[must_use]
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.verifying_key
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(verifying_key: VerifyingKey) -> Self {
        Self {
            curve: Curve::P256,
            verifying_key,
        }
    }
}

impl From<p256::PublicKey> for PublicKey {
    fn from(public_key: p256::PublicKey) -> Self {
        Self::from(VerifyingKey::from(public_key))
    }
}

/// Parsed key material: either half of a P-256 key pair
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    /// Private key, for the signer
    Private(PrivateKey),
    /// Public key, for the verifier
    Public(PublicKey),
}

impl KeyMaterial {
    /// Curve of the contained key
    #[must_use]
    pub fn curve(&self) -> Curve {
        match self {
            KeyMaterial::Private(key) => key.curve(),
            KeyMaterial::Public(key) => key.curve(),
        }
    }

    /// `"private"` or `"public"`
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            KeyMaterial::Private(_) => "private",
            KeyMaterial::Public(_) => "public",
        }
    }

    /// Take the private key, failing for public material
    ///
    /// # Errors
    /// Returns `JwtError::KeyParse` when this is a public key
    pub fn into_private(self) -> JwtResult<PrivateKey> {
        match self {
            KeyMaterial::Private(key) => Ok(key),
            KeyMaterial::Public(_) => Err(JwtError::key_parse(
                "expected an EC private key, found a public key",
            )),
        }
    }

    /// Take the public key, failing for private material
    ///
    /// # Errors
    /// Returns `JwtError::KeyParse` when this is a private key
    pub fn into_public(self) -> JwtResult<PublicKey> {
        match self {
            KeyMaterial::Public(key) => Ok(key),
            KeyMaterial::Private(_) => Err(JwtError::key_parse(
                "expected an EC public key, found a private key",
            )),
        }
    }
}

impl From<PrivateKey> for KeyMaterial {
    fn from(key: PrivateKey) -> Self {
        KeyMaterial::Private(key)
    }
}

impl From<PublicKey> for KeyMaterial {
    fn from(key: PublicKey) -> Self {
        KeyMaterial::Public(key)
    }
}

/// Read a PEM stream to completion and parse the key it contains
///
/// # Errors
/// Returns `JwtError::KeyParse` if reading fails or the PEM is not a P-256 key
pub fn read_key_material<R: Read>(mut reader: R) -> JwtResult<KeyMaterial> {
    let mut buffer = Zeroizing::new(Vec::new());
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| JwtError::key_parse(&format!("failed to read PEM stream: {e}")))?;
    parse_key_material(&buffer)
}

/// Parse a PEM document containing one P-256 private or public key
///
/// # Errors
/// Returns `JwtError::KeyParse` on malformed PEM or DER, a curve other than
/// P-256, or a non-EC key
pub fn parse_key_material(pem_bytes: &[u8]) -> JwtResult<KeyMaterial> {
    let blocks = pem::parse_many(pem_bytes)
        .map_err(|e| JwtError::key_parse(&format!("malformed PEM framing: {e}")))?;

    let mut key_block = None;
    for block in blocks {
        if block.tag() == PEM_TAG_EC_PARAMETERS {
            check_ec_parameters(block.contents())?;
            continue;
        }
        if key_block.is_some() {
            return Err(JwtError::key_parse(
                "expected one key block, found more than one",
            ));
        }
        key_block = Some(block);
    }

    let block = key_block.ok_or_else(|| JwtError::key_parse("no PEM key block found"))?;
    let material = match block.tag() {
        PEM_TAG_SEC1_PRIVATE_KEY => {
            let der = Zeroizing::new(block.into_contents());
            KeyMaterial::Private(parse_sec1_private_key(&der)?)
        }
        PEM_TAG_PKCS8_PRIVATE_KEY => {
            let der = Zeroizing::new(block.into_contents());
            KeyMaterial::Private(parse_pkcs8_private_key(&der)?)
        }
        PEM_TAG_PUBLIC_KEY => KeyMaterial::Public(parse_spki_public_key(block.contents())?),
        other => {
            return Err(JwtError::key_parse(&format!(
                "unsupported PEM block `{other}`: expected `{PEM_TAG_SEC1_PRIVATE_KEY}`, \
                 `{PEM_TAG_PKCS8_PRIVATE_KEY}` or `{PEM_TAG_PUBLIC_KEY}`"
            )));
        }
    };

    tracing::debug!(
        kind = material.kind(),
        curve = %material.curve(),
        "parsed EC key material"
    );
    Ok(material)
}

/// Parse a PEM document that must contain a P-256 private key
///
/// # Errors
/// Returns `JwtError::KeyParse` as [`parse_key_material`] does, or when the
/// PEM holds a public key
pub fn parse_private_key(pem_bytes: &[u8]) -> JwtResult<PrivateKey> {
    parse_key_material(pem_bytes)?.into_private()
}

/// Parse a PEM document that must contain a P-256 public key
///
/// # Errors
/// Returns `JwtError::KeyParse` as [`parse_key_material`] does, or when the
/// PEM holds a private key
pub fn parse_public_key(pem_bytes: &[u8]) -> JwtResult<PublicKey> {
    parse_key_material(pem_bytes)?.into_public()
}

fn check_ec_parameters(der: &[u8]) -> JwtResult<()> {
    let oid = ObjectIdentifier::from_der(der)
        .map_err(|e| JwtError::key_parse(&format!("malformed EC PARAMETERS block: {e}")))?;
    ensure_p256(oid)
}

fn parse_sec1_private_key(der: &[u8]) -> JwtResult<PrivateKey> {
    let ec_key = sec1::EcPrivateKey::from_der(der)
        .map_err(|e| JwtError::key_parse(&format!("malformed SEC1 EC private key: {e}")))?;
    if let Some(curve) = ec_key.parameters.and_then(|params| params.named_curve()) {
        ensure_p256(curve)?;
    }

    let secret_key = p256::SecretKey::from_sec1_der(der)
        .map_err(|e| JwtError::key_parse(&format!("invalid P-256 private key: {e}")))?;
    Ok(PrivateKey::from(secret_key))
}

fn parse_pkcs8_private_key(der: &[u8]) -> JwtResult<PrivateKey> {
    let info = pkcs8::PrivateKeyInfo::try_from(der)
        .map_err(|e| JwtError::key_parse(&format!("malformed PKCS#8 private key: {e}")))?;
    ensure_ec_algorithm(info.algorithm.oid)?;
    let curve = info
        .algorithm
        .parameters_oid()
        .map_err(|e| JwtError::key_parse(&format!("missing EC named curve: {e}")))?;
    ensure_p256(curve)?;

    let signing_key = SigningKey::from_pkcs8_der(der)
        .map_err(|e| JwtError::key_parse(&format!("invalid P-256 private key: {e}")))?;
    Ok(PrivateKey::from(signing_key))
}

fn parse_spki_public_key(der: &[u8]) -> JwtResult<PublicKey> {
    let info = spki::SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| JwtError::key_parse(&format!("malformed SubjectPublicKeyInfo: {e}")))?;
    ensure_ec_algorithm(info.algorithm.oid)?;
    let curve = info
        .algorithm
        .parameters_oid()
        .map_err(|e| JwtError::key_parse(&format!("missing EC named curve: {e}")))?;
    ensure_p256(curve)?;

    let verifying_key = VerifyingKey::from_public_key_der(der)
        .map_err(|e| JwtError::key_parse(&format!("invalid P-256 public key: {e}")))?;
    Ok(PublicKey::from(verifying_key))
}

fn ensure_ec_algorithm(oid: ObjectIdentifier) -> JwtResult<()> {
    if oid == ID_EC_PUBLIC_KEY {
        return Ok(());
    }
    let name = if oid == ID_RSA_ENCRYPTION {
        "RSA"
    } else if oid == ID_ED25519 {
        "Ed25519"
    } else {
        "unknown"
    };
    Err(JwtError::key_parse(&format!(
        "unsupported key type {name} ({oid}): expected id-ecPublicKey ({ID_EC_PUBLIC_KEY})"
    )))
}

fn ensure_p256(oid: ObjectIdentifier) -> JwtResult<()> {
    if oid == Curve::P256.oid() {
        Ok(())
    } else {
        Err(JwtError::key_parse(&format!(
            "curve mismatch: expected {} ({}), found {oid}",
            Curve::P256,
            Curve::P256.oid()
        )))
    }
}
