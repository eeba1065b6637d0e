// Copyright 2023 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::ciphersuites::BbsCiphersuite;
use crate::{
    errors::Error,
    keys::{
        pair::KeyPair,
        traits::{PrivateKey, PublicKey},
    },
    schemes::algorithms::BBSplus,
    utils::{
        group::{g2_from_bytes, g2_to_bytes, scalar_from_bytes, ScalarExt, G2_LEN, SCALAR_LEN},
        util::bbsplus_utils::{expand_message, hash_to_scalar, i2osp},
    },
};
use bls12_381_plus::{G2Projective, Scalar};
use core::{fmt, sync::atomic};
use elliptic_curve::{
    hash2curve::ExpandMsg,
    subtle::{Choice, ConstantTimeEq},
};
use ff::Field;
use rand::{CryptoRng, RngCore};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Shortest seed accepted by [`KeyPair::from_seed`].
pub const MIN_SEED_LEN: usize = 8;
/// Fewest distinct byte values a seed must contain.
pub const MIN_SEED_DISTINCT_BYTES: usize = 4;

/// Serializes as the hex of its compressed point. Deserialization goes
/// through [`BBSplusPublicKey::from_bytes`], so the identity is refused.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BBSplusPublicKey(pub(crate) G2Projective);

impl BBSplusPublicKey {
    pub const LENGTH: usize = G2_LEN;

    pub fn to_bytes(&self) -> [u8; G2_LEN] {
        g2_to_bytes(&self.0)
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Fails with [`Error::InvalidEncoding`] for malformed points and
    /// [`Error::PointAtInfinity`] for the identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        g2_from_bytes(bytes).map(Self)
    }

    pub fn point(&self) -> G2Projective {
        self.0
    }
}

/// Secret scalar `0 < SK < r`. Zeroized on drop; never printed.
///
/// Serde uses the big-endian hex form and rejects zero.
#[derive(Clone)]
pub struct BBSplusSecretKey(pub(crate) Scalar);

impl BBSplusSecretKey {
    pub const LENGTH: usize = SCALAR_LEN;

    //in BE order
    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        self.0.to_bytes_be()
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let s = scalar_from_bytes(bytes)?;
        if bool::from(s.is_zero()) {
            return Err(Error::InvalidEncoding("secret key must be non-zero".to_owned()));
        }
        Ok(Self(s))
    }

    /// `SkToPk`: W = SK * BP2
    pub fn public_key(&self) -> BBSplusPublicKey {
        BBSplusPublicKey(sk_to_pk(self.0))
    }
}

impl PartialEq for BBSplusSecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for BBSplusSecretKey {}

impl fmt::Debug for BBSplusSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BBSplusSecretKey(<redacted>)")
    }
}

impl Zeroize for BBSplusSecretKey {
    fn zeroize(&mut self) {
        self.0 = Scalar::ZERO;
        atomic::compiler_fence(atomic::Ordering::SeqCst);
    }
}

impl Drop for BBSplusSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for BBSplusSecretKey {}

/// Fixed-length hex string, decoded without allocating.
struct HexVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for HexVisitor<N> {
    type Value = [u8; N];

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hex-encoded bytes", N)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let mut bytes = [0u8; N];
        hex::decode_to_slice(v, &mut bytes).map_err(E::custom)?;
        Ok(bytes)
    }
}

impl Serialize for BBSplusPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for BBSplusPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserializer.deserialize_str(HexVisitor::<G2_LEN>)?;
        Self::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

impl Serialize for BBSplusSecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut encoded = self.encode();
        let result = serializer.serialize_str(&encoded);
        encoded.zeroize();
        result
    }
}

impl<'de> Deserialize<'de> for BBSplusSecretKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut bytes = deserializer.deserialize_str(HexVisitor::<SCALAR_LEN>)?;
        let sk = Self::from_bytes(&bytes);
        bytes.zeroize();
        sk.map_err(de::Error::custom)
    }
}

impl PublicKey for BBSplusPublicKey {
    type Output = [u8; G2_LEN];

    fn to_bytes(&self) -> Self::Output {
        BBSplusPublicKey::to_bytes(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        BBSplusPublicKey::from_bytes(bytes)
    }

    fn encode(&self) -> String {
        BBSplusPublicKey::encode(self)
    }
}

impl PrivateKey for BBSplusSecretKey {
    type Output = [u8; SCALAR_LEN];
    type Public = BBSplusPublicKey;

    fn public_key(&self) -> Self::Public {
        BBSplusSecretKey::public_key(self)
    }

    fn to_bytes(&self) -> Self::Output {
        BBSplusSecretKey::to_bytes(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        BBSplusSecretKey::from_bytes(bytes)
    }

    fn encode(&self) -> String {
        BBSplusSecretKey::encode(self)
    }
}

impl<CS: BbsCiphersuite> KeyPair<BBSplus<CS>> {
    /// `KeyGen(key_material, key_info, key_dst)` followed by `SkToPk`.
    pub fn generate(key_material: &[u8], key_info: Option<&[u8]>, key_dst: Option<&[u8]>) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let sk = key_gen::<CS>(key_material, key_info, key_dst)?;
        let pk = sk_to_pk(sk);

        Ok(Self { public: BBSplusPublicKey(pk), private: BBSplusSecretKey(sk) })
    }

    /// Deterministic key pair for a caller-chosen seed.
    ///
    /// The seed goes through a sanity check ([`MIN_SEED_LEN`],
    /// [`MIN_SEED_DISTINCT_BYTES`]) and is then stretched to `IKM_LEN` bytes of
    /// key material.
    pub fn from_seed(seed: &[u8]) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        check_seed(seed)?;
        let key_material = expand_message::<CS>(seed, &CS::keygen_seed_dst(), CS::IKM_LEN)?;
        Self::generate(&key_material, None, None)
    }

    /// Key pair from the thread-local CSPRNG.
    pub fn random() -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        Self::random_with_rng(&mut rand::thread_rng())
    }

    pub fn random_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let mut key_material = vec![0u8; CS::IKM_LEN];
        rng.fill_bytes(&mut key_material);
        let keypair = Self::generate(&key_material, None, None);
        key_material.zeroize();
        keypair
    }
}

fn check_seed(seed: &[u8]) -> Result<(), Error> {
    if seed.len() < MIN_SEED_LEN {
        return Err(Error::WeakSeed(format!("length {} < {}", seed.len(), MIN_SEED_LEN)));
    }

    // Scan every byte value against the whole seed; no lookups indexed by seed bytes.
    let distinct: usize = (0..=u8::MAX)
        .map(|v| seed.iter().fold(Choice::from(0u8), |present, b| present | b.ct_eq(&v)))
        .map(|present| usize::from(present.unwrap_u8()))
        .sum();
    if distinct < MIN_SEED_DISTINCT_BYTES {
        return Err(Error::WeakSeed(format!("only {} distinct byte values", distinct)));
    }

    Ok(())
}

/// https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bbs-signatures-06#name-secret-key -> SK = KeyGen(key_material, key_info, key_dst)
///
/// # Inputs:
/// * `key_material` (REQUIRED), a secret octet string of at least 32 bytes.
/// * `key_info` (OPTIONAL), an octet string. Defaults to an empty string if
/// not supplied.
/// * `key_dst` (OPTIONAL), an octet string representing the domain separation
/// tag. Defaults to the octet string ciphersuite_id || "KEYGEN_DST_" if not supplied.
pub(crate) fn key_gen<CS>(key_material: &[u8], key_info: Option<&[u8]>, key_dst: Option<&[u8]>) -> Result<Scalar, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    if key_material.len() < CS::IKM_LEN {
        return Err(Error::KeyGenError("length(key_material) < 32".to_owned()));
    }

    let key_info = key_info.unwrap_or(&[]);
    if key_info.len() > 65535 {
        return Err(Error::KeyGenError("length(key_info) > 65535".to_owned()));
    }

    let key_dst_default = CS::keygen_dst();
    let key_dst = key_dst.unwrap_or(&key_dst_default);

    // derive_input = key_material || I2OSP(length(key_info), 2) || key_info
    let mut derive_input = [key_material, &i2osp(key_info.len(), 2), key_info].concat();

    let sk = hash_to_scalar::<CS>(&derive_input, key_dst);
    derive_input.zeroize();
    let sk = sk?;

    if bool::from(sk.is_zero()) {
        return Err(Error::KeyGenError("SK == 0".to_owned()));
    }
    Ok(sk)
}

pub(crate) fn sk_to_pk(sk: Scalar) -> G2Projective {
    G2Projective::GENERATOR * sk
}
