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

use super::traits::{PrivateKey, PublicKey};
use crate::{errors::Error, schemes::algorithms::Scheme};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Issuer key pair for a scheme.
///
/// Serializes with serde as `{ public, private }`; the secret half never shows
/// up in `Debug` output. Deserialization goes through [`KeyPair::from_parts`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct KeyPair<S: Scheme> {
    pub(crate) public: S::PubKey,
    pub(crate) private: S::PrivKey,
}

impl<S> KeyPair<S>
where
    S: Scheme,
{
    pub fn public_key(&self) -> &S::PubKey {
        &self.public
    }

    pub fn private_key(&self) -> &S::PrivKey {
        &self.private
    }

    /// Returns the couple `(sk, pk)`.
    pub fn into_parts(self) -> (S::PrivKey, S::PubKey) {
        (self.private, self.public)
    }

    /// Hex encoding of the public key, the form an issuer publishes.
    pub fn public_key_hex(&self) -> String {
        self.public.encode()
    }

    /// Pairs a secret key with a public key, checking that they belong together.
    pub fn from_parts(sk: S::PrivKey, pk: S::PubKey) -> Result<Self, Error> {
        if sk.public_key() != pk {
            return Err(Error::KeyMismatch);
        }
        Ok(Self { public: pk, private: sk })
    }

    /// Decodes a `(sk, pk)` couple from their byte encodings without checking
    /// that they belong together.
    pub fn decode_parts(sk: &[u8], pk: &[u8]) -> Result<(S::PrivKey, S::PubKey), Error> {
        Ok((S::PrivKey::from_bytes(sk)?, S::PubKey::from_bytes(pk)?))
    }
}

impl<'de, S: Scheme> Deserialize<'de> for KeyPair<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(bound = "")]
        struct Parts<S: Scheme> {
            public: S::PubKey,
            private: S::PrivKey,
        }

        let parts = Parts::<S>::deserialize(deserializer)?;
        Self::from_parts(parts.private, parts.public).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        schemes::algorithms::{BbsBls12381Sha256, BbsBls12381Shake256},
        utils::group::{g2_to_bytes, G2Projective},
    };
    use serde_json::json;

    #[test]
    fn keypair_json_round_trip() {
        let keypair = KeyPair::<BbsBls12381Shake256>::from_seed(b"test-seed-1").unwrap();
        let json = serde_json::to_string(&keypair).unwrap();
        let decoded: KeyPair<BbsBls12381Shake256> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, keypair);
    }

    #[test]
    fn parts_decode_from_bytes() {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let (sk, pk) = KeyPair::<BbsBls12381Sha256>::decode_parts(
            &keypair.private_key().to_bytes(),
            &keypair.public_key().to_bytes(),
        )
        .unwrap();

        assert_eq!(keypair.public_key_hex(), pk.encode());
        assert_eq!(KeyPair::<BbsBls12381Sha256>::from_parts(sk, pk).unwrap(), keypair);
        assert!(KeyPair::<BbsBls12381Sha256>::decode_parts(&[0u8; 32], &[0u8; 96]).is_err());
    }

    #[test]
    fn mismatched_keypair_does_not_deserialize() {
        let a = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let b = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-2").unwrap();

        let swapped = json!({ "public": b.public_key(), "private": a.private_key() }).to_string();
        assert!(serde_json::from_str::<KeyPair<BbsBls12381Sha256>>(&swapped).is_err());

        let identity = json!({
            "public": hex::encode(g2_to_bytes(&G2Projective::IDENTITY)),
            "private": a.private_key(),
        })
        .to_string();
        assert!(serde_json::from_str::<KeyPair<BbsBls12381Sha256>>(&identity).is_err());

        let matching = json!({ "public": a.public_key(), "private": a.private_key() }).to_string();
        assert_eq!(serde_json::from_str::<KeyPair<BbsBls12381Sha256>>(&matching).unwrap(), a);
    }
}
