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

use super::keys::{BBSplusPublicKey, BBSplusSecretKey};
use crate::{
    bbsplus::{ciphersuites::BbsCiphersuite, generators::Generators},
    errors::Error,
    schemes::{algorithms::BBSplus, generics::Signature},
    utils::{
        group::{g1_from_bytes, g1_to_bytes, invert_scalar, pairing_product_is_identity, scalar_from_bytes, ScalarExt, G1_LEN},
        message::BBSplusMessage,
        util::bbsplus_utils::{calculate_domain, hash_to_scalar, serialize_scalars},
    },
};
use bls12_381_plus::{G1Projective, G2Projective, Scalar};
use elliptic_curve::hash2curve::ExpandMsg;
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusSignature {
    pub(crate) a: G1Projective,
    pub(crate) e: Scalar,
}

impl BBSplusSignature {
    pub const SIGNATURE_LENGTH: usize = 80;

    pub fn a(&self) -> G1Projective {
        self.a
    }

    pub fn e(&self) -> Scalar {
        self.e
    }

    /// `A || e`, point compressed and scalar big-endian.
    pub fn to_bytes(&self) -> [u8; Self::SIGNATURE_LENGTH] {
        let mut bytes = [0u8; Self::SIGNATURE_LENGTH];
        bytes[0..G1_LEN].copy_from_slice(&g1_to_bytes(&self.a));
        bytes[G1_LEN..Self::SIGNATURE_LENGTH].copy_from_slice(&self.e.to_bytes_be());
        bytes
    }

    /// Fails with [`Error::PointAtInfinity`] if `A` is the identity and with
    /// [`Error::InvalidEncoding`] for any other malformed input.
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        if data.len() != Self::SIGNATURE_LENGTH {
            return Err(Error::InvalidEncoding(format!(
                "signature must be {} bytes, got {}",
                Self::SIGNATURE_LENGTH,
                data.len()
            )));
        }

        let a = g1_from_bytes(&data[0..G1_LEN])?;
        let e = scalar_from_bytes(&data[G1_LEN..Self::SIGNATURE_LENGTH])?;

        Ok(Self { a, e })
    }
}

impl<CS: BbsCiphersuite> Signature<BBSplus<CS>> {
    pub fn a(&self) -> G1Projective {
        self.inner.a
    }

    pub fn e(&self) -> Scalar {
        self.inner.e
    }

    /// Signs an ordered, non-empty list of messages.
    ///
    /// `pk` must be the public key of `sk` ([`Error::KeyMismatch`] otherwise).
    /// `header` is optional context bound into the signature.
    pub fn sign(messages: &[Vec<u8>], sk: &BBSplusSecretKey, pk: &BBSplusPublicKey, header: Option<&[u8]>) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if messages.is_empty() {
            return Err(Error::EmptyMessageList);
        }
        if sk.public_key() != *pk {
            return Err(Error::KeyMismatch);
        }

        let message_scalars = BBSplusMessage::messages_to_scalar::<CS>(messages)?;
        let generators = Generators::create::<CS>(pk, messages.len())?;
        let signature = core_sign::<CS>(sk, pk, &generators, header, &message_scalars)?;

        Ok(Self::from_inner(signature))
    }

    /// `Ok(true)` iff the signature is valid for `messages` under `pk`.
    pub fn verify(&self, pk: &BBSplusPublicKey, messages: &[Vec<u8>], header: Option<&[u8]>) -> Result<bool, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if messages.is_empty() {
            return Err(Error::EmptyMessageList);
        }

        let message_scalars = BBSplusMessage::messages_to_scalar::<CS>(messages)?;
        let generators = Generators::create::<CS>(pk, messages.len())?;

        core_verify::<CS>(pk, &self.inner, &message_scalars, &generators, header)
    }

    pub fn to_bytes(&self) -> [u8; BBSplusSignature::SIGNATURE_LENGTH] {
        self.inner.to_bytes()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        BBSplusSignature::from_bytes(data).map(Self::from_inner)
    }
}

pub(crate) fn core_sign<CS>(
    sk: &BBSplusSecretKey,
    pk: &BBSplusPublicKey,
    generators: &Generators,
    header: Option<&[u8]>,
    messages: &[BBSplusMessage],
) -> Result<BBSplusSignature, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    if generators.message_count() != messages.len() {
        return Err(Error::NotEnoughGenerators);
    }

    let domain = calculate_domain::<CS>(pk, generators, header)?;

    // e = hash_to_scalar(serialize((SK, domain, msg_1, ..., msg_L)), signature_dst)
    let mut input: Vec<Scalar> = Vec::with_capacity(messages.len() + 2);
    input.push(sk.0);
    input.push(domain);
    input.extend(messages.iter().map(|m| m.value));

    let e = hash_to_scalar::<CS>(&serialize_scalars(&input), &CS::h2s_dst())?;

    let B = generators.b_value(domain, messages);

    // A = B * (1 / (SK + e))
    let sk_plus_e_inv = invert_scalar(&(sk.0 + e))
        .ok_or_else(|| Error::SignatureGenerationError("SK + e == 0".to_owned()))?;
    let A = B * sk_plus_e_inv;

    if bool::from(A.is_identity()) {
        return Err(Error::PointAtInfinity);
    }

    Ok(BBSplusSignature { a: A, e })
}

pub(crate) fn core_verify<CS>(
    pk: &BBSplusPublicKey,
    signature: &BBSplusSignature,
    messages: &[BBSplusMessage],
    generators: &Generators,
    header: Option<&[u8]>,
) -> Result<bool, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    if generators.message_count() != messages.len() {
        return Err(Error::NotEnoughGenerators);
    }

    if bool::from(signature.a.is_identity()) {
        log::debug!("signature rejected: A is the identity");
        return Ok(false);
    }

    let domain = calculate_domain::<CS>(pk, generators, header)?;
    let B = generators.b_value(domain, messages);

    // e(A, W + BP2 * e) * e(B, -BP2) == Identity_GT
    let BP2 = G2Projective::GENERATOR;
    let A2 = pk.0 + BP2 * signature.e;

    let valid = pairing_product_is_identity(&[(signature.a, A2), (B, -BP2)]);
    if !valid {
        log::debug!("signature rejected: pairing check failed");
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bbsplus::ciphersuites::Bls12381Sha256, keys::pair::KeyPair, schemes::algorithms::BbsBls12381Sha256};

    fn messages() -> Vec<Vec<u8>> {
        ["name:Alice", "age:30", "country:Utopia"].iter().map(|m| m.as_bytes().to_vec()).collect()
    }

    #[test]
    fn signature_round_trips_through_bytes() {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let signature = Signature::<BbsBls12381Sha256>::sign(&messages(), keypair.private_key(), keypair.public_key(), None).unwrap();

        let bytes = signature.to_bytes();
        assert_eq!(bytes.len(), BBSplusSignature::SIGNATURE_LENGTH);
        assert_eq!(Signature::<BbsBls12381Sha256>::from_bytes(&bytes).unwrap(), signature);
    }

    #[test]
    fn signing_is_deterministic() {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let a = Signature::<BbsBls12381Sha256>::sign(&messages(), keypair.private_key(), keypair.public_key(), None).unwrap();
        let b = Signature::<BbsBls12381Sha256>::sign(&messages(), keypair.private_key(), keypair.public_key(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn header_is_bound() {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());
        let signature = Signature::<BbsBls12381Sha256>::sign(&messages(), sk, pk, Some(b"header".as_slice())).unwrap();

        assert!(signature.verify(pk, &messages(), Some(b"header".as_slice())).unwrap());
        assert!(!signature.verify(pk, &messages(), None).unwrap());
        assert!(!signature.verify(pk, &messages(), Some(b"other".as_slice())).unwrap());
    }

    #[test]
    fn malformed_signature_bytes() {
        assert!(matches!(BBSplusSignature::from_bytes(&[0u8; 79]), Err(Error::InvalidEncoding(_))));

        let mut identity = [0u8; BBSplusSignature::SIGNATURE_LENGTH];
        identity[..G1_LEN].copy_from_slice(&g1_to_bytes(&G1Projective::IDENTITY));
        identity[BBSplusSignature::SIGNATURE_LENGTH - 1] = 1;
        assert_eq!(BBSplusSignature::from_bytes(&identity), Err(Error::PointAtInfinity));
    }

    #[test]
    fn message_count_must_match_generators() {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());
        let generators = Generators::create::<Bls12381Sha256>(pk, 2).unwrap();
        let scalars = BBSplusMessage::messages_to_scalar::<Bls12381Sha256>(&messages()).unwrap();

        let result = core_sign::<Bls12381Sha256>(sk, pk, &generators, None, &scalars);
        assert_eq!(result, Err(Error::NotEnoughGenerators));
    }
}
