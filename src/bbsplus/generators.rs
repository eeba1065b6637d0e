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
    bbsplus::keys::BBSplusPublicKey,
    errors::Error,
    utils::{
        group::g1_to_bytes,
        message::BBSplusMessage,
        util::bbsplus_utils::{expand_message, i2osp},
    },
};
use bls12_381_plus::{G1Projective, Scalar};
use elliptic_curve::hash2curve::ExpandMsg;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Generators for one signer and one message count.
///
/// `q1` blinds the signature through the domain; `message_generators[i]` is
/// paired with message `i`. Together they are the `L + 1` generators; the base
/// point `P1` is fixed by the ciphersuite.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Generators {
    pub g1_base_point: G1Projective,
    pub q1: G1Projective,
    pub message_generators: Vec<G1Projective>,
}

impl Serialize for Generators {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let result: Vec<String> = self.message_generators.iter().map(|item| hex::encode(g1_to_bytes(item))).collect();

        let mut state = serializer.serialize_struct("Generators", 3)?;
        state.serialize_field("BP", &hex::encode(g1_to_bytes(&self.g1_base_point)))?;
        state.serialize_field("Q1", &hex::encode(g1_to_bytes(&self.q1)))?;
        state.serialize_field("MsgGenerators", &result)?;
        state.end()
    }
}

impl Generators {
    /// Derives the generators for `message_count` messages signed under `pk`.
    ///
    /// Pure and deterministic: signer and verifier recompute the same values
    /// from the public key alone.
    pub fn create<CS>(pk: &BBSplusPublicKey, message_count: usize) -> Result<Generators, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        log::trace!("deriving {} message generators", message_count + 1);

        let seed = [CS::GENERATOR_SEED, &pk.to_bytes()].concat();
        let mut generators = Self::create_generators::<CS>(&seed, message_count + 1)?;
        let message_generators = generators.split_off(1);

        Ok(Generators {
            g1_base_point: Self::create_g1_base_point::<CS>()?,
            q1: generators[0],
            message_generators,
        })
    }

    /// Number of messages these generators can sign.
    pub fn message_count(&self) -> usize {
        self.message_generators.len()
    }

    /// `Q1` plus one generator per message.
    pub fn generator_count(&self) -> usize {
        self.message_generators.len() + 1
    }

    /// B = P1 + Q1 * domain + H_1 * msg_1 + ... + H_L * msg_L
    pub(crate) fn b_value(&self, domain: Scalar, messages: &[BBSplusMessage]) -> G1Projective {
        self.message_generators
            .iter()
            .zip(messages)
            .fold(self.g1_base_point + self.q1 * domain, |acc, (h, m)| acc + h * m.value)
    }

    fn create_generators<CS>(seed: &[u8], count: usize) -> Result<Vec<G1Projective>, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let mut generators: Vec<G1Projective> = Vec::with_capacity(count);

        let mut v = expand_message::<CS>(seed, CS::GENERATOR_SEED_DST, CS::EXPAND_LEN)?;
        let mut n = 1usize;
        while generators.len() < count {
            v.extend_from_slice(&i2osp(n, 8));
            v = expand_message::<CS>(&v, CS::GENERATOR_SEED_DST, CS::EXPAND_LEN)?;
            n += 1;
            let candidate = G1Projective::hash::<CS::Expander>(&v, CS::GENERATOR_DST);
            if !generators.contains(&candidate) {
                generators.push(candidate);
            }
        }

        Ok(generators)
    }

    fn create_g1_base_point<CS>() -> Result<G1Projective, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let generators = Self::create_generators::<CS>(CS::GENERATOR_SEED_BP, 1)?;
        generators.first().copied().ok_or(Error::NotEnoughGenerators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bbsplus::ciphersuites::{Bls12381Sha256, Bls12381Shake256},
        keys::pair::KeyPair,
        schemes::algorithms::BbsBls12381Sha256,
    };

    fn issuer_pk(seed: &[u8]) -> BBSplusPublicKey {
        KeyPair::<BbsBls12381Sha256>::from_seed(seed).unwrap().public_key().clone()
    }

    #[test]
    fn generators_are_deterministic() {
        let pk = issuer_pk(b"test-seed-1");
        let a = Generators::create::<Bls12381Sha256>(&pk, 4).unwrap();
        let b = Generators::create::<Bls12381Sha256>(&pk, 4).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.generator_count(), 5);
        assert_eq!(a.message_count(), 4);
    }

    #[test]
    fn longer_lists_extend_shorter_ones() {
        let pk = issuer_pk(b"test-seed-1");
        let short = Generators::create::<Bls12381Sha256>(&pk, 2).unwrap();
        let long = Generators::create::<Bls12381Sha256>(&pk, 6).unwrap();
        assert_eq!(short.q1, long.q1);
        assert_eq!(short.message_generators[..], long.message_generators[..2]);
    }

    #[test]
    fn generators_are_bound_to_the_public_key() {
        let a = Generators::create::<Bls12381Sha256>(&issuer_pk(b"test-seed-1"), 3).unwrap();
        let b = Generators::create::<Bls12381Sha256>(&issuer_pk(b"test-seed-2"), 3).unwrap();
        assert_eq!(a.g1_base_point, b.g1_base_point);
        assert_ne!(a.q1, b.q1);
        assert!(a.message_generators.iter().all(|h| !b.message_generators.contains(h)));
    }

    #[test]
    fn generators_are_distinct_and_non_trivial() {
        let pk = issuer_pk(b"test-seed-1");
        let g = Generators::create::<Bls12381Shake256>(&pk, 8).unwrap();
        let mut all = vec![g.g1_base_point, g.q1];
        all.extend_from_slice(&g.message_generators);
        for (i, p) in all.iter().enumerate() {
            assert!(!bool::from(p.is_identity()));
            assert!(!all[i + 1..].contains(p));
        }
    }

    #[test]
    fn zero_messages_still_yield_q1() {
        let pk = issuer_pk(b"test-seed-1");
        let g = Generators::create::<Bls12381Sha256>(&pk, 0).unwrap();
        assert_eq!(g.generator_count(), 1);
        assert!(g.message_generators.is_empty());
    }

    #[test]
    fn serializes_as_hex() {
        let pk = issuer_pk(b"test-seed-1");
        let g = Generators::create::<Bls12381Sha256>(&pk, 2).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["MsgGenerators"].as_array().unwrap().len(), 2);
        assert_eq!(json["Q1"].as_str().unwrap(), hex::encode(g1_to_bytes(&g.q1)));
    }
}
