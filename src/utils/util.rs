// Copyright 2025 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Returns the indexes in `0..length` that are not listed in `indexes`.
pub fn get_remaining_indexes(length: usize, indexes: &[usize]) -> Vec<usize> {
    (0..length).filter(|i| !indexes.contains(i)).collect()
}

pub mod bbsplus_utils {
    use crate::{
        bbsplus::{ciphersuites::BbsCiphersuite, generators::Generators, keys::BBSplusPublicKey},
        errors::Error,
        utils::{
            group::{g1_to_bytes, ScalarExt},
            message::BBSplusMessage,
        },
    };
    use bls12_381_plus::Scalar;
    use elliptic_curve::hash2curve::{ExpandMsg, Expander};
    use rand::RngCore;

    /// Big-endian encoding of `integer` on `octet_length` bytes (at most 8).
    pub fn i2osp(integer: usize, octet_length: usize) -> Vec<u8> {
        let bytes = (integer as u64).to_be_bytes();
        let octet_length = octet_length.min(bytes.len());
        bytes[bytes.len() - octet_length..].to_vec()
    }

    pub fn expand_message<CS>(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Result<Vec<u8>, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let mut uniform_bytes = vec![0u8; len_in_bytes];
        CS::Expander::expand_message(&[msg], &[dst], len_in_bytes)
            .map_err(|_| Error::ExpandMessageError)?
            .fill_bytes(&mut uniform_bytes);
        Ok(uniform_bytes)
    }

    /// `hash_to_scalar(msg_octets, dst)`: expands to 48 bytes and reduces modulo r.
    pub fn hash_to_scalar<CS>(msg_octets: &[u8], dst: &[u8]) -> Result<Scalar, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        if dst.len() > 255 {
            return Err(Error::HashToScalarError);
        }

        let uniform_bytes = expand_message::<CS>(msg_octets, dst, CS::EXPAND_LEN)?;
        let okm: [u8; 48] = uniform_bytes.as_slice().try_into().map_err(|_| Error::HashToScalarError)?;

        Ok(Scalar::from_okm(&okm))
    }

    pub fn serialize_scalars(scalars: &[Scalar]) -> Vec<u8> {
        scalars.iter().flat_map(|s| s.to_bytes_be()).collect()
    }

    /// Domain scalar binding the public key, the generators and the header.
    pub(crate) fn calculate_domain<CS>(pk: &BBSplusPublicKey, generators: &Generators, header: Option<&[u8]>) -> Result<Scalar, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let header = header.unwrap_or(b"");
        let L = generators.message_generators.len();

        // dom_octs = serialize((L, Q1, H_1, ..., H_L)) || api_id
        let mut dom_octs: Vec<u8> = Vec::new();
        dom_octs.extend_from_slice(&i2osp(L, 8));
        dom_octs.extend_from_slice(&g1_to_bytes(&generators.q1));
        generators
            .message_generators
            .iter()
            .for_each(|h| dom_octs.extend_from_slice(&g1_to_bytes(h)));
        dom_octs.extend_from_slice(CS::API_ID);

        let mut dom_input: Vec<u8> = Vec::new();
        dom_input.extend_from_slice(&pk.to_bytes());
        dom_input.extend_from_slice(&dom_octs);
        dom_input.extend_from_slice(&i2osp(header.len(), 8));
        dom_input.extend_from_slice(header);

        hash_to_scalar::<CS>(&dom_input, &CS::h2s_dst())
    }

    pub fn get_messages(messages: &[BBSplusMessage], indexes: &[usize]) -> Vec<BBSplusMessage> {
        indexes.iter().map(|&i| messages[i]).collect()
    }

    /// Pairs each index with its message, in the shape expected by proof verification.
    /// Indexes outside `messages` are skipped.
    pub fn get_disclosed_pairs(messages: &[Vec<u8>], indexes: &[usize]) -> Vec<(usize, Vec<u8>)> {
        indexes
            .iter()
            .filter_map(|&i| messages.get(i).map(|m| (i, m.clone())))
            .collect()
    }

    /// Random octets, e.g. a verifier nonce.
    pub fn generate_random_secret(n: usize) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        let mut secret = vec![0u8; n];
        rng.fill_bytes(&mut secret);
        secret
    }
}
