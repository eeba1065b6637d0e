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

use core::fmt::Debug;
use digest::HashMarker;
use elliptic_curve::hash2curve::{ExpandMsg, ExpandMsgXmd, ExpandMsgXof};
use sha2::Sha256;
use sha3::Shake256;

/// Parameters of a BBS ciphersuite over BLS12-381.
///
/// Identifiers follow the IRTF BBS draft, `ID || "H2G_HM2S_"` being the API id.
pub trait BbsCiphersuite: 'static + Clone + Copy + Default + PartialEq + Eq + Debug + Send + Sync {
    const ID: &'static [u8];
    const API_ID: &'static [u8];
    const GENERATOR_SEED: &'static [u8];
    const GENERATOR_SEED_BP: &'static [u8];
    const GENERATOR_SEED_DST: &'static [u8];
    const GENERATOR_DST: &'static [u8];

    const H2S: &'static [u8] = b"H2S_";
    const MAP_MSG_TO_SCALAR_AS_HASH: &'static [u8] = b"MAP_MSG_TO_SCALAR_AS_HASH_";
    const KEYGEN_DST: &'static [u8] = b"KEYGEN_DST_";
    const KEYGEN_SEED_DST: &'static [u8] = b"KEYGEN_SEED_DST_";

    /// Minimum length of the key material accepted by `KeyGen`.
    const IKM_LEN: usize = 32;
    /// `ceil((ceil(log2(r)) + k) / 8)` with `k = 128`.
    const EXPAND_LEN: usize = 48;

    type HashAlg: HashMarker;
    type Expander: ExpandMsg<'static>;

    fn keygen_dst() -> Vec<u8> {
        [Self::ID, Self::KEYGEN_DST].concat()
    }

    fn keygen_seed_dst() -> Vec<u8> {
        [Self::ID, Self::KEYGEN_SEED_DST].concat()
    }

    fn h2s_dst() -> Vec<u8> {
        [Self::API_ID, Self::H2S].concat()
    }

    fn map_msg_dst() -> Vec<u8> {
        [Self::API_ID, Self::MAP_MSG_TO_SCALAR_AS_HASH].concat()
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Bls12381Shake256 {}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Bls12381Sha256 {}

impl BbsCiphersuite for Bls12381Shake256 {
    const ID: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_";
    const API_ID: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_H2G_HM2S_";
    const GENERATOR_SEED: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_H2G_HM2S_MESSAGE_GENERATOR_SEED";
    const GENERATOR_SEED_BP: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_H2G_HM2S_BP_MESSAGE_GENERATOR_SEED";
    const GENERATOR_SEED_DST: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_H2G_HM2S_SIG_GENERATOR_SEED_";
    const GENERATOR_DST: &'static [u8] = b"BBS_BLS12381G1_XOF:SHAKE-256_SSWU_RO_H2G_HM2S_SIG_GENERATOR_DST_";
    type HashAlg = Shake256;
    type Expander = ExpandMsgXof<Self::HashAlg>;
}

impl BbsCiphersuite for Bls12381Sha256 {
    const ID: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_";
    const API_ID: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_H2G_HM2S_";
    const GENERATOR_SEED: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_H2G_HM2S_MESSAGE_GENERATOR_SEED";
    const GENERATOR_SEED_BP: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_H2G_HM2S_BP_MESSAGE_GENERATOR_SEED";
    const GENERATOR_SEED_DST: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_H2G_HM2S_SIG_GENERATOR_SEED_";
    const GENERATOR_DST: &'static [u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_H2G_HM2S_SIG_GENERATOR_DST_";
    type HashAlg = Sha256;
    type Expander = ExpandMsgXmd<Self::HashAlg>;
}
