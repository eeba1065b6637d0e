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

use super::{
    keys::BBSplusPublicKey,
    signature::{core_verify, BBSplusSignature},
};
use crate::{
    bbsplus::{ciphersuites::BbsCiphersuite, generators::Generators},
    errors::Error,
    schemes::{
        algorithms::BBSplus,
        generics::{PoKSignature, Signature},
    },
    utils::{
        group::{
            calculate_random_scalars, g1_from_bytes, g1_to_bytes, invert_scalar, pairing_product_is_identity,
            scalar_from_bytes, ScalarExt, G1_LEN, SCALAR_LEN,
        },
        message::BBSplusMessage,
        util::{
            bbsplus_utils::{calculate_domain, get_messages, hash_to_scalar, i2osp},
            get_remaining_indexes,
        },
    },
};
use bls12_381_plus::{G1Projective, G2Projective, Scalar};
use elliptic_curve::hash2curve::ExpandMsg;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Points `Abar, Bbar, D` plus the three fixed responses `e^, r1^, r3^`.
const FIXED_PART_LEN: usize = 3 * G1_LEN + 3 * SCALAR_LEN;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BBSplusPoKSignature {
    Abar: G1Projective,
    Bbar: G1Projective,
    D: G1Projective,
    e_cap: Scalar,
    r1_cap: Scalar,
    r3_cap: Scalar,
    m_cap: Vec<Scalar>,
    challenge: Scalar,
}

impl BBSplusPoKSignature {
    /// Length of a proof hiding no message.
    pub const MIN_LENGTH: usize = FIXED_PART_LEN + SCALAR_LEN;

    pub fn a_bar(&self) -> G1Projective {
        self.Abar
    }

    pub fn b_bar(&self) -> G1Projective {
        self.Bbar
    }

    pub fn d(&self) -> G1Projective {
        self.D
    }

    pub fn challenge(&self) -> Scalar {
        self.challenge
    }

    /// Number of messages the proof keeps hidden.
    pub fn undisclosed_count(&self) -> usize {
        self.m_cap.len()
    }

    /// `Abar || Bbar || D || e^ || r1^ || r3^ || m^_1 || ... || m^_U || c`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = Vec::with_capacity(Self::MIN_LENGTH + SCALAR_LEN * self.m_cap.len());

        bytes.extend_from_slice(&g1_to_bytes(&self.Abar));
        bytes.extend_from_slice(&g1_to_bytes(&self.Bbar));
        bytes.extend_from_slice(&g1_to_bytes(&self.D));
        bytes.extend_from_slice(&self.e_cap.to_bytes_be());
        bytes.extend_from_slice(&self.r1_cap.to_bytes_be());
        bytes.extend_from_slice(&self.r3_cap.to_bytes_be());
        self.m_cap.iter().for_each(|v| bytes.extend_from_slice(&v.to_bytes_be()));
        bytes.extend_from_slice(&self.challenge.to_bytes_be());
        bytes
    }

    /// Rejects identity points with [`Error::PointAtInfinity`]: an identity
    /// `Abar` satisfies the pairing check for any statement.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Self::MIN_LENGTH || (bytes.len() - 3 * G1_LEN) % SCALAR_LEN != 0 {
            return Err(Error::InvalidEncoding(format!("invalid proof length {}", bytes.len())));
        }

        let Abar = g1_from_bytes(&bytes[0..G1_LEN])?;
        let Bbar = g1_from_bytes(&bytes[G1_LEN..2 * G1_LEN])?;
        let D = g1_from_bytes(&bytes[2 * G1_LEN..3 * G1_LEN])?;

        let mut scalars = bytes[3 * G1_LEN..]
            .chunks_exact(SCALAR_LEN)
            .map(scalar_from_bytes)
            .collect::<Result<Vec<Scalar>, Error>>()?;

        // at least e^, r1^, r3^ and the challenge are present, even when every message is disclosed
        let challenge = scalars.pop().ok_or_else(|| Error::InvalidEncoding("missing challenge".to_owned()))?;
        let m_cap = scalars.split_off(3);
        let (e_cap, r1_cap, r3_cap) = (scalars[0], scalars[1], scalars[2]);

        Ok(Self { Abar, Bbar, D, e_cap, r1_cap, r3_cap, m_cap, challenge })
    }
}

impl<CS: BbsCiphersuite> PoKSignature<BBSplus<CS>> {
    /// Derives a proof that reveals `messages[i]` for every `i` in
    /// `disclosed_indexes` and hides the rest.
    ///
    /// `header` must be the one used at signing time; `ph` is the presentation
    /// header (typically a verifier nonce) the proof is bound to. Every call
    /// draws fresh randomness, so two proofs of the same statement are
    /// unlinkable.
    pub fn proof_gen(
        pk: &BBSplusPublicKey,
        signature: &Signature<BBSplus<CS>>,
        messages: &[Vec<u8>],
        disclosed_indexes: &[usize],
        header: Option<&[u8]>,
        ph: Option<&[u8]>,
    ) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        Self::proof_gen_with_rng(pk, signature, messages, disclosed_indexes, header, ph, &mut rand::thread_rng())
    }

    /// Same as [`proof_gen`](Self::proof_gen) with a caller-supplied randomness source.
    pub fn proof_gen_with_rng<R: RngCore + CryptoRng>(
        pk: &BBSplusPublicKey,
        signature: &Signature<BBSplus<CS>>,
        messages: &[Vec<u8>],
        disclosed_indexes: &[usize],
        header: Option<&[u8]>,
        ph: Option<&[u8]>,
        rng: &mut R,
    ) -> Result<Self, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let L = messages.len();
        let mut disclosed_indexes = disclosed_indexes.to_vec();
        disclosed_indexes.sort_unstable();
        disclosed_indexes.dedup();

        if let Some(&index) = disclosed_indexes.iter().find(|&&i| i >= L) {
            return Err(Error::IndexOutOfRange { index, length: L });
        }
        if messages.is_empty() {
            return Err(Error::EmptyMessageList);
        }

        let message_scalars = BBSplusMessage::messages_to_scalar::<CS>(messages)?;
        let generators = Generators::create::<CS>(pk, L)?;

        if !core_verify::<CS>(pk, &signature.inner, &message_scalars, &generators, header)? {
            return Err(Error::InvalidSignature);
        }

        let U = L - disclosed_indexes.len();
        let random_scalars = calculate_random_scalars(rng, 5 + U);

        let proof = core_proof_gen::<CS>(
            pk,
            &signature.inner,
            &generators,
            &message_scalars,
            &disclosed_indexes,
            header,
            ph,
            &random_scalars,
        )?;

        log::debug!("derived proof disclosing {} of {} messages", disclosed_indexes.len(), L);

        Ok(Self::from_inner(proof))
    }

    /// Checks the proof against the revealed `(index, message)` pairs.
    ///
    /// Returns `Ok(false)` when the proof does not verify and `Err` when the
    /// inputs are malformed (duplicate or out of range indexes, nothing to
    /// verify).
    pub fn proof_verify(
        &self,
        pk: &BBSplusPublicKey,
        revealed: &[(usize, Vec<u8>)],
        header: Option<&[u8]>,
        ph: Option<&[u8]>,
    ) -> Result<bool, Error>
    where
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let proof = &self.inner;

        let mut revealed: Vec<&(usize, Vec<u8>)> = revealed.iter().collect();
        revealed.sort_by_key(|(i, _)| *i);
        if let Some(w) = revealed.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicateIndex(w[0].0));
        }

        let U = proof.m_cap.len();
        let R = revealed.len();
        let L = U + R;

        if L == 0 {
            return Err(Error::EmptyMessageList);
        }
        if let Some(index) = revealed.iter().map(|(i, _)| *i).find(|&i| i >= L) {
            return Err(Error::IndexOutOfRange { index, length: L });
        }

        let disclosed_indexes: Vec<usize> = revealed.iter().map(|(i, _)| *i).collect();
        let disclosed_messages: Vec<Vec<u8>> = revealed.iter().map(|(_, m)| m.clone()).collect();
        let disclosed_message_scalars = BBSplusMessage::messages_to_scalar::<CS>(&disclosed_messages)?;

        let generators = Generators::create::<CS>(pk, L)?;

        core_proof_verify::<CS>(pk, proof, &generators, header, ph, &disclosed_message_scalars, &disclosed_indexes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        BBSplusPoKSignature::from_bytes(bytes).map(Self::from_inner)
    }
}

#[allow(clippy::too_many_arguments)]
fn core_proof_gen<CS>(
    pk: &BBSplusPublicKey,
    signature: &BBSplusSignature,
    generators: &Generators,
    messages: &[BBSplusMessage],
    disclosed_indexes: &[usize],
    header: Option<&[u8]>,
    ph: Option<&[u8]>,
    random_scalars: &[Scalar],
) -> Result<BBSplusPoKSignature, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let L = messages.len();
    let undisclosed_indexes = get_remaining_indexes(L, disclosed_indexes);

    let disclosed_messages = get_messages(messages, disclosed_indexes);
    let undisclosed_messages = get_messages(messages, &undisclosed_indexes);

    let init_res = proof_init::<CS>(pk, signature, generators, random_scalars, header, messages, &undisclosed_indexes)?;

    let challenge = proof_challenge_calculate::<CS>(&init_res, disclosed_indexes, &disclosed_messages, ph)?;

    proof_finalize(&init_res, challenge, signature.e, random_scalars, &undisclosed_messages)
}

struct ProofInitResult {
    Abar: G1Projective,
    Bbar: G1Projective,
    D: G1Projective,
    T1: G1Projective,
    T2: G1Projective,
    domain: Scalar,
}

fn proof_init<CS>(
    pk: &BBSplusPublicKey,
    signature: &BBSplusSignature,
    generators: &Generators,
    random_scalars: &[Scalar],
    header: Option<&[u8]>,
    messages: &[BBSplusMessage],
    undisclosed_indexes: &[usize],
) -> Result<ProofInitResult, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let U = undisclosed_indexes.len();

    if random_scalars.len() != 5 + U {
        return Err(Error::ProofGenError("wrong number of random scalars".to_owned()));
    }
    if generators.message_count() != messages.len() {
        return Err(Error::NotEnoughGenerators);
    }

    let domain = calculate_domain::<CS>(pk, generators, header)?;
    let B = generators.b_value(domain, messages);

    let (r1, r2, e_tilde, r1_tilde, r3_tilde) =
        (random_scalars[0], random_scalars[1], random_scalars[2], random_scalars[3], random_scalars[4]);
    let m_tilde = &random_scalars[5..];

    let D = B * r2;
    let Abar = signature.a * (r1 * r2);
    let Bbar = D * r1 - Abar * signature.e;

    let T1 = Abar * e_tilde + D * r1_tilde;
    let T2 = undisclosed_indexes
        .iter()
        .zip(m_tilde)
        .fold(D * r3_tilde, |acc, (&j, m)| acc + generators.message_generators[j] * m);

    Ok(ProofInitResult { Abar, Bbar, D, T1, T2, domain })
}

fn proof_challenge_calculate<CS>(
    init_res: &ProofInitResult,
    disclosed_indexes: &[usize],
    disclosed_messages: &[BBSplusMessage],
    ph: Option<&[u8]>,
) -> Result<Scalar, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let R = disclosed_indexes.len();

    if disclosed_messages.len() != R {
        return Err(Error::ProofGenError("disclosed indexes and messages differ in number".to_owned()));
    }

    let ph = ph.unwrap_or(b"");

    let mut c_arr: Vec<u8> = Vec::new();
    c_arr.extend_from_slice(&g1_to_bytes(&init_res.Abar));
    c_arr.extend_from_slice(&g1_to_bytes(&init_res.Bbar));
    c_arr.extend_from_slice(&g1_to_bytes(&init_res.D));
    c_arr.extend_from_slice(&g1_to_bytes(&init_res.T1));
    c_arr.extend_from_slice(&g1_to_bytes(&init_res.T2));
    c_arr.extend_from_slice(&i2osp(R, 8));
    disclosed_indexes.iter().for_each(|&i| c_arr.extend_from_slice(&i2osp(i, 8)));
    disclosed_messages.iter().for_each(|m| c_arr.extend_from_slice(&m.value.to_bytes_be()));
    c_arr.extend_from_slice(&init_res.domain.to_bytes_be());
    c_arr.extend_from_slice(&i2osp(ph.len(), 8));
    c_arr.extend_from_slice(ph);

    hash_to_scalar::<CS>(&c_arr, &CS::h2s_dst())
}

fn proof_finalize(
    init_res: &ProofInitResult,
    challenge: Scalar,
    e: Scalar,
    random_scalars: &[Scalar],
    undisclosed_messages: &[BBSplusMessage],
) -> Result<BBSplusPoKSignature, Error> {
    let (r1, r2, e_tilde, r1_tilde, r3_tilde) =
        (random_scalars[0], random_scalars[1], random_scalars[2], random_scalars[3], random_scalars[4]);
    let m_tilde = &random_scalars[5..];

    let r3 = invert_scalar(&r2).ok_or_else(|| Error::ProofGenError("r2 is not invertible".to_owned()))?;

    let e_cap = e_tilde + e * challenge;
    let r1_cap = r1_tilde - r1 * challenge;
    let r3_cap = r3_tilde - r3 * challenge;
    let m_cap: Vec<Scalar> = m_tilde
        .iter()
        .zip(undisclosed_messages)
        .map(|(m_t, m)| m_t + m.value * challenge)
        .collect();

    Ok(BBSplusPoKSignature {
        Abar: init_res.Abar,
        Bbar: init_res.Bbar,
        D: init_res.D,
        e_cap,
        r1_cap,
        r3_cap,
        m_cap,
        challenge,
    })
}

fn core_proof_verify<CS>(
    pk: &BBSplusPublicKey,
    proof: &BBSplusPoKSignature,
    generators: &Generators,
    header: Option<&[u8]>,
    ph: Option<&[u8]>,
    disclosed_messages: &[BBSplusMessage],
    disclosed_indexes: &[usize],
) -> Result<bool, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    if bool::from(proof.Abar.is_identity()) {
        log::debug!("proof rejected: Abar is the identity");
        return Ok(false);
    }

    let init_res = proof_verify_init::<CS>(pk, proof, generators, header, disclosed_messages, disclosed_indexes)?;

    let challenge = proof_challenge_calculate::<CS>(&init_res, disclosed_indexes, disclosed_messages, ph)?;

    if proof.challenge != challenge {
        log::debug!("proof rejected: challenge mismatch");
        return Ok(false);
    }

    // e(Abar, W) * e(Bbar, -BP2) == Identity_GT
    let BP2 = G2Projective::GENERATOR;
    let valid = pairing_product_is_identity(&[(proof.Abar, pk.0), (proof.Bbar, -BP2)]);
    if !valid {
        log::debug!("proof rejected: pairing check failed");
    }
    Ok(valid)
}

fn proof_verify_init<CS>(
    pk: &BBSplusPublicKey,
    proof: &BBSplusPoKSignature,
    generators: &Generators,
    header: Option<&[u8]>,
    disclosed_messages: &[BBSplusMessage],
    disclosed_indexes: &[usize],
) -> Result<ProofInitResult, Error>
where
    CS: BbsCiphersuite,
    CS::Expander: for<'a> ExpandMsg<'a>,
{
    let L = proof.m_cap.len() + disclosed_indexes.len();

    if generators.message_count() != L {
        return Err(Error::NotEnoughGenerators);
    }
    if disclosed_messages.len() != disclosed_indexes.len() {
        return Err(Error::ProofGenError("disclosed indexes and messages differ in number".to_owned()));
    }

    let undisclosed_indexes = get_remaining_indexes(L, disclosed_indexes);

    let domain = calculate_domain::<CS>(pk, generators, header)?;

    let T1 = proof.Bbar * proof.challenge + proof.Abar * proof.e_cap + proof.D * proof.r1_cap;

    // Bv = P1 + Q1 * domain + sum of H_i * msg_i over the disclosed messages
    let Bv = disclosed_indexes
        .iter()
        .zip(disclosed_messages)
        .fold(generators.g1_base_point + generators.q1 * domain, |acc, (&i, m)| {
            acc + generators.message_generators[i] * m.value
        });

    let T2 = undisclosed_indexes
        .iter()
        .zip(&proof.m_cap)
        .fold(Bv * proof.challenge + proof.D * proof.r3_cap, |acc, (&j, m)| {
            acc + generators.message_generators[j] * m
        });

    Ok(ProofInitResult { Abar: proof.Abar, Bbar: proof.Bbar, D: proof.D, T1, T2, domain })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        keys::pair::KeyPair, schemes::algorithms::BbsBls12381Sha256,
        utils::util::bbsplus_utils::get_disclosed_pairs,
    };
    use rand::{rngs::StdRng, SeedableRng};

    type Proof = PoKSignature<BbsBls12381Sha256>;

    fn messages() -> Vec<Vec<u8>> {
        ["name:Alice", "age:30", "country:Utopia", "role:admin"].iter().map(|m| m.as_bytes().to_vec()).collect()
    }

    fn setup() -> (KeyPair<BbsBls12381Sha256>, Signature<BbsBls12381Sha256>) {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let signature =
            Signature::<BbsBls12381Sha256>::sign(&messages(), keypair.private_key(), keypair.public_key(), None).unwrap();
        (keypair, signature)
    }

    #[test]
    fn proof_length_tracks_hidden_messages() {
        let (keypair, signature) = setup();
        let pk = keypair.public_key();

        for (reveal, hidden) in [(vec![], 4usize), (vec![1], 3), (vec![0, 1, 2, 3], 0)] {
            let proof = Proof::proof_gen(pk, &signature, &messages(), &reveal, None, None).unwrap();
            assert_eq!(proof.to_bbsplus_proof().undisclosed_count(), hidden);
            assert_eq!(proof.to_bytes().len(), BBSplusPoKSignature::MIN_LENGTH + 32 * hidden);
        }
    }

    #[test]
    fn proof_round_trips_through_bytes() {
        let (keypair, signature) = setup();
        let proof = Proof::proof_gen(keypair.public_key(), &signature, &messages(), &[0, 2], None, None).unwrap();

        let decoded = Proof::from_bytes(&proof.to_bytes()).unwrap();
        assert_eq!(decoded, proof);
    }

    #[test]
    fn same_rng_seed_gives_same_proof() {
        let (keypair, signature) = setup();
        let pk = keypair.public_key();

        let a = Proof::proof_gen_with_rng(pk, &signature, &messages(), &[1], None, None, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let b = Proof::proof_gen_with_rng(pk, &signature, &messages(), &[1], None, None, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let c = Proof::proof_gen_with_rng(pk, &signature, &messages(), &[1], None, None, &mut StdRng::seed_from_u64(6))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a.to_bbsplus_proof().a_bar(), c.to_bbsplus_proof().a_bar());
    }

    #[test]
    fn duplicate_disclosed_indexes_are_collapsed() {
        let (keypair, signature) = setup();
        let pk = keypair.public_key();
        let proof = Proof::proof_gen(pk, &signature, &messages(), &[2, 0, 2], None, None).unwrap();

        assert_eq!(proof.to_bbsplus_proof().undisclosed_count(), 2);
        assert!(proof.proof_verify(pk, &get_disclosed_pairs(&messages(), &[0, 2]), None, None).unwrap());
    }

    #[test]
    fn revealed_pairs_may_come_in_any_order() {
        let (keypair, signature) = setup();
        let pk = keypair.public_key();
        let proof = Proof::proof_gen(pk, &signature, &messages(), &[0, 3], None, None).unwrap();

        let revealed = get_disclosed_pairs(&messages(), &[3, 0]);
        assert!(proof.proof_verify(pk, &revealed, None, None).unwrap());
    }

    #[test]
    fn duplicate_revealed_index_is_an_error() {
        let (keypair, signature) = setup();
        let pk = keypair.public_key();
        let proof = Proof::proof_gen(pk, &signature, &messages(), &[0], None, None).unwrap();

        let revealed = vec![(0, messages()[0].clone()), (0, messages()[0].clone())];
        assert_eq!(proof.proof_verify(pk, &revealed, None, None), Err(Error::DuplicateIndex(0)));
    }

    #[test]
    fn wrong_revealed_value_fails() {
        let (keypair, signature) = setup();
        let pk = keypair.public_key();
        let proof = Proof::proof_gen(pk, &signature, &messages(), &[1], None, None).unwrap();

        assert!(!proof.proof_verify(pk, &[(1, b"age:31".to_vec())], None, None).unwrap());
        assert!(!proof.proof_verify(pk, &[(0, b"age:30".to_vec())], None, None).unwrap());
    }

    #[test]
    fn header_is_bound() {
        let keypair = KeyPair::<BbsBls12381Sha256>::from_seed(b"test-seed-1").unwrap();
        let (sk, pk) = (keypair.private_key(), keypair.public_key());
        let header = Some(b"issuer-context".as_slice());
        let signature = Signature::<BbsBls12381Sha256>::sign(&messages(), sk, pk, header).unwrap();

        let proof = Proof::proof_gen(pk, &signature, &messages(), &[0], header, None).unwrap();
        let revealed = get_disclosed_pairs(&messages(), &[0]);

        assert!(proof.proof_verify(pk, &revealed, header, None).unwrap());
        assert!(!proof.proof_verify(pk, &revealed, None, None).unwrap());
    }

    #[test]
    fn identity_points_are_rejected_on_decode() {
        let (keypair, signature) = setup();
        let proof = Proof::proof_gen(keypair.public_key(), &signature, &messages(), &[0], None, None).unwrap();

        let mut bytes = proof.to_bytes();
        bytes[..G1_LEN].copy_from_slice(&g1_to_bytes(&G1Projective::IDENTITY));
        assert_eq!(Proof::from_bytes(&bytes), Err(Error::PointAtInfinity));
    }

    #[test]
    fn malformed_lengths_are_rejected() {
        assert!(matches!(BBSplusPoKSignature::from_bytes(&[]), Err(Error::InvalidEncoding(_))));
        assert!(matches!(
            BBSplusPoKSignature::from_bytes(&vec![0u8; BBSplusPoKSignature::MIN_LENGTH - 1]),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(matches!(
            BBSplusPoKSignature::from_bytes(&vec![0u8; BBSplusPoKSignature::MIN_LENGTH + 5]),
            Err(Error::InvalidEncoding(_))
        ));
    }
}
