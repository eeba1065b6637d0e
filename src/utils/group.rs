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

//! Pairing-group layer over BLS12-381.
//!
//! Field and group arithmetic is provided by `bls12_381_plus`, whose scalar
//! multiplications run in constant time. This module adds the checked
//! encodings and the pairing-product test used by the signature and proof
//! verifiers.

pub use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Gt, Scalar};

use crate::errors::Error;
use bls12_381_plus::{multi_miller_loop, G2Prepared};
use ff::Field;
use group::{Curve, Group};
use rand::{CryptoRng, RngCore};

/// Compressed G1 point length.
pub const G1_LEN: usize = 48;
/// Compressed G2 point length.
pub const G2_LEN: usize = 96;
/// Scalar length.
pub const SCALAR_LEN: usize = 32;

pub trait ScalarExt: Sized {
    fn to_bytes_be(&self) -> [u8; SCALAR_LEN];
    fn from_bytes_be(bytes: &[u8; SCALAR_LEN]) -> Result<Self, Error>;
}

impl ScalarExt for Scalar {
    fn to_bytes_be(&self) -> [u8; SCALAR_LEN] {
        self.to_be_bytes()
    }

    fn from_bytes_be(bytes: &[u8; SCALAR_LEN]) -> Result<Self, Error> {
        Option::<Scalar>::from(Scalar::from_be_bytes(bytes))
            .ok_or_else(|| Error::InvalidEncoding("scalar is not reduced modulo r".to_owned()))
    }
}

/// Decodes a big-endian scalar, rejecting values `>= r`.
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, Error> {
    let bytes: [u8; SCALAR_LEN] = bytes.try_into().map_err(|_| {
        Error::InvalidEncoding(format!("expected {} bytes for a scalar, got {}", SCALAR_LEN, bytes.len()))
    })?;
    Scalar::from_bytes_be(&bytes)
}

/// Decodes a compressed G1 point. The point must lie in the prime-order subgroup
/// and must not be the identity.
pub fn g1_from_bytes(bytes: &[u8]) -> Result<G1Projective, Error> {
    let bytes: [u8; G1_LEN] = bytes.try_into().map_err(|_| {
        Error::InvalidEncoding(format!("expected {} bytes for a G1 point, got {}", G1_LEN, bytes.len()))
    })?;
    let point = Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
        .ok_or_else(|| Error::InvalidEncoding("not a G1 point of the prime order subgroup".to_owned()))?;

    if bool::from(point.is_identity()) {
        return Err(Error::PointAtInfinity);
    }
    Ok(G1Projective::from(point))
}

/// Decodes a compressed G2 point. The point must lie in the prime-order subgroup
/// and must not be the identity.
pub fn g2_from_bytes(bytes: &[u8]) -> Result<G2Projective, Error> {
    let bytes: [u8; G2_LEN] = bytes.try_into().map_err(|_| {
        Error::InvalidEncoding(format!("expected {} bytes for a G2 point, got {}", G2_LEN, bytes.len()))
    })?;
    let point = Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
        .ok_or_else(|| Error::InvalidEncoding("not a G2 point of the prime order subgroup".to_owned()))?;

    if bool::from(point.is_identity()) {
        return Err(Error::PointAtInfinity);
    }
    Ok(G2Projective::from(point))
}

pub fn g1_to_bytes(point: &G1Projective) -> [u8; G1_LEN] {
    point.to_affine().to_compressed()
}

pub fn g2_to_bytes(point: &G2Projective) -> [u8; G2_LEN] {
    point.to_affine().to_compressed()
}

/// `None` for zero; callers report the failure in their own terms.
pub fn invert_scalar(s: &Scalar) -> Option<Scalar> {
    s.invert().into()
}

/// Uniform non-zero scalar, reduced from 48 random bytes.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    let mut buf = [0u8; 48];
    loop {
        rng.fill_bytes(&mut buf);
        let scalar = Scalar::from_okm(&buf);
        if !bool::from(scalar.is_zero()) {
            return scalar;
        }
    }
}

pub fn calculate_random_scalars<R: RngCore + CryptoRng>(rng: &mut R, count: usize) -> Vec<Scalar> {
    (0..count).map(|_| random_scalar(rng)).collect()
}

/// Returns true iff `prod e(P_i, Q_i) == 1` in GT.
pub fn pairing_product_is_identity(terms: &[(G1Projective, G2Projective)]) -> bool {
    let prepared: Vec<(G1Affine, G2Prepared)> = terms
        .iter()
        .map(|(p, q)| (p.to_affine(), G2Prepared::from(q.to_affine())))
        .collect();
    let refs: Vec<(&G1Affine, &G2Prepared)> = prepared.iter().map(|(p, q)| (p, q)).collect();

    bool::from(multi_miller_loop(&refs).final_exponentiation().is_identity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn scalar_bytes_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = random_scalar(&mut rng);
        assert_eq!(scalar_from_bytes(&s.to_bytes_be()).unwrap(), s);
    }

    #[test]
    fn scalar_above_modulus_is_rejected() {
        let err = scalar_from_bytes(&[0xff; SCALAR_LEN]).unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
        assert!(matches!(scalar_from_bytes(&[1u8; 31]), Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn identity_points_are_rejected() {
        let g1 = G1Projective::IDENTITY.to_affine().to_compressed();
        assert_eq!(g1_from_bytes(&g1), Err(Error::PointAtInfinity));

        let g2 = G2Projective::IDENTITY.to_affine().to_compressed();
        assert_eq!(g2_from_bytes(&g2), Err(Error::PointAtInfinity));
    }

    #[test]
    fn garbage_points_are_rejected() {
        assert!(matches!(g1_from_bytes(&[0x11; G1_LEN]), Err(Error::InvalidEncoding(_))));
        assert!(matches!(g2_from_bytes(&[0x11; G2_LEN]), Err(Error::InvalidEncoding(_))));
        assert!(matches!(g1_from_bytes(&[0u8; 10]), Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn points_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        let p = G1Projective::GENERATOR * random_scalar(&mut rng);
        let q = G2Projective::GENERATOR * random_scalar(&mut rng);
        assert_eq!(g1_from_bytes(&g1_to_bytes(&p)).unwrap(), p);
        assert_eq!(g2_from_bytes(&g2_to_bytes(&q)).unwrap(), q);
    }

    #[test]
    fn pairing_is_bilinear() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_scalar(&mut rng);
        let b = random_scalar(&mut rng);

        // e(a*P, b*Q) * e(-ab*P, Q) == 1
        let lhs = (G1Projective::GENERATOR * a, G2Projective::GENERATOR * b);
        let rhs = (-(G1Projective::GENERATOR * (a * b)), G2Projective::GENERATOR);
        assert!(pairing_product_is_identity(&[lhs, rhs]));

        let wrong = (-(G1Projective::GENERATOR * (a + b)), G2Projective::GENERATOR);
        assert!(!pairing_product_is_identity(&[lhs, wrong]));
    }

    #[test]
    fn zero_has_no_inverse() {
        assert!(invert_scalar(&Scalar::ZERO).is_none());
        let two = Scalar::from(2u64);
        assert_eq!(invert_scalar(&two).unwrap() * two, Scalar::ONE);
    }
}
