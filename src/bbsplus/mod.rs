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

//! The [BBS (Boneh-Boyen-Shacham) Signature Scheme](https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bbs-signatures-06)
//! signs an ordered list of messages with a single constant-size signature, and lets the holder of that
//! signature prove possession of it while disclosing only a chosen subset of the messages.
//!
//! - **Signature Compactness**: a signature is one G1 point and one scalar (80 bytes) regardless of the number of messages.
//! - **Selective Disclosure**: a proof reveals the messages at the chosen indexes and nothing about the others.
//! - **Unlinkable Proofs**: each proof is re-randomized, so two proofs derived from the same signature cannot be correlated.
//! - **Presentation binding**: a proof is bound to a presentation header, typically a verifier nonce, and does not verify under any other.
//!
//! Message generators are derived from the signer public key, so every issuer gets its own set.
//! Two ciphersuites are provided, [`ciphersuites::Bls12381Sha256`] and [`ciphersuites::Bls12381Shake256`].

/// Module for ciphersuites
pub mod ciphersuites;
/// Module for generators
pub mod generators;
/// Module for keys
pub mod keys;
/// Module for proofs
pub mod proof;
/// Module for signatures
pub mod signature;
