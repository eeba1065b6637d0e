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

//! BBS+ signatures with selective disclosure over BLS12-381.
//!
//! An issuer signs an ordered list of messages with a single constant-size
//! signature. The holder derives, for each presentation, a zero-knowledge proof
//! that reveals only chosen messages and is bound to a verifier nonce.
//!
//! ```no_run
//! use zkdisclose::{
//!     keys::pair::KeyPair,
//!     schemes::{algorithms::BbsBls12381Sha256, generics::{PoKSignature, Signature}},
//!     utils::util::bbsplus_utils::get_disclosed_pairs,
//! };
//!
//! # fn main() -> Result<(), zkdisclose::errors::Error> {
//! let keypair = KeyPair::<BbsBls12381Sha256>::random()?;
//! let messages: Vec<Vec<u8>> = vec![b"name:Alice".to_vec(), b"age:30".to_vec()];
//!
//! let signature = Signature::<BbsBls12381Sha256>::sign(&messages, keypair.private_key(), keypair.public_key(), None)?;
//! let proof = PoKSignature::<BbsBls12381Sha256>::proof_gen(keypair.public_key(), &signature, &messages, &[0], None, Some(b"nonce".as_slice()))?;
//!
//! let revealed = get_disclosed_pairs(&messages, &[0]);
//! assert!(proof.proof_verify(keypair.public_key(), &revealed, None, Some(b"nonce".as_slice()))?);
//! # Ok(())
//! # }
//! ```

#![allow(non_snake_case)]

pub mod bbsplus;
pub mod errors;
pub mod keys;
pub mod schemes;
pub mod utils;
