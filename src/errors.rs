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

use thiserror::Error;

/// Faults raised by the engine.
///
/// A signature or proof that simply does not verify is not an [`Error`]:
/// verification returns `Ok(false)` in that case. Errors are reserved for
/// malformed input and caller misuse.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("Identity element not allowed here")]
    PointAtInfinity,
    #[error("Index {index} out of range for {length} messages")]
    IndexOutOfRange { index: usize, length: usize },
    #[error("Disclosed index {0} appears more than once")]
    DuplicateIndex(usize),
    #[error("At least one message is required")]
    EmptyMessageList,
    #[error("Public key does not correspond to the secret key")]
    KeyMismatch,
    #[error("Not a valid Signature")]
    InvalidSignature,
    #[error("Seed rejected: {0}")]
    WeakSeed(String),
    #[error("Error during keypair generation: {0}")]
    KeyGenError(String),
    #[error("Error during computation of a Signature: {0}")]
    SignatureGenerationError(String),
    #[error("Error during computation of a Proof of Knowledge of a Signature: {0}")]
    ProofGenError(String),
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
    #[error("Error mapping a message to scalar")]
    MapMessageToScalarError,
    #[error("Not enough Generators")]
    NotEnoughGenerators,
    #[error("Error during message expansion")]
    ExpandMessageError,
}
