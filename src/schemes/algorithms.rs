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

use crate::{
    bbsplus::{
        ciphersuites::{BbsCiphersuite, Bls12381Sha256, Bls12381Shake256},
        keys::{BBSplusPublicKey, BBSplusSecretKey},
    },
    keys::traits::{PrivateKey, PublicKey},
};
use core::{fmt::Debug, marker::PhantomData};

/// A signature scheme: a ciphersuite plus the key types it works with.
pub trait Scheme: 'static + Sized + Clone + PartialEq + Eq + Debug + Send + Sync {
    type Ciphersuite: BbsCiphersuite;
    type PrivKey: PrivateKey<Public = Self::PubKey>;
    type PubKey: PublicKey;
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct BBSplus<CS: BbsCiphersuite>(PhantomData<CS>);

impl<CS: BbsCiphersuite> Scheme for BBSplus<CS> {
    type Ciphersuite = CS;
    type PrivKey = BBSplusSecretKey;
    type PubKey = BBSplusPublicKey;
}

/// BBS over BLS12-381 with `expand_message_xmd` / SHA-256
pub type BbsBls12381Sha256 = BBSplus<Bls12381Sha256>;
/// BBS over BLS12-381 with `expand_message_xof` / SHAKE-256
pub type BbsBls12381Shake256 = BBSplus<Bls12381Shake256>;
