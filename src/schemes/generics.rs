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

use super::algorithms::Scheme;
use crate::bbsplus::{proof::BBSplusPoKSignature, signature::BBSplusSignature};
use core::marker::PhantomData;

/// A signature over an ordered list of messages, tagged with its scheme.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature<S: Scheme> {
    pub(crate) inner: BBSplusSignature,
    _scheme: PhantomData<S>,
}

impl<S: Scheme> Signature<S> {
    pub(crate) fn from_inner(inner: BBSplusSignature) -> Self {
        Self { inner, _scheme: PhantomData }
    }

    pub fn bbs_plus_signature(&self) -> &BBSplusSignature {
        &self.inner
    }
}

/// A proof of knowledge of a signature that discloses a subset of the messages.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PoKSignature<S: Scheme> {
    pub(crate) inner: BBSplusPoKSignature,
    _scheme: PhantomData<S>,
}

impl<S: Scheme> PoKSignature<S> {
    pub(crate) fn from_inner(inner: BBSplusPoKSignature) -> Self {
        Self { inner, _scheme: PhantomData }
    }

    pub fn to_bbsplus_proof(&self) -> &BBSplusPoKSignature {
        &self.inner
    }
}
