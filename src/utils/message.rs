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

use crate::{bbsplus::ciphersuites::BbsCiphersuite, errors::Error, utils::util::bbsplus_utils::hash_to_scalar};
use bls12_381_plus::Scalar;
use elliptic_curve::hash2curve::ExpandMsg;

/// A signed message, already mapped into the scalar field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBSplusMessage {
    pub value: Scalar,
}

impl BBSplusMessage {
    pub fn new(msg: Scalar) -> Self {
        Self { value: msg }
    }

    /// https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bbs-signatures-06#name-mapmessagetoscalarashash
    ///
    /// `dst` defaults to `api_id || "MAP_MSG_TO_SCALAR_AS_HASH_"`.
    pub fn map_message_to_scalar_as_hash<CS>(data: &[u8], dst: Option<&[u8]>) -> Result<Self, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let default_dst = CS::map_msg_dst();
        let dst = dst.unwrap_or(&default_dst);

        if dst.len() > 255 {
            return Err(Error::MapMessageToScalarError);
        }

        let scalar = hash_to_scalar::<CS>(data, dst).map_err(|_| Error::MapMessageToScalarError)?;

        Ok(Self { value: scalar })
    }

    pub fn messages_to_scalar<CS>(messages: &[Vec<u8>]) -> Result<Vec<Self>, Error>
    where
        CS: BbsCiphersuite,
        CS::Expander: for<'a> ExpandMsg<'a>,
    {
        let dst = CS::map_msg_dst();
        messages
            .iter()
            .map(|m| Self::map_message_to_scalar_as_hash::<CS>(m, Some(dst.as_slice())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbsplus::ciphersuites::Bls12381Sha256;

    #[test]
    fn messages_map_in_order() {
        let msgs = vec![b"name:Alice".to_vec(), b"age:30".to_vec()];
        let scalars = BBSplusMessage::messages_to_scalar::<Bls12381Sha256>(&msgs).unwrap();
        assert_eq!(scalars.len(), 2);
        assert_eq!(
            scalars[1],
            BBSplusMessage::map_message_to_scalar_as_hash::<Bls12381Sha256>(b"age:30", None).unwrap()
        );
        assert_ne!(scalars[0], scalars[1]);
    }

    #[test]
    fn empty_message_maps_to_a_scalar() {
        assert!(BBSplusMessage::map_message_to_scalar_as_hash::<Bls12381Sha256>(b"", None).is_ok());
    }
}
