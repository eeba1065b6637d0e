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

//! Issue a JSON credential, present two of its claims to a verifier.
//!
//! The credential is flattened into sorted `key:value` statements; each
//! statement is one signed message, so its position is fixed by the key order.

mod credential_example {
    use serde_json::{json, Value};
    use zkdisclose::{
        errors::Error,
        keys::pair::KeyPair,
        schemes::{
            algorithms::BbsBls12381Sha256,
            generics::{PoKSignature, Signature},
        },
        utils::util::bbsplus_utils::{generate_random_secret, get_disclosed_pairs},
    };

    const ISSUER_SEED: &[u8] = b"demo-issuer-seed-2025";
    const CREDENTIAL_TYPE: &[u8] = b"EmployeeCredential";

    /// One statement per top-level claim, in key order.
    fn canonicalize(credential: &Value) -> Result<Vec<(String, Vec<u8>)>, Error> {
        let claims = credential
            .as_object()
            .ok_or_else(|| Error::InvalidEncoding("credential must be a JSON object".to_owned()))?;

        let mut statements: Vec<(String, Vec<u8>)> = claims
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), format!("{}:{}", key, value).into_bytes())
            })
            .collect();
        statements.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(statements)
    }

    /// Indexes of the statements whose key appears in `frame`.
    fn frame_indexes(statements: &[(String, Vec<u8>)], frame: &[&str]) -> Result<Vec<usize>, Error> {
        frame
            .iter()
            .map(|key| {
                statements
                    .iter()
                    .position(|(k, _)| k == key)
                    .ok_or_else(|| Error::InvalidEncoding(format!("no claim named {}", key)))
            })
            .collect()
    }

    pub(crate) fn credential_main() -> Result<(), Error> {
        let credential = json!({
            "givenName": "Alice",
            "familyName": "Liddell",
            "birthDate": "1995-05-04",
            "employer": "Wonderland Ltd",
            "clearance": 3,
            "country": "Utopia"
        });

        // Issuer
        let issuer = KeyPair::<BbsBls12381Sha256>::from_seed(ISSUER_SEED)?;
        let statements = canonicalize(&credential)?;
        let messages: Vec<Vec<u8>> = statements.iter().map(|(_, m)| m.clone()).collect();
        log::info!("Credential statements: {}", statements.len());

        let signature = Signature::<BbsBls12381Sha256>::sign(
            &messages,
            issuer.private_key(),
            issuer.public_key(),
            Some(CREDENTIAL_TYPE),
        )?;
        log::info!("Credential signed ({} bytes)", signature.to_bytes().len());

        // Verifier asks for a frame and sends a nonce
        let frame = ["employer", "country"];
        let nonce = generate_random_secret(16);
        log::info!("Verifier requests {:?} with nonce {}", frame, hex::encode(&nonce));

        // Holder
        let disclosed = frame_indexes(&statements, &frame)?;
        let proof = PoKSignature::<BbsBls12381Sha256>::proof_gen(
            issuer.public_key(),
            &signature,
            &messages,
            &disclosed,
            Some(CREDENTIAL_TYPE),
            Some(nonce.as_slice()),
        )?;
        let presentation = json!({
            "proof": hex::encode(proof.to_bytes()),
            "revealed": get_disclosed_pairs(&messages, &disclosed)
                .iter()
                .map(|(i, m)| json!({ "index": i, "statement": String::from_utf8_lossy(m) }))
                .collect::<Vec<Value>>(),
        });
        log::info!("Presentation: {}", presentation);

        // Verifier
        let proof_bytes = presentation["proof"]
            .as_str()
            .and_then(|p| hex::decode(p).ok())
            .ok_or_else(|| Error::InvalidEncoding("proof is not hex".to_owned()))?;
        let received = PoKSignature::<BbsBls12381Sha256>::from_bytes(&proof_bytes)?;

        let revealed: Vec<(usize, Vec<u8>)> = presentation["revealed"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let index = item["index"].as_u64()? as usize;
                        let statement = item["statement"].as_str()?;
                        Some((index, statement.as_bytes().to_vec()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let valid =
            received.proof_verify(issuer.public_key(), &revealed, Some(CREDENTIAL_TYPE), Some(nonce.as_slice()))?;
        log::info!("Presentation is {}", if valid { "VALID" } else { "INVALID" });

        let stale = received.proof_verify(
            issuer.public_key(),
            &revealed,
            Some(CREDENTIAL_TYPE),
            Some(generate_random_secret(16).as_slice()),
        )?;
        log::info!("Replayed presentation is {}", if stale { "VALID" } else { "REJECTED" });

        Ok(())
    }
}

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = credential_example::credential_main() {
        log::error!("{}", e);
    }
}
