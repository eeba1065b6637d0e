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

mod bbsplus_example {
    use elliptic_curve::hash2curve::ExpandMsg;
    use rand::Rng;
    use zkdisclose::{
        bbsplus::ciphersuites::BbsCiphersuite,
        errors::Error,
        keys::pair::KeyPair,
        schemes::{
            algorithms::{BBSplus, Scheme},
            generics::{PoKSignature, Signature},
        },
        utils::util::bbsplus_utils::{generate_random_secret, get_disclosed_pairs},
    };

    pub(crate) fn bbsplus_main<S: Scheme>() -> Result<(), Error>
    where
        S::Ciphersuite: BbsCiphersuite,
        <S::Ciphersuite as BbsCiphersuite>::Expander: for<'a> ExpandMsg<'a>,
    {
        const MSGS: [&str; 3] = [
            "9872ad089e452c7b6e283dfac2a80d58e8d0ff71cc4d5e310a1debdda4a45f02",
            "87a8bd656d49ee07b8110e1d8fd4f1dcef6fb9bc368c492d9bc8c4f98a739ac6",
            "96012096adda3f13dd4adbe4eea481a4c4b5717932b73b00e31807d3c5894b90",
        ];

        log::info!("Messages: {:?}", MSGS);

        const HEADER_HEX: &str = "11223344556677889900aabbccddeeff";
        let header = hex::decode(HEADER_HEX).map_err(|e| Error::InvalidEncoding(e.to_string()))?;

        let mut rng = rand::thread_rng();
        let key_material: Vec<u8> = (0..S::Ciphersuite::IKM_LEN).map(|_| rng.gen()).collect();

        log::info!("Keypair Generation");
        let issuer_keypair = KeyPair::<BBSplus<S::Ciphersuite>>::generate(&key_material, None, None)?;

        let issuer_sk = issuer_keypair.private_key();
        let issuer_pk = issuer_keypair.public_key();
        log::info!("PK: {}", issuer_keypair.public_key_hex());

        let messages = MSGS
            .iter()
            .map(|m| hex::decode(m))
            .collect::<Result<Vec<Vec<u8>>, _>>()
            .map_err(|e| Error::InvalidEncoding(e.to_string()))?;

        log::info!("Signature Computation...");
        let signature = Signature::<BBSplus<S::Ciphersuite>>::sign(&messages, issuer_sk, issuer_pk, Some(header.as_slice()))?;
        log::info!("Signature: {}", hex::encode(signature.to_bytes()));

        assert!(signature.verify(issuer_pk, &messages, Some(header.as_slice()))?, "Signature verification FAILED!");
        log::info!("Signature is VALID");

        //Holder receive nonce from Verifier
        let nonce_verifier = generate_random_secret(32);
        log::info!("Generate Nonce...");
        log::info!("Nonce: {}", hex::encode(&nonce_verifier));

        //Holder chooses what to disclose
        let disclosed_indexes = [0usize, 2usize];

        log::info!("Proof of Knowledge of the Signature Generation...");
        let proof = PoKSignature::<BBSplus<S::Ciphersuite>>::proof_gen(
            issuer_pk,
            &signature,
            &messages,
            &disclosed_indexes,
            Some(header.as_slice()),
            Some(nonce_verifier.as_slice()),
        )?;
        log::info!("Proof: {}", hex::encode(proof.to_bytes()));

        //Verifier verifies SPoK
        let revealed = get_disclosed_pairs(&messages, &disclosed_indexes);

        log::info!("Proof of Knowledge of the Signature verification...");
        let proof_result = proof.proof_verify(issuer_pk, &revealed, Some(header.as_slice()), Some(nonce_verifier.as_slice()))?;
        assert!(proof_result, "Proof of Knowledge of the Signature Verification Failed!");
        log::info!("Proof of Knowledge of the Signature is VALID!");

        let replayed = proof.proof_verify(issuer_pk, &revealed, Some(header.as_slice()), Some(generate_random_secret(32).as_slice()))?;
        assert!(!replayed, "Proof accepted under a different nonce!");
        log::info!("Replay under a fresh nonce is REJECTED");

        Ok(())
    }
}

fn main() {
    use crate::bbsplus_example::bbsplus_main;
    use std::env;
    use zkdisclose::schemes::algorithms::{BbsBls12381Sha256, BbsBls12381Shake256};

    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        println!(
            "Usage: {} <cipher_suite>
                Ciphersuites:
                    - BLS12-381-SHA-256
                    - BLS12-381-SHAKE-256",
            args[0]
        );
        return;
    }

    let cipher_suite = &args[1];

    let result = match cipher_suite.as_str() {
        "BLS12-381-SHA-256" => {
            log::info!("Ciphersuite: BLS12-381-SHA-256");
            bbsplus_main::<BbsBls12381Sha256>()
        }
        "BLS12-381-SHAKE-256" => {
            log::info!("Ciphersuite: BLS12-381-SHAKE-256");
            bbsplus_main::<BbsBls12381Shake256>()
        }
        _ => {
            println!("Unknown cipher suite: {}", cipher_suite);
            return;
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
    }
}
