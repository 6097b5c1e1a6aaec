// Primitive cipher adapter tests: fixed vectors, fail-closed open, tamper
// detection over every field.

#[cfg(test)]
mod tests {
    use aead_session::crypto::{open, seal, AeadImpl, CryptoError, Key, KeySize};
    use proptest::prelude::*;

// # ✅ 1. Known-answer vectors

    #[test]
    fn aes256_empty_plaintext_vector() {
        // AES-256-GCM, zero key, zero nonce, empty plaintext and AAD.
        let sealed = seal(&[0u8; 32], &[0u8; 12], b"", b"").unwrap();
        assert!(sealed.ciphertext.is_empty());
        assert_eq!(hex::encode(sealed.tag), "530f8afbc74536b9a963b4f1c4cb738b");
    }

    #[test]
    fn temperature_reading_vector() {
        let mut nonce = [0u8; 12];
        nonce[11] = 1;
        let sealed = seal(&[0u8; 32], &nonce, b"Temperature:23.5C", b"").unwrap();

        assert_eq!(hex::encode(&sealed.ciphertext), "7da44952910406a8dc72389ba3ccdaa0d2");
        assert_eq!(hex::encode(sealed.tag), "d2e32ac10d1b98d8bc7e6549ac5051b7");
    }

// # ❌ 2. Key length policy

    #[test]
    fn only_declared_key_lengths_accepted() {
        for len in [0usize, 1, 15, 17, 23, 25, 31, 33, 64] {
            assert!(matches!(
                seal(&vec![0u8; len], &[0u8; 12], b"x", b""),
                Err(CryptoError::InvalidKeyLength { .. })
            ));
        }
    }

    #[test]
    fn cipher_reports_its_key_size() {
        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            let key = Key::from_slice(size, &vec![9u8; size.key_len()]).unwrap();
            assert_eq!(AeadImpl::new(&key).unwrap().key_size(), size);
        }
    }

// # ❌ 3. Different keys of different sizes do not interoperate

    #[test]
    fn wrong_key_is_auth_failure() {
        let nonce = [5u8; 12];
        let sealed = seal(&[1u8; 16], &nonce, b"secret", b"").unwrap();
        assert_eq!(
            open(&[2u8; 16], &nonce, &sealed.ciphertext, &sealed.tag, b"").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

// # 🔁 4. Properties

    fn key_size_strategy() -> impl Strategy<Value = KeySize> {
        prop_oneof![Just(KeySize::Aes128), Just(KeySize::Aes192), Just(KeySize::Aes256)]
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            size in key_size_strategy(),
            key_byte in any::<u8>(),
            nonce in any::<[u8; 12]>(),
            pt in proptest::collection::vec(any::<u8>(), 0..256),
            aad in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let key = vec![key_byte; size.key_len()];
            let sealed = seal(&key, &nonce, &pt, &aad).unwrap();
            prop_assert_eq!(sealed.ciphertext.len(), pt.len());
            let opened = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, &aad).unwrap();
            prop_assert_eq!(opened, pt);
        }

        #[test]
        fn prop_any_single_bit_flip_fails(
            pt in proptest::collection::vec(any::<u8>(), 1..64),
            aad in proptest::collection::vec(any::<u8>(), 1..32),
            field in 0usize..4,
            bit in any::<usize>(),
        ) {
            let key = [0x42u8; 32];
            let mut nonce = [7u8; 12];
            let sealed = seal(&key, &nonce, &pt, &aad).unwrap();
            let mut ct = sealed.ciphertext.clone();
            let mut tag = sealed.tag;
            let mut aad = aad;

            let target: &mut [u8] = match field {
                0 => ct.as_mut_slice(),
                1 => &mut tag[..],
                2 => &mut nonce[..],
                _ => aad.as_mut_slice(),
            };
            let i = bit % (target.len() * 8);
            target[i / 8] ^= 1 << (i % 8);

            prop_assert_eq!(
                open(&key, &nonce, &ct, &tag, &aad),
                Err(CryptoError::AuthenticationFailure)
            );
        }
    }
}
