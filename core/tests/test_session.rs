// Session tests: end-to-end scenario, round trips across key sizes and
// strategies, concurrency, terminal exhaustion, combined/text surfaces.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use aead_session::prelude::*;
    use proptest::prelude::*;

    fn zero_key_session() -> Session {
        let key = Key::from_slice(KeySize::Aes256, &[0u8; 32]).unwrap();
        Session::new(key, SessionConfig::default()).unwrap()
    }

// # ✅ 1. Concrete scenario: zero key, counter from 0

    #[test]
    fn temperature_reading_scenario() {
        let session = zero_key_session();
        let record = session.encrypt(b"Temperature:23.5C", b"").unwrap();

        let mut expected_nonce = vec![0u8; 12];
        expected_nonce[11] = 1;
        assert_eq!(record.nonce, expected_nonce);
        assert_eq!(hex::encode(&record.ciphertext), "7da44952910406a8dc72389ba3ccdaa0d2");
        assert_eq!(hex::encode(&record.tag), "d2e32ac10d1b98d8bc7e6549ac5051b7");

        assert_eq!(session.decrypt(&record, b"").unwrap(), b"Temperature:23.5C");
        assert_eq!(session.counter(), Some(1));
    }

    #[test]
    fn other_session_with_same_key_decrypts() {
        let (alice, key) = Session::generate(SessionConfig::default()).unwrap();
        let bob = Session::new(key, SessionConfig::random(KeySize::Aes256)).unwrap();

        let record = alice.encrypt(b"heartrate:75", b"device-7").unwrap();
        assert_eq!(bob.decrypt(&record, b"device-7").unwrap(), b"heartrate:75");
    }

// # ❌ 2. Authentication failures are returned, never partial plaintext

    #[test]
    fn mismatched_aad_fails() {
        let session = zero_key_session();
        let record = session.encrypt(b"steps:8541", b"aad-1").unwrap();
        assert!(matches!(
            session.decrypt(&record, b"aad-2"),
            Err(SessionError::AuthenticationFailure)
        ));
        assert!(matches!(
            session.decrypt(&record, b""),
            Err(SessionError::AuthenticationFailure)
        ));
    }

    #[test]
    fn wrong_key_fails() {
        let (a, _) = Session::generate(SessionConfig::default()).unwrap();
        let (b, _) = Session::generate(SessionConfig::default()).unwrap();
        let record = a.encrypt(b"calories:325", b"").unwrap();
        assert!(matches!(b.decrypt(&record, b""), Err(SessionError::AuthenticationFailure)));
    }

    #[test]
    fn detached_parts_decrypt() {
        let session = zero_key_session();
        let record = session.encrypt(b"x", b"").unwrap();
        let pt = session
            .decrypt_parts(&record.nonce, &record.ciphertext, &record.tag, b"")
            .unwrap();
        assert_eq!(pt, b"x");
    }

// # ❌ 3. Exhaustion retires the session

    #[test]
    fn exhausted_session_refuses_encrypt_but_still_decrypts() {
        let key = Key::from_slice(KeySize::Aes128, &[1u8; 16]).unwrap();
        let config = SessionConfig {
            counter_bits: 8,
            ..SessionConfig::iot()
        };
        let counter = Counter::with_prefix(8, &[0u8; 11]).unwrap().restore(254).unwrap();
        let session =
            Session::from_parts(key, config, NonceSequencer::counter(counter), None).unwrap();

        let last = session.encrypt(b"final", b"").unwrap();
        assert_eq!(last.nonce[11], 0xFF);
        assert!(session.is_exhausted());

        for _ in 0..3 {
            assert!(matches!(
                session.encrypt(b"more", b""),
                Err(SessionError::NonceSpaceExhausted)
            ));
        }
        assert_eq!(session.decrypt(&last, b"").unwrap(), b"final");

        let snap = session.telemetry();
        assert!(snap.exhausted);
        assert_eq!(snap.counters.records_sealed, 1);
        assert_eq!(snap.counters.encrypt_failures, 3);
    }

// # ✅ 4. Concurrent encrypts never share a nonce

    #[test]
    fn concurrent_encrypts_use_distinct_nonces() {
        let session = Arc::new(zero_key_session());
        let mut handles = Vec::new();

        for t in 0..8u8 {
            let s = Arc::clone(&session);
            handles.push(thread::spawn(move || {
                (0..200)
                    .map(|_| s.encrypt(&[t; 4], b"").unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let mut nonces = HashSet::new();
        let mut records = Vec::new();
        for h in handles {
            for record in h.join().unwrap() {
                assert!(nonces.insert(record.nonce.clone()));
                records.push(record);
            }
        }
        assert_eq!(nonces.len(), 1600);
        assert_eq!(session.counter(), Some(1600));

        // Decrypt runs in parallel without the encrypt lock.
        let chunks: Vec<Vec<AuthenticatedRecord>> = records.chunks(400).map(|c| c.to_vec()).collect();
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let s = Arc::clone(&session);
                thread::spawn(move || chunk.iter().all(|r| s.decrypt(r, b"").is_ok()))
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }

// # ✅ 5. Combined and text surfaces

    #[test]
    fn combined_fixed_layout() {
        let session = zero_key_session();
        let wire = session.encrypt_combined(b"Temperature:23.5C", b"").unwrap();
        assert_eq!(wire.len(), 12 + 17 + 16);
        assert_eq!(
            hex::encode(&wire),
            concat!(
                "000000000000000000000001",
                "7da44952910406a8dc72389ba3ccdaa0d2",
                "d2e32ac10d1b98d8bc7e6549ac5051b7"
            )
        );
        assert_eq!(session.decrypt_combined(&wire, b"").unwrap(), b"Temperature:23.5C");
    }

    #[test]
    fn combined_rejects_truncated_wire() {
        let session = zero_key_session();
        assert!(matches!(
            session.decrypt_combined(&[0u8; 27], b""),
            Err(SessionError::MalformedRecord(_))
        ));
    }

    #[test]
    fn prefixed_wire_with_wrong_field_lengths_is_malformed() {
        let config = SessionConfig { layout: WireLayout::LengthPrefixed, ..SessionConfig::default() };
        let (session, _) = Session::generate(config).unwrap();

        // 5-byte nonce, 16-byte tag, empty ciphertext
        let mut wire = vec![5u8];
        wire.extend_from_slice(&[0u8; 5]);
        wire.push(16);
        wire.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            session.decrypt_combined(&wire, b""),
            Err(SessionError::MalformedRecord(_))
        ));

        // 12-byte nonce, 8-byte tag
        let mut wire = vec![12u8];
        wire.extend_from_slice(&[0u8; 12]);
        wire.push(8);
        wire.extend_from_slice(&[0u8; 8]);
        assert!(matches!(
            session.decrypt_combined(&wire, b""),
            Err(SessionError::MalformedRecord(_))
        ));
        assert!(matches!(
            session.decrypt_text(&hex::encode(&wire), b""),
            Err(SessionError::MalformedRecord(_))
        ));
        assert!(matches!(
            session.decrypt_parts(&[0u8; 5], b"", &[0u8; 16], b""),
            Err(SessionError::MalformedRecord(_))
        ));
        assert_eq!(session.telemetry().counters.auth_failures, 0);
    }

    #[test]
    fn text_round_trip_each_encoding() {
        for (layout, text) in [
            (WireLayout::Fixed, TextEncoding::Hex),
            (WireLayout::LengthPrefixed, TextEncoding::Base64),
        ] {
            let config = SessionConfig { layout, text, ..SessionConfig::iot() };
            let (session, _) = Session::generate(config).unwrap();
            let encoded = session.encrypt_text(b"heartrate:75,steps:8541", b"").unwrap();
            assert_eq!(session.decrypt_text(&encoded, b"").unwrap(), b"heartrate:75,steps:8541");
        }
    }

    #[test]
    fn bad_text_is_encoding_error() {
        let session = zero_key_session();
        assert!(matches!(
            session.decrypt_text("not hex", b""),
            Err(SessionError::EncodingError(_))
        ));
    }

// # 🔁 6. Round-trip property across key sizes and strategies

    fn config_strategy() -> impl Strategy<Value = SessionConfig> {
        (
            prop_oneof![Just(KeySize::Aes128), Just(KeySize::Aes192), Just(KeySize::Aes256)],
            prop_oneof![Just(NonceStrategy::Random), Just(NonceStrategy::Counter)],
            prop_oneof![Just(32u32), Just(64u32), Just(96u32)],
        )
            .prop_map(|(key_size, nonce_strategy, counter_bits)| SessionConfig {
                key_size,
                nonce_strategy,
                counter_bits,
                ..SessionConfig::default()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_session_round_trip(
            config in config_strategy(),
            pt in proptest::collection::vec(any::<u8>(), 0..128),
            aad in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            let (session, _) = Session::generate(config).unwrap();
            let record = session.encrypt(&pt, &aad).unwrap();
            prop_assert_eq!(record.ciphertext.len(), pt.len());
            prop_assert_eq!(session.decrypt(&record, &aad).unwrap(), pt);
        }
    }
}
