//! Property-based tests for DER lengths and DTBS reconstruction

use num_bigint::BigUint;
use proptest::prelude::*;
use ttc_codec::der::encode_length;
use ttc_codec::{decode_length, encode_dtbs, parse_log_message, DerError, LogMessageBuilder};
use ttc_types::{LogTime, OperationType};

fn operation_type() -> impl Strategy<Value = OperationType> {
    prop_oneof![
        Just(OperationType::Start),
        Just(OperationType::Update),
        Just(OperationType::Finish),
    ]
}

fn log_time() -> impl Strategy<Value = LogTime> {
    prop_oneof![
        any::<i64>().prop_map(LogTime::UnixTime),
        (0u32..100, 1u32..13, 1u32..29, 0u32..24, 0u32..60, 0u32..60).prop_map(
            |(y, mo, d, h, mi, s)| LogTime::UtcTime(format!(
                "{:02}{:02}{:02}{:02}{:02}{:02}Z",
                y, mo, d, h, mi, s
            ))
        ),
        (1970u32..2100, 1u32..13, 1u32..29).prop_map(|(y, mo, d)| LogTime::GeneralizedTime(
            format!("{:04}{:02}{:02}120000Z", y, mo, d)
        )),
    ]
}

proptest! {
    #[test]
    fn short_form_lengths_decode_to_themselves(len in 0u8..0x80) {
        prop_assert_eq!(decode_length(&[len]), Ok(len as usize));
    }

    #[test]
    fn long_form_lengths_round_trip(len in 0x80usize..=usize::MAX) {
        let mut encoded = Vec::new();
        encode_length(len, &mut encoded);
        prop_assert_eq!(decode_length(&encoded), Ok(len));
    }

    #[test]
    fn oversized_lengths_overflow(first in 1u8..=0xff, rest in proptest::collection::vec(any::<u8>(), 8)) {
        let mut encoded = vec![0x89, first];
        encoded.extend_from_slice(&rest);
        let overflowed = matches!(decode_length(&encoded), Err(DerError::LengthOverflow { .. }));
        prop_assert!(overflowed);
    }

    #[test]
    fn dtbs_matches_reencoding(
        op in operation_type(),
        tx in any::<u64>(),
        counter in any::<u64>(),
        serial in proptest::collection::vec(any::<u8>(), 1..40),
        client in proptest::option::of("[A-Za-z0-9-]{1,16}"),
        audit in proptest::option::of(proptest::collection::vec(any::<u8>(), 0..300)),
        time in log_time(),
        signature in proptest::collection::vec(any::<u8>(), 0..140),
    ) {
        let mut builder = LogMessageBuilder::transaction(op, tx)
            .signature_counter(counter)
            .serial_number(serial)
            .log_time(time)
            .signature_value(signature);
        if let Some(client) = client {
            builder = builder.client_id(client);
        }
        if let Some(audit) = audit {
            builder = builder.se_audit_data(audit);
        }

        let message = parse_log_message(&builder.build(), &builder.file_name()).unwrap();
        prop_assert_eq!(encode_dtbs(&message), message.dtbs().to_vec());
        prop_assert_eq!(message.dtbs().to_vec(), builder.dtbs());
        prop_assert_eq!(message.signature_counter(), &BigUint::from(counter));
    }
}
