use crate::config::BufferConfig;
use crate::core::arena::ScratchArena;
use crate::core::catalog::{
    CapabilityId, EventId, MediaAttributeId, PduId, PlayStatus, PlayerAttributeId, StatusCode,
};
use crate::core::envelope::{BoundedBuffers, Envelope, HeapBuffers};
use crate::error::CodecError;
use crate::protocol::dispatcher::Dispatcher;
use crate::protocol::message::{Command, Response};
use crate::protocol::types::{AttributeValue, PlayerSetting};

fn assert_length_consistent(env: &Envelope) {
    if let Some(declared) = env.declared_param_len() {
        assert_eq!(usize::from(declared), env.param_len());
    }
}

#[test]
fn test_get_capabilities_command_round_trip() {
    let dispatcher = Dispatcher::new();
    let cmd = Command::GetCapabilities { capability_id: CapabilityId::COMPANY_ID };
    let env = dispatcher.command(&cmd).unwrap();

    assert_eq!(dispatcher.parse_command(&env.to_incoming()).unwrap(), cmd);
}

#[test]
fn test_list_values_accumulate_in_order() {
    let dispatcher = Dispatcher::new();
    let mut envelope = None;

    dispatcher
        .build_response(&Response::ListPlayerApplicationSettingValues { values: vec![1, 2] }, &mut envelope)
        .unwrap();
    dispatcher
        .build_response(&Response::ListPlayerApplicationSettingValues { values: vec![3] }, &mut envelope)
        .unwrap();
    let env = envelope.unwrap();
    assert_length_consistent(&env);
    assert_eq!(env.payload(), &[3, 1, 2, 3]);

    let mut backing = [0u8; 16];
    let parsed = dispatcher
        .parse_response(&env.to_incoming(), &mut ScratchArena::new(&mut backing))
        .unwrap();
    assert!(parsed.is_complete());
    assert_eq!(parsed.value, Response::ListPlayerApplicationSettingValues { values: vec![1, 2, 3] });
}

#[test]
fn test_single_entry_calls_accumulate() {
    let dispatcher = Dispatcher::new();
    let mut envelope = None;
    for value in [1u8, 2, 3] {
        dispatcher
            .build_response(
                &Response::ListPlayerApplicationSettingValues { values: vec![value] },
                &mut envelope,
            )
            .unwrap();
        assert_length_consistent(envelope.as_ref().unwrap());
    }
    assert_eq!(envelope.unwrap().payload(), &[3, 1, 2, 3]);
}

#[test]
fn test_element_attributes_truncated_by_arena() {
    let dispatcher = Dispatcher::new();
    let env = dispatcher
        .response(&Response::GetElementAttributes {
            attributes: vec![
                AttributeValue::utf8(MediaAttributeId::TITLE, b"A"),
                AttributeValue::utf8(MediaAttributeId::ARTIST_NAME, b"B"),
            ],
        })
        .unwrap();

    // Room for one fixed record and its one-byte value
    let mut backing = [0u8; AttributeValue::FIXED_LEN + 1];
    let parsed = dispatcher
        .parse_response(&env.to_incoming(), &mut ScratchArena::new(&mut backing))
        .unwrap();

    assert_eq!(parsed.error, Some(CodecError::InternalError { processed: 1 }));
    assert_eq!(
        parsed.value,
        Response::GetElementAttributes {
            attributes: vec![AttributeValue::utf8(MediaAttributeId::TITLE, b"A")],
        }
    );
}

#[test]
fn test_truncated_text_keeps_prefix() {
    let dispatcher = Dispatcher::new();
    let env = dispatcher
        .response(&Response::GetElementAttributes {
            attributes: vec![
                AttributeValue::utf8(MediaAttributeId::TITLE, b"Blue"),
                AttributeValue::utf8(MediaAttributeId::ALBUM_NAME, b"Kind of Blue"),
            ],
        })
        .unwrap();

    let mut backing = [0u8; 8 + 4 + 8 + 3];
    let parsed = dispatcher
        .parse_response(&env.to_incoming(), &mut ScratchArena::new(&mut backing))
        .unwrap();

    assert_eq!(parsed.error, Some(CodecError::InternalError { processed: 2 }));
    match parsed.value {
        Response::GetElementAttributes { attributes } => {
            assert_eq!(attributes.len(), 2);
            assert_eq!(attributes[0].value, b"Blue");
            assert_eq!(attributes[1].value, b"Kin");
        }
        other => panic!("unexpected response {:?}", other),
    }
}

#[test]
fn test_register_notification_command_round_trip() {
    let dispatcher = Dispatcher::new();
    let cmd = Command::RegisterNotification {
        event_id: EventId::PLAYBACK_STATUS_CHANGED,
        interval: 2000,
    };
    let env = dispatcher.command(&cmd).unwrap();
    assert_eq!(dispatcher.parse_command(&env.to_incoming()).unwrap(), cmd);
}

#[test]
fn test_rejection_skips_payload_decoding() {
    let dispatcher = Dispatcher::new();
    let env = dispatcher
        .response(&Response::rejected(PduId::GetPlayStatus, StatusCode::INVALID_PARAMETER))
        .unwrap();

    let mut backing = [0u8; 4];
    let parsed = dispatcher
        .parse_response(&env.to_incoming(), &mut ScratchArena::new(&mut backing))
        .unwrap();
    assert!(parsed.is_complete());
    assert_eq!(parsed.value.status(), StatusCode::INVALID_PARAMETER);
    assert_eq!(parsed.value.pdu_id().unwrap(), PduId::GetPlayStatus);
}

#[test]
fn test_full_envelope_reports_processed_index() {
    let config = BufferConfig { small_capacity: 16, large_capacity: 64 };
    let dispatcher = Dispatcher::with_source(config, HeapBuffers);
    let mut envelope = None;

    // Header 4 + count 1 leaves room for five two-byte settings.
    let settings = vec![PlayerSetting::new(PlayerAttributeId::REPEAT_MODE, 2); 8];
    let result = dispatcher.build_command(
        &Command::SetPlayerApplicationSettingValue { settings: settings.clone() },
        &mut envelope,
    );
    assert_eq!(result, Err(CodecError::InternalError { processed: 5 }));

    let env = envelope.unwrap();
    assert_length_consistent(&env);
    assert_eq!(env.len(), 15);
    assert_eq!(env.payload()[0], 5);

    let parsed = dispatcher.parse_command(&env.to_incoming()).unwrap();
    assert_eq!(
        parsed,
        Command::SetPlayerApplicationSettingValue { settings: settings[..5].to_vec() }
    );
}

#[test]
fn test_invalid_entries_are_skipped() {
    let dispatcher = Dispatcher::new();
    let env = dispatcher
        .command(&Command::SetPlayerApplicationSettingValue {
            settings: vec![
                PlayerSetting::new(PlayerAttributeId::EQUALIZER, 9),
                PlayerSetting::new(PlayerAttributeId::SHUFFLE_MODE, 2),
            ],
        })
        .unwrap();
    assert_eq!(env.payload(), &[1, 0x03, 0x02]);
}

#[test]
fn test_bad_parameter_leaves_slot_empty() {
    let dispatcher = Dispatcher::new();
    let mut envelope = None;
    let result =
        dispatcher.build_command(&Command::SetAbsoluteVolume { volume: 0x80 }, &mut envelope);
    assert!(matches!(result, Err(CodecError::BadParameter(_))));
    assert!(envelope.is_none());
}

#[test]
fn test_envelope_for_other_pdu_is_refused() {
    let dispatcher = Dispatcher::new();
    let mut envelope = Some(dispatcher.command(&Command::GetPlayStatus).unwrap());
    let result = dispatcher.build_command(
        &Command::InformDisplayableCharacterSet { charsets: vec![] },
        &mut envelope,
    );
    assert!(matches!(result, Err(CodecError::BadParameter(_))));
    assert_eq!(envelope.unwrap().as_bytes(), &[0x30, 0x00, 0x00, 0x00]);
}

#[test]
fn test_buffer_source_exhausted() {
    let dispatcher =
        Dispatcher::with_source(BufferConfig::default(), BoundedBuffers { max_capacity: 600 });
    let mut envelope = None;
    let result = dispatcher.build_response(
        &Response::GetFolderItems { uid_counter: 1, items: vec![] },
        &mut envelope,
    );
    assert_eq!(result, Err(CodecError::BufferExhausted { capacity: 4096 }));
    assert!(envelope.is_none());

    assert!(dispatcher.command(&Command::GetPlayStatus).is_ok());
}

#[test]
fn test_capacity_smaller_than_header() {
    let config = BufferConfig { small_capacity: 2, large_capacity: 2 };
    let dispatcher = Dispatcher::with_source(config, HeapBuffers);
    let result =
        dispatcher.command(&Command::GetCapabilities { capability_id: CapabilityId::COMPANY_ID });
    assert_eq!(result.unwrap_err(), CodecError::BufferExhausted { capacity: 2 });
}

#[test]
fn test_play_status_response_round_trip() {
    let dispatcher = Dispatcher::new();
    let rsp = Response::GetPlayStatus {
        song_length: 240_000,
        song_position: 12_500,
        play_status: PlayStatus::PLAYING,
    };
    let env = dispatcher.response(&rsp).unwrap();
    let mut backing = [0u8; 0];
    let parsed = dispatcher
        .parse_response(&env.to_incoming(), &mut ScratchArena::new(&mut backing))
        .unwrap();
    assert_eq!(parsed.into_result().unwrap(), rsp);
}
