use avrcp_codec::core::arena::ScratchArena;
use avrcp_codec::core::catalog::{
    BatteryStatus, CapabilityId, CharsetId, Direction, EventId, FolderType, GroupNavigationId,
    MediaAttributeId, MediaType, PduId, PlayStatus, PlayerAttributeId, Scope, StatusCode,
    SystemStatus,
};
use avrcp_codec::protocol::dispatcher::Dispatcher;
use avrcp_codec::protocol::message::{Command, Response};
use avrcp_codec::protocol::types::{
    AttributeSelection, AttributeValue, BrowseItem, Capabilities, FolderItem, FolderName,
    MediaElementItem, MediaPlayerItem, Notification, PlayerSetting, SettingText,
};

fn assert_command_round_trip(cmd: Command<'_>) {
    let dispatcher = Dispatcher::new();
    let env = dispatcher
        .command(&cmd)
        .unwrap_or_else(|e| panic!("building {:?} failed: {}", cmd, e));
    let parsed = dispatcher
        .parse_command(&env.to_incoming())
        .unwrap_or_else(|e| panic!("parsing {:?} failed: {}", cmd, e));
    assert_eq!(parsed, cmd);
}

fn assert_response_round_trip(rsp: Response<'_>) {
    let dispatcher = Dispatcher::new();
    let env = dispatcher
        .response(&rsp)
        .unwrap_or_else(|e| panic!("building {:?} failed: {}", rsp, e));
    if let Some(declared) = env.declared_param_len() {
        assert_eq!(usize::from(declared), env.param_len());
    }

    let mut backing = vec![0u8; dispatcher.scratch_capacity(env.class())];
    let mut arena = ScratchArena::new(&mut backing);
    let parsed = dispatcher
        .parse_response(&env.to_incoming(), &mut arena)
        .unwrap_or_else(|e| panic!("parsing {:?} failed: {}", rsp, e));
    assert!(parsed.is_complete(), "{:?} parsed with {:?}", rsp, parsed.error);
    assert_eq!(parsed.value, rsp);
}

#[test]
fn test_vendor_commands() {
    assert_command_round_trip(Command::GetCapabilities {
        capability_id: CapabilityId::EVENTS_SUPPORTED,
    });
    assert_command_round_trip(Command::ListPlayerApplicationSettingAttributes);
    assert_command_round_trip(Command::ListPlayerApplicationSettingValues {
        attribute: PlayerAttributeId::REPEAT_MODE,
    });
    assert_command_round_trip(Command::GetCurrentPlayerApplicationSettingValue {
        attributes: vec![PlayerAttributeId::EQUALIZER, PlayerAttributeId::REPEAT_MODE],
    });
    assert_command_round_trip(Command::SetPlayerApplicationSettingValue {
        settings: vec![
            PlayerSetting::new(PlayerAttributeId::EQUALIZER, 1),
            PlayerSetting::new(PlayerAttributeId::SCAN_MODE, 3),
        ],
    });
    assert_command_round_trip(Command::GetPlayerApplicationSettingAttributeText {
        attributes: vec![PlayerAttributeId::SHUFFLE_MODE, PlayerAttributeId(0x81)],
    });
    assert_command_round_trip(Command::GetPlayerApplicationSettingValueText {
        attribute: PlayerAttributeId::REPEAT_MODE,
        values: vec![1, 2, 3, 4],
    });
    assert_command_round_trip(Command::InformDisplayableCharacterSet {
        charsets: vec![CharsetId::UTF8, CharsetId(0x0003)],
    });
    assert_command_round_trip(Command::InformBatteryStatusOfCt { status: BatteryStatus::WARNING });
    assert_command_round_trip(Command::GetElementAttributes { identifier: 0, attributes: vec![] });
    assert_command_round_trip(Command::GetElementAttributes {
        identifier: 5,
        attributes: vec![MediaAttributeId::TITLE, MediaAttributeId::PLAYING_TIME],
    });
    assert_command_round_trip(Command::GetPlayStatus);
    assert_command_round_trip(Command::RegisterNotification {
        event_id: EventId::VOLUME_CHANGED,
        interval: 0,
    });
    assert_command_round_trip(Command::RequestContinuingResponse {
        target: PduId::GetElementAttributes,
    });
    assert_command_round_trip(Command::AbortContinuingResponse {
        target: PduId::GetElementAttributes,
    });
    assert_command_round_trip(Command::SetAbsoluteVolume { volume: 0x7F });
    assert_command_round_trip(Command::SetAddressedPlayer { player_id: 3 });
    assert_command_round_trip(Command::PlayItem {
        scope: Scope::NOW_PLAYING,
        uid: 0x0102_0304_0506_0708,
        uid_counter: 11,
    });
    assert_command_round_trip(Command::AddToNowPlaying {
        scope: Scope::SEARCH,
        uid: 42,
        uid_counter: 0,
    });
}

#[test]
fn test_pass_through_commands() {
    assert_command_round_trip(Command::GroupNavigation(GroupNavigationId::NEXT_GROUP));
    assert_command_round_trip(Command::GroupNavigation(GroupNavigationId::PREVIOUS_GROUP));
}

#[test]
fn test_browse_commands() {
    assert_command_round_trip(Command::SetBrowsedPlayer { player_id: 1 });
    assert_command_round_trip(Command::GetFolderItems {
        scope: Scope::VIRTUAL_FILESYSTEM,
        start_item: 0,
        end_item: 10,
        attributes: AttributeSelection::All,
    });
    assert_command_round_trip(Command::GetFolderItems {
        scope: Scope::NOW_PLAYING,
        start_item: 0,
        end_item: 0,
        attributes: AttributeSelection::Only(vec![MediaAttributeId::TITLE]),
    });
    assert_command_round_trip(Command::GetFolderItems {
        scope: Scope::MEDIA_PLAYER_LIST,
        start_item: 0,
        end_item: 5,
        attributes: AttributeSelection::Nothing,
    });
    assert_command_round_trip(Command::ChangePath {
        uid_counter: 1,
        direction: Direction::DOWN,
        folder_uid: 0x10,
    });
    assert_command_round_trip(Command::GetItemAttributes {
        scope: Scope::VIRTUAL_FILESYSTEM,
        uid: 0x22,
        uid_counter: 2,
        attributes: vec![MediaAttributeId::TITLE, MediaAttributeId::GENRE],
    });
    assert_command_round_trip(Command::GetTotalNumberOfItems { scope: Scope::NOW_PLAYING });
    assert_command_round_trip(Command::Search { charset: CharsetId::UTF8, text: b"miles" });
}

#[test]
fn test_vendor_responses() {
    assert_response_round_trip(Response::GetCapabilities(Capabilities::CompanyIds(vec![
        0x001958, 0x00ABCD,
    ])));
    assert_response_round_trip(Response::GetCapabilities(Capabilities::Events(vec![
        EventId::PLAYBACK_STATUS_CHANGED,
        EventId::TRACK_CHANGED,
        EventId::VOLUME_CHANGED,
    ])));
    assert_response_round_trip(Response::ListPlayerApplicationSettingAttributes {
        attributes: vec![
            PlayerAttributeId::EQUALIZER,
            PlayerAttributeId::REPEAT_MODE,
            PlayerAttributeId(0x80),
        ],
    });
    assert_response_round_trip(Response::ListPlayerApplicationSettingValues { values: vec![1, 2] });
    assert_response_round_trip(Response::GetCurrentPlayerApplicationSettingValue {
        settings: vec![PlayerSetting::new(PlayerAttributeId::REPEAT_MODE, 2)],
    });
    assert_response_round_trip(Response::SetPlayerApplicationSettingValue);
    assert_response_round_trip(Response::GetPlayerApplicationSettingAttributeText {
        entries: vec![
            SettingText::utf8(0x02, b"Repeat"),
            SettingText::utf8(0x03, b"Shuffle"),
        ],
    });
    assert_response_round_trip(Response::GetPlayerApplicationSettingValueText {
        entries: vec![SettingText::utf8(0x01, b"Off"), SettingText::utf8(0x02, b"")],
    });
    assert_response_round_trip(Response::InformDisplayableCharacterSet);
    assert_response_round_trip(Response::InformBatteryStatusOfCt);
    assert_response_round_trip(Response::GetElementAttributes {
        attributes: vec![
            AttributeValue::utf8(MediaAttributeId::TITLE, b"So What"),
            AttributeValue::utf8(MediaAttributeId::ARTIST_NAME, b"Miles Davis"),
            AttributeValue::utf8(MediaAttributeId::PLAYING_TIME, b"562000"),
        ],
    });
    assert_response_round_trip(Response::GetPlayStatus {
        song_length: 562_000,
        song_position: 0,
        play_status: PlayStatus::STOPPED,
    });
    assert_response_round_trip(Response::AbortContinuingResponse);
    assert_response_round_trip(Response::SetAbsoluteVolume { volume: 0x30 });
    assert_response_round_trip(Response::SetAddressedPlayer);
    assert_response_round_trip(Response::PlayItem);
    assert_response_round_trip(Response::AddToNowPlaying);
}

#[test]
fn test_notifications() {
    let notifications = vec![
        Notification::PlaybackStatusChanged(PlayStatus::PAUSED),
        Notification::TrackChanged { identifier: u64::MAX },
        Notification::TrackReachedEnd,
        Notification::TrackReachedStart,
        Notification::PlaybackPosChanged { position: 1234 },
        Notification::BatteryStatusChanged(BatteryStatus::FULL_CHARGE),
        Notification::SystemStatusChanged(SystemStatus::POWER_ON),
        Notification::PlayerApplicationSettingChanged(vec![PlayerSetting::new(
            PlayerAttributeId::EQUALIZER,
            2,
        )]),
        Notification::NowPlayingContentChanged,
        Notification::AvailablePlayersChanged,
        Notification::AddressedPlayerChanged { player_id: 1, uid_counter: 2 },
        Notification::UidsChanged { uid_counter: 9 },
        Notification::VolumeChanged { volume: 0x7F },
    ];
    for notification in notifications {
        assert_response_round_trip(Response::RegisterNotification(notification));
    }
}

#[test]
fn test_browse_responses() {
    assert_response_round_trip(Response::SetBrowsedPlayer {
        uid_counter: 7,
        num_items: 120,
        charset: CharsetId::UTF8,
        folder_path: vec![FolderName(b"Music"), FolderName(b"Jazz")],
    });
    assert_response_round_trip(Response::SetBrowsedPlayer {
        uid_counter: 0,
        num_items: 3,
        charset: CharsetId::UTF8,
        folder_path: vec![],
    });
    assert_response_round_trip(Response::GetFolderItems {
        uid_counter: 4,
        items: vec![
            BrowseItem::MediaPlayer(MediaPlayerItem {
                player_id: 1,
                major_type: 0x01,
                sub_type: 0,
                play_status: PlayStatus::PLAYING,
                feature_bit_mask: [0xA5; 16],
                charset: CharsetId::UTF8,
                name: b"Player",
            }),
            BrowseItem::Folder(FolderItem {
                uid: 2,
                folder_type: FolderType::ARTISTS,
                is_playable: false,
                charset: CharsetId::UTF8,
                name: b"Artists",
            }),
            BrowseItem::MediaElement(MediaElementItem {
                uid: 3,
                media_type: MediaType::AUDIO,
                charset: CharsetId::UTF8,
                name: b"Blue in Green",
                attributes: vec![
                    AttributeValue::utf8(MediaAttributeId::TITLE, b"Blue in Green"),
                    AttributeValue::utf8(MediaAttributeId::TRACK_NUMBER, b"3"),
                ],
            }),
        ],
    });
    assert_response_round_trip(Response::ChangePath { num_items: 12 });
    assert_response_round_trip(Response::GetItemAttributes {
        attributes: vec![AttributeValue::utf8(MediaAttributeId::GENRE, b"Jazz")],
    });
    assert_response_round_trip(Response::GetTotalNumberOfItems { uid_counter: 4, num_items: 99 });
    assert_response_round_trip(Response::Search { uid_counter: 4, num_items: 0 });
}

#[test]
fn test_rejections() {
    assert_response_round_trip(Response::rejected(
        PduId::RegisterNotification,
        StatusCode::INVALID_PARAMETER,
    ));
    assert_response_round_trip(Response::rejected(PduId::SetAddressedPlayer, StatusCode::INVALID_PLAYER_ID));
    assert_response_round_trip(Response::rejected(PduId::NextGroup, StatusCode::INTERNAL_ERROR));
    assert_response_round_trip(Response::rejected(PduId::ChangePath, StatusCode::NOT_A_DIRECTORY));
    assert_response_round_trip(Response::general_reject(StatusCode::INVALID_COMMAND));
}

#[test]
fn test_pass_through_response() {
    assert_response_round_trip(Response::GroupNavigation(GroupNavigationId::PREVIOUS_GROUP));
}
