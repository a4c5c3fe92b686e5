//! List entry records shared by commands, responses and the parser.
//!
//! Text fields are borrowed byte slices: on the build side they point into the
//! caller's data, on the parse side into the scratch arena. Text is not
//! assumed to be UTF-8; its encoding is given by the accompanying charset.

use crate::core::catalog::{
    CharsetId, EventId, FolderType, ItemType, MediaAttributeId, MediaType, PlayStatus,
    PlayerAttributeId, BatteryStatus, SystemStatus,
};

/// One player application setting (attribute id, value id)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSetting {
    pub attribute: PlayerAttributeId,
    pub value: u8,
}

impl PlayerSetting {
    pub fn new(attribute: PlayerAttributeId, value: u8) -> Self {
        Self { attribute, value }
    }
}

/// Attribute Value entry (AVRCP 6.6.1 / 6.10.2.3.1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeValue<'a> {
    pub id: MediaAttributeId,
    pub charset: CharsetId,
    pub value: &'a [u8],
}

impl<'a> AttributeValue<'a> {
    /// Attribute id (4), charset (2), value length (2)
    pub const FIXED_LEN: usize = 8;

    pub fn utf8(id: MediaAttributeId, value: &'a [u8]) -> Self {
        Self { id, charset: CharsetId::UTF8, value }
    }

    pub fn encoded_len(&self) -> usize {
        Self::FIXED_LEN + self.value.len()
    }
}

/// Displayable text for a player application setting attribute or value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettingText<'a> {
    pub id: u8,
    pub charset: CharsetId,
    pub text: &'a [u8],
}

impl<'a> SettingText<'a> {
    /// Id (1), charset (2), text length (1)
    pub const FIXED_LEN: usize = 4;

    pub fn utf8(id: u8, text: &'a [u8]) -> Self {
        Self { id, charset: CharsetId::UTF8, text }
    }
}

/// Folder name element of a SetBrowsedPlayer response path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FolderName<'a>(pub &'a [u8]);

impl FolderName<'_> {
    /// Name length (2)
    pub const FIXED_LEN: usize = 2;
}

/// Media Player Item (AVRCP 6.10.2.1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaPlayerItem<'a> {
    pub player_id: u16,
    pub major_type: u8,
    pub sub_type: u32,
    pub play_status: PlayStatus,
    pub feature_bit_mask: [u8; 16],
    pub charset: CharsetId,
    pub name: &'a [u8],
}

impl MediaPlayerItem<'_> {
    /// Player id (2), major type (1), sub type (4), play status (1),
    /// feature mask (16), charset (2), name length (2)
    pub const FIXED_LEN: usize = 28;
}

/// Folder Item (AVRCP 6.10.2.2)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FolderItem<'a> {
    pub uid: u64,
    pub folder_type: FolderType,
    pub is_playable: bool,
    pub charset: CharsetId,
    pub name: &'a [u8],
}

impl FolderItem<'_> {
    /// Uid (8), folder type (1), playable (1), charset (2), name length (2)
    pub const FIXED_LEN: usize = 14;
}

/// Media Element Item (AVRCP 6.10.2.3)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaElementItem<'a> {
    pub uid: u64,
    pub media_type: MediaType,
    pub charset: CharsetId,
    pub name: &'a [u8],
    pub attributes: Vec<AttributeValue<'a>>,
}

impl MediaElementItem<'_> {
    /// Uid (8), media type (1), charset (2), name length (2). The attribute
    /// count byte follows the name.
    pub const FIXED_LEN: usize = 13;
}

/// One entry of a GetFolderItems response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseItem<'a> {
    MediaPlayer(MediaPlayerItem<'a>),
    Folder(FolderItem<'a>),
    MediaElement(MediaElementItem<'a>),
}

impl BrowseItem<'_> {
    /// Item type (1) and item length (2)
    pub const HEADER_LEN: usize = 3;

    pub fn item_type(&self) -> ItemType {
        match self {
            BrowseItem::MediaPlayer(_) => ItemType::MEDIA_PLAYER,
            BrowseItem::Folder(_) => ItemType::FOLDER,
            BrowseItem::MediaElement(_) => ItemType::MEDIA_ELEMENT,
        }
    }

    /// Length of the type-specific record, excluding the item header
    pub fn record_len(&self) -> usize {
        match self {
            BrowseItem::MediaPlayer(p) => MediaPlayerItem::FIXED_LEN + p.name.len(),
            BrowseItem::Folder(f) => FolderItem::FIXED_LEN + f.name.len(),
            BrowseItem::MediaElement(e) => {
                MediaElementItem::FIXED_LEN
                    + e.name.len()
                    + 1
                    + e.attributes.iter().map(AttributeValue::encoded_len).sum::<usize>()
            }
        }
    }
}

/// Which media attributes a GetFolderItems command asks for
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AttributeSelection {
    /// Attribute count 0x00
    #[default]
    All,
    /// Attribute count 0xFF
    Nothing,
    /// A non-empty list of ids
    Only(Vec<MediaAttributeId>),
}

impl AttributeSelection {
    pub const ALL_COUNT: u8 = 0x00;
    pub const NOTHING_COUNT: u8 = 0xFF;
}

/// GetCapabilities response list
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capabilities {
    /// 24 bit company ids
    CompanyIds(Vec<u32>),
    Events(Vec<EventId>),
}

/// RegisterNotification response payload, one shape per event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    PlaybackStatusChanged(PlayStatus),
    TrackChanged { identifier: u64 },
    TrackReachedEnd,
    TrackReachedStart,
    PlaybackPosChanged { position: u32 },
    BatteryStatusChanged(BatteryStatus),
    SystemStatusChanged(SystemStatus),
    PlayerApplicationSettingChanged(Vec<PlayerSetting>),
    NowPlayingContentChanged,
    AvailablePlayersChanged,
    AddressedPlayerChanged { player_id: u16, uid_counter: u16 },
    UidsChanged { uid_counter: u16 },
    VolumeChanged { volume: u8 },
}

impl Notification {
    pub fn event_id(&self) -> EventId {
        match self {
            Notification::PlaybackStatusChanged(_) => EventId::PLAYBACK_STATUS_CHANGED,
            Notification::TrackChanged { .. } => EventId::TRACK_CHANGED,
            Notification::TrackReachedEnd => EventId::TRACK_REACHED_END,
            Notification::TrackReachedStart => EventId::TRACK_REACHED_START,
            Notification::PlaybackPosChanged { .. } => EventId::PLAYBACK_POS_CHANGED,
            Notification::BatteryStatusChanged(_) => EventId::BATT_STATUS_CHANGED,
            Notification::SystemStatusChanged(_) => EventId::SYSTEM_STATUS_CHANGED,
            Notification::PlayerApplicationSettingChanged(_) => {
                EventId::PLAYER_APPLICATION_SETTING_CHANGED
            }
            Notification::NowPlayingContentChanged => EventId::NOW_PLAYING_CONTENT_CHANGED,
            Notification::AvailablePlayersChanged => EventId::AVAILABLE_PLAYERS_CHANGED,
            Notification::AddressedPlayerChanged { .. } => EventId::ADDRESSED_PLAYER_CHANGED,
            Notification::UidsChanged { .. } => EventId::UIDS_CHANGED,
            Notification::VolumeChanged { .. } => EventId::VOLUME_CHANGED,
        }
    }
}
