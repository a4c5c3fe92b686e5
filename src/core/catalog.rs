//! # Catalog
//!
//! This file is part of the AVRCP Codec project.
//!
//! It enumerates every PDU the codec understands, maps each one to its opcode
//! class, and defines the field domains carried inside PDUs together with the
//! validity predicates that builders and parsers consult.
//!
//! Field domains are open newtypes over the raw wire value with named
//! constants for the assigned values. A peer may send anything, and a caller
//! may hand the builder anything, so the raw value must be representable; the
//! `is_*` predicates decide whether it is acceptable.
//!
//! Values follow AVRCP 1.6.2, Appendix H (PDU ids) and the Bluetooth SIG
//! assigned numbers for media attributes and player application settings.

use std::fmt;

use crate::config::{OPCODE_BROWSE, OPCODE_PASS_THROUGH, OPCODE_VENDOR};
use crate::error::CodecError;

/// Declares an open wire enumeration: a newtype over the raw value with one
/// associated constant per assigned value.
macro_rules! wire_value {
    (
        $(#[$meta:meta])*
        $name:ident($repr:ty) {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub $repr);

        impl $name {
            $( $(#[$vmeta])* pub const $variant: Self = Self($value); )*

            /// Name of the value if it is an assigned one
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $( v if v == $value => Some(stringify!($variant)), )*
                    _ => None,
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}::{}", stringify!($name), name),
                    None => write!(f, "{}(0x{:x})", stringify!($name), self.0),
                }
            }
        }

        impl From<$repr> for $name {
            fn from(raw: $repr) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> $repr {
                value.0
            }
        }
    };
}

wire_value! {
    /// GetCapabilities capability id (AVRCP 6.4.1)
    CapabilityId(u8) {
        COMPANY_ID = 0x02,
        EVENTS_SUPPORTED = 0x03,
    }
}

wire_value! {
    /// Notification event id (AVRCP 6.7.2)
    EventId(u8) {
        PLAYBACK_STATUS_CHANGED = 0x01,
        TRACK_CHANGED = 0x02,
        TRACK_REACHED_END = 0x03,
        TRACK_REACHED_START = 0x04,
        PLAYBACK_POS_CHANGED = 0x05,
        BATT_STATUS_CHANGED = 0x06,
        SYSTEM_STATUS_CHANGED = 0x07,
        PLAYER_APPLICATION_SETTING_CHANGED = 0x08,
        NOW_PLAYING_CONTENT_CHANGED = 0x09,
        AVAILABLE_PLAYERS_CHANGED = 0x0a,
        ADDRESSED_PLAYER_CHANGED = 0x0b,
        UIDS_CHANGED = 0x0c,
        VOLUME_CHANGED = 0x0d,
    }
}

wire_value! {
    /// Player application setting attribute id (AVRCP Appendix F)
    PlayerAttributeId(u8) {
        EQUALIZER = 0x01,
        REPEAT_MODE = 0x02,
        SHUFFLE_MODE = 0x03,
        SCAN_MODE = 0x04,
    }
}

wire_value! {
    /// Media attribute id (AVRCP Appendix E). Only the low byte is assigned.
    MediaAttributeId(u32) {
        TITLE = 0x01,
        ARTIST_NAME = 0x02,
        ALBUM_NAME = 0x03,
        TRACK_NUMBER = 0x04,
        TOTAL_NUMBER_OF_TRACKS = 0x05,
        GENRE = 0x06,
        PLAYING_TIME = 0x07,
        DEFAULT_COVER_ART = 0x08,
    }
}

wire_value! {
    BatteryStatus(u8) {
        NORMAL = 0x00,
        WARNING = 0x01,
        CRITICAL = 0x02,
        EXTERNAL = 0x03,
        FULL_CHARGE = 0x04,
    }
}

wire_value! {
    SystemStatus(u8) {
        POWER_ON = 0x00,
        POWER_OFF = 0x01,
        UNPLUGGED = 0x02,
    }
}

wire_value! {
    PlayStatus(u8) {
        STOPPED = 0x00,
        PLAYING = 0x01,
        PAUSED = 0x02,
        FWD_SEEK = 0x03,
        REV_SEEK = 0x04,
        ERROR = 0xFF,
    }
}

wire_value! {
    /// Browsing scope (AVRCP 6.10.1)
    Scope(u8) {
        MEDIA_PLAYER_LIST = 0x00,
        VIRTUAL_FILESYSTEM = 0x01,
        SEARCH = 0x02,
        NOW_PLAYING = 0x03,
    }
}

wire_value! {
    /// AVRCP status / error code (AVRCP 6.15.3)
    StatusCode(u8) {
        INVALID_COMMAND = 0x00,
        INVALID_PARAMETER = 0x01,
        PARAMETER_CONTENT_ERROR = 0x02,
        INTERNAL_ERROR = 0x03,
        SUCCESS = 0x04,
        UID_CHANGED = 0x05,
        INVALID_DIRECTION = 0x07,
        NOT_A_DIRECTORY = 0x08,
        DOES_NOT_EXIST = 0x09,
        INVALID_SCOPE = 0x0a,
        RANGE_OUT_OF_BOUNDS = 0x0b,
        FOLDER_ITEM_NOT_PLAYABLE = 0x0c,
        MEDIA_IN_USE = 0x0d,
        NOW_PLAYING_LIST_FULL = 0x0e,
        SEARCH_NOT_SUPPORTED = 0x0f,
        SEARCH_IN_PROGRESS = 0x10,
        INVALID_PLAYER_ID = 0x11,
        PLAYER_NOT_BROWSABLE = 0x12,
        PLAYER_NOT_ADDRESSED = 0x13,
        NO_VALID_SEARCH_RESULTS = 0x14,
        NO_AVAILABLE_PLAYERS = 0x15,
        ADDRESSED_PLAYER_CHANGED = 0x16,
    }
}

wire_value! {
    /// Group navigation operation carried in a pass-through vendor-unique frame
    GroupNavigationId(u16) {
        NEXT_GROUP = 0x0000,
        PREVIOUS_GROUP = 0x0001,
    }
}

wire_value! {
    /// ChangePath direction
    Direction(u8) {
        UP = 0x00,
        DOWN = 0x01,
    }
}

wire_value! {
    ItemType(u8) {
        MEDIA_PLAYER = 0x01,
        FOLDER = 0x02,
        MEDIA_ELEMENT = 0x03,
    }
}

wire_value! {
    FolderType(u8) {
        MIXED = 0x00,
        TITLES = 0x01,
        ALBUMS = 0x02,
        ARTISTS = 0x03,
        GENRES = 0x04,
        PLAYLISTS = 0x05,
        YEARS = 0x06,
    }
}

wire_value! {
    MediaType(u8) {
        AUDIO = 0x00,
        VIDEO = 0x01,
    }
}

wire_value! {
    /// IANA character set id
    CharsetId(u16) {
        UTF8 = 0x006a,
    }
}

wire_value! {
    /// AV/C response code of the frame that carried a vendor-dependent PDU
    ResponseCode(u8) {
        NOT_IMPLEMENTED = 0x08,
        ACCEPTED = 0x09,
        REJECTED = 0x0a,
        IN_TRANSITION = 0x0b,
        STABLE = 0x0c,
        CHANGED = 0x0d,
        INTERIM = 0x0f,
    }
}

/// Largest value of the 7 bit absolute volume field
pub const MAX_VOLUME: u8 = 0x7F;

/// First vendor-extended player application setting attribute
pub const PLAYER_ATTRIBUTE_EXTENDED_MIN: u8 = 0x80;

/// Header shape and buffer sizing follow from the opcode class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpcodeClass {
    Vendor,
    PassThrough,
    Browse,
}

impl OpcodeClass {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            OPCODE_VENDOR => Some(Self::Vendor),
            OPCODE_PASS_THROUGH => Some(Self::PassThrough),
            OPCODE_BROWSE => Some(Self::Browse),
            _ => None,
        }
    }

    pub fn opcode(&self) -> u8 {
        match self {
            Self::Vendor => OPCODE_VENDOR,
            Self::PassThrough => OPCODE_PASS_THROUGH,
            Self::Browse => OPCODE_BROWSE,
        }
    }
}

/// PDU identifiers (AVRCP 1.6.2 Appendix H). `NextGroup` and `PreviousGroup`
/// are the group navigation operations, which travel as pass-through frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PduId {
    NextGroup = 0x00,
    PreviousGroup = 0x01,
    GetCapabilities = 0x10,
    ListPlayerApplicationSettingAttributes = 0x11,
    ListPlayerApplicationSettingValues = 0x12,
    GetCurrentPlayerApplicationSettingValue = 0x13,
    SetPlayerApplicationSettingValue = 0x14,
    GetPlayerApplicationSettingAttributeText = 0x15,
    GetPlayerApplicationSettingValueText = 0x16,
    InformDisplayableCharacterSet = 0x17,
    InformBatteryStatusOfCt = 0x18,
    GetElementAttributes = 0x20,
    GetPlayStatus = 0x30,
    RegisterNotification = 0x31,
    RequestContinuingResponse = 0x40,
    AbortContinuingResponse = 0x41,
    SetAbsoluteVolume = 0x50,
    SetAddressedPlayer = 0x60,
    SetBrowsedPlayer = 0x70,
    GetFolderItems = 0x71,
    ChangePath = 0x72,
    GetItemAttributes = 0x73,
    PlayItem = 0x74,
    GetTotalNumberOfItems = 0x75,
    Search = 0x80,
    AddToNowPlaying = 0x90,
    GeneralReject = 0xa0,
}

impl PduId {
    /// Every PDU, in id order
    pub const ALL: [PduId; 27] = [
        PduId::NextGroup,
        PduId::PreviousGroup,
        PduId::GetCapabilities,
        PduId::ListPlayerApplicationSettingAttributes,
        PduId::ListPlayerApplicationSettingValues,
        PduId::GetCurrentPlayerApplicationSettingValue,
        PduId::SetPlayerApplicationSettingValue,
        PduId::GetPlayerApplicationSettingAttributeText,
        PduId::GetPlayerApplicationSettingValueText,
        PduId::InformDisplayableCharacterSet,
        PduId::InformBatteryStatusOfCt,
        PduId::GetElementAttributes,
        PduId::GetPlayStatus,
        PduId::RegisterNotification,
        PduId::RequestContinuingResponse,
        PduId::AbortContinuingResponse,
        PduId::SetAbsoluteVolume,
        PduId::SetAddressedPlayer,
        PduId::SetBrowsedPlayer,
        PduId::GetFolderItems,
        PduId::ChangePath,
        PduId::GetItemAttributes,
        PduId::PlayItem,
        PduId::GetTotalNumberOfItems,
        PduId::Search,
        PduId::AddToNowPlaying,
        PduId::GeneralReject,
    ];

    pub fn opcode_class(&self) -> OpcodeClass {
        match self {
            PduId::NextGroup | PduId::PreviousGroup => OpcodeClass::PassThrough,
            PduId::SetBrowsedPlayer
            | PduId::GetFolderItems
            | PduId::ChangePath
            | PduId::GetItemAttributes
            | PduId::GetTotalNumberOfItems
            | PduId::Search
            | PduId::GeneralReject => OpcodeClass::Browse,
            _ => OpcodeClass::Vendor,
        }
    }

    /// Browsing PDUs and the GetElementAttributes response carry unbounded
    /// text and are given the large buffer.
    pub fn needs_large_buffer(&self, is_response: bool) -> bool {
        match self.opcode_class() {
            OpcodeClass::Browse => true,
            OpcodeClass::Vendor => is_response && *self == PduId::GetElementAttributes,
            OpcodeClass::PassThrough => false,
        }
    }

    /// Resolves a raw PDU id within an opcode class
    pub fn for_class(raw: u8, class: OpcodeClass) -> Result<Self, CodecError> {
        let pdu = PduId::try_from(raw)?;
        if pdu.opcode_class() != class {
            return Err(CodecError::BadCommand(raw));
        }
        Ok(pdu)
    }

    pub fn group_navigation(&self) -> Option<GroupNavigationId> {
        match self {
            PduId::NextGroup => Some(GroupNavigationId::NEXT_GROUP),
            PduId::PreviousGroup => Some(GroupNavigationId::PREVIOUS_GROUP),
            _ => None,
        }
    }
}

impl TryFrom<u8> for PduId {
    type Error = CodecError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        PduId::ALL
            .iter()
            .copied()
            .find(|pdu| *pdu as u8 == raw)
            .ok_or(CodecError::BadCommand(raw))
    }
}

impl From<PduId> for u8 {
    fn from(pdu: PduId) -> u8 {
        pdu as u8
    }
}

impl TryFrom<GroupNavigationId> for PduId {
    type Error = CodecError;

    fn try_from(id: GroupNavigationId) -> Result<Self, Self::Error> {
        match id {
            GroupNavigationId::NEXT_GROUP => Ok(PduId::NextGroup),
            GroupNavigationId::PREVIOUS_GROUP => Ok(PduId::PreviousGroup),
            _ => Err(CodecError::BadParameter("group navigation id")),
        }
    }
}

pub fn is_opcode(opcode: u8) -> bool {
    OpcodeClass::from_opcode(opcode).is_some()
}

pub fn is_capability_id(id: CapabilityId) -> bool {
    matches!(id, CapabilityId::COMPANY_ID | CapabilityId::EVENTS_SUPPORTED)
}

pub fn is_event_id(id: EventId) -> bool {
    (EventId::PLAYBACK_STATUS_CHANGED.0..=EventId::VOLUME_CHANGED.0).contains(&id.0)
}

pub fn is_group_navigation_id(id: GroupNavigationId) -> bool {
    matches!(id, GroupNavigationId::NEXT_GROUP | GroupNavigationId::PREVIOUS_GROUP)
}

pub fn is_player_attribute_id(id: PlayerAttributeId) -> bool {
    (PlayerAttributeId::EQUALIZER.0..=PlayerAttributeId::SCAN_MODE.0).contains(&id.0)
        || id.0 >= PLAYER_ATTRIBUTE_EXTENDED_MIN
}

/// Checks a setting value against the value range of its attribute. Values of
/// vendor-extended attributes are not constrained.
pub fn is_player_attribute_value_pair(attr: PlayerAttributeId, value: u8) -> bool {
    match attr {
        PlayerAttributeId::EQUALIZER => (0x01..=0x02).contains(&value),
        PlayerAttributeId::REPEAT_MODE => (0x01..=0x04).contains(&value),
        PlayerAttributeId::SHUFFLE_MODE | PlayerAttributeId::SCAN_MODE => {
            (0x01..=0x03).contains(&value)
        }
        other => other.0 >= PLAYER_ATTRIBUTE_EXTENDED_MIN,
    }
}

pub fn is_media_attribute_id(id: MediaAttributeId) -> bool {
    (MediaAttributeId::TITLE.0..=MediaAttributeId::DEFAULT_COVER_ART.0).contains(&id.0)
}

pub fn is_battery_status(status: BatteryStatus) -> bool {
    status.0 <= BatteryStatus::FULL_CHARGE.0
}

pub fn is_system_status(status: SystemStatus) -> bool {
    status.0 <= SystemStatus::UNPLUGGED.0
}

pub fn is_play_status(status: PlayStatus) -> bool {
    status.0 <= PlayStatus::REV_SEEK.0 || status == PlayStatus::ERROR
}

pub fn is_scope(scope: Scope) -> bool {
    scope.0 <= Scope::NOW_PLAYING.0
}

pub fn is_direction(direction: Direction) -> bool {
    direction.0 <= Direction::DOWN.0
}

pub fn is_item_type(item_type: ItemType) -> bool {
    (ItemType::MEDIA_PLAYER.0..=ItemType::MEDIA_ELEMENT.0).contains(&item_type.0)
}

pub fn is_folder_type(folder_type: FolderType) -> bool {
    folder_type.0 <= FolderType::YEARS.0
}

pub fn is_media_type(media_type: MediaType) -> bool {
    media_type.0 <= MediaType::VIDEO.0
}

pub fn is_volume(volume: u8) -> bool {
    volume <= MAX_VOLUME
}
