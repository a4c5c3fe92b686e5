use crate::core::catalog::{
    BatteryStatus, CapabilityId, CharsetId, Direction, EventId, GroupNavigationId,
    MediaAttributeId, PduId, PlayStatus, PlayerAttributeId, Scope, StatusCode,
};
use crate::error::{CodecError, Result};
use crate::protocol::types::{
    AttributeSelection, AttributeValue, BrowseItem, Capabilities, FolderName, Notification,
    PlayerSetting, SettingText,
};

/// Command parameters, one variant per PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    GroupNavigation(GroupNavigationId),
    GetCapabilities { capability_id: CapabilityId },
    ListPlayerApplicationSettingAttributes,
    ListPlayerApplicationSettingValues { attribute: PlayerAttributeId },
    GetCurrentPlayerApplicationSettingValue { attributes: Vec<PlayerAttributeId> },
    SetPlayerApplicationSettingValue { settings: Vec<PlayerSetting> },
    GetPlayerApplicationSettingAttributeText { attributes: Vec<PlayerAttributeId> },
    GetPlayerApplicationSettingValueText { attribute: PlayerAttributeId, values: Vec<u8> },
    InformDisplayableCharacterSet { charsets: Vec<CharsetId> },
    InformBatteryStatusOfCt { status: BatteryStatus },
    /// An empty attribute list asks for every attribute
    GetElementAttributes { identifier: u64, attributes: Vec<MediaAttributeId> },
    GetPlayStatus,
    RegisterNotification { event_id: EventId, interval: u32 },
    RequestContinuingResponse { target: PduId },
    AbortContinuingResponse { target: PduId },
    SetAbsoluteVolume { volume: u8 },
    SetAddressedPlayer { player_id: u16 },
    PlayItem { scope: Scope, uid: u64, uid_counter: u16 },
    AddToNowPlaying { scope: Scope, uid: u64, uid_counter: u16 },
    SetBrowsedPlayer { player_id: u16 },
    GetFolderItems { scope: Scope, start_item: u32, end_item: u32, attributes: AttributeSelection },
    ChangePath { uid_counter: u16, direction: Direction, folder_uid: u64 },
    /// An empty attribute list asks for every attribute
    GetItemAttributes {
        scope: Scope,
        uid: u64,
        uid_counter: u16,
        attributes: Vec<MediaAttributeId>,
    },
    GetTotalNumberOfItems { scope: Scope },
    Search { charset: CharsetId, text: &'a [u8] },
}

impl Command<'_> {
    pub fn pdu_id(&self) -> Result<PduId> {
        let pdu = match self {
            Command::GroupNavigation(id) => return PduId::try_from(*id),
            Command::GetCapabilities { .. } => PduId::GetCapabilities,
            Command::ListPlayerApplicationSettingAttributes => {
                PduId::ListPlayerApplicationSettingAttributes
            }
            Command::ListPlayerApplicationSettingValues { .. } => {
                PduId::ListPlayerApplicationSettingValues
            }
            Command::GetCurrentPlayerApplicationSettingValue { .. } => {
                PduId::GetCurrentPlayerApplicationSettingValue
            }
            Command::SetPlayerApplicationSettingValue { .. } => {
                PduId::SetPlayerApplicationSettingValue
            }
            Command::GetPlayerApplicationSettingAttributeText { .. } => {
                PduId::GetPlayerApplicationSettingAttributeText
            }
            Command::GetPlayerApplicationSettingValueText { .. } => {
                PduId::GetPlayerApplicationSettingValueText
            }
            Command::InformDisplayableCharacterSet { .. } => PduId::InformDisplayableCharacterSet,
            Command::InformBatteryStatusOfCt { .. } => PduId::InformBatteryStatusOfCt,
            Command::GetElementAttributes { .. } => PduId::GetElementAttributes,
            Command::GetPlayStatus => PduId::GetPlayStatus,
            Command::RegisterNotification { .. } => PduId::RegisterNotification,
            Command::RequestContinuingResponse { .. } => PduId::RequestContinuingResponse,
            Command::AbortContinuingResponse { .. } => PduId::AbortContinuingResponse,
            Command::SetAbsoluteVolume { .. } => PduId::SetAbsoluteVolume,
            Command::SetAddressedPlayer { .. } => PduId::SetAddressedPlayer,
            Command::PlayItem { .. } => PduId::PlayItem,
            Command::AddToNowPlaying { .. } => PduId::AddToNowPlaying,
            Command::SetBrowsedPlayer { .. } => PduId::SetBrowsedPlayer,
            Command::GetFolderItems { .. } => PduId::GetFolderItems,
            Command::ChangePath { .. } => PduId::ChangePath,
            Command::GetItemAttributes { .. } => PduId::GetItemAttributes,
            Command::GetTotalNumberOfItems { .. } => PduId::GetTotalNumberOfItems,
            Command::Search { .. } => PduId::Search,
        };
        Ok(pdu)
    }
}

/// Response parameters, one variant per PDU.
///
/// `Rejected` replaces the normal payload of any PDU with a single status
/// byte. A browsing GeneralReject is `Rejected` with `pdu` set to
/// [`PduId::GeneralReject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<'a> {
    Rejected { pdu: PduId, status: StatusCode },
    GroupNavigation(GroupNavigationId),
    GetCapabilities(Capabilities),
    ListPlayerApplicationSettingAttributes { attributes: Vec<PlayerAttributeId> },
    ListPlayerApplicationSettingValues { values: Vec<u8> },
    GetCurrentPlayerApplicationSettingValue { settings: Vec<PlayerSetting> },
    SetPlayerApplicationSettingValue,
    GetPlayerApplicationSettingAttributeText { entries: Vec<SettingText<'a>> },
    GetPlayerApplicationSettingValueText { entries: Vec<SettingText<'a>> },
    InformDisplayableCharacterSet,
    InformBatteryStatusOfCt,
    GetElementAttributes { attributes: Vec<AttributeValue<'a>> },
    GetPlayStatus { song_length: u32, song_position: u32, play_status: PlayStatus },
    RegisterNotification(Notification),
    AbortContinuingResponse,
    SetAbsoluteVolume { volume: u8 },
    SetAddressedPlayer,
    PlayItem,
    AddToNowPlaying,
    SetBrowsedPlayer {
        uid_counter: u16,
        num_items: u32,
        charset: CharsetId,
        folder_path: Vec<FolderName<'a>>,
    },
    GetFolderItems { uid_counter: u16, items: Vec<BrowseItem<'a>> },
    ChangePath { num_items: u32 },
    GetItemAttributes { attributes: Vec<AttributeValue<'a>> },
    GetTotalNumberOfItems { uid_counter: u16, num_items: u32 },
    Search { uid_counter: u16, num_items: u32 },
}

impl Response<'_> {
    pub fn rejected(pdu: PduId, status: StatusCode) -> Self {
        Response::Rejected { pdu, status }
    }

    pub fn general_reject(status: StatusCode) -> Self {
        Response::Rejected { pdu: PduId::GeneralReject, status }
    }

    /// Status the peer reported or will see; `SUCCESS` for any normal payload
    pub fn status(&self) -> StatusCode {
        match self {
            Response::Rejected { status, .. } => *status,
            _ => StatusCode::SUCCESS,
        }
    }

    pub fn pdu_id(&self) -> Result<PduId> {
        let pdu = match self {
            Response::Rejected { pdu, .. } => *pdu,
            Response::GroupNavigation(id) => return PduId::try_from(*id),
            Response::GetCapabilities(_) => PduId::GetCapabilities,
            Response::ListPlayerApplicationSettingAttributes { .. } => {
                PduId::ListPlayerApplicationSettingAttributes
            }
            Response::ListPlayerApplicationSettingValues { .. } => {
                PduId::ListPlayerApplicationSettingValues
            }
            Response::GetCurrentPlayerApplicationSettingValue { .. } => {
                PduId::GetCurrentPlayerApplicationSettingValue
            }
            Response::SetPlayerApplicationSettingValue => PduId::SetPlayerApplicationSettingValue,
            Response::GetPlayerApplicationSettingAttributeText { .. } => {
                PduId::GetPlayerApplicationSettingAttributeText
            }
            Response::GetPlayerApplicationSettingValueText { .. } => {
                PduId::GetPlayerApplicationSettingValueText
            }
            Response::InformDisplayableCharacterSet => PduId::InformDisplayableCharacterSet,
            Response::InformBatteryStatusOfCt => PduId::InformBatteryStatusOfCt,
            Response::GetElementAttributes { .. } => PduId::GetElementAttributes,
            Response::GetPlayStatus { .. } => PduId::GetPlayStatus,
            Response::RegisterNotification(_) => PduId::RegisterNotification,
            Response::AbortContinuingResponse => PduId::AbortContinuingResponse,
            Response::SetAbsoluteVolume { .. } => PduId::SetAbsoluteVolume,
            Response::SetAddressedPlayer => PduId::SetAddressedPlayer,
            Response::PlayItem => PduId::PlayItem,
            Response::AddToNowPlaying => PduId::AddToNowPlaying,
            Response::SetBrowsedPlayer { .. } => PduId::SetBrowsedPlayer,
            Response::GetFolderItems { .. } => PduId::GetFolderItems,
            Response::ChangePath { .. } => PduId::ChangePath,
            Response::GetItemAttributes { .. } => PduId::GetItemAttributes,
            Response::GetTotalNumberOfItems { .. } => PduId::GetTotalNumberOfItems,
            Response::Search { .. } => PduId::Search,
        };
        Ok(pdu)
    }
}

/// A decoded value, possibly incomplete.
///
/// When `error` is set the value holds everything decoded before the parse
/// stopped: `InternalError` when the scratch arena ran out, `BadParameter`
/// when the peer sent an invalid field or a truncated list.
#[derive(Debug, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub error: Option<CodecError>,
}

impl<T> Parsed<T> {
    pub fn complete(value: T) -> Self {
        Self { value, error: None }
    }

    pub fn partial(value: T, error: CodecError) -> Self {
        Self { value, error: Some(error) }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Parsed<U> {
        Parsed { value: f(self.value), error: self.error }
    }

    /// Discards partial results
    pub fn into_result(self) -> Result<T> {
        match self.error {
            None => Ok(self.value),
            Some(error) => Err(error),
        }
    }
}
