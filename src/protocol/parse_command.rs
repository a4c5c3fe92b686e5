//! Target-side command parser.
//!
//! Commands carry no text except the Search string, which is borrowed from
//! the incoming bytes, so no scratch arena is needed. Any field that fails
//! its predicate rejects the whole command; a target answers such a command
//! with a rejection rather than acting on part of it.

use tracing::debug;

use crate::core::catalog::{
    is_battery_status, is_capability_id, is_direction, is_event_id, is_media_attribute_id,
    is_player_attribute_id, is_player_attribute_value_pair, is_scope, BatteryStatus,
    CapabilityId, CharsetId, Direction, EventId, GroupNavigationId, MediaAttributeId,
    OpcodeClass, PduId, PlayerAttributeId, Scope, MAX_VOLUME,
};
use crate::core::envelope::{read_header, IncomingMessage};
use crate::core::wire::WireReader;
use crate::error::{CodecError, Result};
use crate::protocol::message::Command;
use crate::protocol::types::{AttributeSelection, PlayerSetting};

/// Decodes a command.
///
/// # Errors
/// Returns `CodecError::BadCommand` for an unknown opcode, a message shorter
/// than its header or a PDU id that is not a command of the opcode class,
/// and `CodecError::BadParameter` for a truncated payload or an invalid
/// field.
pub fn parse_command<'a>(msg: &IncomingMessage<'a>) -> Result<Command<'a>> {
    let class = OpcodeClass::from_opcode(msg.opcode).ok_or(CodecError::BadCommand(msg.opcode))?;
    let header = read_header(class, msg.data)?;

    if class == OpcodeClass::PassThrough {
        let id = GroupNavigationId(header.id);
        PduId::try_from(id).map_err(|_| CodecError::BadCommand(header.id as u8))?;
        return Ok(Command::GroupNavigation(id));
    }

    let pdu = PduId::for_class(header.id as u8, class)?;
    let mut reader = WireReader::new(header.payload);
    let cmd = match pdu {
        PduId::GetCapabilities => {
            let capability_id = CapabilityId(reader.u8()?);
            if !is_capability_id(capability_id) {
                return Err(CodecError::BadParameter("capability id"));
            }
            Command::GetCapabilities { capability_id }
        }
        PduId::ListPlayerApplicationSettingAttributes => {
            Command::ListPlayerApplicationSettingAttributes
        }
        PduId::ListPlayerApplicationSettingValues => {
            Command::ListPlayerApplicationSettingValues { attribute: player_attribute(&mut reader)? }
        }
        PduId::GetCurrentPlayerApplicationSettingValue => {
            Command::GetCurrentPlayerApplicationSettingValue {
                attributes: counted(&mut reader, player_attribute)?,
            }
        }
        PduId::SetPlayerApplicationSettingValue => Command::SetPlayerApplicationSettingValue {
            settings: counted(&mut reader, |r| {
                let setting = PlayerSetting::new(PlayerAttributeId(r.u8()?), r.u8()?);
                if !is_player_attribute_value_pair(setting.attribute, setting.value) {
                    return Err(CodecError::BadParameter("player attribute value pair"));
                }
                Ok(setting)
            })?,
        },
        PduId::GetPlayerApplicationSettingAttributeText => {
            Command::GetPlayerApplicationSettingAttributeText {
                attributes: counted(&mut reader, player_attribute)?,
            }
        }
        PduId::GetPlayerApplicationSettingValueText => {
            let attribute = player_attribute(&mut reader)?;
            let values = counted(&mut reader, |r| {
                let value = r.u8()?;
                if !is_player_attribute_value_pair(attribute, value) {
                    return Err(CodecError::BadParameter("player attribute value"));
                }
                Ok(value)
            })?;
            Command::GetPlayerApplicationSettingValueText { attribute, values }
        }
        PduId::InformDisplayableCharacterSet => Command::InformDisplayableCharacterSet {
            charsets: counted(&mut reader, |r| r.u16().map(CharsetId))?,
        },
        PduId::InformBatteryStatusOfCt => {
            let status = BatteryStatus(reader.u8()?);
            if !is_battery_status(status) {
                return Err(CodecError::BadParameter("battery status"));
            }
            Command::InformBatteryStatusOfCt { status }
        }
        PduId::GetElementAttributes => {
            let identifier = reader.u64()?;
            Command::GetElementAttributes {
                identifier,
                attributes: counted(&mut reader, media_attribute)?,
            }
        }
        PduId::GetPlayStatus => Command::GetPlayStatus,
        PduId::RegisterNotification => {
            let event_id = EventId(reader.u8()?);
            if !is_event_id(event_id) {
                return Err(CodecError::BadParameter("event id"));
            }
            Command::RegisterNotification { event_id, interval: reader.u32()? }
        }
        PduId::RequestContinuingResponse => {
            Command::RequestContinuingResponse { target: continuation_target(&mut reader)? }
        }
        PduId::AbortContinuingResponse => {
            Command::AbortContinuingResponse { target: continuation_target(&mut reader)? }
        }
        PduId::SetAbsoluteVolume => {
            Command::SetAbsoluteVolume { volume: reader.u8()? & MAX_VOLUME }
        }
        PduId::SetAddressedPlayer => Command::SetAddressedPlayer { player_id: reader.u16()? },
        PduId::PlayItem => {
            let (scope, uid, uid_counter) = item_reference(&mut reader)?;
            Command::PlayItem { scope, uid, uid_counter }
        }
        PduId::AddToNowPlaying => {
            let (scope, uid, uid_counter) = item_reference(&mut reader)?;
            Command::AddToNowPlaying { scope, uid, uid_counter }
        }
        PduId::SetBrowsedPlayer => Command::SetBrowsedPlayer { player_id: reader.u16()? },
        PduId::GetFolderItems => {
            let scope = scope(&mut reader)?;
            let start_item = reader.u32()?;
            let end_item = reader.u32()?;
            if start_item > end_item {
                return Err(CodecError::BadParameter("start item after end item"));
            }
            let attributes = match reader.u8()? {
                AttributeSelection::ALL_COUNT => AttributeSelection::All,
                AttributeSelection::NOTHING_COUNT => AttributeSelection::Nothing,
                count => AttributeSelection::Only(
                    (0..count).map(|_| media_attribute(&mut reader)).collect::<Result<_>>()?,
                ),
            };
            Command::GetFolderItems { scope, start_item, end_item, attributes }
        }
        PduId::ChangePath => {
            let uid_counter = reader.u16()?;
            let direction = Direction(reader.u8()?);
            if !is_direction(direction) {
                return Err(CodecError::BadParameter("direction"));
            }
            Command::ChangePath { uid_counter, direction, folder_uid: reader.u64()? }
        }
        PduId::GetItemAttributes => {
            let (scope, uid, uid_counter) = item_reference(&mut reader)?;
            Command::GetItemAttributes {
                scope,
                uid,
                uid_counter,
                attributes: counted(&mut reader, media_attribute)?,
            }
        }
        PduId::GetTotalNumberOfItems => Command::GetTotalNumberOfItems { scope: scope(&mut reader)? },
        PduId::Search => {
            let charset = CharsetId(reader.u16()?);
            let len = usize::from(reader.u16()?);
            Command::Search { charset, text: reader.bytes(len)? }
        }
        _ => return Err(CodecError::BadCommand(u8::from(pdu))),
    };

    debug!(pdu = ?pdu, "Parsed command");
    Ok(cmd)
}

/// Reads a one-byte count followed by that many entries.
fn counted<'r, T, F>(reader: &mut WireReader<'r>, mut read: F) -> Result<Vec<T>>
where
    F: FnMut(&mut WireReader<'r>) -> Result<T>,
{
    let count = usize::from(reader.u8()?);
    (0..count).map(|_| read(reader)).collect()
}

fn player_attribute(reader: &mut WireReader<'_>) -> Result<PlayerAttributeId> {
    let attribute = PlayerAttributeId(reader.u8()?);
    if !is_player_attribute_id(attribute) {
        return Err(CodecError::BadParameter("player attribute id"));
    }
    Ok(attribute)
}

fn media_attribute(reader: &mut WireReader<'_>) -> Result<MediaAttributeId> {
    let id = MediaAttributeId(reader.u32()?);
    if !is_media_attribute_id(id) {
        return Err(CodecError::BadParameter("media attribute id"));
    }
    Ok(id)
}

fn scope(reader: &mut WireReader<'_>) -> Result<Scope> {
    let scope = Scope(reader.u8()?);
    if !is_scope(scope) {
        return Err(CodecError::BadParameter("scope"));
    }
    Ok(scope)
}

fn item_reference(reader: &mut WireReader<'_>) -> Result<(Scope, u64, u16)> {
    let scope = scope(reader)?;
    if scope == Scope::MEDIA_PLAYER_LIST {
        return Err(CodecError::BadParameter("scope"));
    }
    Ok((scope, reader.u64()?, reader.u16()?))
}

fn continuation_target(reader: &mut WireReader<'_>) -> Result<PduId> {
    PduId::for_class(reader.u8()?, OpcodeClass::Vendor)
        .map_err(|_| CodecError::BadParameter("continuation target"))
}
