//! # Response Parser
//!
//! This file is part of the AVRCP Codec project.
//!
//! It decodes responses received by a controller, one routine per PDU.
//!
//! Fixed-size fields are decoded straight into the result. Entries that carry
//! text (setting text, attribute values, browsing items, folder names) are
//! copied into the caller's [`ScratchArena`], fixed fields first and then the
//! text, and the result borrows the text from there. When the arena runs out
//! the entry in progress keeps whatever text fit, decoding stops, and the
//! result carries `InternalError` with the number of entries processed.
//!
//! Peer data is never trusted: a list that is shorter than its count, or an
//! invalid enumerated field, ends the parse with `BadParameter` and the
//! entries decoded so far.

use tracing::{debug, warn};

use crate::core::arena::{ScratchArena, Stored};
use crate::core::catalog::{
    is_battery_status, is_event_id, is_folder_type, is_media_type, is_play_status,
    is_player_attribute_id, is_player_attribute_value_pair, is_system_status, BatteryStatus, CapabilityId, CharsetId, EventId, FolderType,
    GroupNavigationId, ItemType, MediaAttributeId, MediaType, OpcodeClass, PduId, PlayStatus,
    PlayerAttributeId, ResponseCode, StatusCode, SystemStatus, MAX_VOLUME,
};
use crate::core::envelope::{read_header, Header, IncomingMessage, PACKET_TYPE_SINGLE};
use crate::core::wire::WireReader;
use crate::error::{CodecError, Result};
use crate::protocol::message::{Parsed, Response};
use crate::protocol::types::{
    AttributeValue, BrowseItem, Capabilities, FolderItem, FolderName, MediaElementItem,
    MediaPlayerItem, Notification, PlayerSetting, SettingText,
};

/// Decodes a response. Text is copied into `arena`.
///
/// # Errors
/// Returns `CodecError::BadCommand` for an unknown opcode, a message shorter
/// than its header or a PDU id outside the opcode class. Returns
/// `CodecError::BadParameter` when a fixed-size payload is truncated or holds
/// a value the result cannot represent. Partial results are reported through
/// [`Parsed::error`] instead.
pub fn parse_response<'a>(
    msg: &IncomingMessage<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Parsed<Response<'a>>> {
    let class = OpcodeClass::from_opcode(msg.opcode).ok_or(CodecError::BadCommand(msg.opcode))?;
    let header = read_header(class, msg.data)?;

    match class {
        OpcodeClass::PassThrough => parse_pass_through(msg, &header).map(Parsed::complete),
        OpcodeClass::Vendor => parse_vendor(msg, &header, arena),
        OpcodeClass::Browse => parse_browse(&header, arena),
    }
}

fn is_rejected(code: Option<ResponseCode>) -> bool {
    matches!(code, Some(ResponseCode::REJECTED) | Some(ResponseCode::NOT_IMPLEMENTED))
}

/// A rejected control frame carries at most a status byte
fn rejection(pdu: PduId, payload: &[u8]) -> Response<'static> {
    let status = payload.first().copied().map_or(StatusCode::INVALID_COMMAND, StatusCode);
    debug!(pdu = ?pdu, status = ?status, "Response rejected");
    Response::Rejected { pdu, status }
}

fn parse_pass_through(msg: &IncomingMessage<'_>, header: &Header<'_>) -> Result<Response<'static>> {
    let id = GroupNavigationId(header.id);
    let pdu = PduId::try_from(id).map_err(|_| CodecError::BadCommand(header.id as u8))?;
    if is_rejected(msg.response_code) {
        return Ok(rejection(pdu, header.payload));
    }
    Ok(Response::GroupNavigation(id))
}

fn parse_vendor<'a>(
    msg: &IncomingMessage<'_>,
    header: &Header<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Parsed<Response<'a>>> {
    let pdu = PduId::for_class(header.id as u8, OpcodeClass::Vendor)?;
    if header.packet_type != PACKET_TYPE_SINGLE {
        debug!(pdu = ?pdu, packet_type = header.packet_type, "Fragmented response, decoding first packet");
    }
    if is_rejected(msg.response_code) {
        return Ok(Parsed::complete(rejection(pdu, header.payload)));
    }

    let mut reader = WireReader::new(header.payload);
    let parsed = match pdu {
        PduId::GetCapabilities => {
            let capability_id = CapabilityId(reader.u8()?);
            let count = usize::from(reader.u8()?);
            let capabilities = match capability_id {
                CapabilityId::COMPANY_ID => read_list(&mut reader, count, |r| r.company_id())
                    .map(Capabilities::CompanyIds),
                CapabilityId::EVENTS_SUPPORTED => read_list(&mut reader, count, |r| {
                    let event = EventId(r.u8()?);
                    if !is_event_id(event) {
                        return Err(CodecError::BadParameter("event id"));
                    }
                    Ok(event)
                })
                .map(Capabilities::Events),
                _ => return Err(CodecError::BadParameter("capability id")),
            };
            capabilities.map(Response::GetCapabilities)
        }
        PduId::ListPlayerApplicationSettingAttributes => {
            let count = usize::from(reader.u8()?);
            read_list(&mut reader, count, read_attribute_id)
                .map(|attributes| Response::ListPlayerApplicationSettingAttributes { attributes })
        }
        PduId::ListPlayerApplicationSettingValues => {
            let count = usize::from(reader.u8()?);
            read_list(&mut reader, count, |r| r.u8())
                .map(|values| Response::ListPlayerApplicationSettingValues { values })
        }
        PduId::GetCurrentPlayerApplicationSettingValue => {
            let count = usize::from(reader.u8()?);
            read_list(&mut reader, count, read_setting)
                .map(|settings| Response::GetCurrentPlayerApplicationSettingValue { settings })
        }
        PduId::SetPlayerApplicationSettingValue => {
            Parsed::complete(Response::SetPlayerApplicationSettingValue)
        }
        PduId::GetPlayerApplicationSettingAttributeText => {
            let count = usize::from(reader.u8()?);
            read_text_list(&mut reader, count, arena, setting_text)
                .map(|entries| Response::GetPlayerApplicationSettingAttributeText { entries })
        }
        PduId::GetPlayerApplicationSettingValueText => {
            let count = usize::from(reader.u8()?);
            read_text_list(&mut reader, count, arena, setting_text)
                .map(|entries| Response::GetPlayerApplicationSettingValueText { entries })
        }
        PduId::InformDisplayableCharacterSet => {
            Parsed::complete(Response::InformDisplayableCharacterSet)
        }
        PduId::InformBatteryStatusOfCt => Parsed::complete(Response::InformBatteryStatusOfCt),
        PduId::GetElementAttributes => {
            let count = usize::from(reader.u8()?);
            read_text_list(&mut reader, count, arena, attribute_value)
                .map(|attributes| Response::GetElementAttributes { attributes })
        }
        PduId::GetPlayStatus => {
            let song_length = reader.u32()?;
            let song_position = reader.u32()?;
            let play_status = PlayStatus(reader.u8()?);
            let response = Response::GetPlayStatus { song_length, song_position, play_status };
            checked(response, is_play_status(play_status), "play status")
        }
        PduId::RegisterNotification => {
            parse_notification(&mut reader)?.map(Response::RegisterNotification)
        }
        PduId::AbortContinuingResponse => Parsed::complete(Response::AbortContinuingResponse),
        PduId::SetAbsoluteVolume => {
            Parsed::complete(Response::SetAbsoluteVolume { volume: reader.u8()? & MAX_VOLUME })
        }
        PduId::SetAddressedPlayer | PduId::PlayItem | PduId::AddToNowPlaying => {
            let status = StatusCode(reader.u8()?);
            let response = match (status, pdu) {
                (StatusCode::SUCCESS, PduId::SetAddressedPlayer) => Response::SetAddressedPlayer,
                (StatusCode::SUCCESS, PduId::PlayItem) => Response::PlayItem,
                (StatusCode::SUCCESS, _) => Response::AddToNowPlaying,
                (status, pdu) => Response::Rejected { pdu, status },
            };
            Parsed::complete(response)
        }
        // A continuation arrives under the id of the PDU being continued.
        _ => return Err(CodecError::BadCommand(u8::from(pdu))),
    };

    log_outcome(pdu, &parsed);
    Ok(parsed)
}

fn parse_browse<'a>(header: &Header<'_>, arena: &mut ScratchArena<'a>) -> Result<Parsed<Response<'a>>> {
    let pdu = PduId::for_class(header.id as u8, OpcodeClass::Browse)?;
    let mut reader = WireReader::new(header.payload);

    // Every browsing response leads with its status.
    let status = StatusCode(reader.u8()?);
    if pdu == PduId::GeneralReject || status != StatusCode::SUCCESS {
        debug!(pdu = ?pdu, status = ?status, "Browse response rejected");
        return Ok(Parsed::complete(Response::Rejected { pdu, status }));
    }

    let parsed = match pdu {
        PduId::SetBrowsedPlayer => {
            let uid_counter = reader.u16()?;
            let num_items = reader.u32()?;
            let charset = CharsetId(reader.u16()?);
            let depth = usize::from(reader.u8()?);
            read_text_list(&mut reader, depth, arena, folder_name).map(|folder_path| {
                Response::SetBrowsedPlayer { uid_counter, num_items, charset, folder_path }
            })
        }
        PduId::GetFolderItems => {
            let uid_counter = reader.u16()?;
            let count = usize::from(reader.u16()?);
            read_text_list(&mut reader, count, arena, browse_item)
                .map(|items| Response::GetFolderItems { uid_counter, items })
        }
        PduId::ChangePath => Parsed::complete(Response::ChangePath { num_items: reader.u32()? }),
        PduId::GetItemAttributes => {
            let count = usize::from(reader.u8()?);
            read_text_list(&mut reader, count, arena, attribute_value)
                .map(|attributes| Response::GetItemAttributes { attributes })
        }
        PduId::GetTotalNumberOfItems => Parsed::complete(Response::GetTotalNumberOfItems {
            uid_counter: reader.u16()?,
            num_items: reader.u32()?,
        }),
        PduId::Search => Parsed::complete(Response::Search {
            uid_counter: reader.u16()?,
            num_items: reader.u32()?,
        }),
        _ => return Err(CodecError::BadCommand(u8::from(pdu))),
    };

    log_outcome(pdu, &parsed);
    Ok(parsed)
}

fn log_outcome<T>(pdu: PduId, parsed: &Parsed<T>) {
    match &parsed.error {
        None => debug!(pdu = ?pdu, "Parsed response"),
        Some(error) => warn!(pdu = ?pdu, error = %error, "Partially parsed response"),
    }
}

/// Keeps `value` either way; flags it when a field failed its predicate.
fn checked<T>(value: T, valid: bool, field: &'static str) -> Parsed<T> {
    if valid {
        Parsed::complete(value)
    } else {
        Parsed::partial(value, CodecError::BadParameter(field))
    }
}

fn read_attribute_id(reader: &mut WireReader<'_>) -> Result<PlayerAttributeId> {
    let attribute = PlayerAttributeId(reader.u8()?);
    if !is_player_attribute_id(attribute) {
        return Err(CodecError::BadParameter("player attribute id"));
    }
    Ok(attribute)
}

fn read_setting(reader: &mut WireReader<'_>) -> Result<PlayerSetting> {
    let attribute = read_attribute_id(reader)?;
    let value = reader.u8()?;
    if !is_player_attribute_value_pair(attribute, value) {
        return Err(CodecError::BadParameter("player setting value"));
    }
    Ok(PlayerSetting::new(attribute, value))
}

fn parse_notification(reader: &mut WireReader<'_>) -> Result<Parsed<Notification>> {
    let event_id = EventId(reader.u8()?);
    let notification = match event_id {
        EventId::PLAYBACK_STATUS_CHANGED => {
            let status = PlayStatus(reader.u8()?);
            return Ok(checked(
                Notification::PlaybackStatusChanged(status),
                is_play_status(status),
                "play status",
            ));
        }
        EventId::TRACK_CHANGED => Notification::TrackChanged { identifier: reader.u64()? },
        EventId::TRACK_REACHED_END => Notification::TrackReachedEnd,
        EventId::TRACK_REACHED_START => Notification::TrackReachedStart,
        EventId::PLAYBACK_POS_CHANGED => {
            Notification::PlaybackPosChanged { position: reader.u32()? }
        }
        EventId::BATT_STATUS_CHANGED => {
            let status = BatteryStatus(reader.u8()?);
            return Ok(checked(
                Notification::BatteryStatusChanged(status),
                is_battery_status(status),
                "battery status",
            ));
        }
        EventId::SYSTEM_STATUS_CHANGED => {
            let status = SystemStatus(reader.u8()?);
            return Ok(checked(
                Notification::SystemStatusChanged(status),
                is_system_status(status),
                "system status",
            ));
        }
        EventId::PLAYER_APPLICATION_SETTING_CHANGED => {
            let count = usize::from(reader.u8()?);
            return Ok(read_list(reader, count, read_setting)
                .map(Notification::PlayerApplicationSettingChanged));
        }
        EventId::NOW_PLAYING_CONTENT_CHANGED => Notification::NowPlayingContentChanged,
        EventId::AVAILABLE_PLAYERS_CHANGED => Notification::AvailablePlayersChanged,
        EventId::ADDRESSED_PLAYER_CHANGED => Notification::AddressedPlayerChanged {
            player_id: reader.u16()?,
            uid_counter: reader.u16()?,
        },
        EventId::UIDS_CHANGED => Notification::UidsChanged { uid_counter: reader.u16()? },
        EventId::VOLUME_CHANGED => {
            Notification::VolumeChanged { volume: reader.u8()? & MAX_VOLUME }
        }
        _ => return Err(CodecError::BadParameter("event id")),
    };
    Ok(Parsed::complete(notification))
}

/// Reads `count` entries that carry no text.
fn read_list<'r, T, F>(reader: &mut WireReader<'r>, count: usize, mut read: F) -> Parsed<Vec<T>>
where
    F: FnMut(&mut WireReader<'r>) -> Result<T>,
{
    let mut entries = Vec::with_capacity(count.min(reader.remaining()));
    for index in 0..count {
        match read(reader) {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                warn!(index, count, error = %error, "List ended early");
                return Parsed::partial(entries, error);
            }
        }
    }
    Parsed::complete(entries)
}

/// One text-bearing entry after it went through the arena
enum Entry<T> {
    Whole(T),
    /// The text was cut at the end of the arena
    Cut(T),
    NoRoom,
}

fn entry_from<'a, T>(stored: Stored<'a>, make: impl FnOnce(&'a [u8]) -> T) -> Entry<T> {
    match stored {
        Stored::Complete(text) => Entry::Whole(make(text)),
        Stored::Truncated(text) => Entry::Cut(make(text)),
        Stored::NoRoom => Entry::NoRoom,
    }
}

/// Reads `count` text-bearing entries into the arena, stopping at the first
/// entry the arena cannot hold in full.
fn read_text_list<'r, 'a, T, F>(
    reader: &mut WireReader<'r>,
    count: usize,
    arena: &mut ScratchArena<'a>,
    mut read: F,
) -> Parsed<Vec<T>>
where
    F: FnMut(&mut WireReader<'r>, &mut ScratchArena<'a>) -> Result<Entry<T>>,
{
    let mut entries = Vec::new();
    for index in 0..count {
        match read(reader, arena) {
            Ok(Entry::Whole(entry)) => entries.push(entry),
            Ok(Entry::Cut(entry)) => {
                entries.push(entry);
                let processed = entries.len();
                warn!(processed, count, "Scratch arena full, text truncated");
                return Parsed::partial(entries, CodecError::InternalError { processed });
            }
            Ok(Entry::NoRoom) => {
                let processed = entries.len();
                warn!(processed, count, "Scratch arena full");
                return Parsed::partial(entries, CodecError::InternalError { processed });
            }
            Err(error) => {
                warn!(index, count, error = %error, "List ended early");
                return Parsed::partial(entries, error);
            }
        }
    }
    Parsed::complete(entries)
}

fn setting_text<'a>(
    reader: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<SettingText<'a>>> {
    let fixed = reader.bytes(SettingText::FIXED_LEN)?;
    let mut fields = WireReader::new(fixed);
    let id = fields.u8()?;
    let charset = CharsetId(fields.u16()?);
    let text = reader.bytes(usize::from(fields.u8()?))?;
    Ok(entry_from(arena.store(fixed, text), |text| SettingText { id, charset, text }))
}

fn attribute_value<'a>(
    reader: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<AttributeValue<'a>>> {
    let fixed = reader.bytes(AttributeValue::FIXED_LEN)?;
    let mut fields = WireReader::new(fixed);
    let id = MediaAttributeId(fields.u32()?);
    let charset = CharsetId(fields.u16()?);
    let value = reader.bytes(usize::from(fields.u16()?))?;
    Ok(entry_from(arena.store(fixed, value), |value| AttributeValue { id, charset, value }))
}

fn folder_name<'a>(
    reader: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<FolderName<'a>>> {
    let fixed = reader.bytes(FolderName::FIXED_LEN)?;
    let name = reader.bytes(usize::from(WireReader::new(fixed).u16()?))?;
    Ok(entry_from(arena.store(fixed, name), FolderName))
}

fn browse_item<'a>(
    reader: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<BrowseItem<'a>>> {
    let item_type = ItemType(reader.u8()?);
    let len = usize::from(reader.u16()?);
    let mut record = WireReader::new(reader.bytes(len)?);

    match item_type {
        ItemType::MEDIA_PLAYER => media_player(&mut record, arena),
        ItemType::FOLDER => folder(&mut record, arena),
        ItemType::MEDIA_ELEMENT => media_element(&mut record, arena),
        _ => Err(CodecError::BadParameter("item type")),
    }
}

fn media_player<'a>(
    record: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<BrowseItem<'a>>> {
    let fixed = record.bytes(MediaPlayerItem::FIXED_LEN)?;
    let mut fields = WireReader::new(fixed);
    let player_id = fields.u16()?;
    let major_type = fields.u8()?;
    let sub_type = fields.u32()?;
    let play_status = PlayStatus(fields.u8()?);
    let feature_bit_mask = fields.fixed::<16>()?;
    let charset = CharsetId(fields.u16()?);
    let name = record.bytes(usize::from(fields.u16()?))?;
    if !is_play_status(play_status) {
        return Err(CodecError::BadParameter("play status"));
    }

    Ok(entry_from(arena.store(fixed, name), |name| {
        BrowseItem::MediaPlayer(MediaPlayerItem {
            player_id,
            major_type,
            sub_type,
            play_status,
            feature_bit_mask,
            charset,
            name,
        })
    }))
}

fn folder<'a>(
    record: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<BrowseItem<'a>>> {
    let fixed = record.bytes(FolderItem::FIXED_LEN)?;
    let mut fields = WireReader::new(fixed);
    let uid = fields.u64()?;
    let folder_type = FolderType(fields.u8()?);
    let is_playable = fields.u8()? != 0;
    let charset = CharsetId(fields.u16()?);
    let name = record.bytes(usize::from(fields.u16()?))?;
    if !is_folder_type(folder_type) {
        return Err(CodecError::BadParameter("folder type"));
    }

    Ok(entry_from(arena.store(fixed, name), |name| {
        BrowseItem::Folder(FolderItem { uid, folder_type, is_playable, charset, name })
    }))
}

fn media_element<'a>(
    record: &mut WireReader<'_>,
    arena: &mut ScratchArena<'a>,
) -> Result<Entry<BrowseItem<'a>>> {
    let fixed = record.bytes(MediaElementItem::FIXED_LEN)?;
    let mut fields = WireReader::new(fixed);
    let uid = fields.u64()?;
    let media_type = MediaType(fields.u8()?);
    let charset = CharsetId(fields.u16()?);
    let name = record.bytes(usize::from(fields.u16()?))?;
    let count = usize::from(record.u8()?);
    if !is_media_type(media_type) {
        return Err(CodecError::BadParameter("media type"));
    }

    let stored = arena.store(fixed, name);
    let name = match stored.text() {
        Some(name) => name,
        None => return Ok(Entry::NoRoom),
    };
    let mut item = MediaElementItem { uid, media_type, charset, name, attributes: Vec::new() };
    if !stored.is_complete() {
        return Ok(Entry::Cut(BrowseItem::MediaElement(item)));
    }

    // The item counts as processed once its name is in, even if only some of
    // its attributes fit.
    let attributes = read_text_list(record, count, arena, attribute_value);
    item.attributes = attributes.value;
    match attributes.error {
        None => Ok(Entry::Whole(BrowseItem::MediaElement(item))),
        Some(CodecError::InternalError { .. }) => Ok(Entry::Cut(BrowseItem::MediaElement(item))),
        Some(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OPCODE_VENDOR;

    #[test]
    fn test_rejected_vendor_response_reads_status_only() {
        let data = [0x30, 0x00, 0x00, 0x01, 0x01];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::REJECTED, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(
            parsed.value,
            Response::Rejected { pdu: PduId::GetPlayStatus, status: StatusCode::INVALID_PARAMETER }
        );
    }

    #[test]
    fn test_not_implemented_without_payload() {
        let data = [0x50, 0x00, 0x00, 0x00];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::NOT_IMPLEMENTED, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(parsed.value.status(), StatusCode::INVALID_COMMAND);
    }

    #[test]
    fn test_invalid_play_status_keeps_fixed_fields() {
        let data = [0x30, 0x00, 0x00, 0x09, 0, 0, 0, 10, 0, 0, 0, 5, 0x42];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::STABLE, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(parsed.error, Some(CodecError::BadParameter("play status")));
        assert_eq!(
            parsed.value,
            Response::GetPlayStatus { song_length: 10, song_position: 5, play_status: PlayStatus(0x42) }
        );
    }

    #[test]
    fn test_short_peer_list_returns_prefix() {
        // Count says three values, two are present.
        let data = [0x12, 0x00, 0x00, 0x03, 0x03, 0x01, 0x02];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::STABLE, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert!(matches!(parsed.error, Some(CodecError::BadParameter(_))));
        assert_eq!(parsed.value, Response::ListPlayerApplicationSettingValues { values: vec![1, 2] });
    }

    #[test]
    fn test_invalid_setting_pair_ends_list() {
        // Repeat mode 2 is valid, shuffle mode 9 is not.
        let data = [0x13, 0x00, 0x00, 0x05, 0x02, 0x02, 0x02, 0x03, 0x09];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::STABLE, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(parsed.error, Some(CodecError::BadParameter("player setting value")));
        assert_eq!(
            parsed.value,
            Response::GetCurrentPlayerApplicationSettingValue {
                settings: vec![PlayerSetting::new(PlayerAttributeId::REPEAT_MODE, 2)],
            }
        );
    }

    #[test]
    fn test_invalid_attribute_id_ends_list() {
        let data = [0x11, 0x00, 0x00, 0x04, 0x03, 0x01, 0x05, 0x80];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::STABLE, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(parsed.error, Some(CodecError::BadParameter("player attribute id")));
        assert_eq!(
            parsed.value,
            Response::ListPlayerApplicationSettingAttributes {
                attributes: vec![PlayerAttributeId::EQUALIZER],
            }
        );
    }

    #[test]
    fn test_setting_changed_with_invalid_pair() {
        let data = [0x31, 0x00, 0x00, 0x04, 0x08, 0x01, 0x01, 0x07];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::CHANGED, &data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(parsed.error, Some(CodecError::BadParameter("player setting value")));
        assert_eq!(
            parsed.value,
            Response::RegisterNotification(Notification::PlayerApplicationSettingChanged(vec![]))
        );
    }

    #[test]
    fn test_browse_status_rejects() {
        let data = [0x72, 0x00, 0x01, 0x08];
        let msg = IncomingMessage::browse(&data);
        let mut backing = [0u8; 8];
        let parsed = parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap();
        assert_eq!(parsed.value.status(), StatusCode::NOT_A_DIRECTORY);
    }

    #[test]
    fn test_unknown_opcode_and_pdu() {
        let mut backing = [0u8; 8];
        let msg = IncomingMessage::command(0x30, &[0x10, 0x00, 0x00, 0x00]);
        assert_eq!(
            parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap_err(),
            CodecError::BadCommand(0x30)
        );
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::STABLE, &[0x71, 0, 0, 0]);
        assert_eq!(
            parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap_err(),
            CodecError::BadCommand(0x71)
        );
    }

    #[test]
    fn test_unknown_event_is_bad_parameter() {
        let data = [0x31, 0x00, 0x00, 0x02, 0x20, 0x00];
        let msg = IncomingMessage::response(OPCODE_VENDOR, ResponseCode::CHANGED, &data);
        let mut backing = [0u8; 8];
        assert_eq!(
            parse_response(&msg, &mut ScratchArena::new(&mut backing)).unwrap_err(),
            CodecError::BadParameter("event id")
        );
    }
}
