//! # Response Builder
//!
//! This file is part of the AVRCP Codec project.
//!
//! It appends the wire form of a [`Response`] to an opened envelope.
//!
//! ## Responsibilities
//! - Write rejections as a single status byte in place of the payload
//! - Encode each notification shape under its event id
//! - Accumulate list responses across calls, keeping the count and the
//!   parameter length in step after every entry
//! - Encode browsing items with their item header and record length

use tracing::trace;

use crate::core::catalog::{
    is_event_id, is_folder_type, is_group_navigation_id, is_media_attribute_id,
    is_media_type, is_play_status, is_player_attribute_id, is_system_status, is_volume,
    is_battery_status, CapabilityId, StatusCode,
};
use crate::core::envelope::Envelope;
use crate::core::wire::{put_bytes, put_company_id, put_u16, put_u32, put_u64, put_u8};
use crate::error::{CodecError, Result};
use crate::protocol::accumulate::{append_entries, start_list, CountField};
use crate::protocol::command::{encode_setting, write_fixed};
use crate::protocol::message::Response;
use crate::protocol::types::{
    AttributeValue, BrowseItem, Capabilities, FolderName, Notification, SettingText,
};

/// Appends `rsp` to `env`, which must have been opened as a response for the
/// same PDU.
pub fn encode_response(rsp: &Response<'_>, env: &mut Envelope) -> Result<()> {
    let pdu = rsp.pdu_id()?;
    if env.pdu() != pdu || !env.is_response() {
        return Err(CodecError::BadParameter("envelope opened for another PDU"));
    }
    if env.is_rejection() {
        return Err(CodecError::BadParameter("envelope holds a rejection"));
    }
    trace!(pdu = ?pdu, "Encoding response");

    match rsp {
        Response::Rejected { status, .. } => {
            if *status == StatusCode::SUCCESS {
                return Err(CodecError::BadParameter("rejection with success status"));
            }
            env.write_rejection(*status)
        }
        Response::GroupNavigation(id) => {
            if !is_group_navigation_id(*id) {
                return Err(CodecError::BadParameter("group navigation id"));
            }
            Ok(())
        }
        Response::GetCapabilities(capabilities) => encode_capabilities(env, capabilities),
        Response::ListPlayerApplicationSettingAttributes { attributes } => {
            require_entries(env, attributes.len())?;
            start_list(env, &[0])?;
            append_entries(env, CountField::U8(0), attributes, |attribute, out| {
                if !is_player_attribute_id(*attribute) {
                    return Err(CodecError::BadParameter("player attribute id"));
                }
                put_u8(out, attribute.0);
                Ok(())
            })
            .map(drop)
        }
        Response::ListPlayerApplicationSettingValues { values } => {
            require_entries(env, values.len())?;
            start_list(env, &[0])?;
            append_entries(env, CountField::U8(0), values, |value, out| {
                put_u8(out, *value);
                Ok(())
            })
            .map(drop)
        }
        Response::GetCurrentPlayerApplicationSettingValue { settings } => {
            require_entries(env, settings.len())?;
            start_list(env, &[0])?;
            append_entries(env, CountField::U8(0), settings, encode_setting).map(drop)
        }
        Response::GetPlayerApplicationSettingAttributeText { entries }
        | Response::GetPlayerApplicationSettingValueText { entries } => {
            require_entries(env, entries.len())?;
            start_list(env, &[0])?;
            append_entries(env, CountField::U8(0), entries, encode_setting_text).map(drop)
        }
        Response::SetPlayerApplicationSettingValue
        | Response::InformDisplayableCharacterSet
        | Response::InformBatteryStatusOfCt
        | Response::AbortContinuingResponse => write_fixed(env, &[]),
        Response::GetElementAttributes { attributes } => {
            require_entries(env, attributes.len())?;
            start_list(env, &[0])?;
            append_entries(env, CountField::U8(0), attributes, encode_attribute_value).map(drop)
        }
        Response::GetPlayStatus { song_length, song_position, play_status } => {
            if !is_play_status(*play_status) {
                return Err(CodecError::BadParameter("play status"));
            }
            let mut out = Vec::with_capacity(9);
            put_u32(&mut out, *song_length);
            put_u32(&mut out, *song_position);
            put_u8(&mut out, play_status.0);
            write_fixed(env, &out)
        }
        Response::RegisterNotification(notification) => {
            let mut out = Vec::new();
            encode_notification(notification, &mut out)?;
            write_fixed(env, &out)
        }
        Response::SetAbsoluteVolume { volume } => {
            if !is_volume(*volume) {
                return Err(CodecError::BadParameter("absolute volume"));
            }
            write_fixed(env, &[*volume])
        }
        Response::SetAddressedPlayer | Response::PlayItem | Response::AddToNowPlaying => {
            write_fixed(env, &[StatusCode::SUCCESS.0])
        }
        Response::SetBrowsedPlayer { uid_counter, num_items, charset, folder_path } => {
            let mut prefix = Vec::with_capacity(10);
            put_u8(&mut prefix, StatusCode::SUCCESS.0);
            put_u16(&mut prefix, *uid_counter);
            put_u32(&mut prefix, *num_items);
            put_u16(&mut prefix, charset.0);
            put_u8(&mut prefix, 0);
            if !start_list(env, &prefix)? && env.payload()[..9] != prefix[..9] {
                return Err(CodecError::BadParameter("browsed player fields differ from envelope"));
            }
            append_entries(env, CountField::U8(9), folder_path, encode_folder_name).map(drop)
        }
        Response::GetFolderItems { uid_counter, items } => {
            require_entries(env, items.len())?;
            let mut prefix = Vec::with_capacity(5);
            put_u8(&mut prefix, StatusCode::SUCCESS.0);
            put_u16(&mut prefix, *uid_counter);
            put_u16(&mut prefix, 0);
            if !start_list(env, &prefix)? && env.payload()[..3] != prefix[..3] {
                return Err(CodecError::BadParameter("uid counter differs from envelope"));
            }
            append_entries(env, CountField::U16(3), items, encode_browse_item).map(drop)
        }
        Response::ChangePath { num_items } => {
            let mut out = Vec::with_capacity(5);
            put_u8(&mut out, StatusCode::SUCCESS.0);
            put_u32(&mut out, *num_items);
            write_fixed(env, &out)
        }
        Response::GetItemAttributes { attributes } => {
            require_entries(env, attributes.len())?;
            start_list(env, &[StatusCode::SUCCESS.0, 0])?;
            append_entries(env, CountField::U8(1), attributes, encode_attribute_value).map(drop)
        }
        Response::GetTotalNumberOfItems { uid_counter, num_items }
        | Response::Search { uid_counter, num_items } => {
            let mut out = Vec::with_capacity(7);
            put_u8(&mut out, StatusCode::SUCCESS.0);
            put_u16(&mut out, *uid_counter);
            put_u32(&mut out, *num_items);
            write_fixed(env, &out)
        }
    }
}

fn require_entries(env: &Envelope, len: usize) -> Result<()> {
    if len == 0 && env.is_fresh() {
        return Err(CodecError::BadParameter("empty list"));
    }
    Ok(())
}

fn encode_capabilities(env: &mut Envelope, capabilities: &Capabilities) -> Result<()> {
    let (capability_id, len) = match capabilities {
        Capabilities::CompanyIds(ids) => (CapabilityId::COMPANY_ID, ids.len()),
        Capabilities::Events(events) => (CapabilityId::EVENTS_SUPPORTED, events.len()),
    };
    require_entries(env, len)?;
    if !start_list(env, &[capability_id.0, 0])? && env.payload()[0] != capability_id.0 {
        return Err(CodecError::BadParameter("capability id differs from envelope"));
    }

    let appended = match capabilities {
        Capabilities::CompanyIds(ids) => {
            append_entries(env, CountField::U8(1), ids, |id, out| {
                if *id > 0x00FF_FFFF {
                    return Err(CodecError::BadParameter("company id wider than 24 bits"));
                }
                put_company_id(out, *id);
                Ok(())
            })
        }
        Capabilities::Events(events) => {
            append_entries(env, CountField::U8(1), events, |event, out| {
                if !is_event_id(*event) {
                    return Err(CodecError::BadParameter("event id"));
                }
                put_u8(out, event.0);
                Ok(())
            })
        }
    };
    appended.map(drop)
}

fn encode_setting_text(entry: &SettingText<'_>, out: &mut Vec<u8>) -> Result<()> {
    let len =
        u8::try_from(entry.text.len()).map_err(|_| CodecError::BadParameter("text too long"))?;
    put_u8(out, entry.id);
    put_u16(out, entry.charset.0);
    put_u8(out, len);
    put_bytes(out, entry.text);
    Ok(())
}

pub(crate) fn encode_attribute_value(value: &AttributeValue<'_>, out: &mut Vec<u8>) -> Result<()> {
    if !is_media_attribute_id(value.id) {
        return Err(CodecError::BadParameter("media attribute id"));
    }
    let len = u16::try_from(value.value.len())
        .map_err(|_| CodecError::BadParameter("attribute value too long"))?;
    put_u32(out, value.id.0);
    put_u16(out, value.charset.0);
    put_u16(out, len);
    put_bytes(out, value.value);
    Ok(())
}

fn encode_folder_name(name: &FolderName<'_>, out: &mut Vec<u8>) -> Result<()> {
    let len =
        u16::try_from(name.0.len()).map_err(|_| CodecError::BadParameter("folder name too long"))?;
    put_u16(out, len);
    put_bytes(out, name.0);
    Ok(())
}

fn name_len(name: &[u8]) -> Result<u16> {
    u16::try_from(name.len()).map_err(|_| CodecError::BadParameter("item name too long"))
}

fn encode_browse_item(item: &BrowseItem<'_>, out: &mut Vec<u8>) -> Result<()> {
    let record_len = u16::try_from(item.record_len())
        .map_err(|_| CodecError::BadParameter("item record too long"))?;
    put_u8(out, item.item_type().0);
    put_u16(out, record_len);

    match item {
        BrowseItem::MediaPlayer(player) => {
            if !is_play_status(player.play_status) {
                return Err(CodecError::BadParameter("play status"));
            }
            put_u16(out, player.player_id);
            put_u8(out, player.major_type);
            put_u32(out, player.sub_type);
            put_u8(out, player.play_status.0);
            put_bytes(out, &player.feature_bit_mask);
            put_u16(out, player.charset.0);
            put_u16(out, name_len(player.name)?);
            put_bytes(out, player.name);
        }
        BrowseItem::Folder(folder) => {
            if !is_folder_type(folder.folder_type) {
                return Err(CodecError::BadParameter("folder type"));
            }
            put_u64(out, folder.uid);
            put_u8(out, folder.folder_type.0);
            put_u8(out, u8::from(folder.is_playable));
            put_u16(out, folder.charset.0);
            put_u16(out, name_len(folder.name)?);
            put_bytes(out, folder.name);
        }
        BrowseItem::MediaElement(element) => {
            if !is_media_type(element.media_type) {
                return Err(CodecError::BadParameter("media type"));
            }
            let count = u8::try_from(element.attributes.len())
                .map_err(|_| CodecError::BadParameter("too many attributes"))?;
            put_u64(out, element.uid);
            put_u8(out, element.media_type.0);
            put_u16(out, element.charset.0);
            put_u16(out, name_len(element.name)?);
            put_bytes(out, element.name);
            put_u8(out, count);
            // An item is all or nothing, so one bad attribute drops the item.
            for attribute in &element.attributes {
                encode_attribute_value(attribute, out)?;
            }
        }
    }
    Ok(())
}

fn encode_notification(notification: &Notification, out: &mut Vec<u8>) -> Result<()> {
    put_u8(out, notification.event_id().0);
    match notification {
        Notification::PlaybackStatusChanged(status) => {
            if !is_play_status(*status) {
                return Err(CodecError::BadParameter("play status"));
            }
            put_u8(out, status.0);
        }
        Notification::TrackChanged { identifier } => put_u64(out, *identifier),
        Notification::TrackReachedEnd
        | Notification::TrackReachedStart
        | Notification::NowPlayingContentChanged
        | Notification::AvailablePlayersChanged => {}
        Notification::PlaybackPosChanged { position } => put_u32(out, *position),
        Notification::BatteryStatusChanged(status) => {
            if !is_battery_status(*status) {
                return Err(CodecError::BadParameter("battery status"));
            }
            put_u8(out, status.0);
        }
        Notification::SystemStatusChanged(status) => {
            if !is_system_status(*status) {
                return Err(CodecError::BadParameter("system status"));
            }
            put_u8(out, status.0);
        }
        Notification::PlayerApplicationSettingChanged(settings) => {
            if settings.is_empty() {
                return Err(CodecError::BadParameter("empty list"));
            }
            let count = u8::try_from(settings.len())
                .map_err(|_| CodecError::BadParameter("too many settings"))?;
            put_u8(out, count);
            for setting in settings {
                encode_setting(setting, out)?;
            }
        }
        Notification::AddressedPlayerChanged { player_id, uid_counter } => {
            put_u16(out, *player_id);
            put_u16(out, *uid_counter);
        }
        Notification::UidsChanged { uid_counter } => put_u16(out, *uid_counter),
        Notification::VolumeChanged { volume } => {
            if !is_volume(*volume) {
                return Err(CodecError::BadParameter("absolute volume"));
            }
            put_u8(out, *volume);
        }
    }
    Ok(())
}
