//! # Command Builder
//!
//! This file is part of the AVRCP Codec project.
//!
//! It appends the wire form of a [`Command`] to an opened envelope.
//!
//! Every field is validated before anything is written, so a rejected command
//! leaves the envelope exactly as it was. List commands accumulate: calling
//! the builder again with more entries on the same envelope extends the list.

use tracing::trace;

use crate::core::catalog::{
    is_battery_status, is_capability_id, is_direction, is_event_id, is_group_navigation_id,
    is_media_attribute_id, is_player_attribute_id, is_player_attribute_value_pair, is_scope,
    is_volume, MediaAttributeId, OpcodeClass, PlayerAttributeId, Scope,
};
use crate::core::envelope::Envelope;
use crate::core::wire::{put_bytes, put_u16, put_u32, put_u64, put_u8};
use crate::error::{CodecError, Result};
use crate::protocol::accumulate::{append_entries, start_list, CountField};
use crate::protocol::message::Command;
use crate::protocol::types::{AttributeSelection, PlayerSetting};

/// Appends `cmd` to `env`, which must have been opened for the same PDU.
pub fn encode_command(cmd: &Command<'_>, env: &mut Envelope) -> Result<()> {
    let pdu = cmd.pdu_id()?;
    if env.pdu() != pdu || env.is_response() {
        return Err(CodecError::BadParameter("envelope opened for another PDU"));
    }
    trace!(pdu = ?pdu, "Encoding command");

    match cmd {
        Command::GroupNavigation(id) => {
            // The operation id is the pass-through header; nothing follows it.
            if !is_group_navigation_id(*id) {
                return Err(CodecError::BadParameter("group navigation id"));
            }
            Ok(())
        }
        Command::GetCapabilities { capability_id } => {
            if !is_capability_id(*capability_id) {
                return Err(CodecError::BadParameter("capability id"));
            }
            write_fixed(env, &[capability_id.0])
        }
        Command::ListPlayerApplicationSettingAttributes | Command::GetPlayStatus => {
            write_fixed(env, &[])
        }
        Command::ListPlayerApplicationSettingValues { attribute } => {
            if !is_player_attribute_id(*attribute) {
                return Err(CodecError::BadParameter("player attribute id"));
            }
            write_fixed(env, &[attribute.0])
        }
        Command::GetCurrentPlayerApplicationSettingValue { attributes }
        | Command::GetPlayerApplicationSettingAttributeText { attributes } => {
            encode_attribute_ids(env, attributes)
        }
        Command::SetPlayerApplicationSettingValue { settings } => encode_settings(env, settings),
        Command::GetPlayerApplicationSettingValueText { attribute, values } => {
            encode_value_ids(env, *attribute, values)
        }
        Command::InformDisplayableCharacterSet { charsets } => {
            require_entries(env, charsets.len())?;
            start_list(env, &[0])?;
            append_entries(env, CountField::U8(0), charsets, |charset, out| {
                put_u16(out, charset.0);
                Ok(())
            })
            .map(drop)
        }
        Command::InformBatteryStatusOfCt { status } => {
            if !is_battery_status(*status) {
                return Err(CodecError::BadParameter("battery status"));
            }
            write_fixed(env, &[status.0])
        }
        Command::GetElementAttributes { identifier, attributes } => {
            encode_element_attributes(env, *identifier, attributes)
        }
        Command::RegisterNotification { event_id, interval } => {
            if !is_event_id(*event_id) {
                return Err(CodecError::BadParameter("event id"));
            }
            let mut out = Vec::with_capacity(5);
            put_u8(&mut out, event_id.0);
            put_u32(&mut out, *interval);
            write_fixed(env, &out)
        }
        Command::RequestContinuingResponse { target }
        | Command::AbortContinuingResponse { target } => {
            if target.opcode_class() != OpcodeClass::Vendor {
                return Err(CodecError::BadParameter("continuation target"));
            }
            write_fixed(env, &[u8::from(*target)])
        }
        Command::SetAbsoluteVolume { volume } => {
            if !is_volume(*volume) {
                return Err(CodecError::BadParameter("absolute volume"));
            }
            write_fixed(env, &[*volume])
        }
        Command::SetAddressedPlayer { player_id } | Command::SetBrowsedPlayer { player_id } => {
            write_fixed(env, &player_id.to_be_bytes())
        }
        Command::PlayItem { scope, uid, uid_counter }
        | Command::AddToNowPlaying { scope, uid, uid_counter } => {
            // The player list holds no playable items.
            if !is_scope(*scope) || *scope == Scope::MEDIA_PLAYER_LIST {
                return Err(CodecError::BadParameter("scope"));
            }
            let mut out = Vec::with_capacity(11);
            put_u8(&mut out, scope.0);
            put_u64(&mut out, *uid);
            put_u16(&mut out, *uid_counter);
            write_fixed(env, &out)
        }
        Command::GetFolderItems { scope, start_item, end_item, attributes } => {
            encode_get_folder_items(env, *scope, *start_item, *end_item, attributes)
        }
        Command::ChangePath { uid_counter, direction, folder_uid } => {
            if !is_direction(*direction) {
                return Err(CodecError::BadParameter("direction"));
            }
            let mut out = Vec::with_capacity(11);
            put_u16(&mut out, *uid_counter);
            put_u8(&mut out, direction.0);
            put_u64(&mut out, *folder_uid);
            write_fixed(env, &out)
        }
        Command::GetItemAttributes { scope, uid, uid_counter, attributes } => {
            if !is_scope(*scope) || *scope == Scope::MEDIA_PLAYER_LIST {
                return Err(CodecError::BadParameter("scope"));
            }
            let ids = checked_media_attributes(attributes)?;
            let mut out = Vec::with_capacity(12 + 4 * ids.len());
            put_u8(&mut out, scope.0);
            put_u64(&mut out, *uid);
            put_u16(&mut out, *uid_counter);
            put_u8(&mut out, ids.len() as u8);
            for id in ids {
                put_u32(&mut out, id.0);
            }
            write_fixed(env, &out)
        }
        Command::GetTotalNumberOfItems { scope } => {
            if !is_scope(*scope) {
                return Err(CodecError::BadParameter("scope"));
            }
            write_fixed(env, &[scope.0])
        }
        Command::Search { charset, text } => {
            if text.is_empty() {
                return Err(CodecError::BadParameter("empty search string"));
            }
            let len = u16::try_from(text.len())
                .map_err(|_| CodecError::BadParameter("search string too long"))?;
            let mut out = Vec::with_capacity(4 + text.len());
            put_u16(&mut out, charset.0);
            put_u16(&mut out, len);
            put_bytes(&mut out, text);
            write_fixed(env, &out)
        }
    }
}

/// Writes the complete payload of a non-list PDU.
pub(crate) fn write_fixed(env: &mut Envelope, payload: &[u8]) -> Result<()> {
    if !env.is_fresh() {
        return Err(CodecError::BadParameter("PDU already encoded"));
    }
    env.append(payload)
}

/// A list command must carry entries when it starts a new envelope.
fn require_entries(env: &Envelope, len: usize) -> Result<()> {
    if len == 0 && env.is_fresh() {
        return Err(CodecError::BadParameter("empty list"));
    }
    Ok(())
}

fn encode_attribute_ids(env: &mut Envelope, attributes: &[PlayerAttributeId]) -> Result<()> {
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

fn encode_settings(env: &mut Envelope, settings: &[PlayerSetting]) -> Result<()> {
    require_entries(env, settings.len())?;
    start_list(env, &[0])?;
    append_entries(env, CountField::U8(0), settings, encode_setting).map(drop)
}

pub(crate) fn encode_setting(setting: &PlayerSetting, out: &mut Vec<u8>) -> Result<()> {
    if !is_player_attribute_value_pair(setting.attribute, setting.value) {
        return Err(CodecError::BadParameter("player attribute value pair"));
    }
    put_u8(out, setting.attribute.0);
    put_u8(out, setting.value);
    Ok(())
}

fn encode_value_ids(env: &mut Envelope, attribute: PlayerAttributeId, values: &[u8]) -> Result<()> {
    if !is_player_attribute_id(attribute) {
        return Err(CodecError::BadParameter("player attribute id"));
    }
    require_entries(env, values.len())?;
    if !start_list(env, &[attribute.0, 0])? && env.payload()[0] != attribute.0 {
        return Err(CodecError::BadParameter("attribute differs from envelope"));
    }
    append_entries(env, CountField::U8(1), values, |value, out| {
        if !is_player_attribute_value_pair(attribute, *value) {
            return Err(CodecError::BadParameter("player attribute value"));
        }
        put_u8(out, *value);
        Ok(())
    })
    .map(drop)
}

fn encode_element_attributes(
    env: &mut Envelope,
    identifier: u64,
    attributes: &[MediaAttributeId],
) -> Result<()> {
    let mut prefix = Vec::with_capacity(9);
    put_u64(&mut prefix, identifier);
    put_u8(&mut prefix, 0);
    if !start_list(env, &prefix)? && env.payload()[..8] != prefix[..8] {
        return Err(CodecError::BadParameter("identifier differs from envelope"));
    }
    append_entries(env, CountField::U8(8), attributes, |id, out| {
        if !is_media_attribute_id(*id) {
            return Err(CodecError::BadParameter("media attribute id"));
        }
        put_u32(out, id.0);
        Ok(())
    })
    .map(drop)
}

fn checked_media_attributes(attributes: &[MediaAttributeId]) -> Result<&[MediaAttributeId]> {
    if attributes.len() >= usize::from(AttributeSelection::NOTHING_COUNT) {
        return Err(CodecError::BadParameter("too many attributes"));
    }
    if attributes.iter().any(|id| !is_media_attribute_id(*id)) {
        return Err(CodecError::BadParameter("media attribute id"));
    }
    Ok(attributes)
}

fn encode_get_folder_items(
    env: &mut Envelope,
    scope: Scope,
    start_item: u32,
    end_item: u32,
    attributes: &AttributeSelection,
) -> Result<()> {
    if !is_scope(scope) {
        return Err(CodecError::BadParameter("scope"));
    }
    if start_item > end_item {
        return Err(CodecError::BadParameter("start item after end item"));
    }

    // A zero count means All on the wire
    if matches!(attributes, AttributeSelection::Only(ids) if ids.is_empty()) {
        return Err(CodecError::BadParameter("empty attribute selection"));
    }

    let ids: &[MediaAttributeId] = match (scope, attributes) {
        (_, AttributeSelection::Only(ids)) if scope != Scope::MEDIA_PLAYER_LIST => {
            checked_media_attributes(ids)?
        }
        _ => &[],
    };
    // Media players have no attributes; the list is replaced by the sentinel.
    let count = match (scope, attributes) {
        (Scope::MEDIA_PLAYER_LIST, _) | (_, AttributeSelection::Nothing) => {
            AttributeSelection::NOTHING_COUNT
        }
        (_, AttributeSelection::All) => AttributeSelection::ALL_COUNT,
        (_, AttributeSelection::Only(_)) => ids.len() as u8,
    };

    let mut out = Vec::with_capacity(10 + 4 * ids.len());
    put_u8(&mut out, scope.0);
    put_u32(&mut out, start_item);
    put_u32(&mut out, end_item);
    put_u8(&mut out, count);
    for id in ids {
        put_u32(&mut out, id.0);
    }
    write_fixed(env, &out)
}
