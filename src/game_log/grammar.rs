use chrono::{DateTime, Utc};

use super::cursor::LineCursor;
use super::entry::{ActorDeathEntry, HostilityEventEntry, VehicleDestructionEntry};
use super::error::{ParseError, ParseResult};
use super::vector::parse_position_and_velocity;

const HOSTILITY_SOURCE_MARKER: &str = " FROM ";
const HOSTILITY_TARGET_MARKER: &str = " TO ";
const HOSTILITY_CHILD_MARKER: &str = " child ";

/// `Vehicle 'NAME' [ID] in zone 'ZONE' [pos VEC] driven by 'NAME' [ID]
/// advanced from destroy level N to N caused by 'NAME' [ID] with 'CAUSE'
/// [TEAM][CATEGORY]`
pub fn parse_vehicle_destruction(
    body: &str,
    timestamp: DateTime<Utc>,
) -> ParseResult<VehicleDestructionEntry> {
    let mut cursor = LineCursor::new(body);

    let vehicle_name = cursor.take_between("Vehicle '", "'")?;
    let vehicle_id = cursor.take_between("[", "]")?;
    let zone = cursor.take_between("in zone '", "'")?;
    let (position, velocity) = parse_position_and_velocity(cursor.take_between("[pos ", "]")?)?;

    let driver_name = cursor.take_between("driven by '", "'")?;
    let driver_id = cursor.take_between("[", "]")?;

    let from_level = parse_level(cursor.take_between("advanced from destroy level ", " ")?)?;
    let to_level = parse_level(cursor.take_between("to ", " ")?)?;

    let caused_by_name = cursor.take_between("caused by '", "'")?;
    let caused_by_id = cursor.take_between("[", "]")?;

    // The quoted cause after `with` duplicates the category tag.
    cursor.take_between("with '", "'")?;
    let cause_tag_team = cursor.take_between("[", "]")?;
    let cause_tag_category = cursor.take_between("[", "]")?;

    Ok(VehicleDestructionEntry {
        timestamp,
        vehicle_name: vehicle_name.to_string(),
        vehicle_id: vehicle_id.to_string(),
        zone: zone.to_string(),
        position,
        velocity,
        driver_name: driver_name.to_string(),
        driver_id: driver_id.to_string(),
        from_level,
        to_level,
        caused_by_name: caused_by_name.to_string(),
        caused_by_id: caused_by_id.to_string(),
        cause_tag_team: cause_tag_team.to_string(),
        cause_tag_category: cause_tag_category.to_string(),
    })
}

/// `CActor::Kill: 'VICTIM' [ID] in zone 'ZONE' killed by 'KILLER' [ID] using
/// 'WEAPON' [Class ...] with damage type 'TYPE' from direction VEC [TAG][TAG]`
///
/// The `[Class ...]` block is missing from older builds of the game.
pub fn parse_actor_death(body: &str, timestamp: DateTime<Utc>) -> ParseResult<ActorDeathEntry> {
    let mut cursor = LineCursor::new(body);

    let victim_name = cursor.take_between("Kill: '", "'")?;
    let victim_id = cursor.take_between("[", "]")?;
    let zone = cursor.take_between("in zone '", "'")?;

    let killer_name = cursor.take_between("killed by '", "'")?;
    let killer_id = cursor.take_between("[", "]")?;

    let weapon_name = cursor.take_between("using '", "'")?;
    if cursor.remaining().trim_start().starts_with("[Class") {
        cursor.skip_past("]")?;
    }

    let damage_type = cursor.take_between("with damage type '", "'")?;

    let (direction, _) = parse_position_and_velocity(cursor.peek_between("direction ", "[")?)?;
    let team_tag_1 = cursor.take_between("[", "]")?;
    let team_tag_2 = cursor.take_between("[", "]")?;

    Ok(ActorDeathEntry {
        timestamp,
        victim_name: victim_name.to_string(),
        victim_id: victim_id.to_string(),
        zone: zone.to_string(),
        killer_name: killer_name.to_string(),
        killer_id: killer_id.to_string(),
        weapon_name: weapon_name.to_string(),
        damage_type: damage_type.to_string(),
        direction,
        team_tag_1: team_tag_1.to_string(),
        team_tag_2: team_tag_2.to_string(),
    })
}

/// `[OnHandleHit] Fake hit FROM SOURCE TO TARGET. Being sent to child CHILD
/// [TAG][TAG]`
///
/// Only the `FROM`/`TO` pair is required. Child and tags are filled with
/// empty strings when the game leaves them out.
pub fn parse_hostility_event(
    body: &str,
    timestamp: DateTime<Utc>,
) -> ParseResult<HostilityEventEntry> {
    let mut cursor = LineCursor::new(body);

    let source_name = cursor.take_between(HOSTILITY_SOURCE_MARKER, HOSTILITY_TARGET_MARKER)?;
    let after_target_marker = cursor.remaining();

    let (target_name, after_target) = match after_target_marker.split_once('.') {
        Some((target, rest)) => (target, Some(rest)),
        None => (after_target_marker, None),
    };
    let child_name = after_target.map(extract_child_name).unwrap_or_default();
    let (tag_1, tag_2) = extract_trailing_tags(after_target_marker);

    Ok(HostilityEventEntry {
        timestamp,
        source_name: source_name.trim().to_string(),
        target_name: target_name.trim().to_string(),
        child_name: child_name.to_string(),
        tag_1: tag_1.to_string(),
        tag_2: tag_2.to_string(),
    })
}

fn parse_level(token: &str) -> ParseResult<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::MalformedInteger(token.to_string()))
}

fn extract_child_name(text: &str) -> &str {
    let Some((_, child_onwards)) = text.split_once(HOSTILITY_CHILD_MARKER) else {
        return "";
    };

    let end = child_onwards
        .find([' ', '[', '.'])
        .unwrap_or(child_onwards.len());
    &child_onwards[..end]
}

/// Scans from the end of `text` for up to two `[...]` groups and returns them
/// in reading order. A single group lands in the first slot.
// Only the text after ` TO ` is passed in, so the leading `[OnHandleHit]`
// marker is never read as a tag on lines that carry a single trailing group.
fn extract_trailing_tags(text: &str) -> (&str, &str) {
    let Some((last, before_last)) = last_bracket_group(text) else {
        return ("", "");
    };

    match last_bracket_group(before_last) {
        Some((previous, _)) => (previous, last),
        None => (last, ""),
    }
}

fn last_bracket_group(text: &str) -> Option<(&str, &str)> {
    let close = text.rfind(']')?;
    let open = text[..close].rfind('[')?;
    Some((&text[open + 1..close], &text[..open]))
}
