mod cursor;
mod entry;
mod error;
mod grammar;
mod timestamp;
mod vector;

pub use cursor::LineCursor;
pub use entry::{
    ActorDeathEntry, EventKind, HostilityEventEntry, LogEntry, Vec3, VehicleDestructionEntry,
};
pub use error::{ParseError, ParseResult};
pub use timestamp::parse_log_timestamp;
pub use vector::parse_position_and_velocity;

pub(crate) const TAG_VEHICLE_DESTRUCTION: &str = "Vehicle Destruction";
pub(crate) const TAG_ACTOR_DEATH: &str = "Actor Death";
pub(crate) const TAG_HOSTILITY_EVENTS: &str = "Debug Hostility Events";

/// Parses one `Game.log` line.
///
/// Returns `Ok(None)` for anything that is not an event line we model: blank
/// lines, lines that do not open with `<`, lines without an event tag, and
/// the many event tags the game writes that carry no combat information.
/// Errors are reserved for recognized tags whose body does not match the
/// expected layout.
pub fn parse_line(line: &str) -> ParseResult<Option<LogEntry>> {
    if line.trim().is_empty() || !line.starts_with('<') {
        return Ok(None);
    }

    let Some(timestamp_end) = line.find('>') else {
        return Err(ParseError::MalformedTimestamp(line[1..].to_string()));
    };
    let timestamp = parse_log_timestamp(&line[1..timestamp_end])?;

    let after_timestamp = &line[timestamp_end + 1..];
    let Some((event_tag, body)) = split_event_tag(after_timestamp) else {
        return Ok(None);
    };
    let body = body.trim_start();

    let entry = match event_tag {
        TAG_VEHICLE_DESTRUCTION => {
            LogEntry::VehicleDestruction(grammar::parse_vehicle_destruction(body, timestamp)?)
        }
        TAG_ACTOR_DEATH => LogEntry::ActorDeath(grammar::parse_actor_death(body, timestamp)?),
        TAG_HOSTILITY_EVENTS => {
            LogEntry::HostilityEvent(grammar::parse_hostility_event(body, timestamp)?)
        }
        _ => return Ok(None),
    };

    Ok(Some(entry))
}

fn split_event_tag(text: &str) -> Option<(&str, &str)> {
    let tag_start = text.find('<')? + 1;
    let tag_length = text[tag_start..].find('>')?;
    let tag_end = tag_start + tag_length;
    Some((&text[tag_start..tag_end], &text[tag_end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::{parse_line, EventKind, LogEntry, ParseError};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn build_line(event_tag: &str, body: &str) -> String {
        format!("<2025-06-20T23:50:29.843Z> [Notice] <{event_tag}> {body}")
    }

    #[test]
    fn routes_each_known_tag_to_its_grammar() {
        let vehicle = build_line(
            "Vehicle Destruction",
            "CVehicle::OnAdvanceDestroyLevel: Vehicle 'ANVL_Arrow_1' [1] in zone 'stanton2' [pos x: 1, y: 2, z: 3] driven by 'Pilot' [2] advanced from destroy level 1 to 2 caused by 'Gunner' [3] with 'Combat' [Team_VehicleFeatures][Vehicle]",
        );
        let actor = build_line(
            "Actor Death",
            "CActor::Kill: 'Victim' [1] in zone 'stanton2' killed by 'Killer' [2] using 'Rifle_7' with damage type 'Bullet' from direction x: 0, y: 0, z: 1 [Team_ActorTech][Actor]",
        );
        let hostility = build_line(
            "Debug Hostility Events",
            "[OnHandleHit] Fake hit FROM Alpha TO Bravo. Being sent to child Bravo [Team_MissionFeatures][HitDetection]",
        );

        for (line, kind) in [
            (vehicle, EventKind::VehicleDestruction),
            (actor, EventKind::ActorDeath),
            (hostility, EventKind::HostilityEvent),
        ] {
            let entry = parse_line(&line).unwrap().expect("known tag should parse");
            assert_eq!(entry.kind(), kind);
            assert_eq!(
                entry.timestamp(),
                Utc.with_ymd_and_hms(2025, 6, 20, 23, 50, 29).unwrap()
                    + chrono::Duration::milliseconds(843)
            );
        }
    }

    #[test]
    fn extracted_fields_are_verbatim_substrings() {
        let line = build_line(
            "Actor Death",
            "CActor::Kill: 'Rydianna' [326852421041] in zone 'MISC_Starlancer_TAC_4528531523558' killed by 'WhatIdo' [202153873895] using 'HRST_LaserBeam_Bespoke_4510244335981' [Class unknown] with damage type 'VehicleDestruction' from direction x: 0.000000, y: 0.000000, z: 0.000000 [Team_ActorTech][Actor]",
        );
        let Some(LogEntry::ActorDeath(entry)) = parse_line(&line).unwrap() else {
            panic!("expected an actor death entry");
        };

        let rebuilt = format!(
            "Kill: '{}' [{}] in zone '{}' killed by '{}' [{}] using '{}'",
            entry.victim_name,
            entry.victim_id,
            entry.zone,
            entry.killer_name,
            entry.killer_id,
            entry.weapon_name
        );
        assert!(line.contains(&rebuilt));
        assert!(line.contains(&format!("with damage type '{}'", entry.damage_type)));
        assert!(line.ends_with(&format!("[{}][{}]", entry.team_tag_1, entry.team_tag_2)));
    }

    #[test]
    fn rejects_lines_that_are_not_event_lines() {
        for line in [
            "",
            "   ",
            "Log started on 06/20/25",
            " <2025-06-20T23:50:29.843Z> [Notice] <Actor Death> leading space",
            "<2025-06-20T23:50:29.843Z> Loading screen closed",
        ] {
            assert_eq!(parse_line(line), Ok(None), "line {line:?} should be skipped");
        }
    }

    #[test]
    fn skips_unmodeled_event_tags() {
        let line = build_line("Join PU", "address[35.186.163.47] port[64320] shard[pub_euw1b]");
        assert_eq!(parse_line(&line), Ok(None));
    }

    #[test]
    fn bad_timestamp_is_a_hard_failure() {
        assert_eq!(
            parse_line("<yesterday> [Notice] <Actor Death> whatever"),
            Err(ParseError::MalformedTimestamp("yesterday".to_string()))
        );
        assert!(matches!(
            parse_line("<2025-06-20T23:50:29.843Z"),
            Err(ParseError::MalformedTimestamp(_))
        ));
    }

    #[test]
    fn recognized_tag_with_unexpected_body_is_an_error() {
        let line = build_line("Vehicle Destruction", "Vehicle 'Cutter' without an id");
        assert!(matches!(
            parse_line(&line),
            Err(ParseError::DelimiterNotFound(_))
        ));
    }
}
