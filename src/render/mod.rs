mod rtf;

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;
use thiserror::Error;

use crate::friendly_names::FriendlyNames;
use crate::game_log::{
    parse_line, ActorDeathEntry, HostilityEventEntry, LogEntry, ParseError,
    VehicleDestructionEntry,
};
use crate::settings::FailurePolicy;

pub use rtf::escape_rtf;
use rtf::RtfDocument;

const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const NPC_MARKER: &str = "npc";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported log format on line {line_number} ({source}), please report this line: {line}")]
    Line {
        line_number: usize,
        line: String,
        #[source]
        source: ParseError,
    },
}

/// Renders a whole `Game.log` as RTF, with timestamps in the local timezone.
pub fn render_log(
    raw_log: &str,
    names: &FriendlyNames,
    failure_policy: FailurePolicy,
) -> Result<String, RenderError> {
    render_log_in(&Local, raw_log, names, failure_policy)
}

pub fn render_log_in<Tz>(
    timezone: &Tz,
    raw_log: &str,
    names: &FriendlyNames,
    failure_policy: FailurePolicy,
) -> Result<String, RenderError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut renderer = EventStreamRenderer::new(timezone, names, raw_log.len());

    for (index, line) in raw_log.lines().enumerate() {
        let line_number = index + 1;
        match parse_line(line) {
            Ok(Some(entry)) => renderer.push(entry),
            Ok(None) => {}
            Err(source) => match failure_policy {
                FailurePolicy::SkipLine => {
                    tracing::warn!(
                        line_number,
                        parse_error = %source,
                        line,
                        "Skipping unsupported log line, please report it"
                    );
                }
                FailurePolicy::Abort => {
                    return Err(RenderError::Line {
                        line_number,
                        line: line.to_string(),
                        source,
                    });
                }
            },
        }
    }

    Ok(renderer.finish())
}

/// Folds parsed entries into an RTF document.
///
/// Consecutive hostility hits that display the same are collapsed into the
/// first one plus an `(+ N identical events)` counter. Entries must be pushed
/// in log order.
#[derive(Debug)]
pub struct EventStreamRenderer<'a, Tz: TimeZone> {
    timezone: &'a Tz,
    names: &'a FriendlyNames,
    document: RtfDocument,
    pending_hostility: Option<HostilityEventEntry>,
    repeat_count: u32,
}

impl<'a, Tz> EventStreamRenderer<'a, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(timezone: &'a Tz, names: &'a FriendlyNames, size_hint: usize) -> Self {
        Self {
            timezone,
            names,
            document: RtfDocument::with_capacity(size_hint),
            pending_hostility: None,
            repeat_count: 0,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        match entry {
            LogEntry::HostilityEvent(hostility) => self.push_hostility(hostility),
            LogEntry::ActorDeath(death) => {
                self.flush_hostility_run();
                self.write_actor_death(&death);
                self.document.end_paragraph();
            }
            LogEntry::VehicleDestruction(destruction) => {
                self.flush_hostility_run();
                self.write_vehicle_destruction(&destruction);
                self.document.end_paragraph();
            }
        }
    }

    pub fn finish(mut self) -> String {
        self.flush_hostility_run();
        self.document.finish()
    }

    fn push_hostility(&mut self, hostility: HostilityEventEntry) {
        if let Some(pending) = self.pending_hostility.as_ref() {
            if pending.is_display_equal(&hostility) {
                self.repeat_count = self.repeat_count.saturating_add(1);
                return;
            }
            self.flush_hostility_run();
        }

        self.write_hostility(&hostility);
        self.pending_hostility = Some(hostility);
    }

    fn flush_hostility_run(&mut self) {
        if self.pending_hostility.take().is_none() {
            return;
        }

        if self.repeat_count > 0 {
            self.document
                .text(&format!(" (+ {} identical events)", self.repeat_count));
        }
        self.document.end_paragraph();
        self.repeat_count = 0;
    }

    fn write_timestamp(&mut self, timestamp: DateTime<Utc>) {
        let local = timestamp.with_timezone(self.timezone);
        self.document
            .text(&local.format(DISPLAY_TIMESTAMP_FORMAT).to_string())
            .text(" - ");
    }

    fn write_actor_death(&mut self, death: &ActorDeathEntry) {
        let killer = self.names.resolve(&death.killer_name);

        if death.is_backspace() {
            self.write_timestamp(death.timestamp);
            self.document.bold(&killer).text(" backspaced");
            return;
        }

        if mentions_npc(&death.victim_name) {
            self.document.muted();
        }
        self.write_timestamp(death.timestamp);
        self.document
            .bold(&killer)
            .text(" killed ")
            .text(&self.names.resolve(&death.victim_name))
            .text(" with ")
            .text(&self.names.resolve(&death.weapon_name))
            .text(" in ")
            .text(&self.names.resolve(&death.zone));
    }

    fn write_vehicle_destruction(&mut self, destruction: &VehicleDestructionEntry) {
        self.write_timestamp(destruction.timestamp);
        let causer = self.names.resolve(&destruction.caused_by_name);

        if destruction.is_backspace() {
            self.document.bold(&causer).text(" backspaced");
            return;
        }

        self.document
            .bold(&causer)
            .text(" destroyed ")
            .text(&self.names.resolve(&destruction.vehicle_name))
            .text(" of ")
            .text(&self.names.resolve(&destruction.driver_name));

        if !destruction.zone.is_empty() {
            self.document
                .text(" in ")
                .text(&self.names.resolve(&destruction.zone));
        }
    }

    fn write_hostility(&mut self, hostility: &HostilityEventEntry) {
        if mentions_npc(&hostility.source_name) || mentions_npc(&hostility.target_name) {
            self.document.muted();
        }
        self.write_timestamp(hostility.timestamp);
        self.document
            .bold(&self.names.resolve(&hostility.source_name))
            .text(" hit ")
            .text(&self.names.resolve(&hostility.target_name))
            .text(" (child element : ")
            .text(&self.names.resolve(&hostility.child_name))
            .text(")");
    }
}

fn mentions_npc(raw_name: &str) -> bool {
    raw_name.to_lowercase().contains(NPC_MARKER)
}
