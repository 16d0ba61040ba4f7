//! Event Log
//!
//! Append-only JSONL log of debate rounds, interactions, moments and team
//! psychology.

use debate_events::{generate_event_id, LoggedEvent, SimEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one [`LoggedEvent`] per line.
pub struct EventLog {
    writer: Option<BufWriter<File>>,
    event_count: u64,
    next_event_id: u64,
}

impl EventLog {
    /// Create a log writing to the specified path, truncating it.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            event_count: 0,
            next_event_id: 1,
        })
    }

    /// Create a log that discards events (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            event_count: 0,
            next_event_id: 1,
        }
    }

    fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Stamps the event with the next ID and writes it.
    pub fn log(&mut self, turn: u32, event: SimEvent) -> std::io::Result<LoggedEvent> {
        let logged = LoggedEvent {
            event_id: self.next_id(),
            turn,
            event,
        };
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = logged.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(logged)
    }

    pub fn log_batch(&mut self, events: Vec<(u32, SimEvent)>) -> std::io::Result<()> {
        for (turn, event) in events {
            self.log(turn, event)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush event log: {}", e);
        }
    }
}

/// Events produced during a turn, waiting to be written.
#[derive(Debug, Clone, Default)]
pub struct PendingEvents {
    events: Vec<(u32, SimEvent)>,
}

impl PendingEvents {
    pub fn push(&mut self, turn: u32, event: SimEvent) {
        self.events.push((turn, event));
    }

    pub fn drain(&mut self) -> Vec<(u32, SimEvent)> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_events::fixtures::{sample_interactions, sample_moment};
    use debate_events::PsychologySnapshot;
    use std::io::BufRead;

    #[test]
    fn test_event_log_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        {
            let mut log = EventLog::new(&path).unwrap();
            log.log(1, SimEvent::Moment(sample_moment())).unwrap();
            for interaction in sample_interactions() {
                log.log(interaction.turn, SimEvent::Interaction(interaction)).unwrap();
            }
            assert_eq!(log.event_count(), 5);
        }

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        let first = LoggedEvent::from_jsonl(&lines[0]).unwrap();
        assert_eq!(first.event_id, "evt_00000001");
        assert!(matches!(first.event, SimEvent::Moment(_)));
        let last = LoggedEvent::from_jsonl(&lines[4]).unwrap();
        assert_eq!(last.event_id, "evt_00000005");
        assert_eq!(last.turn, 3);
    }

    #[test]
    fn test_null_log_counts_only() {
        let mut log = EventLog::null();
        let psych = PsychologySnapshot {
            cohesion: 0.5,
            morale: 0.5,
            coordination: 0.5,
            leadership: 0.5,
        };
        let logged = log.log(0, SimEvent::Psychology(psych)).unwrap();
        assert_eq!(logged.event_id, "evt_00000001");
        assert_eq!(log.event_count(), 1);
        log.flush().unwrap();
    }

    #[test]
    fn test_pending_events_drain() {
        let mut pending = PendingEvents::default();
        pending.push(1, SimEvent::Moment(sample_moment()));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.drain().len(), 1);
        assert!(pending.is_empty());
    }
}
