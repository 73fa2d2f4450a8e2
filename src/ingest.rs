//! Decoder for csTimer JSON exports.
//!
//! The export is an object whose `session<N>` keys hold arrays of attempt
//! tuples `[[penalty, time], scramble, comment, timestamp]`. Display names and
//! puzzle types live in a JSON string under `properties.sessionData`.

use crate::error::IngestError;
use crate::solve::{Session, Solve, TimeValue};
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

const SESSION_PREFIX: &str = "session";
const DNF_PENALTY: i64 = -1;

/// `[penalty, time, ...]`; multi-phase exports append split times, which are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeData {
    penalty: i64,
    time: i64,
}

impl<'de> Deserialize<'de> for TimeData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimeDataVisitor;

        impl<'de> Visitor<'de> for TimeDataVisitor {
            type Value = TimeData;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a [penalty, time] pair")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TimeData, A::Error> {
                let penalty = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let time = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(TimeData { penalty, time })
            }
        }

        deserializer.deserialize_seq(TimeDataVisitor)
    }
}

/// One attempt exactly as it appears in the export.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttempt {
    pub penalty: i64,
    pub time: i64,
    pub scramble: String,
    pub comment: String,
    pub timestamp: i64,
}

impl<'de> Deserialize<'de> for RawAttempt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttemptVisitor;

        impl<'de> Visitor<'de> for AttemptVisitor {
            type Value = RawAttempt;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an attempt [[penalty, time], scramble, comment, timestamp]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawAttempt, A::Error> {
                let TimeData { penalty, time } = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let scramble = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                // null when the attempt has no comment
                let comment: Option<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                let timestamp = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(3, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(RawAttempt {
                    penalty,
                    time,
                    scramble,
                    comment: comment.unwrap_or_default(),
                    timestamp,
                })
            }
        }

        deserializer.deserialize_seq(AttemptVisitor)
    }
}

impl RawAttempt {
    /// A DNF penalty overrides whatever time was stored alongside it.
    pub fn time_value(&self) -> TimeValue {
        if self.penalty == DNF_PENALTY {
            TimeValue::DNF
        } else {
            TimeValue::from_millis(self.time)
        }
    }

    fn into_solve(self, session: u32, index: usize) -> Solve {
        Solve::new(
            format!("{session}-{index}"),
            self.time_value(),
            self.penalty,
            self.scramble,
            self.comment,
            self.timestamp,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum MetaName {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct MetaOptions {
    #[serde(rename = "scrType", default)]
    scramble_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct SessionMeta {
    #[serde(default)]
    name: Option<MetaName>,
    #[serde(default)]
    opt: Option<MetaOptions>,
}

impl SessionMeta {
    fn display_name(&self, id: u32) -> String {
        match &self.name {
            // csTimer stores the session number itself as the name of unnamed sessions
            Some(MetaName::Number(n)) if n.as_u64() == Some(u64::from(id)) => {
                Session::default_name(id)
            }
            Some(MetaName::Number(n)) => n.to_string(),
            Some(MetaName::Text(s)) => s.clone(),
            None => Session::default_name(id),
        }
    }

    fn scramble_type(&self) -> String {
        self.opt
            .as_ref()
            .and_then(|o| o.scramble_type.clone())
            .unwrap_or_default()
    }
}

/// `session<N>` with N a positive decimal integer.
fn session_number(key: &str) -> Option<u32> {
    let digits = key.strip_prefix(SESSION_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

fn session_metadata(export: &Map<String, Value>) -> HashMap<u32, SessionMeta> {
    let Some(raw) = export
        .get("properties")
        .and_then(|p| p.get("sessionData"))
    else {
        return HashMap::new();
    };

    let Some(text) = raw.as_str() else {
        warn!("sessionData is not a JSON string; using default session names");
        return HashMap::new();
    };

    match serde_json::from_str::<HashMap<String, SessionMeta>>(text) {
        Ok(entries) => entries
            .into_iter()
            .filter_map(|(key, meta)| key.parse::<u32>().ok().map(|id| (id, meta)))
            .collect(),
        Err(err) => {
            warn!(%err, "could not decode sessionData; using default session names");
            HashMap::new()
        }
    }
}

/// Decode an already parsed export. Sessions come back ordered by number,
/// with empty sessions dropped.
pub fn parse_value(export: Value) -> Result<Vec<Session>, IngestError> {
    let Value::Object(map) = export else {
        return Err(IngestError::NotAnObject);
    };

    let metadata = session_metadata(&map);
    let mut sessions = Vec::new();

    for (key, entry) in map {
        let Some(id) = session_number(&key) else {
            continue;
        };

        let attempts: Vec<RawAttempt> = serde_json::from_value(entry)
            .map_err(|source| IngestError::Session {
                key: key.clone(),
                source,
            })?;

        if attempts.is_empty() {
            debug!(session = id, "dropping empty session");
            continue;
        }

        let meta = metadata.get(&id).cloned().unwrap_or_default();
        sessions.push(Session {
            id,
            name: meta.display_name(id),
            scramble_type: meta.scramble_type(),
            solves: attempts
                .into_iter()
                .enumerate()
                .map(|(index, attempt)| attempt.into_solve(id, index))
                .collect(),
        });
    }

    sessions.sort_by_key(|s| s.id);
    debug!(sessions = sessions.len(), "ingested export");
    Ok(sessions)
}

pub fn parse_str(input: &str) -> Result<Vec<Session>, IngestError> {
    let export: Value = serde_json::from_str(input)?;
    parse_value(export)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Session>, IngestError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&text)
}

/// The session list currently under analysis.
///
/// A failed reload leaves the previous sessions in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    sessions: Vec<Session>,
}

impl Dataset {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session(&self, id: u32) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn reload(&mut self, input: &str) -> Result<(), IngestError> {
        self.sessions = parse_str(input)?;
        Ok(())
    }
}
