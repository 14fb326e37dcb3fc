use super::TimeRecord;
use crate::model::{FieldStates, Timestamp};
use std::collections::HashMap;

/// A record that keeps its time attributes in a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    values: HashMap<String, Timestamp>,
    states: FieldStates,
}

impl MemoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style initial value, bypassing any field logic.
    pub fn with_value(mut self, attr: &str, value: Timestamp) -> Self {
        self.values.insert(attr.to_string(), value);
        self
    }
}

impl TimeRecord for MemoryRecord {
    fn read_time(&self, attr: &str) -> Option<Timestamp> {
        self.values.get(attr).copied()
    }

    fn write_time(&mut self, attr: &str, value: Option<Timestamp>) {
        match value {
            Some(v) => {
                self.values.insert(attr.to_string(), v);
            }
            None => {
                self.values.remove(attr);
            }
        }
    }

    fn field_states(&self) -> &FieldStates {
        &self.states
    }

    fn field_states_mut(&mut self) -> &mut FieldStates {
        &mut self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn write_then_read() {
        let mut record = MemoryRecord::new();
        assert_eq!(record.read_time("starts_at"), None);

        record.write_time("starts_at", Some(at(9)));
        assert_eq!(record.read_time("starts_at"), Some(at(9)));

        record.write_time("starts_at", None);
        assert_eq!(record.read_time("starts_at"), None);
    }

    #[test]
    fn with_value_seeds_storage_without_state() {
        let record = MemoryRecord::new().with_value("ends_at", at(17));
        assert_eq!(record.read_time("ends_at"), Some(at(17)));
        assert!(record.field_states().is_empty());
    }

    #[test]
    fn no_named_preparsers_by_default() {
        assert!(MemoryRecord::preparser("anything").is_none());
    }
}
