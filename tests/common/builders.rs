//! Test data builders for creating test objects

use flowvis_rs::{Dataset, FlowRecord};

/// Builder for creating test FlowRecords
pub struct FlowRecordBuilder {
    source: String,
    target: String,
    time: i64,
    value: f64,
    source_tag: Option<String>,
    target_tag: Option<String>,
    attribute: Option<String>,
}

impl FlowRecordBuilder {
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            time: 20151,
            value: 1.0,
            source_tag: None,
            target_tag: None,
            attribute: None,
        }
    }

    pub fn time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn source_tag(mut self, tags: &str) -> Self {
        self.source_tag = Some(tags.to_string());
        self
    }

    pub fn target_tag(mut self, tags: &str) -> Self {
        self.target_tag = Some(tags.to_string());
        self
    }

    pub fn attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }

    pub fn build(self) -> FlowRecord {
        let mut record = FlowRecord::new(self.source, self.target, self.time, self.value)
            .expect("builder values are finite");
        if let Some(tags) = self.source_tag {
            record = record.with_source_tag(tags);
        }
        if let Some(tags) = self.target_tag {
            record = record.with_target_tag(tags);
        }
        if let Some(attribute) = self.attribute {
            record = record.with_attribute(attribute);
        }
        record
    }
}

/// Two quarters of payments from three entities to three media outlets.
///
/// Totals per entity over both quarters: Ministry A 150, Bank B 90, City C 10.
pub fn sample_dataset() -> Dataset {
    vec![
        FlowRecordBuilder::new("Ministry A", "Daily News")
            .time(20151)
            .value(100.0)
            .attribute("2")
            .source_tag("federal")
            .target_tag("print")
            .build(),
        FlowRecordBuilder::new("Ministry A", "Radio One")
            .time(20152)
            .value(50.0)
            .attribute("4")
            .target_tag("radio")
            .build(),
        FlowRecordBuilder::new("Bank B", "Daily News")
            .time(20152)
            .value(90.0)
            .attribute("31")
            .build(),
        FlowRecordBuilder::new("City C", "TV Channel")
            .time(20152)
            .value(10.0)
            .attribute("2")
            .source_tag("municipal")
            .target_tag("tv | online")
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_record_builder() {
        let record = FlowRecordBuilder::new("A", "B")
            .time(20163)
            .value(2.5)
            .target_tag("radio")
            .build();

        assert_eq!(record.source_node(), "A");
        assert_eq!(record.time_node().value(), 20163);
        assert_eq!(record.value_node(), 2.5);
        assert_eq!(record.target_tag(), Some("radio"));
        assert_eq!(record.attribute1(), None);
    }
}
