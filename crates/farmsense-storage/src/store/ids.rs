use snowflake::SnowflakeIdBucket;
use std::sync::Mutex;

/// Hands out animal ids for one store.
///
/// Ids are snowflake values rendered as decimal strings. They are only
/// assigned on insert and never rewritten afterwards.
pub(crate) struct AnimalIdGenerator {
    bucket: Mutex<SnowflakeIdBucket>,
}

impl AnimalIdGenerator {
    pub(crate) fn new(machine_id: i32, node_id: i32) -> Self {
        Self {
            bucket: Mutex::new(SnowflakeIdBucket::new(machine_id, node_id)),
        }
    }

    pub(crate) fn next_id(&self) -> String {
        let mut bucket = self
            .bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        bucket.get_id().to_string()
    }
}
