use mongodb::options::{ReadConcern, ReadPreference, WriteConcern};

/// Sparse configuration applied when opening a database handle.
///
/// Absent fields inherit the client's settings.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    pub read_concern: Option<ReadConcern>,
    pub write_concern: Option<WriteConcern>,
    pub read_preference: Option<ReadPreference>,
}

impl DatabaseConfig {
    /// Creates a configuration with every field absent.
    pub fn new() -> DatabaseConfig {
        DatabaseConfig::default()
    }

    /// Sets the read concern for operations on the database.
    pub fn read_concern(mut self, read_concern: ReadConcern) -> DatabaseConfig {
        self.read_concern = Some(read_concern);
        self
    }

    /// Sets the acknowledgment level required for writes.
    pub fn write_concern(mut self, write_concern: WriteConcern) -> DatabaseConfig {
        self.write_concern = Some(write_concern);
        self
    }

    /// Selects which replica set members serve reads.
    pub fn read_preference(mut self, read_preference: ReadPreference) -> DatabaseConfig {
        self.read_preference = Some(read_preference);
        self
    }
}
