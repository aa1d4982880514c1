use chrono::{DateTime, Utc};

pub type MessageId = String; // Opaque id assigned by the store on creation
pub type Timestamp = DateTime<Utc>;
