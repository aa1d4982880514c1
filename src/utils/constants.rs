//Session identity
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

//Validation
pub const MAX_MESSAGE_CHARS: usize = 500;

//Channel capacities
pub const COMMAND_CHANNEL_CAPACITY: usize = 100;
pub const EVENT_CHANNEL_CAPACITY: usize = 100;
pub const SNAPSHOT_BUFFER: usize = 64;
