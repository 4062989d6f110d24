// Activity log actions
pub const TRANSACTION_CREATED: &str = "TRANSACTION_CREATED";
pub const TRANSACTION_UPDATED: &str = "TRANSACTION_UPDATED";
pub const TRANSACTION_DELETED: &str = "TRANSACTION_DELETED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const GROUP_DELETED: &str = "GROUP_DELETED";
pub const MEMBER_LEFT: &str = "MEMBER_LEFT";
pub const INVITATION_CREATED: &str = "INVITATION_CREATED";
pub const INVITATION_ACCEPTED: &str = "INVITATION_ACCEPTED";
pub const INVITATION_REJECTED: &str = "INVITATION_REJECTED";
pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";
pub const SETTINGS_UPDATED: &str = "SETTINGS_UPDATED";

pub const INVITATION_TTL_DAYS: i64 = 7;
pub const INVITE_TOKEN_BYTES: usize = 32;
pub const SUGGESTION_CONFIDENCE_THRESHOLD: f64 = 0.5;
pub const RECENT_TRANSACTIONS_LIMIT: usize = 5;
pub const GROWTH_WINDOW_DAYS: i64 = 30;

pub const MIN_DESCRIPTION_LENGTH: usize = 2;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_GROUP_NAME_LENGTH: usize = 100;
pub const MAX_GROUP_DESCRIPTION_LENGTH: usize = 500;
