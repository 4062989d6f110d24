pub mod audit;
pub mod group;
pub mod invitation;
pub mod transaction;
pub mod user;

pub use audit::AppLog;
pub use group::{Group, GroupMember, Role};
pub use invitation::{GroupInvitation, InvitationStatus};
pub use transaction::{
    Category, Currency, NewTransaction, OwnerScope, Transaction, TransactionItem, TransactionPatch, TransactionType,
};
pub use user::{AuthUser, NotificationSettings, ProfileUpdate, UserProfile, UserSettings};
