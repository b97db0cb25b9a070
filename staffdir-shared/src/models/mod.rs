/// Domain models for the account directory
///
/// # Models
///
/// - `account`: The managed [`account::Account`] entity, its enums
///   (`AccountRole`, `JobRole`, `AccountStatus`) and the create/update
///   input structs consumed by the repository port.
pub mod account;

pub use account::{
    Account, AccountChanges, AccountRole, AccountStatus, JobRole, NewAccount,
};
