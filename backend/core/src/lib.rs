pub mod error;
pub mod permissions;
pub mod query;
pub mod traits;
pub mod types;

pub use error::ActivityError;
pub use permissions::{
    PermissionCatalog, PermissionEntry, StaticAuthorizer, PERM_ADMIN, PERM_VIEW_ONLINE,
    PERM_VIEW_PROFILE, PERM_VIEW_STATS,
};
pub use query::{JoinClause, SelectQuery};
pub use traits::{ActivityStore, Authorizer, CacheService, DateFormatter, DateMode, LangArg, Localizer};
pub use types::{
    ActivityCounts, Capabilities, ClassificationTally, HideBots, RelativeDates, RevealedHidden,
    UserSession, UserType, ViewerContext, Window, ANONYMOUS_USER_ID, USER_TYPE_IGNORE,
};
