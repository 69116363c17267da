//! Users, authentication, and favorite-office membership.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    AuthToken, NewUserProfile, NewUserRecord, UserChanges, UserId, UserRecord, UserRole,
    UserUpdate, UserView,
};
pub use repository::{FavoriteChange, FavoriteRepository, RegistrationConflict, UserRepository};
pub use router::identity_router;
pub use service::{
    bootstrap_admin, FavoriteAddOutcome, FavoriteLookupError, FavoriteRemoveOutcome,
    IdentityError, IdentityService, LoginOutcome, RegistrationOutcome,
};
