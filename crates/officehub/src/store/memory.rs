//! Serialized in-memory store.
//!
//! Every repository operation takes the single state lock once, which is
//! what makes the check-then-insert paths (registration uniqueness,
//! application uniqueness, favorite membership) and the cascade deletes
//! atomic under concurrent requests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use crate::applications::{
    ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationStatus, SubmissionConflict,
};
use crate::identity::domain::normalize_phone;
use crate::identity::{
    AuthToken, FavoriteChange, FavoriteRepository, NewUserRecord, RegistrationConflict,
    UserChanges, UserId, UserRecord, UserRepository,
};
use crate::offices::domain::normalize_name;
use crate::offices::{
    NewOfficeRecord, OfficeChanges, OfficeId, OfficeRecord, OfficeRepository, OfficeSearch,
};

#[derive(Default)]
struct StoreState {
    users: BTreeMap<UserId, UserRecord>,
    offices: BTreeMap<OfficeId, OfficeRecord>,
    applications: BTreeMap<ApplicationId, ApplicationRecord>,
    favorites: BTreeSet<(UserId, OfficeId)>,
    next_user_id: i64,
    next_office_id: i64,
    next_application_id: i64,
}

/// Process-wide store shared by every service through the repository traits.
#[derive(Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }
}

impl UserRepository for MemoryStore {
    fn insert_user(&self, user: NewUserRecord) -> Result<UserRecord, RegistrationConflict> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RegistrationConflict::DuplicateEmail);
        }
        if state.users.values().any(|u| u.tel == user.tel) {
            return Err(RegistrationConflict::DuplicatePhone);
        }

        state.next_user_id += 1;
        let record = UserRecord {
            id: UserId(state.next_user_id),
            last_name: user.last_name,
            first_name: user.first_name,
            tel: user.tel,
            age: user.age,
            email: user.email,
            password_hash: user.password_hash,
            admin: user.admin,
            blocked: user.blocked,
            token: user.token,
        };
        state.users.insert(record.id, record.clone());
        Ok(record)
    }

    fn user_by_token(&self, token: &AuthToken) -> Option<UserRecord> {
        let state = self.lock();
        state.users.values().find(|u| &u.token == token).cloned()
    }

    fn user_by_id(&self, id: UserId) -> Option<UserRecord> {
        self.lock().users.get(&id).cloned()
    }

    fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        let state = self.lock();
        state.users.values().find(|u| u.email == email).cloned()
    }

    fn regular_users(&self) -> Vec<UserRecord> {
        let state = self.lock();
        state.users.values().filter(|u| !u.admin).cloned().collect()
    }

    fn update_user(&self, id: UserId, changes: UserChanges) -> Option<UserRecord> {
        let mut state = self.lock();
        let user = state.users.get_mut(&id)?;
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(tel) = changes.tel {
            user.tel = tel;
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(blocked) = changes.blocked {
            user.blocked = blocked;
        }
        Some(user.clone())
    }

    fn delete_user(&self, id: UserId) -> bool {
        let mut state = self.lock();
        if state.users.remove(&id).is_none() {
            return false;
        }
        state.applications.retain(|_, a| a.user_id != id);
        state.favorites.retain(|(user, _)| *user != id);
        true
    }

    fn users_by_phone_fragment(&self, fragment: &str) -> Vec<UserRecord> {
        let state = self.lock();
        state
            .users
            .values()
            .filter(|u| !u.admin && normalize_phone(&u.tel).contains(fragment))
            .cloned()
            .collect()
    }
}

impl FavoriteRepository for MemoryStore {
    fn add_favorite(&self, user: UserId, office: OfficeId) -> FavoriteChange {
        let mut state = self.lock();
        if state.favorites.insert((user, office)) {
            FavoriteChange::Inserted
        } else {
            FavoriteChange::AlreadyPresent
        }
    }

    fn remove_favorite(&self, user: UserId, office: OfficeId) -> bool {
        self.lock().favorites.remove(&(user, office))
    }

    fn favorites_of(&self, user: UserId) -> Vec<OfficeId> {
        let state = self.lock();
        state
            .favorites
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, office)| *office)
            .collect()
    }
}

impl OfficeRepository for MemoryStore {
    fn insert_office(&self, office: NewOfficeRecord) -> OfficeRecord {
        let mut state = self.lock();
        state.next_office_id += 1;
        let record = OfficeRecord {
            id: OfficeId(state.next_office_id),
            name: office.name,
            address: office.address,
            options: office.options,
            description: office.description,
            area: office.area,
            price: office.price,
            active: office.active,
            photos: Vec::new(),
        };
        state.offices.insert(record.id, record.clone());
        record
    }

    fn office(&self, id: OfficeId) -> Option<OfficeRecord> {
        self.lock().offices.get(&id).cloned()
    }

    fn office_exists(&self, id: OfficeId) -> bool {
        self.lock().offices.contains_key(&id)
    }

    fn offices(&self) -> Vec<OfficeRecord> {
        self.lock().offices.values().cloned().collect()
    }

    fn update_office(&self, id: OfficeId, changes: OfficeChanges) -> Option<OfficeRecord> {
        let mut state = self.lock();
        let office = state.offices.get_mut(&id)?;
        if let Some(name) = changes.name {
            office.name = name;
        }
        if let Some(address) = changes.address {
            office.address = address;
        }
        if let Some(options) = changes.options {
            office.options = options;
        }
        if let Some(description) = changes.description {
            office.description = description;
        }
        if let Some(area) = changes.area {
            office.area = area;
        }
        if let Some(price) = changes.price {
            office.price = price;
        }
        if let Some(active) = changes.active {
            office.active = active;
        }
        Some(office.clone())
    }

    fn delete_office(&self, id: OfficeId) -> bool {
        let mut state = self.lock();
        if state.offices.remove(&id).is_none() {
            return false;
        }
        state.applications.retain(|_, a| a.office_id != id);
        state.favorites.retain(|(_, office)| *office != id);
        true
    }

    fn set_photos(&self, id: OfficeId, photos: Vec<String>) -> Option<OfficeRecord> {
        let mut state = self.lock();
        let office = state.offices.get_mut(&id)?;
        office.photos = photos;
        Some(office.clone())
    }

    fn offices_in_range(&self, criteria: &OfficeSearch) -> Vec<OfficeRecord> {
        let state = self.lock();
        state
            .offices
            .values()
            .filter(|office| criteria.matches(office))
            .cloned()
            .collect()
    }

    fn offices_by_name_fragment(&self, fragment: &str) -> Vec<OfficeRecord> {
        let state = self.lock();
        state
            .offices
            .values()
            .filter(|office| normalize_name(&office.name).contains(fragment))
            .cloned()
            .collect()
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert_application(
        &self,
        user: UserId,
        office: OfficeId,
    ) -> Result<ApplicationRecord, SubmissionConflict> {
        let mut state = self.lock();
        let taken = state
            .applications
            .values()
            .any(|a| a.user_id == user && a.office_id == office);
        if taken {
            return Err(SubmissionConflict);
        }

        state.next_application_id += 1;
        let record = ApplicationRecord {
            id: ApplicationId(state.next_application_id),
            user_id: user,
            office_id: office,
            status: ApplicationStatus::PENDING,
        };
        state.applications.insert(record.id, record);
        Ok(record)
    }

    fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Option<ApplicationRecord> {
        let mut state = self.lock();
        let application = state.applications.get_mut(&id)?;
        application.status = status;
        Some(*application)
    }

    fn applications(&self) -> Vec<ApplicationRecord> {
        self.lock().applications.values().copied().collect()
    }

    fn applications_for_user(&self, user: UserId) -> Vec<ApplicationRecord> {
        let state = self.lock();
        state
            .applications
            .values()
            .filter(|a| a.user_id == user)
            .copied()
            .collect()
    }

    fn delete_application(&self, id: ApplicationId) -> bool {
        self.lock().applications.remove(&id).is_some()
    }
}
