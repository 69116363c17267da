use std::sync::Arc;

use crate::applications::ApplicationService;
use crate::auth::AdminGate;
use crate::identity::{AuthToken, NewUserRecord, UserRecord, UserRepository};
use crate::offices::{NewOfficeRecord, OfficeRecord, OfficeRepository};
use crate::store::MemoryStore;

pub(super) struct World {
    pub(super) service: ApplicationService<MemoryStore>,
    pub(super) admin: UserRecord,
    pub(super) tenant: UserRecord,
    pub(super) office: OfficeRecord,
}

pub(super) fn world() -> World {
    let store = Arc::new(MemoryStore::default());

    let admin = store
        .insert_user(user_record("admin@example.com", "000-000-0000", true))
        .expect("admin inserts");
    let tenant = store
        .insert_user(user_record("jane@example.com", "111-222-3333", false))
        .expect("tenant inserts");
    let office = store.insert_office(NewOfficeRecord {
        name: "Harbor Loft".to_string(),
        address: "Pier 4".to_string(),
        options: "open plan".to_string(),
        description: "top floor".to_string(),
        area: 85.0,
        price: 2400.0,
        active: true,
    });

    let gate = Arc::new(AdminGate::new(admin.token.clone()));
    let service = ApplicationService::new(store, gate);

    World {
        service,
        admin,
        tenant,
        office,
    }
}

fn user_record(email: &str, tel: &str, admin: bool) -> NewUserRecord {
    NewUserRecord {
        last_name: "Doe".to_string(),
        first_name: if admin { "Admin" } else { "Jane" }.to_string(),
        tel: tel.to_string(),
        age: 32,
        email: email.to_string(),
        password_hash: "$argon2$test".to_string(),
        admin,
        blocked: false,
        token: AuthToken::generate(),
    }
}
