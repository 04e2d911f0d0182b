use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreError;
use crate::store::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub products: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

/// 创建用户的输入，密码已在边界处散列
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub products: BTreeSet<String>,
}

/// 更新用户的输入，只合并提供的字段
#[derive(Debug, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub products: Option<BTreeSet<String>>,
}

#[derive(Default)]
struct IdentityInner {
    /// 主记录，键为 `user:<id>`
    users: HashMap<String, User>,
    /// 二级索引，键为 `user_email:<小写邮箱>`，值为用户ID
    email_index: HashMap<String, String>,
}

/// 用户存储，记录和邮箱索引在同一把锁下变更
#[derive(Default)]
pub struct IdentityStore {
    inner: RwLock<IdentityInner>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, IdentityInner> {
        self.inner.read().expect("identity store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, IdentityInner> {
        self.inner.write().expect("identity store lock poisoned")
    }

    /// 创建用户，邮箱查重和索引写入在同一临界区内完成
    pub fn create(&self, draft: NewUser) -> Result<User, StoreError> {
        let mut inner = self.write();

        let email_key = keys::user_email_key(&draft.email);
        if inner.email_index.contains_key(&email_key) {
            return Err(StoreError::DuplicateEmail(draft.email));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: draft.email,
            password_hash: draft.password_hash,
            name: draft.name,
            role: draft.role,
            products: draft.products,
            created_at: Utc::now(),
        };

        inner.email_index.insert(email_key, user.id.clone());
        inner.users.insert(keys::user_key(&user.id), user.clone());

        Ok(user)
    }

    pub fn get_by_id(&self, user_id: &str) -> Option<User> {
        self.read().users.get(&keys::user_key(user_id)).cloned()
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        let inner = self.read();
        let user_id = inner.email_index.get(&keys::user_email_key(email))?;
        inner.users.get(&keys::user_key(user_id)).cloned()
    }

    /// 合并更新，邮箱变更时在同一临界区内重指索引，不留悬空或重复条目
    pub fn update(&self, user_id: &str, patch: UserPatch) -> Result<User, StoreError> {
        let mut inner = self.write();

        let user_key = keys::user_key(user_id);
        let mut user = inner
            .users
            .get(&user_key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;

        if let Some(new_email) = patch.email {
            let new_key = keys::user_email_key(&new_email);
            let old_key = keys::user_email_key(&user.email);
            if new_key != old_key {
                if inner.email_index.contains_key(&new_key) {
                    return Err(StoreError::DuplicateEmail(new_email));
                }
                inner.email_index.remove(&old_key);
                inner.email_index.insert(new_key, user.id.clone());
            }
            user.email = new_email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(products) = patch.products {
            user.products = products;
        }
        inner.users.insert(user_key, user.clone());

        Ok(user)
    }

    /// 删除用户及其邮箱索引，返回记录是否存在
    pub fn delete(&self, user_id: &str) -> bool {
        let mut inner = self.write();
        match inner.users.remove(&keys::user_key(user_id)) {
            Some(user) => {
                inner.email_index.remove(&keys::user_email_key(&user.email));
                true
            }
            None => false,
        }
    }

    pub fn list_all(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$2b$12$hash".to_string(),
            name: "测试用户".to_string(),
            role: Role::Operator,
            products: BTreeSet::new(),
        }
    }

    #[test]
    fn duplicate_email_rejected_any_casing() {
        let store = IdentityStore::new();
        store.create(draft("a@x.com")).unwrap();

        let err = store.create(draft("A@X.COM")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
    }

    #[test]
    fn lookup_by_email_is_case_insensitive() {
        let store = IdentityStore::new();
        let created = store.create(draft("Ops@Example.com")).unwrap();

        let found = store.get_by_email("ops@example.COM").unwrap();
        assert_eq!(found.id, created.id);
        // 记录中保留原始大小写
        assert_eq!(found.email, "Ops@Example.com");
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let store = IdentityStore::new();
        let created = store.create(draft("a@x.com")).unwrap();

        let updated = store
            .update(
                &created.id,
                UserPatch {
                    name: Some("新名字".to_string()),
                    role: Some(Role::Admin),
                    products: Some(BTreeSet::from(["stigviewer".to_string()])),
                    ..UserPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "新名字");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.password_hash, created.password_hash);
        // 分配后的产品集合立即生效
        assert_eq!(
            store.get_by_id(&created.id).unwrap().products,
            BTreeSet::from(["stigviewer".to_string()])
        );
    }

    #[test]
    fn email_update_repoints_index() {
        let store = IdentityStore::new();
        let created = store.create(draft("old@x.com")).unwrap();

        store
            .update(
                &created.id,
                UserPatch {
                    email: Some("new@x.com".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap();

        assert!(store.get_by_email("old@x.com").is_none());
        assert_eq!(store.get_by_email("new@x.com").unwrap().id, created.id);
        // 旧邮箱可以被重新注册
        assert!(store.create(draft("old@x.com")).is_ok());
    }

    #[test]
    fn email_update_to_taken_address_rejected() {
        let store = IdentityStore::new();
        store.create(draft("a@x.com")).unwrap();
        let second = store.create(draft("b@x.com")).unwrap();

        let err = store
            .update(
                &second.id,
                UserPatch {
                    email: Some("A@x.com".to_string()),
                    ..UserPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        // 失败的更新不能破坏原索引
        assert_eq!(store.get_by_email("b@x.com").unwrap().id, second.id);
    }

    #[test]
    fn delete_removes_record_and_index() {
        let store = IdentityStore::new();
        let created = store.create(draft("a@x.com")).unwrap();

        assert!(store.delete(&created.id));
        assert!(store.get_by_id(&created.id).is_none());
        assert!(store.get_by_email("a@x.com").is_none());
        assert!(!store.delete(&created.id));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = IdentityStore::new();
        let err = store.update("missing", UserPatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
