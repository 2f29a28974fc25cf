//! The shared user CRUD service.
//!
//! Six mechanical operations, each a fixed path/method/schema combination
//! handed to the [`RequestExecutor`]. Results — success or failure — are
//! returned verbatim; error normalization happens in the adapters, never
//! here.

mod types;

pub use types::{Address, DeletedUser, NewUser, User, UserPage, UserPatch};

use crate::executor::{Request, RequestExecutor};

pub struct UserService {
    executor: RequestExecutor,
}

impl UserService {
    pub fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// GET `/users`
    pub async fn list(&self, limit: Option<u32>, skip: Option<u32>) -> crate::Result<UserPage> {
        let mut request = Request::get("/users");
        if let Some(limit) = limit {
            request = request.query("limit", limit);
        }
        if let Some(skip) = skip {
            request = request.query("skip", skip);
        }
        self.executor.execute(request).await
    }

    /// GET `/users/search`
    pub async fn search(
        &self,
        q: &str,
        limit: Option<u32>,
        skip: Option<u32>,
    ) -> crate::Result<UserPage> {
        let mut request = Request::get("/users/search").query("q", q);
        if let Some(limit) = limit {
            request = request.query("limit", limit);
        }
        if let Some(skip) = skip {
            request = request.query("skip", skip);
        }
        self.executor.execute(request).await
    }

    /// GET `/users/{id}`
    pub async fn get(&self, id: u64) -> crate::Result<User> {
        self.executor.execute(Request::get(format!("/users/{id}"))).await
    }

    /// POST `/users/add`
    pub async fn create(&self, user: &NewUser) -> crate::Result<User> {
        let body = serde_json::to_value(user)?;
        self.executor.execute(Request::post("/users/add", body)).await
    }

    /// PUT `/users/{id}`
    pub async fn update(&self, id: u64, patch: &UserPatch) -> crate::Result<User> {
        let body = serde_json::to_value(patch)?;
        self.executor
            .execute(Request::put(format!("/users/{id}"), body))
            .await
    }

    /// DELETE `/users/{id}`
    pub async fn delete(&self, id: u64) -> crate::Result<DeletedUser> {
        self.executor
            .execute(Request::delete(format!("/users/{id}")))
            .await
    }
}
