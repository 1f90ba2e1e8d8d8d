//! Client ("user") endpoints

use serde::{Deserialize, Serialize};

use super::client::Meta;
use super::error::ApiError;
use super::models::User;
use super::Client;

#[derive(Serialize)]
struct GroupRequest<'a> {
    objects: Vec<GroupObject<'a>>,
}

#[derive(Serialize)]
struct GroupObject<'a> {
    data: &'a User,
}

/// `group/user` answers with one nested envelope per submitted object
#[derive(Deserialize)]
struct GroupResult {
    meta: Meta,
    #[serde(default)]
    data: Vec<User>,
}

#[derive(Serialize)]
struct StationCommand<'a> {
    cmd: &'static str,
    macs: Vec<&'a str>,
}

pub struct UsersApi<'a> {
    client: &'a Client,
    site: &'a str,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a Client, site: &'a str) -> Self {
        Self { client, site }
    }

    /// GET /api/s/{site}/rest/user/{id}
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let users: Vec<User> = self
            .client
            .get(self.site, &format!("rest/user/{}", id))
            .await?;
        users.into_iter().next().ok_or(ApiError::NotFound)
    }

    /// POST /api/s/{site}/group/user
    pub async fn create(&self, user: &User) -> Result<User, ApiError> {
        let request = GroupRequest {
            objects: vec![GroupObject { data: user }],
        };
        let results: Vec<GroupResult> = self.client.post(self.site, "group/user", &request).await?;

        let result = results.into_iter().next().ok_or(ApiError::NotFound)?;
        result.meta.into_result()?;
        result.data.into_iter().next().ok_or(ApiError::NotFound)
    }

    /// PUT /api/s/{site}/rest/user/{id}
    pub async fn update(&self, user: &User) -> Result<User, ApiError> {
        let users: Vec<User> = self
            .client
            .put(self.site, &format!("rest/user/{}", user.id), user)
            .await?;
        users.into_iter().next().ok_or(ApiError::NotFound)
    }

    /// POST /api/s/{site}/cmd/stamgr with `forget-sta`
    pub async fn delete_by_mac(&self, mac: &str) -> Result<(), ApiError> {
        let command = StationCommand {
            cmd: "forget-sta",
            macs: vec![mac],
        };
        self.client
            .post::<serde_json::Value, _>(self.site, "cmd/stamgr", &command)
            .await
            .map(|_| ())
    }
}
