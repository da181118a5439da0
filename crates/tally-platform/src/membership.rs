//! REST implementation of the membership gateway
//!
//! Speaks the chat platform's guild/member/role REST API with a bot token.
//! Member sweeps page through the listing endpoint until exhausted; all
//! mutations are single-target calls the engine sequences itself.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use tally_core::traits::{MembershipGateway, RepoResult};
use tally_core::{MemberProfile, RoleColor, RoleProfile, ServerProfile, Snowflake};

use crate::error::{map_mutation_status, map_read_status, map_transport_error};

/// Page size for member sweeps (the platform's maximum)
const MEMBER_PAGE_LIMIT: usize = 1000;

/// Base URL for user/server image assets
const CDN_BASE_URL: &str = "https://cdn.discordapp.com";

/// REST implementation of MembershipGateway
#[derive(Clone)]
pub struct RestMembershipGateway {
    http: Client,
    base_url: String,
}

impl RestMembershipGateway {
    /// Create a gateway against `base_url` authenticating with the bot token
    pub fn new(base_url: impl Into<String>, bot_token: &str) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bot {bot_token}"))
            .unwrap_or_else(|_| header::HeaderValue::from_static("Bot invalid"));
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

// Wire payloads ------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GuildPayload {
    id: Snowflake,
    name: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RolePayload {
    id: Snowflake,
    name: String,
    color: u32,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Snowflake,
    username: String,
    global_name: Option<String>,
    avatar: Option<String>,
    #[serde(default)]
    bot: bool,
}

#[derive(Debug, Deserialize)]
struct MemberPayload {
    user: UserPayload,
    nick: Option<String>,
    #[serde(default)]
    roles: Vec<Snowflake>,
}

impl MemberPayload {
    fn into_profile(self) -> MemberProfile {
        let avatar_url = self.user.avatar.as_ref().map(|hash| {
            format!("{CDN_BASE_URL}/avatars/{}/{hash}.png?size=256", self.user.id)
        });
        let display_name = self
            .nick
            .or(self.user.global_name)
            .unwrap_or(self.user.username);
        MemberProfile {
            user_id: self.user.id,
            display_name,
            role_ids: self.roles,
            avatar_url,
            bot: self.user.bot,
        }
    }
}

// Gateway impl -------------------------------------------------------------

#[async_trait]
impl MembershipGateway for RestMembershipGateway {
    #[instrument(skip(self))]
    async fn fetch_server(&self, server_id: Snowflake) -> RepoResult<Option<ServerProfile>> {
        let response = self
            .http
            .get(self.url(&format!("/guilds/{server_id}")))
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let guild: GuildPayload = response.json().await.map_err(map_transport_error)?;
                let icon_url = guild
                    .icon
                    .map(|hash| format!("{CDN_BASE_URL}/icons/{}/{hash}.png", guild.id));
                Ok(Some(ServerProfile {
                    id: guild.id,
                    name: guild.name,
                    icon_url,
                }))
            }
            status => Err(map_read_status(status, "fetch server")),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_role(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<Option<RoleProfile>> {
        // The platform only exposes the full role list
        let response = self
            .http
            .get(self.url(&format!("/guilds/{server_id}/roles")))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_read_status(status, "fetch roles"));
        }

        let roles: Vec<RolePayload> = response.json().await.map_err(map_transport_error)?;
        Ok(roles.into_iter().find(|r| r.id == role_id).map(|r| RoleProfile {
            id: r.id,
            name: r.name,
            color: RoleColor::new(r.color),
        }))
    }

    #[instrument(skip(self))]
    async fn list_members(&self, server_id: Snowflake) -> RepoResult<Vec<MemberProfile>> {
        let mut members = Vec::new();
        let mut after = Snowflake::new(0);

        loop {
            let response = self
                .http
                .get(self.url(&format!("/guilds/{server_id}/members")))
                .query(&[
                    ("limit", MEMBER_PAGE_LIMIT.to_string()),
                    ("after", after.to_string()),
                ])
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(map_read_status(status, "list members"));
            }

            let page: Vec<MemberPayload> = response.json().await.map_err(map_transport_error)?;
            let page_len = page.len();

            if let Some(last) = page.last() {
                after = last.user.id;
            }
            members.extend(page.into_iter().map(MemberPayload::into_profile));

            if page_len < MEMBER_PAGE_LIMIT {
                break;
            }
        }

        debug!(server_id = %server_id, count = members.len(), "member sweep complete");
        Ok(members)
    }

    #[instrument(skip(self))]
    async fn fetch_member(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberProfile>> {
        let response = self
            .http
            .get(self.url(&format!("/guilds/{server_id}/members/{user_id}")))
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let member: MemberPayload = response.json().await.map_err(map_transport_error)?;
                Ok(Some(member.into_profile()))
            }
            status => Err(map_read_status(status, "fetch member")),
        }
    }

    #[instrument(skip(self))]
    async fn add_role(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()> {
        let response = self
            .http
            .put(self.url(&format!(
                "/guilds/{server_id}/members/{user_id}/roles/{role_id}"
            )))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(map_mutation_status(status, "add role"))
        }
    }

    #[instrument(skip(self))]
    async fn remove_roles(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> RepoResult<()> {
        for role_id in role_ids {
            let response = self
                .http
                .delete(self.url(&format!(
                    "/guilds/{server_id}/members/{user_id}/roles/{role_id}"
                )))
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(map_mutation_status(status, "remove role"));
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn edit_role_color(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
        color: RoleColor,
    ) -> RepoResult<()> {
        let response = self
            .http
            .patch(self.url(&format!("/guilds/{server_id}/roles/{role_id}")))
            .json(&json!({ "color": color.value() }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(map_mutation_status(status, "edit role color"))
        }
    }

    #[instrument(skip(self))]
    async fn fetch_avatar(&self, url: &str) -> RepoResult<Option<Vec<u8>>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bytes = response.bytes().await.map_err(map_transport_error)?;
                Ok(Some(bytes.to_vec()))
            }
            status => Err(map_read_status(status, "fetch avatar")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestMembershipGateway>();
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = RestMembershipGateway::new("https://example.com/api/", "token").unwrap();
        assert_eq!(gateway.url("/guilds/1"), "https://example.com/api/guilds/1");
    }

    #[test]
    fn test_member_payload_display_name_priority() {
        let payload = MemberPayload {
            user: UserPayload {
                id: Snowflake::new(1),
                username: "user".to_string(),
                global_name: Some("global".to_string()),
                avatar: None,
                bot: false,
            },
            nick: Some("nick".to_string()),
            roles: vec![],
        };
        assert_eq!(payload.into_profile().display_name, "nick");

        let payload = MemberPayload {
            user: UserPayload {
                id: Snowflake::new(1),
                username: "user".to_string(),
                global_name: None,
                avatar: None,
                bot: false,
            },
            nick: None,
            roles: vec![],
        };
        assert_eq!(payload.into_profile().display_name, "user");
    }
}
