//! Auth and user endpoints (`/users`)

use shared::client::{AuthResponse, LoginRequest, RegisterRequest};
use shared::models::{User, UserRole, UserUpdate};

use super::DeskClient;
use crate::ClientResult;
use crate::http::HttpClient;

impl<H: HttpClient> DeskClient<H> {
    // ========== Auth API ==========

    /// Login with email and password; on success the session holds the
    /// returned user and token.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: AuthResponse = self.http.post("users/login", &request).await?;
        self.session().login(resp.user.clone(), resp.token);
        Ok(resp.user)
    }

    /// Register a new account and log it in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> ClientResult<User> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
        };
        let resp: AuthResponse = self.http.post("users/register", &request).await?;
        self.session().login(resp.user.clone(), resp.token);
        Ok(resp.user)
    }

    /// Local logout; the backend keeps no server-side session.
    pub fn logout(&self) {
        self.session().logout();
    }

    // ========== Users API ==========

    pub async fn get_user(&self, id: i64) -> ClientResult<User> {
        self.http.get(&format!("users/{}", id)).await
    }

    pub async fn update_user(&self, id: i64, first_name: &str, last_name: &str) -> ClientResult<User> {
        let body = UserUpdate {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.http.put(&format!("users/{}", id), &body).await
    }

    /// Active agents (for the assignment picker)
    pub async fn agents(&self) -> ClientResult<Vec<User>> {
        self.http.get("users/agents").await
    }

    /// Deactivate an account
    pub async fn deactivate_user(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("users/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::RecordingHttp;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_stores_session() {
        let http = RecordingHttp::new(vec![json!({
            "id": 5, "email": "c@x.io", "firstName": "Cy", "lastName": "Doe",
            "role": "CUSTOMER", "token": "abc", "message": "Login successful"
        })]);
        let client = DeskClient::with_http(http);

        let user = client.login("c@x.io", "pw").await.unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(client.session().token().as_deref(), Some("abc"));

        let calls = client.http().calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "users/login");
        assert_eq!(calls[0].body, Some(json!({"email": "c@x.io", "password": "pw"})));

        client.logout();
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_update_user_sends_names_only() {
        let http = RecordingHttp::new(vec![json!({
            "id": 5, "email": "c@x.io", "firstName": "New", "lastName": "Name", "role": "CUSTOMER"
        })]);
        let client = DeskClient::with_http(http);

        let user = client.update_user(5, "New", "Name").await.unwrap();
        assert_eq!(user.full_name(), "New Name");
        let calls = client.http().calls();
        assert_eq!(calls[0].path, "users/5");
        assert_eq!(calls[0].body, Some(json!({"firstName": "New", "lastName": "Name"})));
    }
}
