// Username/password exchange for a bearer token.
//
// The server issues JWTs from `POST /api/authenticate`. The returned
// token is stored on the client and sent as `Authorization: Bearer ...`
// on every later request.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Deserialize)]
struct LoginResponse {
    id_token: String,
}

impl ApiClient {
    /// Authenticate with username/password and store the issued token.
    ///
    /// A 401 from the server surfaces as [`Error::Authentication`].
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        let url = self.url("authenticate")?;
        debug!("POST {url} (user={username})");

        let body = LoginRequest {
            username,
            password: password.expose_secret(),
            remember_me: false,
        };
        let resp = self.http().post(url).json(&body).send().await?;
        let login: LoginResponse = self.handle_response(resp).await?;

        if login.id_token.is_empty() {
            return Err(Error::Authentication {
                message: "server returned an empty token".into(),
            });
        }

        self.set_token(SecretString::from(login.id_token));
        Ok(())
    }
}
