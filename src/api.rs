//! REST client for the pins and users backend.
//!
//! Every call is a single request: no retry, caching or de-duplication.
//! Failures come back as [`AppError`] for the caller to log and surface.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::model::{NewPin, Pin};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserRecord {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PinApi {
    config: AppConfig,
}

fn ensure_ok(resp: &Response) -> Result<()> {
    if resp.ok() {
        Ok(())
    } else {
        Err(AppError::Http {
            status: resp.status(),
        })
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    ensure_ok(&resp)?;
    Ok(resp.json::<T>().await?)
}

impl PinApi {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn load_pins(&self) -> Result<Vec<Pin>> {
        let url = self.config.endpoint("/pins");
        log::debug!("GET {url}");
        let resp = Request::get(&url).send().await?;
        decode(resp).await
    }

    pub async fn create_pin(&self, pin: &NewPin) -> Result<Pin> {
        let url = self.config.endpoint("/pins");
        log::debug!("POST {url} at ({}, {})", pin.latitude, pin.longitude);
        let resp = Request::post(&url).json(pin)?.send().await?;
        decode(resp).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<UserRecord> {
        let url = self.config.endpoint("/users/login");
        let resp = Request::post(&url).json(body)?.send().await?;
        decode(resp).await
    }

    /// Registration response body is ignored; the user logs in afterwards.
    pub async fn register(&self, body: &RegisterRequest) -> Result<()> {
        let url = self.config.endpoint("/users/register");
        let resp = Request::post(&url).json(body)?.send().await?;
        ensure_ok(&resp)
    }
}
