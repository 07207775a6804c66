use async_trait::async_trait;
use portal_core::model::UserId;
use serde_json::Value;
use tracing::warn;

use super::dto::LoginDto;
use super::{Call, Discriminator, HttpPortal, paths};
use crate::repository::{ApiError, AuthRepository, LoginGrant, LoginRequest};

const LOGIN: Discriminator = Discriminator::Source("login");

#[async_trait]
impl AuthRepository for HttpPortal {
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, ApiError> {
        let call = Call::new(LOGIN)
            .with("user_id", request.identifier.trim())
            .with("package_name", self.config().package_name.as_str())
            .with("password", request.otp.trim())
            .with("token", Value::Null);
        let dto: LoginDto = self.post(paths::LOGIN, call).await?.data()?;

        let (Some(token), Some(id)) = (dto.token, dto.id) else {
            warn!("login succeeded without a token or user id");
            return Err(ApiError::Application {
                status: 200,
                message: "Invalid OTP. Please try again.".to_owned(),
            });
        };
        Ok(LoginGrant {
            token,
            user_id: UserId::new(id),
            first_name: dto.first_name,
            picture_url: dto.profile_picture,
        })
    }
}
