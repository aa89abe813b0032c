//! JWT 工具
//!
//! 令牌由外部身份服务签发（HS256，共享 `jwt.secret`），本服务只负责校验。

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色（仅供参考，以存储中的角色为准）
    pub token_type: String, // token类型，只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    /// 解析 sub 中的用户 ID
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok().filter(|id| *id > 0)
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        secret: &str,
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 验证 JWT token
    pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(
        secret: &str,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token(secret, token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}
