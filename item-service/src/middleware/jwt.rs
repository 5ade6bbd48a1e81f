//! JWT authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::{fs, sync::Arc};

use super::route_matcher::PublicRoutes;
use super::token::{extract_token, Claims, TokenValidator};
use crate::{config::JwtConfig, error::Error};

/// JWT authentication middleware state
#[derive(Clone)]
pub struct JwtAuth {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
    public_routes: Arc<PublicRoutes>,
}

impl JwtAuth {
    /// Create the middleware state, reading the key from `config.key_path`
    pub fn new(config: &JwtConfig) -> Result<Self, Error> {
        let key = fs::read(&config.key_path).map_err(|e| {
            let path_display = config.key_path.display().to_string();
            Error::Config(Box::new(figment::Error::from(format!(
                "Failed to read JWT key from path '{}'\n\n\
                Troubleshooting:\n\
                1. Verify the file exists: ls -la {}\n\
                2. Check file permissions (must be readable)\n\
                3. For RS/ES algorithms: Use PEM format public key\n\
                4. For HS algorithms: Use raw secret file\n\n\
                Error: {}",
                path_display, path_display, e
            ))))
        })?;

        Self::from_key(config, &key)
    }

    /// Create the middleware state from key bytes already in memory
    pub fn from_key(config: &JwtConfig, key: &[u8]) -> Result<Self, Error> {
        let algorithm = match config.algorithm.to_uppercase().as_str() {
            "RS256" => Algorithm::RS256,
            "RS384" => Algorithm::RS384,
            "RS512" => Algorithm::RS512,
            "ES256" => Algorithm::ES256,
            "ES384" => Algorithm::ES384,
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            alg => {
                return Err(Error::Config(Box::new(figment::Error::from(format!(
                    "Unsupported JWT algorithm: {}",
                    alg
                )))))
            }
        };

        let decoding_key = match algorithm {
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                DecodingKey::from_rsa_pem(key)?
            }
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key)?,
            _ => DecodingKey::from_secret(key),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        let public_routes = PublicRoutes::compile(&config.public_routes)?;
        tracing::debug!(
            algorithm = ?algorithm,
            public_routes = public_routes.len(),
            "JWT authentication configured"
        );

        Ok(Self {
            decoding_key: Arc::new(decoding_key),
            validation,
            public_routes: Arc::new(public_routes),
        })
    }

    /// Routes that skip authentication
    pub fn public_routes(&self) -> &PublicRoutes {
        &self.public_routes
    }

    /// Middleware function to validate JWT and inject claims
    pub async fn middleware(
        State(auth): State<Self>,
        mut request: Request<Body>,
        next: Next,
    ) -> Result<Response, Error> {
        if auth
            .public_routes
            .is_public(request.method().as_str(), request.uri().path())
        {
            return Ok(next.run(request).await);
        }

        let token = extract_token(request.headers()).inspect_err(|e| {
            tracing::debug!(path = %request.uri().path(), "Rejected request: {}", e);
        })?;

        let claims = auth.validate_token(&token).inspect_err(|e| {
            tracing::warn!(path = %request.uri().path(), "Invalid token: {}", e);
        })?;
        claims.caller()?;

        request.extensions_mut().insert(claims);

        Ok(next.run(request).await)
    }
}

impl TokenValidator for JwtAuth {
    fn validate_token(&self, token: &str) -> Result<Claims, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}
