//! Middleware for bearer token validation
//!
//! Layer it onto protected routes with
//! `middleware::from_fn_with_state(jwt_service, auth_middleware)`. Requests
//! without a valid token are answered with 401 before the handler runs;
//! accepted requests carry an [`AuthUser`] in their extensions.

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::{debug, warn};

use crate::{error::AuthError, jwt::JwtService, models::AuthUser};

/// Extract and validate the JWT from the Authorization header
pub async fn auth_middleware(
    State(jwt_service): State<JwtService>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        debug!(path = %req.uri().path(), "Missing or malformed bearer token");
        return Err(AuthError::invalid_token());
    };

    let claims = jwt_service.validate_token(bearer.token()).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        AuthError::invalid_token()
    })?;

    req.extensions_mut().insert(AuthUser {
        subject: claims.sub,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtConfig;
    use axum::{
        Extension, Router,
        body::{Body, to_bytes},
        http::{StatusCode, header},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    fn jwt_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "middleware-secret".to_string(),
            algorithm: jsonwebtoken::Algorithm::HS256,
            access_token_expiry: 60,
        })
        .unwrap()
    }

    fn app(jwt_service: JwtService) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthUser>| async move { user.subject }),
            )
            .route_layer(middleware::from_fn_with_state(jwt_service, auth_middleware))
    }

    async fn call(app: Router, authorization: Option<String>) -> (StatusCode, String, bool) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let challenged = response.headers().contains_key(header::WWW_AUTHENTICATE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), challenged)
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_subject() {
        let service = jwt_service();
        let token = service.issue_token("admin@gmail.com").unwrap();

        let (status, body, _) = call(app(service), Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "admin@gmail.com");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let (status, body, challenged) = call(app(jwt_service()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(challenged);
        assert!(body.contains("Could not validate credentials"));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_unauthorized() {
        let (status, _, _) = call(
            app(jwt_service()),
            Some("Basic YWRtaW46YWRtaW4=".to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (status, _, _) = call(app(jwt_service()), Some("Bearer garbage".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        let service = jwt_service();
        let token = service
            .issue_token_at("admin@gmail.com", chrono::Utc::now().timestamp() - 3600)
            .unwrap();

        let (status, _, _) = call(app(service), Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
