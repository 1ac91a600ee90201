use axum::http::{HeaderValue, Method};
use configs::{CorsConfig, CorsPolicy};
use tower_http::cors::{AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::errors::StartupError;

/// One CORS layer per route group.
#[derive(Clone)]
pub struct CorsLayers {
    pub producto: CorsLayer,
    pub usuario: CorsLayer,
}

pub fn build_layers(cfg: &CorsConfig) -> Result<CorsLayers, StartupError> {
    Ok(CorsLayers { producto: layer_for(&cfg.producto)?, usuario: layer_for(&cfg.usuario)? })
}

fn layer_for(policy: &CorsPolicy) -> Result<CorsLayer, StartupError> {
    let methods = policy
        .allowed_methods
        .iter()
        .map(|m| {
            Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes())
                .map_err(|_| StartupError::InvalidConfig(format!("invalid CORS method `{m}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let origin = if policy.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins = policy
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim())
                    .map_err(|_| StartupError::InvalidConfig(format!("invalid CORS origin `{o}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(Any))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policies_build() {
        assert!(build_layers(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn wildcard_origin_builds() {
        let mut cfg = CorsConfig::default();
        cfg.producto.allowed_origins = vec!["*".into()];
        assert!(build_layers(&cfg).is_ok());
    }

    #[test]
    fn bad_method_is_rejected() {
        let mut cfg = CorsConfig::default();
        cfg.usuario.allowed_methods = vec!["GE T".into()];
        assert!(matches!(build_layers(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bad_origin_is_rejected() {
        let mut cfg = CorsConfig::default();
        cfg.producto.allowed_origins = vec!["http://bad\norigin".into()];
        assert!(matches!(build_layers(&cfg), Err(StartupError::InvalidConfig(_))));
    }
}
