use runway_core::ControlPlaneError;
use runway_model::ResourceKey;

/// Map a `kube` error for the object at `key` onto the control-plane taxonomy.
///
/// 409 is a name conflict, 404 a missing object, any other API status a rejection.
/// Everything that never produced an API status (connect, TLS, decode) is transport.
pub fn map_error(err: kube::Error, key: ResourceKey) -> ControlPlaneError {
    match err {
        kube::Error::Api(resp) => match resp.code {
            409 => ControlPlaneError::AlreadyExists { key },
            404 => ControlPlaneError::NotFound { key },
            code => ControlPlaneError::Rejected {
                key,
                reason: format!("{} ({code}): {}", resp.reason, resp.message),
            },
        },
        other => ControlPlaneError::Transport(other.to_string()),
    }
}
